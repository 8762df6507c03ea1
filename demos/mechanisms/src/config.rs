//! Command-line and environment configuration.

use anyhow::Context;
use clap::Parser;
use nsm_apis::{Empty, LocalMechanism, Mechanism, RemoteMechanism, codec};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mechanisms", version, about = "Share and rewrite mechanism descriptors")]
pub struct Config {
    /// JSON array of tagged mechanisms to load instead of the built-in samples
    #[arg(long, env = "NSM_MECHANISMS")]
    pub input: Option<PathBuf>,

    /// Concurrent readers per mechanism
    #[arg(
        long,
        env = "NSM_READERS",
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub readers: u16,
}

impl Config {
    pub async fn load(&self) -> anyhow::Result<Vec<Mechanism>> {
        let Some(path) = &self.input else {
            return Ok(samples());
        };
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        codec::decode(&bytes).with_context(|| format!("decoding {}", path.display()))
    }
}

fn samples() -> Vec<Mechanism> {
    vec![
        LocalMechanism::from_parameters([("ifname", "eth0"), ("netns", "/proc/1/ns/net")]).into(),
        RemoteMechanism::new()
            .with_parameter("src_ip", "10.0.0.1")
            .with_parameter("dst_ip", "10.0.0.2")
            .with_parameter("vni", "42")
            .into(),
        RemoteMechanism::new().into(),
        Empty::new().into(),
    ]
}
