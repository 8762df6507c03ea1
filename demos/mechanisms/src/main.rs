//! Mechanism descriptor demo.
//!
//! Plays the part of a negotiation layer: decodes mechanisms, shares each one
//! with several concurrent readers, then takes a private copy and rewrites it
//! without disturbing the shared value.
//!
//!   cargo run -p nsm-demo-mechanisms -- --readers 8
//!   NSM_MECHANISMS=mechanisms.json cargo run -p nsm-demo-mechanisms

mod config;
mod readers;

use clap::Parser;
use config::Config;
use nsm_apis::codec;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mechanisms=info".parse()?))
        .init();

    let config = Config::parse();
    let mechanisms = config.load().await?;
    tracing::info!("Loaded {} mechanisms", mechanisms.len());

    for mechanism in mechanisms {
        let private = readers::share_and_rewrite(mechanism, config.readers).await?;
        println!("{}", String::from_utf8(codec::encode(&private)?)?);
    }

    Ok(())
}
