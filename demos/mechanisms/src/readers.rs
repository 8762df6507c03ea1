//! Concurrent readers over one shared mechanism.

use futures_util::future::try_join_all;
use nsm_apis::{DeepCopy, Mechanism};
use std::sync::Arc;

const NEGOTIATED_BY: &str = "negotiated_by";

/// Hand `mechanism` to `readers` tasks that each take a private copy, check
/// every copy against the shared value, then rewrite a copy of our own.
pub async fn share_and_rewrite(mechanism: Mechanism, readers: u16) -> anyhow::Result<Mechanism> {
    let shared = Arc::new(mechanism);

    let tasks = (0..readers).map(|reader| {
        let shared = Arc::clone(&shared);
        tokio::spawn(async move { (reader, Mechanism::deep_copy(Some(&shared))) })
    });

    for (reader, copy) in try_join_all(tasks).await? {
        if copy.as_ref() != Some(&*shared) {
            tracing::warn!(reader, "copy diverged from {}", shared);
            anyhow::bail!("reader {reader} saw a different {} mechanism", shared.kind());
        }
    }
    tracing::info!(readers, "{} readers agree on {}", readers, shared);

    let mut private = Arc::clone(&shared);
    rewrite(Arc::make_mut(&mut private));
    tracing::info!("rewrote private copy: {} -> {}", shared, private);

    Ok(Arc::unwrap_or_clone(private))
}

fn rewrite(mechanism: &mut Mechanism) {
    match mechanism {
        Mechanism::Local(m) => {
            m.set_parameter(NEGOTIATED_BY, "mechanisms");
        }
        Mechanism::Remote(m) => {
            m.set_parameter(NEGOTIATED_BY, "mechanisms");
        }
        Mechanism::Empty(_) => {}
    }
}
