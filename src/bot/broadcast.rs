//! Broadcast fan-out with per-recipient failure isolation.

use std::time::Duration;

use tokio::time::timeout;

use super::gateway::Gateway;
use crate::models::ActorId;

/// How long one delivery may take before it counts as failed. Keeps a
/// single dead recipient from stalling the whole fan-out.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub delivered: usize,
    pub total: usize,
}

/// Send `text` to every recipient in the snapshot. A failed or slow
/// delivery is counted and skipped, never propagated.
pub async fn fan_out<G: Gateway>(gateway: &G, recipients: &[ActorId], text: &str) -> Outcome {
    let total = recipients.len();
    let mut delivered = 0;

    for &user in recipients {
        match timeout(SEND_TIMEOUT, gateway.send_text(user, text)).await {
            Ok(Ok(())) => delivered += 1,
            Ok(Err(e)) => tracing::debug!("broadcast delivery to {user} failed: {e}"),
            Err(_) => tracing::debug!("broadcast delivery to {user} timed out"),
        }
    }

    Outcome { delivered, total }
}
