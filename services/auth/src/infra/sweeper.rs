use std::sync::Arc;
use std::time::Duration;

use formerr_core::clock::Clock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::domain::repository::{AuthCodeStore, CodeNotifier};
use crate::usecase::authcode::AuthCodeManager;

/// Run `sweep_expired` every `period` until the returned handle is aborted.
///
/// The first sweep happens one full period after spawning.
pub fn spawn_sweeper<S, N, C>(
    manager: Arc<AuthCodeManager<S, N, C>>,
    period: Duration,
) -> JoinHandle<()>
where
    S: AuthCodeStore + 'static,
    N: CodeNotifier + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let evicted = manager.sweep_expired();
            if evicted > 0 {
                info!(evicted, remaining = manager.outstanding(), "swept expired auth codes");
            } else {
                debug!(remaining = manager.outstanding(), "auth code sweep found nothing");
            }
        }
    })
}
