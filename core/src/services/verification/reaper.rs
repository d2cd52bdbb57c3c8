//! Background sweeper for expired verification state
//!
//! Deletes expired requests, expired tokens, and issuance log entries older
//! than the daily window. The sweep is an optimization; every read path
//! already treats expired records as absent.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::{PurgeStats, VerificationStore};

use super::service::VerificationService;

/// Periodic sweeper bound to one verification service
pub struct VerificationReaper<S: VerificationStore + 'static> {
    service: Arc<VerificationService<S>>,
    interval: Duration,
}

impl<S: VerificationStore + 'static> VerificationReaper<S> {
    pub fn new(service: Arc<VerificationService<S>>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run a single sweep
    pub async fn run_once(&self) -> DomainResult<PurgeStats> {
        let stats = self.service.purge_expired(Utc::now()).await?;
        if stats.total() > 0 {
            info!(
                requests = stats.requests,
                tokens = stats.tokens,
                issuances = stats.issuances,
                event = "reaper_sweep",
                "Purged expired verification state"
            );
        }
        Ok(stats)
    }

    /// Spawn the sweep loop
    ///
    /// The first sweep runs immediately. The loop runs until
    /// [`ReaperHandle::stop`] is called; failed sweeps are logged and retried
    /// on the next tick.
    pub fn start(self: Arc<Self>) -> ReaperHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.interval;

        let join = tokio::spawn(async move {
            info!(interval_seconds = period.as_secs(), "Verification reaper started");

            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        break;
                    }
                    _ = timer.tick() => {
                        if let Err(e) = self.run_once().await {
                            error!(error = %e, event = "reaper_sweep_failed", "Verification reaper sweep failed");
                        }
                    }
                }
            }

            info!("Verification reaper stopped");
        });

        ReaperHandle { cancel, join }
    }
}

/// Handle to a running reaper
pub struct ReaperHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signal the loop to exit and wait for it
    ///
    /// A sweep in progress is allowed to finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            warn!(error = %e, "Verification reaper task ended abnormally");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }
}
