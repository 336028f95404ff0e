use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::realtime::core::SessionRegistry;

/// Evicts sessions whose last heartbeat is older than `timeout`.
///
/// Eviction only changes the registry's notion of "live"; the underlying
/// connection, if still open, is left alone.
pub struct HeartbeatMonitor {
    registry: Arc<SessionRegistry>,
    timeout: Duration,
    interval: Duration,
}

impl HeartbeatMonitor {
    pub fn new(registry: Arc<SessionRegistry>, timeout: Duration, interval: Duration) -> Self {
        Self {
            registry,
            timeout,
            interval,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Scan now. Returns the evicted session ids.
    pub fn sweep(&self) -> Vec<String> {
        self.sweep_at(Instant::now())
    }

    /// Scan as if the current time were `now`.
    pub fn sweep_at(&self, now: Instant) -> Vec<String> {
        let marked: Vec<String> = self
            .registry
            .last_seen()
            .into_iter()
            .filter(|(_, seen)| now.saturating_duration_since(*seen) > self.timeout)
            .map(|(id, _)| id)
            .collect();

        let mut evicted = Vec::with_capacity(marked.len());
        for id in marked {
            // a heartbeat may have landed since the snapshot
            if self.registry.remove_if_stale(&id, now, self.timeout) {
                tracing::info!(session_id = %id, timeout_ms = self.timeout.as_millis() as u64, "evicted stale session");
                evicted.push(id);
            }
        }

        tracing::debug!(
            evicted = evicted.len(),
            remaining = self.registry.count(),
            "heartbeat sweep done"
        );
        evicted
    }

    /// Run `sweep` every `interval` until `shutdown` flips to true.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(self.interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        self.sweep();
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("heartbeat monitor stopped");
        })
    }
}
