//! Periodic load decay.
//!
//! # Responsibilities
//! - Decrement every backend's load estimate on a fixed interval
//! - Emit a statistics snapshot after each tick once traffic has started

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{self, MissedTickBehavior};

use crate::controller::Controller;
use crate::load_balancer::StatisticsSnapshot;
use crate::observability::{logging, metrics};

pub struct DecayMonitor {
    controller: Arc<Controller>,
    interval: Duration,
    snapshots: watch::Sender<Option<StatisticsSnapshot>>,
}

impl DecayMonitor {
    pub fn new(controller: Arc<Controller>, interval: Duration) -> Self {
        let (snapshots, _) = watch::channel(None);
        Self {
            controller,
            interval,
            snapshots,
        }
    }

    /// Receiver for the most recent emitted snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<StatisticsSnapshot>> {
        self.snapshots.subscribe()
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs_f64(), "Decay monitor starting");

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Decay monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn tick(&self) {
        let Some(snapshot) = self.controller.decay_tick() else {
            tracing::trace!("Load decayed, no traffic yet");
            return;
        };
        logging::log_snapshot(&snapshot);
        metrics::record_snapshot(&snapshot);
        self.snapshots.send_replace(Some(snapshot));
    }
}
