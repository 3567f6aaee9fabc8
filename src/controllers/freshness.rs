use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::PredictionService;
use crate::controllers::Lifetime;

/// Last-known match date as displayed next to the update button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Checking,
    Known(NaiveDate),
    Unknown,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::Checking => write!(f, "Checking..."),
            Freshness::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Freshness::Unknown => write!(f, "Unknown"),
        }
    }
}

struct Tracker {
    status: Freshness,
    /// Sequence number of the most recently issued query
    issued: u64,
    /// Sequence number of the query whose reply is currently shown
    applied: u64,
}

/// Holds the dataset freshness indicator.
///
/// Queries may overlap (mount and post-update). Each carries a sequence number
/// and a reply older than the one already applied is dropped.
pub struct FreshnessMonitor {
    service: Arc<dyn PredictionService>,
    tracker: RwLock<Tracker>,
    lifetime: Lifetime,
    timeout: Duration,
}

impl FreshnessMonitor {
    pub fn new(service: Arc<dyn PredictionService>, timeout: Duration) -> Self {
        Self {
            service,
            tracker: RwLock::new(Tracker {
                status: Freshness::Checking,
                issued: 0,
                applied: 0,
            }),
            lifetime: Lifetime::new(),
            timeout,
        }
    }

    pub async fn status(&self) -> Freshness {
        self.tracker.read().await.status
    }

    /// Query the service and apply the reply unless a newer one already landed.
    /// Failures settle to `Unknown`.
    pub async fn refresh(&self) -> Freshness {
        if self.lifetime.is_ended() {
            return self.status().await;
        }

        let seq = {
            let mut tracker = self.tracker.write().await;
            tracker.issued += 1;
            tracker.issued
        };

        debug!("Freshness query #{} issued", seq);

        let outcome = match self.lifetime.guard(self.timeout, self.service.last_updated()).await {
            Some(outcome) => outcome,
            None => {
                debug!("Discarding freshness reply #{}: monitor disposed", seq);
                return self.status().await;
            }
        };

        let mut tracker = self.tracker.write().await;

        if seq < tracker.applied {
            debug!(
                "Discarding stale freshness reply #{} (already showing #{})",
                seq, tracker.applied
            );
            return tracker.status;
        }

        tracker.applied = seq;
        tracker.status = match outcome {
            Ok(record) => match record.last_match_date {
                Some(date) => {
                    info!("Last match in dataset: {}", date);
                    Freshness::Known(date)
                }
                None => Freshness::Unknown,
            },
            Err(e) => {
                warn!("Freshness query failed, showing Unknown: {}", e);
                Freshness::Unknown
            }
        };

        tracker.status
    }

    pub fn dispose(&self) {
        self.lifetime.end();
    }
}
