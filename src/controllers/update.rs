use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::api::PredictionService;
use crate::controllers::{FreshnessMonitor, Lifetime, Trigger};

/// Fallback when a failed update carries no detail
pub const CONNECTION_FAILED: &str = "Connection failed";

/// Lifecycle of the manual data refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Idle,
    Updating,
    Updated,
    Failed(String),
}

/// Drives POST /update-data and refreshes freshness after a successful run
pub struct UpdatePipeline {
    service: Arc<dyn PredictionService>,
    status: Arc<RwLock<UpdateStatus>>,
    freshness: Arc<FreshnessMonitor>,
    lifetime: Lifetime,
    timeout: Duration,
}

impl UpdatePipeline {
    pub fn new(
        service: Arc<dyn PredictionService>,
        freshness: Arc<FreshnessMonitor>,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            status: Arc::new(RwLock::new(UpdateStatus::Idle)),
            freshness,
            lifetime: Lifetime::new(),
            timeout,
        }
    }

    pub async fn status(&self) -> UpdateStatus {
        self.status.read().await.clone()
    }

    pub fn freshness(&self) -> &Arc<FreshnessMonitor> {
        &self.freshness
    }

    /// Run one update. Ignored while another update is running.
    pub async fn trigger(&self) -> Trigger {
        if self.lifetime.is_ended() {
            return Trigger::Ignored;
        }

        {
            let mut status = self.status.write().await;
            if *status == UpdateStatus::Updating {
                debug!("Update already running, ignoring trigger");
                return Trigger::Ignored;
            }
            *status = UpdateStatus::Updating;
        }

        info!("Requesting data update");

        // an abandoned trigger still settles the status
        let task = tokio::spawn(run(
            Arc::clone(&self.status),
            Arc::clone(&self.service),
            Arc::clone(&self.freshness),
            self.lifetime.clone(),
            self.timeout,
        ));

        if let Err(e) = task.await {
            error!("Update task failed: {}", e);
        }

        Trigger::Issued
    }

    pub fn dispose(&self) {
        self.lifetime.end();
        self.freshness.dispose();
    }
}

async fn run(
    status: Arc<RwLock<UpdateStatus>>,
    service: Arc<dyn PredictionService>,
    freshness: Arc<FreshnessMonitor>,
    lifetime: Lifetime,
    timeout: Duration,
) {
    let outcome = match lifetime.guard(timeout, service.update_data()).await {
        Some(outcome) => outcome,
        None => {
            debug!("Discarding update outcome: pipeline disposed");
            return;
        }
    };

    match outcome {
        Ok(ack) => {
            info!(
                "Data update complete{}",
                ack.message.map(|m| format!(": {}", m)).unwrap_or_default()
            );
            *status.write().await = UpdateStatus::Updated;

            // read-after-write: the dataset just changed
            freshness.refresh().await;
        }
        Err(e) => {
            error!("Error updating the data: {}", e);
            let message = e.detail().unwrap_or(CONNECTION_FAILED).to_string();
            *status.write().await = UpdateStatus::Failed(message);
        }
    }
}
