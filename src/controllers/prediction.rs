use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::api::{PredictRequest, PredictionService};
use crate::controllers::request::{self, RequestCell, RequestState, Trigger};
use crate::controllers::Lifetime;
use crate::models::Match;

/// Predict action for one listed match.
///
/// At most one request is in flight. `Result` is terminal, while `Failed`
/// accepts a retry.
pub struct PredictionController {
    fixture: Match,
    service: Arc<dyn PredictionService>,
    cell: Arc<RequestCell>,
    lifetime: Lifetime,
    timeout: Duration,
}

impl PredictionController {
    pub fn new(fixture: Match, service: Arc<dyn PredictionService>, timeout: Duration) -> Self {
        Self {
            fixture,
            service,
            cell: Arc::new(RequestCell::new()),
            lifetime: Lifetime::new(),
            timeout,
        }
    }

    pub fn fixture(&self) -> &Match {
        &self.fixture
    }

    pub async fn state(&self) -> RequestState {
        self.cell.state().await
    }

    /// Request a prediction unless one is in flight, already succeeded, or the
    /// controller has been disposed
    pub async fn predict(&self) -> Trigger {
        if self.lifetime.is_ended() {
            debug!("Ignoring predict on disposed controller ({})", self.fixture.label());
            return Trigger::Ignored;
        }

        let Some(ticket) = self.cell.begin().await else {
            debug!("Ignoring predict for {}: busy or done", self.fixture.label());
            return Trigger::Ignored;
        };

        let payload = PredictRequest::new(&self.fixture.home_team, &self.fixture.away_team);
        request::dispatch(
            Arc::clone(&self.cell),
            ticket,
            Arc::clone(&self.service),
            self.lifetime.clone(),
            self.timeout,
            payload,
        )
        .await;

        Trigger::Issued
    }

    /// Detach from the owning view. Pending and future outcomes are discarded.
    pub fn dispose(&self) {
        self.lifetime.end();
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_ended()
    }
}
