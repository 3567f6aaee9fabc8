use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::api::{PredictRequest, PredictionService};
use crate::controllers::Lifetime;
use crate::models::PredictionResult;

/// Shown when a predict call fails for any network or server reason
pub const PREDICT_FAILED_MESSAGE: &str = "Could not predict the match";

/// Lifecycle of a single predict action
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Requesting,
    Result(PredictionResult),
    Failed(String),
}

impl RequestState {
    pub fn is_requesting(&self) -> bool {
        matches!(self, RequestState::Requesting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            RequestState::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Whether a trigger actually sent a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Issued,
    Ignored,
}

struct Slot {
    state: RequestState,
    generation: u64,
    /// Set from `begin` until the outcome arrives, whatever the generation
    in_flight: bool,
}

/// Claim on the slot for one outbound request
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ticket {
    generation: u64,
}

/// State slot shared by the per-match and lab controllers.
///
/// The generation counter changes whenever the slot is reset or rejected, so an
/// outcome holding an older ticket is dropped instead of applied. Resetting
/// does not free the slot: no new request starts until the outstanding one
/// has settled.
pub(crate) struct RequestCell {
    slot: RwLock<Slot>,
}

impl RequestCell {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot {
                state: RequestState::Idle,
                generation: 0,
                in_flight: false,
            }),
        }
    }

    pub async fn state(&self) -> RequestState {
        self.slot.read().await.state.clone()
    }

    /// Move into `Requesting` if the current state allows a new request
    pub async fn begin(&self) -> Option<Ticket> {
        let mut slot = self.slot.write().await;

        if slot.in_flight {
            return None;
        }

        match slot.state {
            RequestState::Requesting | RequestState::Result(_) => None,
            RequestState::Idle | RequestState::Failed(_) => {
                slot.state = RequestState::Requesting;
                slot.in_flight = true;
                Some(Ticket {
                    generation: slot.generation,
                })
            }
        }
    }

    /// Apply an outcome. Returns false when the ticket is stale.
    pub async fn settle(&self, ticket: Ticket, outcome: Option<PredictionResult>) -> bool {
        let mut slot = self.slot.write().await;
        slot.in_flight = false;

        if slot.generation != ticket.generation {
            return false;
        }

        slot.state = match outcome {
            Some(result) => RequestState::Result(result),
            None => RequestState::Failed(PREDICT_FAILED_MESSAGE.to_string()),
        };
        true
    }

    pub async fn reset(&self) {
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.state = RequestState::Idle;
    }

    /// Fail without a request, dropping any stored result
    pub async fn reject(&self, message: &str) {
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.state = RequestState::Failed(message.to_string());
    }
}

/// Send one predict request for an already claimed ticket and wait for it.
///
/// The request runs on its own task, so the outcome is recorded even if the
/// caller stops waiting.
pub(crate) async fn dispatch(
    cell: Arc<RequestCell>,
    ticket: Ticket,
    service: Arc<dyn PredictionService>,
    lifetime: Lifetime,
    timeout: Duration,
    request: PredictRequest,
) {
    let task = tokio::spawn(async move {
        run(&cell, ticket, service.as_ref(), &lifetime, timeout, request).await
    });

    if let Err(e) = task.await {
        error!("Prediction task failed: {}", e);
    }
}

async fn run(
    cell: &RequestCell,
    ticket: Ticket,
    service: &dyn PredictionService,
    lifetime: &Lifetime,
    timeout: Duration,
    request: PredictRequest,
) {
    info!(
        "Requesting prediction: {} vs {}",
        request.home_team, request.away_team
    );

    let outcome = match lifetime.guard(timeout, service.predict(&request)).await {
        Some(outcome) => outcome,
        None => {
            debug!(
                "Discarding prediction for {} vs {}: owner disposed",
                request.home_team, request.away_team
            );
            return;
        }
    };

    let result = match outcome {
        Ok(result) => {
            info!(
                "Prediction {} vs {}: {} ({:.1}%)",
                request.home_team,
                request.away_team,
                result.winner.label(),
                result.confidence() * 100.0
            );
            Some(result)
        }
        Err(e) => {
            warn!(
                "Prediction failed for {} vs {}: {}",
                request.home_team, request.away_team, e
            );
            None
        }
    };

    if !cell.settle(ticket, result).await {
        debug!(
            "Dropping stale prediction for {} vs {}",
            request.home_team, request.away_team
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::sample_result;
    use crate::models::Outcome;

    #[tokio::test]
    async fn test_begin_blocks_while_requesting_or_done() {
        let cell = RequestCell::new();
        let ticket = cell.begin().await.unwrap();
        assert!(cell.state().await.is_requesting());
        assert!(cell.begin().await.is_none());

        assert!(cell.settle(ticket, Some(sample_result(Outcome::Home, 0.6))).await);
        assert!(cell.begin().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_allows_retry() {
        let cell = RequestCell::new();
        let ticket = cell.begin().await.unwrap();
        cell.settle(ticket, None).await;
        assert_eq!(cell.state().await.error(), Some(PREDICT_FAILED_MESSAGE));

        assert!(cell.begin().await.is_some());
        assert_eq!(cell.state().await, RequestState::Requesting);
    }

    #[tokio::test]
    async fn test_reset_invalidates_ticket() {
        let cell = RequestCell::new();
        let ticket = cell.begin().await.unwrap();
        cell.reset().await;

        assert!(!cell.settle(ticket, Some(sample_result(Outcome::Draw, 0.4))).await);
        assert_eq!(cell.state().await, RequestState::Idle);
    }

    #[tokio::test]
    async fn test_reset_keeps_slot_busy_until_outstanding_request_settles() {
        let cell = RequestCell::new();
        let ticket = cell.begin().await.unwrap();
        cell.reset().await;
        assert_eq!(cell.state().await, RequestState::Idle);
        assert!(cell.begin().await.is_none());

        assert!(!cell.settle(ticket, None).await);
        assert_eq!(cell.state().await, RequestState::Idle);
        assert!(cell.begin().await.is_some());
    }

    #[tokio::test]
    async fn test_reject_clears_result() {
        let cell = RequestCell::new();
        let ticket = cell.begin().await.unwrap();
        cell.settle(ticket, Some(sample_result(Outcome::Away, 0.8))).await;

        cell.reject("nope").await;
        assert_eq!(cell.state().await, RequestState::Failed("nope".to_string()));
    }
}
