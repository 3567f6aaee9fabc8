use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api::{PredictRequest, PredictionService};
use crate::controllers::request::{self, RequestCell, RequestState, Trigger};
use crate::controllers::Lifetime;
use crate::error::{PredictorError, Result};
use crate::matching::Roster;

pub const SAME_TEAM_MESSAGE: &str = "Please select two different teams.";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    home: String,
    away: String,
}

/// Ad-hoc "what-if" simulator over two selectable team slots.
///
/// Follows the per-match predict lifecycle. Changing either slot starts a new
/// matchup: the state returns to `Idle` and any in-flight reply for the old
/// pairing is dropped. A new request still waits for that reply to arrive.
pub struct PredictionLab {
    roster: Roster,
    selection: RwLock<Selection>,
    service: Arc<dyn PredictionService>,
    cell: Arc<RequestCell>,
    lifetime: Lifetime,
    timeout: Duration,
}

impl PredictionLab {
    /// Slots start on the first two roster entries
    pub fn new(roster: Roster, service: Arc<dyn PredictionService>, timeout: Duration) -> Result<Self> {
        let (home, away) = match roster.teams() {
            [home, away, ..] => (home.clone(), away.clone()),
            _ => {
                return Err(PredictorError::Config(
                    "lab roster needs at least two teams".to_string(),
                ))
            }
        };

        Ok(Self {
            roster,
            selection: RwLock::new(Selection { home, away }),
            service,
            cell: Arc::new(RequestCell::new()),
            lifetime: Lifetime::new(),
            timeout,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current (home, away) pair
    pub async fn selection(&self) -> (String, String) {
        let selection = self.selection.read().await;
        (selection.home.clone(), selection.away.clone())
    }

    pub async fn state(&self) -> RequestState {
        self.cell.state().await
    }

    pub async fn select_home(&self, team: &str) -> Result<()> {
        self.select(team, true).await
    }

    pub async fn select_away(&self, team: &str) -> Result<()> {
        self.select(team, false).await
    }

    async fn select(&self, team: &str, home: bool) -> Result<()> {
        if !self.roster.contains(team) {
            return Err(PredictorError::Validation(format!(
                "'{}' is not a selectable team",
                team
            )));
        }

        let mut selection = self.selection.write().await;
        let slot = if home {
            &mut selection.home
        } else {
            &mut selection.away
        };

        if slot.as_str() != team {
            *slot = team.to_string();
            self.cell.reset().await;
        }

        Ok(())
    }

    /// Simulate the selected matchup.
    ///
    /// Identical slots are rejected before anything else with a validation
    /// error, clearing any previous result and sending nothing.
    pub async fn predict(&self) -> Result<Trigger> {
        let selection = self.selection.read().await;

        if selection.home == selection.away {
            self.cell.reject(SAME_TEAM_MESSAGE).await;
            return Err(PredictorError::Validation(SAME_TEAM_MESSAGE.to_string()));
        }

        if self.lifetime.is_ended() {
            return Ok(Trigger::Ignored);
        }

        let Some(ticket) = self.cell.begin().await else {
            debug!(
                "Ignoring lab predict for {} vs {}: busy or done",
                selection.home, selection.away
            );
            return Ok(Trigger::Ignored);
        };

        let payload = PredictRequest::new(&selection.home, &selection.away);
        drop(selection);

        request::dispatch(
            Arc::clone(&self.cell),
            ticket,
            Arc::clone(&self.service),
            self.lifetime.clone(),
            self.timeout,
            payload,
        )
        .await;

        Ok(Trigger::Issued)
    }

    pub fn dispose(&self) {
        self.lifetime.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{sample_result, settle, FakeService};
    use crate::models::Outcome;

    fn lab(service: &Arc<FakeService>) -> Arc<PredictionLab> {
        let service: Arc<dyn PredictionService> = service.clone();
        Arc::new(PredictionLab::new(Roster::default(), service, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_defaults_to_first_two_teams() {
        let lab = lab(&FakeService::new());
        assert_eq!(
            lab.selection().await,
            ("Arsenal".to_string(), "Aston Villa".to_string())
        );
    }

    #[tokio::test]
    async fn test_identical_teams_rejected_without_request() {
        let service = FakeService::new();
        let lab = lab(&service);
        lab.select_away("Arsenal").await.unwrap();

        let err = lab.predict().await.unwrap_err();
        assert_eq!(err, PredictorError::Validation(SAME_TEAM_MESSAGE.to_string()));
        assert_eq!(
            lab.state().await,
            RequestState::Failed(SAME_TEAM_MESSAGE.to_string())
        );
        assert_eq!(service.predict_calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_clears_previous_result() {
        let service = FakeService::new();
        service.push_prediction(Ok(sample_result(Outcome::Home, 0.62)));
        let lab = lab(&service);

        assert_eq!(lab.predict().await.unwrap(), Trigger::Issued);
        assert!(lab.state().await.result().is_some());

        lab.select_home("Aston Villa").await.unwrap();
        assert!(lab.predict().await.is_err());
        assert!(lab.state().await.result().is_none());
        assert_eq!(service.predict_calls(), 1);
    }

    #[tokio::test]
    async fn test_validation_wins_over_in_flight_request() {
        let service = FakeService::new();
        let gate = service.push_prediction_held(Ok(sample_result(Outcome::Away, 0.57)));
        let lab = lab(&service);

        let pending = {
            let lab = Arc::clone(&lab);
            tokio::spawn(async move { lab.predict().await })
        };
        settle().await;
        assert!(lab.state().await.is_requesting());

        lab.select_home("Aston Villa").await.unwrap();
        assert!(matches!(lab.predict().await, Err(PredictorError::Validation(_))));

        gate.notify_one();
        pending.await.unwrap().unwrap();

        // the reply belonged to the old pairing
        assert_eq!(
            lab.state().await,
            RequestState::Failed(SAME_TEAM_MESSAGE.to_string())
        );
        assert_eq!(service.predict_calls(), 1);
    }

    #[tokio::test]
    async fn test_reselect_mid_flight_sends_no_second_request() {
        let service = FakeService::new();
        let gate = service.push_prediction_held(Ok(sample_result(Outcome::Away, 0.57)));
        service.push_prediction(Ok(sample_result(Outcome::Home, 0.64)));
        let lab = lab(&service);

        let pending = {
            let lab = Arc::clone(&lab);
            tokio::spawn(async move { lab.predict().await })
        };
        settle().await;

        lab.select_away("Chelsea").await.unwrap();
        assert_eq!(lab.predict().await.unwrap(), Trigger::Ignored);
        assert_eq!(service.predict_calls(), 1);

        gate.notify_one();
        pending.await.unwrap().unwrap();
        assert_eq!(lab.state().await, RequestState::Idle);

        assert_eq!(lab.predict().await.unwrap(), Trigger::Issued);
        assert_eq!(service.requests()[1], PredictRequest::new("Arsenal", "Chelsea"));
        assert_eq!(
            lab.state().await.result().map(|r| r.winner),
            Some(Outcome::Home)
        );
    }

    #[tokio::test]
    async fn test_new_selection_allows_new_prediction() {
        let service = FakeService::new();
        service.push_prediction(Ok(sample_result(Outcome::Home, 0.62)));
        service.push_prediction(Ok(sample_result(Outcome::Draw, 0.38)));
        let lab = lab(&service);

        lab.predict().await.unwrap();
        assert_eq!(lab.predict().await.unwrap(), Trigger::Ignored);

        lab.select_away("Chelsea").await.unwrap();
        assert_eq!(lab.state().await, RequestState::Idle);
        assert_eq!(lab.predict().await.unwrap(), Trigger::Issued);

        let requests = service.requests();
        assert_eq!(requests[1], PredictRequest::new("Arsenal", "Chelsea"));
        assert_eq!(
            lab.state().await.result().map(|r| r.winner),
            Some(Outcome::Draw)
        );
    }

    #[tokio::test]
    async fn test_unknown_team_rejected() {
        let lab = lab(&FakeService::new());
        assert!(matches!(
            lab.select_home("Real Madrid").await,
            Err(PredictorError::Validation(_))
        ));
        assert_eq!(lab.selection().await.0, "Arsenal");
    }

    #[tokio::test]
    async fn test_failed_prediction_message() {
        let service = FakeService::new();
        service.push_prediction(Err(PredictorError::Server("500 - boom".into())));
        let lab = lab(&service);

        lab.predict().await.unwrap();
        assert_eq!(
            lab.state().await.error(),
            Some(crate::controllers::PREDICT_FAILED_MESSAGE)
        );
    }
}
