//! JSON shapes exchanged with the prediction service.
//!
//! Every response is decoded into a private raw type first and then checked
//! before it becomes a model. Shape mismatches are reported as
//! [`PredictorError::Server`] instead of leaking half-filled values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PredictorError, Result};
use crate::models::{FreshnessRecord, Match, Outcome, PredictionResult, Standing, TeamStats};

/// Sentinel the service returns when it has no match history at all
const NO_DATA: &str = "No Data";

/// Body of POST /predict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    pub home_team: String,
    pub away_team: String,
}

impl PredictRequest {
    pub fn new(home_team: &str, away_team: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
        }
    }
}

/// Acknowledgement from POST /update-data
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw predict response. The service answers 200 with `{"error": ...}` when it
/// cannot predict, so every field is optional at this stage.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default, alias = "winner")]
    prediction: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default, alias = "homeStats")]
    home_stats: Option<RawTeamStats>,
    #[serde(default, alias = "awayStats")]
    away_stats: Option<RawTeamStats>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTeamStats {
    /// `[elo, wins, draws, losses, scored_avg, conceded_avg, points]`
    Positional(Vec<f64>),
    Named(NamedStats),
}

#[derive(Debug, Deserialize)]
struct NamedStats {
    elo: f64,
    #[serde(alias = "goalsScoredAvg")]
    goals_scored_avg: f64,
    #[serde(alias = "goalsConcededAvg")]
    goals_conceded_avg: f64,
    wins: f64,
    #[serde(alias = "pointsEarned", alias = "points_earned")]
    points: f64,
}

#[derive(Debug, Deserialize)]
struct FreshnessResponse {
    date: Option<String>,
}

pub fn decode_matches(body: &str) -> Result<Vec<Match>> {
    serde_json::from_str(body)
        .map_err(|e| PredictorError::Server(format!("malformed match list: {}", e)))
}

pub fn decode_standings(body: &str) -> Result<Vec<Standing>> {
    serde_json::from_str(body)
        .map_err(|e| PredictorError::Server(format!("malformed standings: {}", e)))
}

pub fn decode_prediction(body: &str) -> Result<PredictionResult> {
    let raw: PredictResponse = serde_json::from_str(body)
        .map_err(|e| PredictorError::Server(format!("malformed prediction: {}", e)))?;

    if let Some(error) = raw.error {
        return Err(PredictorError::Server(error));
    }

    let label = raw
        .prediction
        .ok_or_else(|| missing("prediction"))?;
    let winner = Outcome::from_label(&label)
        .ok_or_else(|| PredictorError::Server(format!("unknown outcome '{}'", label)))?;

    let confidence = raw.confidence.ok_or_else(|| missing("confidence"))?;
    let home_stats = team_stats(raw.home_stats.ok_or_else(|| missing("home_stats"))?)?;
    let away_stats = team_stats(raw.away_stats.ok_or_else(|| missing("away_stats"))?)?;

    Ok(PredictionResult::new(winner, confidence, home_stats, away_stats))
}

pub fn decode_freshness(body: &str) -> Result<FreshnessRecord> {
    let raw: FreshnessResponse = serde_json::from_str(body)
        .map_err(|e| PredictorError::Server(format!("malformed freshness: {}", e)))?;

    let date = match raw.date {
        Some(date) if date.trim() != NO_DATA => date,
        _ => return Ok(FreshnessRecord::unknown()),
    };

    // "2025-01-12", "2025-01-12 00:00:00" and RFC3339 stamps all share the day prefix
    let day = date
        .trim()
        .split(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or_default();

    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(FreshnessRecord::known)
        .map_err(|_| PredictorError::Server(format!("unparseable freshness date '{}'", date)))
}

/// Any success body acknowledges the update. Only an object's string
/// `message` is kept.
pub fn decode_ack(body: &str) -> UpdateAck {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    UpdateAck { message }
}

fn missing(field: &str) -> PredictorError {
    PredictorError::Server(format!("prediction response missing '{}'", field))
}

fn team_stats(raw: RawTeamStats) -> Result<TeamStats> {
    let named = match raw {
        RawTeamStats::Named(named) => named,
        RawTeamStats::Positional(values) => match values.as_slice() {
            [elo, wins, _draws, _losses, scored, conceded, points] => NamedStats {
                elo: *elo,
                goals_scored_avg: *scored,
                goals_conceded_avg: *conceded,
                wins: *wins,
                points: *points,
            },
            _ => {
                return Err(PredictorError::Server(format!(
                    "expected 7 positional team stats, got {}",
                    values.len()
                )))
            }
        },
    };

    Ok(TeamStats {
        elo: named.elo,
        goals_scored_avg: named.goals_scored_avg,
        goals_conceded_avg: named.goals_conceded_avg,
        wins: count(named.wins, "wins")?,
        points_earned: count(named.points, "points")?,
    })
}

/// Whole, non-negative numbers arrive as floats from the model side
fn count(value: f64, field: &str) -> Result<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(PredictorError::Server(format!("'{}' is not a count: {}", field, value)))
    }
}
