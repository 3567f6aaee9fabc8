use serde::{Deserialize, Serialize};

use crate::analysis::format_fixed;

/// Predicted match outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Home => "Home Win",
            Outcome::Away => "Away Win",
            Outcome::Draw => "Draw",
        }
    }

    /// Parse the labels the service uses ("Home Win", "Draw", ...) and their short forms
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "home win" | "home" | "h" => Some(Outcome::Home),
            "away win" | "away" | "a" => Some(Outcome::Away),
            "draw" | "d" => Some(Outcome::Draw),
            _ => None,
        }
    }
}

/// Form figures for one side over the service's trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub elo: f64,
    pub goals_scored_avg: f64,
    pub goals_conceded_avg: f64,
    pub wins: u32,
    pub points_earned: u32,
}

/// A successful prediction for one matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub winner: Outcome,

    /// Probability of the predicted outcome, always within [0, 1]
    confidence: f64,

    pub home_stats: TeamStats,
    pub away_stats: TeamStats,
}

impl PredictionResult {
    /// Build a result, clamping confidence into [0, 1]
    pub fn new(winner: Outcome, confidence: f64, home_stats: TeamStats, away_stats: TeamStats) -> Self {
        Self {
            winner,
            confidence: confidence.clamp(0.0, 1.0),
            home_stats,
            away_stats,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a percentage string (e.g., "72.36%")
    pub fn confidence_percent(&self, decimals: u32) -> String {
        format!("{}%", format_fixed(self.confidence * 100.0, decimals))
    }
}
