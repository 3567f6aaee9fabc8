use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An upcoming fixture as listed by the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Home team short name (e.g., "Man City")
    pub home_team: String,

    /// Away team short name
    pub away_team: String,

    /// Kickoff time (UTC)
    pub date: DateTime<Utc>,

    /// Round number within the season
    pub matchday: u32,
}

impl Match {
    /// Calendar day of kickoff, used for display
    pub fn kickoff_day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Human-readable "Home vs Away" label
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}
