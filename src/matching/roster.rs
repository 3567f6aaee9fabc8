use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Clubs offered by the lab when no roster file is configured
const DEFAULT_TEAMS: &[&str] = &[
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton Hove",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Forest",
    "Fulham",
    "Leeds United",
    "Liverpool",
    "Man City",
    "Man United",
    "Newcastle",
    "Sunderland",
    "Tottenham",
    "West Ham",
    "Wolverhampton",
];

/// Ordered list of teams selectable in the prediction lab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    teams: Vec<String>,
}

impl Roster {
    pub fn new(teams: Vec<String>) -> Self {
        Self { teams }
    }

    /// Load a roster from a JSON file (`{"teams": [...]}`)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read roster file")?;
        let roster: Roster =
            serde_json::from_str(&content).context("Failed to parse roster JSON")?;

        info!("Loaded roster with {} teams", roster.teams.len());

        Ok(roster)
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn contains(&self, team: &str) -> bool {
        self.teams.iter().any(|t| t == team)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect())
    }
}
