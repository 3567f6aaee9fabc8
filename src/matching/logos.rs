use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const CREST_BASE: &str = "https://crests.football-data.org";

/// Premier League lion, shown for any unmapped team
const DEFAULT_CREST: &str = "https://crests.football-data.org/PL.png";

/// Built-in short name -> football-data crest id table
const BUILTIN_CRESTS: &[(&str, u32)] = &[
    ("Arsenal", 57),
    ("Aston Villa", 58),
    ("Bournemouth", 1044),
    ("Brentford", 402),
    ("Brighton Hove", 397),
    ("Burnley", 328),
    ("Chelsea", 61),
    ("Crystal Palace", 354),
    ("Everton", 62),
    ("Forest", 351),
    ("Fulham", 63),
    ("Ipswich Town", 349),
    ("Leeds United", 341),
    ("Leicester City", 338),
    ("Liverpool", 64),
    ("Luton", 389),
    ("Man City", 65),
    ("Man United", 66),
    ("Man Utd", 66),
    ("Newcastle", 67),
    ("Nottingham", 351),
    ("Sheffield United", 356),
    ("Southampton", 340),
    ("Spurs", 73),
    ("Sunderland", 71),
    ("Tottenham", 73),
    ("West Ham", 563),
    ("Wolverhampton", 76),
];

/// Resolves team names to crest image URLs by exact name
pub struct LogoResolver {
    /// Map of team name -> crest URL
    crests: HashMap<String, String>,
    default_crest: String,
}

/// Logo table file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoTable {
    /// Crest used for unmapped names
    #[serde(default)]
    pub default: Option<String>,
    pub teams: HashMap<String, String>,
}

impl LogoResolver {
    /// Create a resolver with no mappings
    pub fn new(default_crest: &str) -> Self {
        Self {
            crests: HashMap::new(),
            default_crest: default_crest.to_string(),
        }
    }

    /// Load a crest table from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read logo table file")?;

        let table: LogoTable =
            serde_json::from_str(&content).context("Failed to parse logo table JSON")?;

        let resolver = Self {
            crests: table.teams,
            default_crest: table.default.unwrap_or_else(|| DEFAULT_CREST.to_string()),
        };

        info!("Loaded {} crest mappings", resolver.crests.len());

        Ok(resolver)
    }

    /// Crest URL for a team, falling back to the default crest.
    ///
    /// Matching is exact: no case folding or fuzzy lookup.
    pub fn resolve(&self, team: &str) -> &str {
        match self.crests.get(team) {
            Some(url) => url,
            None => {
                warn!("Missing team logo for: '{}'", team);
                &self.default_crest
            }
        }
    }

    pub fn is_mapped(&self, team: &str) -> bool {
        self.crests.contains_key(team)
    }

    /// Add or replace a mapping
    pub fn add_crest(&mut self, team: &str, url: &str) {
        self.crests.insert(team.to_string(), url.to_string());
    }
}

impl Default for LogoResolver {
    fn default() -> Self {
        let mut resolver = Self::new(DEFAULT_CREST);
        for (team, id) in BUILTIN_CRESTS {
            resolver.add_crest(team, &format!("{}/{}.svg", CREST_BASE, id));
        }
        resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact() {
        let resolver = LogoResolver::default();
        assert_eq!(resolver.resolve("Arsenal"), "https://crests.football-data.org/57.svg");
        assert_eq!(resolver.resolve("Spurs"), resolver.resolve("Tottenham"));
    }

    #[test]
    fn test_unmapped_falls_back() {
        let resolver = LogoResolver::default();
        assert_eq!(resolver.resolve("arsenal"), DEFAULT_CREST);
        assert_eq!(resolver.resolve(""), DEFAULT_CREST);
        assert!(!resolver.is_mapped("Arsenal FC"));
    }

    #[test]
    fn test_injected_table() {
        let mut resolver = LogoResolver::new("default.png");
        resolver.add_crest("Wrexham", "wrexham.svg");
        assert_eq!(resolver.resolve("Wrexham"), "wrexham.svg");
        assert_eq!(resolver.resolve("Arsenal"), "default.png");
    }

    #[test]
    fn test_parse_table_file_format() {
        let json = r#"{"teams": {"Arsenal": "a.svg"}}"#;
        let table: LogoTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.default, None);
        assert_eq!(table.teams["Arsenal"], "a.svg");
    }
}
