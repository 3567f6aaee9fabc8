use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date of the most recently ingested match, if the service knows one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessRecord {
    pub last_match_date: Option<NaiveDate>,
}

impl FreshnessRecord {
    pub fn known(date: NaiveDate) -> Self {
        Self {
            last_match_date: Some(date),
        }
    }

    pub fn unknown() -> Self {
        Self {
            last_match_date: None,
        }
    }
}
