use serde::{Deserialize, Serialize};

/// Last position that qualifies for the Champions League
const UCL_CUTOFF: u32 = 4;

/// First relegation position in a 20-club league
const RELEGATION_START: u32 = 18;

/// One row of the league table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub position: u32,
    pub name: String,
    pub played: u32,
    pub goal_difference: i32,
    pub points: u32,

    #[serde(default)]
    pub won: Option<u32>,
    #[serde(default)]
    pub draw: Option<u32>,
    #[serde(default)]
    pub lost: Option<u32>,
}

/// Table region a position falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableZone {
    ChampionsLeague,
    MidTable,
    Relegation,
}

impl Standing {
    pub fn zone(&self) -> TableZone {
        if self.position <= UCL_CUTOFF {
            TableZone::ChampionsLeague
        } else if self.position >= RELEGATION_START {
            TableZone::Relegation
        } else {
            TableZone::MidTable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(position: u32) -> Standing {
        Standing {
            position,
            name: "Fulham".to_string(),
            played: 20,
            goal_difference: 0,
            points: 28,
            won: None,
            draw: None,
            lost: None,
        }
    }

    #[test]
    fn test_zone_boundaries() {
        assert_eq!(row(1).zone(), TableZone::ChampionsLeague);
        assert_eq!(row(4).zone(), TableZone::ChampionsLeague);
        assert_eq!(row(5).zone(), TableZone::MidTable);
        assert_eq!(row(17).zone(), TableZone::MidTable);
        assert_eq!(row(18).zone(), TableZone::Relegation);
        assert_eq!(row(20).zone(), TableZone::Relegation);
    }

    #[test]
    fn test_deserialize_with_optional_columns() {
        let json = r#"{"position": 3, "name": "Arsenal", "played": 21,
                       "goalDifference": 22, "points": 43, "won": 12}"#;
        let standing: Standing = serde_json::from_str(json).unwrap();
        assert_eq!(standing.goal_difference, 22);
        assert_eq!(standing.won, Some(12));
        assert_eq!(standing.lost, None);
    }
}
