use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Confidence tier, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Risk,
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Risk => "risk",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Risk => "Risk",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        };
        write!(f, "{}", label)
    }
}

/// Cutoff table mapping confidence values to tiers.
///
/// Each entry activates its tier for any confidence at or above the cutoff.
/// `Risk` is the implicit floor below the first cutoff, so the table always
/// partitions [0, 1] without gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    cutoffs: Vec<(f64, Tier)>,
}

impl TierTable {
    /// Build a table, rejecting cutoffs that are out of range or not strictly increasing
    pub fn new(cutoffs: Vec<(f64, Tier)>) -> Result<Self> {
        let mut previous: Option<(f64, Tier)> = None;

        for &(cutoff, tier) in &cutoffs {
            if !(0.0..=1.0).contains(&cutoff) {
                return Err(PredictorError::Config(format!(
                    "tier cutoff {} for {} is outside [0, 1]",
                    cutoff, tier
                )));
            }

            if tier == Tier::Risk {
                return Err(PredictorError::Config(
                    "Risk is the floor tier and cannot have a cutoff".to_string(),
                ));
            }

            if let Some((prev_cutoff, prev_tier)) = previous {
                if cutoff <= prev_cutoff || tier <= prev_tier {
                    return Err(PredictorError::Config(format!(
                        "tier cutoffs must be strictly increasing: {} ({}) follows {} ({})",
                        tier, cutoff, prev_tier, prev_cutoff
                    )));
                }
            }

            previous = Some((cutoff, tier));
        }

        Ok(Self { cutoffs })
    }

    /// Bronze/Silver/Gold cutoffs in one call
    pub fn from_cutoffs(bronze: f64, silver: f64, gold: f64) -> Result<Self> {
        Self::new(vec![
            (bronze, Tier::Bronze),
            (silver, Tier::Silver),
            (gold, Tier::Gold),
        ])
    }

    /// Highest tier whose cutoff is at or below the confidence.
    ///
    /// Missing or NaN confidence gets no tier and falls to `Risk`. Other values
    /// are clamped into [0, 1] first.
    pub fn classify(&self, confidence: Option<f64>) -> Tier {
        let confidence = match confidence {
            Some(c) if !c.is_nan() => c.clamp(0.0, 1.0),
            _ => return Tier::Risk,
        };

        self.cutoffs
            .iter()
            .rev()
            .find(|(cutoff, _)| *cutoff <= confidence)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Risk)
    }

    pub fn cutoffs(&self) -> &[(f64, Tier)] {
        &self.cutoffs
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            cutoffs: vec![(0.55, Tier::Bronze), (0.60, Tier::Silver), (0.70, Tier::Gold)],
        }
    }
}

/// Parses "bronze,silver,gold" cutoff lists such as `0.45,0.50,0.55`
impl FromStr for TierTable {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    PredictorError::Config(format!("invalid tier cutoff '{}'", part.trim()))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            [bronze, silver, gold] => Self::from_cutoffs(*bronze, *silver, *gold),
            _ => Err(PredictorError::Config(format!(
                "expected 3 tier cutoffs (bronze,silver,gold), got {}",
                values.len()
            ))),
        }
    }
}
