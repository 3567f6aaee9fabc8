use serde::Serialize;

use crate::error::{PredictorError, Result};
use crate::models::PredictionResult;

/// Side-by-side view of one statistic with the better side flagged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatComparison {
    pub home_display: String,
    pub away_display: String,
    pub home_better: bool,
    pub away_better: bool,
}

impl StatComparison {
    pub fn is_tie(&self) -> bool {
        !self.home_better && !self.away_better
    }
}

/// Compare two statistic values.
///
/// Equal values are a tie whatever `lower_is_better` says. Otherwise the larger
/// value wins, or the smaller one when `lower_is_better` is set.
pub fn compare(home: f64, away: f64, lower_is_better: bool, decimals: u32) -> Result<StatComparison> {
    for value in [home, away] {
        if !value.is_finite() {
            return Err(PredictorError::MalformedStatistic(value.to_string()));
        }
    }

    let (home_better, away_better) = if home == away {
        (false, false)
    } else if lower_is_better {
        (home < away, away < home)
    } else {
        (home > away, away > home)
    };

    Ok(StatComparison {
        home_display: format_fixed(home, decimals),
        away_display: format_fixed(away, decimals),
        home_better,
        away_better,
    })
}

/// Same as [`compare`], for values that arrive as text
pub fn compare_raw(home: &str, away: &str, lower_is_better: bool, decimals: u32) -> Result<StatComparison> {
    compare(parse_stat(home)?, parse_stat(away)?, lower_is_better, decimals)
}

fn parse_stat(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PredictorError::MalformedStatistic(raw.to_string()))
}

/// Round half away from zero to `decimals` places and format with exactly that many digits
pub fn format_fixed(value: f64, decimals: u32) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // avoid printing "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", decimals as usize, rounded)
}

/// One labelled row of the prediction breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    pub label: &'static str,
    pub comparison: StatComparison,
}

/// The standard breakdown shown under a prediction
pub fn stat_rows(result: &PredictionResult) -> Result<Vec<StatRow>> {
    let home = &result.home_stats;
    let away = &result.away_stats;

    let rows: [(&str, f64, f64, bool, u32); 5] = [
        ("Elo", home.elo, away.elo, false, 0),
        ("Goals scored (avg)", home.goals_scored_avg, away.goals_scored_avg, false, 2),
        ("Goals conceded (avg)", home.goals_conceded_avg, away.goals_conceded_avg, true, 2),
        ("Wins", f64::from(home.wins), f64::from(away.wins), false, 0),
        ("Points", f64::from(home.points_earned), f64::from(away.points_earned), false, 0),
    ];

    rows.into_iter()
        .map(|(label, h, a, lower_is_better, decimals)| {
            Ok(StatRow {
                label,
                comparison: compare(h, a, lower_is_better, decimals)?,
            })
        })
        .collect()
}
