//! Plain-text views for the CLI.

use std::fmt::Write;

use crate::analysis::{stat_rows, StatComparison, TierTable};
use crate::controllers::{Freshness, RequestState, UpdateStatus};
use crate::dashboard::TableState;
use crate::matching::LogoResolver;
use crate::models::{Match, PredictionResult, TableZone};

/// Decimals used for confidence on match cards
const CARD_DECIMALS: u32 = 2;

/// Decimals used for confidence in the lab
const LAB_DECIMALS: u32 = 1;

pub fn match_card(fixture: &Match, state: &RequestState, logos: &LogoResolver, tiers: &TierTable) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} vs {}  ({}, matchday {})",
        fixture.home_team,
        fixture.away_team,
        fixture.kickoff_day(),
        fixture.matchday
    );
    let _ = writeln!(out, "  crests: {} | {}", logos.resolve(&fixture.home_team), logos.resolve(&fixture.away_team));

    match state {
        RequestState::Idle => {}
        RequestState::Requesting => {
            let _ = writeln!(out, "  Thinking...");
        }
        RequestState::Result(result) => out.push_str(&prediction(result, tiers, CARD_DECIMALS)),
        RequestState::Failed(message) => {
            let _ = writeln!(out, "  {}", message);
        }
    }

    out
}

pub fn lab(home: &str, away: &str, state: &RequestState, tiers: &TierTable) -> String {
    let mut out = format!("Prediction Lab: {} vs {}\n", home, away);

    match state {
        RequestState::Idle => {}
        RequestState::Requesting => out.push_str("  Calculating probabilities...\n"),
        RequestState::Result(result) => out.push_str(&prediction(result, tiers, LAB_DECIMALS)),
        RequestState::Failed(message) => {
            let _ = writeln!(out, "  {}", message);
        }
    }

    out
}

/// Winner, confidence with its tier, and the stat breakdown
pub fn prediction(result: &PredictionResult, tiers: &TierTable, decimals: u32) -> String {
    let mut out = String::new();
    let tier = tiers.classify(Some(result.confidence()));

    let _ = writeln!(out, "  Winner: {}", result.winner.label());
    let _ = writeln!(
        out,
        "  Confidence: {} [{}]",
        result.confidence_percent(decimals),
        tier
    );

    match stat_rows(result) {
        Ok(rows) => {
            for row in rows {
                let _ = writeln!(out, "  {:<22}{}", row.label, stat_cells(&row.comparison));
            }
        }
        Err(e) => {
            let _ = writeln!(out, "  {}", e.user_message());
        }
    }

    out
}

/// Better side gets a `*`
fn stat_cells(comparison: &StatComparison) -> String {
    let mark = |better: bool| if better { "*" } else { " " };
    format!(
        "{:>8}{} | {:<8}{}",
        comparison.home_display,
        mark(comparison.home_better),
        comparison.away_display,
        mark(comparison.away_better)
    )
}

pub fn table(table: &TableState) -> String {
    let standings = match table {
        TableState::Loaded(standings) => standings,
        TableState::Failed(message) => return format!("{}\n", message),
    };

    let mut out = String::from("Premier League Table\n");
    let _ = writeln!(out, "{:>3}  {:<18}{:>4}{:>5}{:>5}", "#", "Team", "PL", "GD", "Pts");

    for row in standings {
        let zone = match row.zone() {
            TableZone::ChampionsLeague => "UCL",
            TableZone::Relegation => "REL",
            TableZone::MidTable => "",
        };
        let _ = writeln!(
            out,
            "{:>3}  {:<18}{:>4}{:>5}{:>5}  {}",
            row.position, row.name, row.played, row.goal_difference, row.points, zone
        );
    }

    out
}

pub fn update_pane(freshness: Freshness, status: &UpdateStatus) -> String {
    let mut out = String::new();

    if let UpdateStatus::Failed(message) = status {
        let _ = writeln!(out, "Something went wrong! {}", message);
    }

    match status {
        UpdateStatus::Updated => out.push_str("The matches are up to date!!\n"),
        UpdateStatus::Updating => out.push_str("Updating...\n"),
        _ => {
            let _ = writeln!(out, "Current last match: {}", freshness);
        }
    }

    out
}
