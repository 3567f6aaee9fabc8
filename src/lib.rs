//! Premier League prediction client
//!
//! Fetches fixtures, standings and data freshness from a remote prediction
//! service, drives per-match and ad-hoc predictions, and interprets results
//! into confidence tiers and stat comparisons.

pub mod analysis;
pub mod api;
pub mod config;
pub mod controllers;
pub mod dashboard;
pub mod error;
pub mod matching;
pub mod models;
pub mod render;

pub use error::{PredictorError, Result};
