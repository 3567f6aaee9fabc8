pub mod fixture;
pub mod freshness;
pub mod prediction;
pub mod standing;

pub use fixture::Match;
pub use freshness::FreshnessRecord;
pub use prediction::{Outcome, PredictionResult, TeamStats};
pub use standing::{Standing, TableZone};
