pub mod freshness;
pub mod lab;
pub mod lifetime;
pub mod prediction;
pub mod request;
pub mod update;

pub use freshness::{Freshness, FreshnessMonitor};
pub use lab::PredictionLab;
pub use lifetime::Lifetime;
pub use prediction::PredictionController;
pub use request::{RequestState, Trigger, PREDICT_FAILED_MESSAGE};
pub use update::{UpdatePipeline, UpdateStatus};
