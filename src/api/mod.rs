pub mod client;
pub mod wire;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FreshnessRecord, Match, PredictionResult, Standing};

pub use client::ApiClient;
pub use wire::{PredictRequest, UpdateAck};

/// Remote prediction service. The model behind it is opaque to this crate.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// GET /upcoming, in server order
    async fn upcoming_matches(&self) -> Result<Vec<Match>>;

    /// GET /standings
    async fn standings(&self) -> Result<Vec<Standing>>;

    /// POST /predict
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult>;

    /// POST /update-data
    async fn update_data(&self) -> Result<UpdateAck>;

    /// GET /last-updated
    async fn last_updated(&self) -> Result<FreshnessRecord>;
}
