use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};

use crate::api::wire::{self, PredictRequest, UpdateAck};
use crate::api::PredictionService;
use crate::error::{PredictorError, Result};
use crate::models::{FreshnessRecord, Match, PredictionResult, Standing};

/// HTTP client for the prediction backend
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictorError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::body(response).await
    }

    async fn post_text(&self, path: &str, payload: Option<&PredictRequest>) -> Result<String> {
        let url = self.url(path);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).header("Accept", "application/json");
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        Self::body(response).await
    }

    /// Read the body, turning non-success statuses into server errors
    async fn body(response: Response) -> Result<String> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PredictionService for ApiClient {
    async fn upcoming_matches(&self) -> Result<Vec<Match>> {
        let body = self.get_text("/upcoming").await?;
        let matches = wire::decode_matches(&body)?;
        info!("Fetched {} upcoming matches", matches.len());
        Ok(matches)
    }

    async fn standings(&self) -> Result<Vec<Standing>> {
        let body = self.get_text("/standings").await?;
        let table = wire::decode_standings(&body)?;
        info!("Fetched standings ({} teams)", table.len());
        Ok(table)
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult> {
        let body = self.post_text("/predict", Some(request)).await?;
        wire::decode_prediction(&body)
    }

    async fn update_data(&self) -> Result<UpdateAck> {
        let body = self.post_text("/update-data", None).await?;
        Ok(wire::decode_ack(&body))
    }

    async fn last_updated(&self) -> Result<FreshnessRecord> {
        let body = self.get_text("/last-updated").await?;
        wire::decode_freshness(&body)
    }
}

fn status_error(status: StatusCode, body: &str) -> PredictorError {
    match body.trim() {
        "" => PredictorError::Server(status.to_string()),
        text => PredictorError::Server(format!("{} - {}", status, text)),
    }
}
