//! HTTP access to the provider's model listing.

use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::raw::{ApiResponse, RawModel};

/// Anything that can produce a batch of raw provider records. The HTTP
/// gateway is the production implementation; tests inject stubs. Always
/// passed into the pipeline explicitly, never held as a process-wide
/// singleton.
#[allow(async_fn_in_trait)]
pub trait FetchModels {
    async fn fetch_models(&self) -> Result<Vec<RawModel>, AppError>;
}

/// Gateway over the provider's models endpoint.
#[derive(Debug, Clone)]
pub struct HttpModelGateway {
    http: reqwest::Client,
    models_url: String,
}

impl HttpModelGateway {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            models_url: config.models_url.clone(),
        })
    }
}

impl FetchModels for HttpModelGateway {
    /// One GET, one batch. Failures propagate as a single error; there is
    /// no partial-batch recovery.
    async fn fetch_models(&self) -> Result<Vec<RawModel>, AppError> {
        let response = self
            .http
            .get(&self.models_url)
            .send()
            .await?
            .error_for_status()?;
        let body: ApiResponse = response.json().await?;
        tracing::debug!("Fetched {} models from {}", body.data.len(), self.models_url);
        Ok(body.data)
    }
}
