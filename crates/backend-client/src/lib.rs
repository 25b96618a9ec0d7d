//! HTTP client for the remote analysis service.
//!
//! Implements [`session_core::AnalysisBackend`] against the service's JSON
//! API. Wire shapes live in [`wire`] and are converted to core types at
//! this boundary; malformed payloads surface as typed errors, never
//! panics.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use session_core::{
    AnalysisBackend, AnalysisReply, InstrumentSeries, PredictionSet, SignalFrame, Timeframe,
    WorkbenchError,
};

use wire::{AnalysisRequest, AnalysisResponse, ChatRequest, ChatResponse, PredictResponse, StockDataRequest, StockDataResponse};

/// Connection settings for the analysis service.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let timeout_secs = std::env::var("CHARTMIND_BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Self {
            base_url: std::env::var("CHARTMIND_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(BackendConfig::default())
    }

    /// Service health check.
    pub async fn ping(&self) -> Result<bool, WorkbenchError> {
        let response = self
            .client
            .get(format!("{}/api/ping", self.base_url))
            .send()
            .await
            .map_err(|e| WorkbenchError::Fetch(e.to_string()))?;

        Ok(response.status().is_success())
    }

    /// Fetch the model's multi-horizon price prediction for one symbol.
    pub async fn fetch_prediction(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<PredictionSet, WorkbenchError> {
        tracing::debug!("requesting prediction for {} ({})", symbol, timeframe);
        let request = StockDataRequest {
            symbol: symbol.to_string(),
            timeframe: timeframe.as_str().to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/predict", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkbenchError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::Fetch(format!(
                "prediction request returned HTTP {}",
                response.status()
            )));
        }

        let payload = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| WorkbenchError::Fetch(e.to_string()))?;
        payload.into_prediction()
    }
}

#[async_trait]
impl AnalysisBackend for BackendClient {
    async fn fetch_instrument_data(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<InstrumentSeries, WorkbenchError> {
        tracing::debug!("fetching instrument data for {} ({})", symbol, timeframe);
        let request = StockDataRequest {
            symbol: symbol.to_string(),
            timeframe: timeframe.as_str().to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/stock-data", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkbenchError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::Fetch(format!(
                "stock data request returned HTTP {}",
                response.status()
            )));
        }

        let payload = response
            .json::<StockDataResponse>()
            .await
            .map_err(|e| WorkbenchError::Fetch(e.to_string()))?;
        payload.into_series()
    }

    async fn request_analysis(
        &self,
        symbol: &str,
        signals: &SignalFrame,
    ) -> Result<AnalysisReply, WorkbenchError> {
        tracing::debug!("requesting analysis narrative for {}", symbol);
        let request = AnalysisRequest {
            symbol: symbol.to_string(),
            signals,
        };

        let response = self
            .client
            .post(format!("{}/api/chart-analysis", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkbenchError::Analysis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::Analysis(format!(
                "analysis request returned HTTP {}",
                response.status()
            )));
        }

        let payload = response
            .json::<AnalysisResponse>()
            .await
            .map_err(|e| WorkbenchError::Analysis(e.to_string()))?;

        Ok(AnalysisReply {
            narrative: payload.response,
            session_id: payload.session_id,
        })
    }

    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<String, WorkbenchError> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: session_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkbenchError::Chat(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::Chat(format!(
                "chat request returned HTTP {}",
                response.status()
            )));
        }

        let payload = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| WorkbenchError::Chat(e.to_string()))?;
        Ok(payload.response)
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), WorkbenchError> {
        let response = self
            .client
            .post(format!("{}/api/clear", self.base_url))
            .query(&[("session_id", session_id)])
            .send()
            .await
            .map_err(|e| WorkbenchError::Chat(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::Chat(format!(
                "clear request returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn reset_model(&self) -> Result<(), WorkbenchError> {
        let response = self
            .client
            .post(format!("{}/api/reset-model", self.base_url))
            .send()
            .await
            .map_err(|e| WorkbenchError::Analysis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::Analysis(format!(
                "reset request returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}
