pub mod error;

pub use error::{FinbertError, FinbertResult};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 3-way class probabilities for one scored text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<ClassProbabilities>,
}

#[derive(Debug, Clone, Serialize)]
struct PredictRequest {
    texts: Vec<String>,
    truncate: bool,
}

/// Configuration for the sentiment inference service.
#[derive(Debug, Clone)]
pub struct FinbertConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl FinbertConfig {
    /// Read configuration from the environment (with `.env` support).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("FINBERT_URL")
            .unwrap_or_else(|_| "http://localhost:8003".to_string());
        let timeout_secs = std::env::var("FINBERT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for FinbertConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8003".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// HTTP client for the remote FinBERT-style classifier.
///
/// The model is served out-of-process; inference here is a stateless POST,
/// safe to share across concurrent analysis tasks.
#[derive(Clone)]
pub struct FinbertClient {
    client: reqwest::Client,
    base_url: String,
}

impl FinbertClient {
    pub fn new(config: FinbertConfig) -> FinbertResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Classify a batch of texts into {negative, neutral, positive}
    /// probability distributions, one per input text.
    pub async fn predict(&self, texts: Vec<String>) -> FinbertResult<PredictResponse> {
        let request = PredictRequest { texts, truncate: true };

        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FinbertError::ServiceUnavailable(format!(
                "status: {}",
                response.status()
            )));
        }

        let result = response.json::<PredictResponse>().await?;
        Ok(result)
    }

    /// Check service health
    pub async fn health(&self) -> FinbertResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
