use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::models::{
    HealthStatus, ModelInfo, PredictionRequest, PredictionResponse, ProgramDirectory,
    ServiceError, ServiceInfo,
};

/// The remote prediction service.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn programs(&self) -> Result<ProgramDirectory>;
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse>;
    async fn health(&self) -> Result<HealthStatus>;
    async fn service_info(&self) -> Result<ServiceInfo>;
    async fn model_info(&self) -> Result<ModelInfo>;
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            detail: error_detail(status, &body),
        });
    }

    serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
        endpoint: path.to_string(),
        source,
    })
}

fn error_detail(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(error) = serde_json::from_slice::<ServiceError>(body) {
        let mut detail = error.error;
        if let Some(extra) = error.detalle {
            detail.push_str(": ");
            detail.push_str(&extra);
        }
        if !error.campos.is_empty() {
            detail.push_str(&format!(" ({})", error.campos.join(", ")));
        }
        return detail;
    }

    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string()
}

#[async_trait]
impl PredictionService for ApiClient {
    async fn programs(&self) -> Result<ProgramDirectory> {
        self.get_json("/programas").await
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let url = self.config.endpoint("/predict");
        debug!(%url, programa = %request.programa, "POST");
        let response = self.http.post(&url).json(request).send().await?;
        decode("/predict", response).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/health").await
    }

    async fn service_info(&self) -> Result<ServiceInfo> {
        self.get_json("/").await
    }

    async fn model_info(&self) -> Result<ModelInfo> {
        self.get_json("/info").await
    }
}
