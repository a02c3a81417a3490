use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use super::models::{ServerConfig, ServerErrorBody};
use crate::domain::DownloadRequest;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("Server returned {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status {
        status: StatusCode,
        detail: Option<ServerErrorBody>,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unreachable(_) => "unreachable",
            ApiError::Status { .. } => "status",
            ApiError::InvalidResponse(_) => "invalid_response",
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ServerClient {
    config: ServerConfig,
    http: Client,
}

impl ServerClient {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        self.config.download_url()
    }

    /// POST one download request and return the server's parsed JSON reply.
    pub async fn send_download_request(&self, request: &DownloadRequest) -> Result<Value> {
        let endpoint = self.endpoint();
        tracing::debug!(
            %endpoint,
            video_url = %request.video_url,
            kind = %request.kind,
            quality = %request.quality,
            "sending download request"
        );

        let response = self.http.post(&endpoint).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            // The status is the error; a body that fails to arrive only loses the detail
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ServerErrorBody>(&body).ok();
            return Err(ApiError::Status { status, detail });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }
}
