use ats_logging::ats_debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GatewayError, MutationGateway};

/// Body of `PATCH /jobs/{id}/reorder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub from_order: u32,
    pub to_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("Failed to reorder job (HTTP {status}){}", message_suffix(.message))]
    HttpStatus { status: u16, message: Option<String> },
    #[error("{0}")]
    Rejected(String),
    #[error("Malformed reorder response: {0}")]
    Malformed(String),
    #[error("Failed to reorder job: {0}")]
    Transport(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

/// The one backend call job reordering needs.
#[async_trait::async_trait]
pub trait ReorderApi: Send + Sync {
    async fn reorder(&self, job_id: &str, request: ReorderRequest) -> Result<(), ReorderError>;
}

#[async_trait::async_trait]
impl ReorderApi for MutationGateway {
    async fn reorder(&self, job_id: &str, request: ReorderRequest) -> Result<(), ReorderError> {
        self.reorder_job(job_id, request.from_order, request.to_order)
            .await
            .map_err(ReorderError::from)
    }
}

/// Reorder endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReorderApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReorderApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, job_id: &str) -> String {
        format!("{}/jobs/{}/reorder", self.base_url, job_id)
    }
}

#[async_trait::async_trait]
impl ReorderApi for HttpReorderApi {
    async fn reorder(&self, job_id: &str, request: ReorderRequest) -> Result<(), ReorderError> {
        let url = self.endpoint(job_id);
        ats_debug!(
            "PATCH {} fromOrder={} toOrder={}",
            url,
            request.from_order,
            request.to_order
        );
        let response = self
            .client
            .patch(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| ReorderError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ReorderError::Transport(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ReorderResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.message);
            return Err(ReorderError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ReorderResponse =
            serde_json::from_str(&body).map_err(|err| ReorderError::Malformed(err.to_string()))?;
        if parsed.success {
            Ok(())
        } else {
            Err(ReorderError::Rejected(
                parsed
                    .message
                    .unwrap_or_else(|| "Failed to reorder job".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_fields() {
        let json = serde_json::to_string(&ReorderRequest {
            from_order: 1,
            to_order: 3,
        })
        .unwrap();
        assert_eq!(json, r#"{"fromOrder":1,"toOrder":3}"#);
    }

    #[test]
    fn status_error_includes_server_message() {
        let err = ReorderError::HttpStatus {
            status: 500,
            message: Some("db down".into()),
        };
        assert_eq!(err.to_string(), "Failed to reorder job (HTTP 500): db down");
        let bare = ReorderError::HttpStatus {
            status: 404,
            message: None,
        };
        assert_eq!(bare.to_string(), "Failed to reorder job (HTTP 404)");
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let api = HttpReorderApi::new("http://localhost:9/api/");
        assert_eq!(api.endpoint("job-3"), "http://localhost:9/api/jobs/job-3/reorder");
    }
}
