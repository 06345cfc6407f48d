//! Claims API client
//!
//! Thin reqwest wrapper over the application endpoints. Every call returns
//! `PortError` so the submitter can treat transport and API failures alike:
//!
//! - 404 -> `PortError::NotFound`
//! - 401/403 -> `PortError::Unauthorized`
//! - 409 -> `PortError::Conflict`
//! - 400/422 -> `PortError::Validation`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Other -> `PortError::Internal`

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use core_kernel::PortError;
use domain_claims::DocumentType;

use crate::config::SubmitConfig;
use crate::dto::{ApiErrorBody, ApiResponse, ApplicationData};

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client for the claims REST API
#[derive(Debug, Clone)]
pub struct ClaimsApiClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl ClaimsApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout,
        })
    }

    pub fn from_config(config: &SubmitConfig) -> Result<Self, PortError> {
        Self::new(&config.api_base_url, &config.api_token, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `POST /applications`
    pub async fn create_application(&self) -> Result<ApplicationData, PortError> {
        let request = self.client.post(self.url("applications")).json(&serde_json::json!({}));
        self.send(request, "create_application").await
    }

    /// `PATCH /applications/{id}`
    pub async fn update_application<B: Serialize + ?Sized>(
        &self,
        application_id: &str,
        body: &B,
    ) -> Result<ApplicationData, PortError> {
        let request = self
            .client
            .patch(self.url(&format!("applications/{}", application_id)))
            .json(body);
        self.send(request, "update_application").await
    }

    /// `POST /applications/{id}/documents` as multipart form data
    pub async fn upload_document(
        &self,
        application_id: &str,
        document_type: DocumentType,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, PortError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| PortError::Transformation {
                message: format!("invalid document part: {}", e),
            })?;
        let form = Form::new()
            .text("document_type", document_type.api_category().to_string())
            .text("name", file_name.to_string())
            .text("description", format!("{} for application {}", document_type, application_id))
            .text("mark_evidence_received", "true")
            .part("file", part);

        let request = self
            .client
            .post(self.url(&format!("applications/{}/documents", application_id)))
            .multipart(form);
        self.send(request, "upload_document").await
    }

    /// `POST /applications/{id}/submit_application`
    pub async fn submit_application(&self, application_id: &str) -> Result<ApplicationData, PortError> {
        self.post_action(application_id, "submit_application", &serde_json::json!({}))
            .await
    }

    /// `POST /applications/{id}/submit_payment_preference`
    pub async fn submit_payment_preference<B: Serialize + ?Sized>(
        &self,
        application_id: &str,
        body: &B,
    ) -> Result<serde_json::Value, PortError> {
        self.post_action(application_id, "submit_payment_preference", body).await
    }

    /// `POST /applications/{id}/complete_application`
    pub async fn complete_application(&self, application_id: &str) -> Result<ApplicationData, PortError> {
        self.post_action(application_id, "complete_application", &serde_json::json!({}))
            .await
    }

    async fn post_action<B, T>(&self, application_id: &str, action: &'static str, body: &B) -> Result<T, PortError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.url(&format!("applications/{}/{}", application_id, action)))
            .json(body);
        self.send(request, action).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, operation: &str) -> Result<T, PortError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| self.transport_error(e, operation))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            warn!(operation, status = status.as_u16(), "Claims API request failed");
            return Err(status_error(status, &headers, &body, operation));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| PortError::Transformation {
            message: format!("{}: unexpected response body: {}", operation, e),
        })?;
        debug!(operation, status = status.as_u16(), "Claims API request succeeded");
        Ok(envelope.data)
    }

    fn transport_error(&self, error: reqwest::Error, operation: &str) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if error.is_connect() {
            PortError::Connection {
                message: format!("{}: {}", operation, error),
                source: Some(Box::new(error)),
            }
        } else {
            PortError::Internal {
                message: format!("{}: {}", operation, error),
                source: Some(Box::new(error)),
            }
        }
    }
}

/// Maps an unsuccessful HTTP status to a `PortError`
pub fn status_error(status: StatusCode, headers: &HeaderMap, body: &str, operation: &str) -> PortError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("{} returned {}", operation, status));

    match status {
        StatusCode::NOT_FOUND => PortError::not_found("claims API resource for", operation),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized { message },
        StatusCode::CONFLICT => PortError::Conflict { message },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let field = parsed.errors.iter().find_map(|e| e.field.clone());
            let detail = parsed
                .errors
                .iter()
                .filter_map(|e| e.message.as_deref())
                .collect::<Vec<_>>()
                .join("; ");
            let message = if detail.is_empty() {
                message
            } else {
                format!("{}: {}", message, detail)
            };
            PortError::Validation { message, field }
        }
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: format!("claims API ({}: {})", operation, s),
        },
        _ => PortError::internal(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn map(status: u16, body: &str) -> PortError {
        status_error(
            StatusCode::from_u16(status).unwrap(),
            &HeaderMap::new(),
            body,
            "submit_application",
        )
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(map(404, ""), PortError::NotFound { .. }));
        assert!(matches!(map(401, ""), PortError::Unauthorized { .. }));
        assert!(matches!(map(403, ""), PortError::Unauthorized { .. }));
        assert!(matches!(map(409, ""), PortError::Conflict { .. }));
        assert!(matches!(map(400, ""), PortError::Validation { .. }));
        assert!(matches!(map(422, ""), PortError::Validation { .. }));
        assert!(matches!(map(429, ""), PortError::RateLimited { retry_after_secs: 60 }));
        assert!(matches!(map(500, ""), PortError::ServiceUnavailable { .. }));
        assert!(matches!(map(503, ""), PortError::ServiceUnavailable { .. }));
        assert!(matches!(map(418, ""), PortError::Internal { .. }));
    }

    #[test]
    fn test_validation_keeps_field_details() {
        let body = r#"{"message":"Request Validation Error","errors":[{"field":"tax_identifier","message":"invalid"}]}"#;
        match map(422, body) {
            PortError::Validation { message, field } => {
                assert_eq!(field.as_deref(), Some("tax_identifier"));
                assert!(message.contains("Request Validation Error"));
                assert!(message.contains("invalid"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let error = status_error(StatusCode::TOO_MANY_REQUESTS, &headers, "", "upload_document");
        assert!(matches!(error, PortError::RateLimited { retry_after_secs: 7 }));
        assert!(error.is_transient());
    }

    #[test]
    fn test_url_joining() {
        let client = ClaimsApiClient::new("http://localhost:1550/v1/", "token", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1550/v1");
        assert_eq!(client.url("/applications"), "http://localhost:1550/v1/applications");
    }
}
