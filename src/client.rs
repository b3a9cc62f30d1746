//! HTTP client for the donor matching service.
//!
//! Every call goes through [`ApiClient::call`], which sends JSON, and turns
//! non-success responses into [`ApiError::Status`] carrying the best message
//! the service offered (`detail` field, raw body text, or the status line).
//! No timeout and no retry: a call resolves or fails on the transport's own
//! terms and failures are surfaced to the caller immediately.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::models::{
    EmergencyPatientsResponse, MatchRequest, MatchResponse, PatientRecord, PatientsResponse,
    ServiceHealth,
};

/// Matching service routes.
pub mod endpoints {
    pub const PATIENTS: &str = "/patients";
    pub const MATCH: &str = "/match";
    pub const EMERGENCY: &str = "/patients/emergency/active";
    pub const HEALTH: &str = "/health";
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// Errors from talking to the matching service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network unreachable, connection refused, reset, ...
    #[error("Cannot reach the matching service at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Non-2xx response. Displays as the extracted message only.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Malformed response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    #[error("Could not encode request for {endpoint}: {reason}")]
    Encode { endpoint: String, reason: String },
    #[error("Failed to create HTTP client: {0}")]
    Setup(String),
}

impl ApiError {
    /// HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Best human-readable message for a failed response.
///
/// A JSON body with a `detail` field wins; an unparseable body is used
/// verbatim; otherwise the status line.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let status_line = format!(
        "API Error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string();

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => {
                detail.clone()
            }
            Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
                status_line
            }
            // FastAPI validation errors put a list here
            Some(other) => other.to_string(),
        },
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                status_line
            } else {
                text.to_string()
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// MatchingService: the seam the pipeline depends on
// ═══════════════════════════════════════════════════════════

/// Operations the rest of the crate needs from the matching service.
///
/// [`ApiClient`] is the real implementation; tests substitute an in-memory one.
pub trait MatchingService: Send + Sync {
    /// Base URL requests go to (shown to users on connectivity errors).
    fn base_url(&self) -> &str;

    fn list_patients(&self)
        -> impl Future<Output = Result<Vec<PatientRecord>, ApiError>> + Send;

    fn request_matches(
        &self,
        request: &MatchRequest,
    ) -> impl Future<Output = Result<MatchResponse, ApiError>> + Send;

    fn emergency_patients(
        &self,
    ) -> impl Future<Output = Result<Vec<PatientRecord>, ApiError>> + Send;

    fn health(&self) -> impl Future<Output = Result<ServiceHealth, ApiError>> + Send;

    /// One patient by id, straight from the service.
    fn patient(
        &self,
        patient_id: &str,
    ) -> impl Future<Output = Result<PatientRecord, ApiError>> + Send;
}

// ═══════════════════════════════════════════════════════════
// ApiClient
// ═══════════════════════════════════════════════════════════

/// reqwest-backed client for the matching service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `{base}/patients/{id}` with `id` percent-encoded as one path segment.
    pub fn patient_url(&self, patient_id: &str) -> Result<Url, ApiError> {
        let encode_error = |reason: String| ApiError::Encode {
            endpoint: endpoints::PATIENTS.to_string(),
            reason,
        };
        let mut url = Url::parse(&self.url(endpoints::PATIENTS))
            .map_err(|e| encode_error(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| encode_error(format!("{} cannot carry a path", self.base_url)))?
            .push(patient_id);
        Ok(url)
    }

    /// Send a request and decode the JSON result.
    ///
    /// The JSON content type is set on every request; `body` is serialized
    /// when present.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        self.send(self.url(endpoint), endpoint, method, body).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: String,
        endpoint: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        tracing::debug!(%method, endpoint, body = ?body, "API request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(|source| {
            tracing::error!(%method, endpoint, error = %source, "API call failed");
            ApiError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| {
            tracing::error!(%method, endpoint, error = %source, "API response body unreadable");
            ApiError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!(%method, endpoint, status = status.as_u16(), %message, "API error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let data = serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(endpoint, status = status.as_u16(), "API response");
        Ok(data)
    }
}

impl MatchingService for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
        let response: Option<PatientsResponse> =
            self.call(endpoints::PATIENTS, Method::GET, None).await?;
        Ok(response.unwrap_or_default().patients)
    }

    async fn request_matches(&self, request: &MatchRequest) -> Result<MatchResponse, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Encode {
            endpoint: endpoints::MATCH.to_string(),
            reason: e.to_string(),
        })?;
        let response: Option<MatchResponse> =
            self.call(endpoints::MATCH, Method::POST, Some(&body)).await?;
        Ok(response.unwrap_or_default())
    }

    async fn emergency_patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
        let response: Option<EmergencyPatientsResponse> =
            self.call(endpoints::EMERGENCY, Method::GET, None).await?;
        Ok(response.unwrap_or_default().emergency_patients)
    }

    async fn health(&self) -> Result<ServiceHealth, ApiError> {
        self.call(endpoints::HEALTH, Method::GET, None).await
    }

    async fn patient(&self, patient_id: &str) -> Result<PatientRecord, ApiError> {
        let url = self.patient_url(patient_id)?;
        self.send(url.to_string(), "/patients/{id}", Method::GET, None)
            .await
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory service for tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tokio::sync::Notify;

    use super::*;

    /// Scriptable stand-in for the matching service.
    #[derive(Default)]
    pub struct FakeService {
        pub patients: Mutex<Vec<PatientRecord>>,
        pub response: Mutex<MatchResponse>,
        /// When set, every call fails with this status and detail.
        pub failure: Mutex<Option<(u16, String)>>,
        /// When set, `request_matches` waits for a notification first.
        pub hold: Option<Arc<Notify>>,
        pub requests: Mutex<Vec<MatchRequest>>,
        pub patient_loads: AtomicUsize,
    }

    impl FakeService {
        pub fn with_patients(patients: Vec<PatientRecord>) -> Self {
            Self {
                patients: Mutex::new(patients),
                ..Self::default()
            }
        }

        pub fn respond_with(&self, response: MatchResponse) {
            *self.response.lock().unwrap() = response;
        }

        pub fn fail_with(&self, status: u16, detail: &str) {
            *self.failure.lock().unwrap() = Some((status, detail.to_string()));
        }

        pub fn recover(&self) {
            *self.failure.lock().unwrap() = None;
        }

        pub fn sent_requests(&self) -> Vec<MatchRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), ApiError> {
            match self.failure.lock().unwrap().clone() {
                Some((status, message)) => Err(ApiError::Status { status, message }),
                None => Ok(()),
            }
        }
    }

    impl MatchingService for FakeService {
        fn base_url(&self) -> &str {
            "http://matching.test"
        }

        async fn list_patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
            self.patient_loads.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.patients.lock().unwrap().clone())
        }

        async fn request_matches(
            &self,
            request: &MatchRequest,
        ) -> Result<MatchResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            self.check()?;
            Ok(self.response.lock().unwrap().clone())
        }

        async fn emergency_patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
            self.check()?;
            Ok(self
                .patients
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.is_emergency())
                .cloned()
                .collect())
        }

        async fn health(&self) -> Result<ServiceHealth, ApiError> {
            self.check()?;
            Ok(ServiceHealth {
                status: "ok".into(),
                model_loaded: true,
                donors_loaded: 3,
            })
        }

        async fn patient(&self, patient_id: &str) -> Result<PatientRecord, ApiError> {
            self.check()?;
            self.patients
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.patient_id == patient_id)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    message: format!("Patient {patient_id} not found"),
                })
        }
    }
}
