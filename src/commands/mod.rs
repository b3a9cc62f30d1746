//! Transport-agnostic command handlers.
//!
//! Each command takes the [`Session`] and plain arguments and returns a
//! serializable value or a [`CommandError`]. The UI adapter maps errors to
//! HTTP; the command layer only decides what the page should show.

pub mod chat;
pub mod patients;
pub mod search;

pub use chat::{contact_donor, send_chat_message, send_chat_message_with};
pub use patients::{emergency_patients, fetch_patient, load_patients, select_patient};
pub use search::find_donors;

use serde::Serialize;

use crate::client::{ApiError, MatchingService};
use crate::config;
use crate::matching::MatchError;
use crate::models::ServiceHealth;
use crate::render::ResultsView;
use crate::session::{Session, SessionError};

/// Failure of a user-triggered action.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The patient list could not be fetched (connectivity, not an empty set).
    #[error("Failed to load patients from {api_base_url}: {source}")]
    PatientsUnavailable {
        api_base_url: String,
        #[source]
        source: ApiError,
    },
    #[error("Patient {0} not found. Please refresh the patient list.")]
    UnknownPatient(String),
    #[error("A donor search is already running")]
    SearchInProgress,
    /// The search worked but nobody usable came back.
    #[error("No matching donors found")]
    NoDonors {
        patient_id: String,
        need: Option<String>,
    },
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("Donor {0} is not in the current results")]
    UnknownDonor(String),
    #[error("No donor chat is open")]
    NoActiveChat,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CommandError {
    /// Results panel state for this failure.
    pub fn view(&self) -> ResultsView {
        match self {
            Self::PatientsUnavailable { api_base_url, .. } => {
                ResultsView::patients_unavailable(api_base_url)
            }
            Self::NoDonors { need, .. } => ResultsView::no_donors(need.as_deref()),
            other => ResultsView::search_failed(&other.to_string()),
        }
    }
}

/// Adapter health plus whatever the matching service reports.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub api_base_url: String,
    pub patients_cached: usize,
    pub search_in_progress: bool,
    pub upstream: Option<ServiceHealth>,
    /// Why `upstream` is missing.
    pub upstream_error: Option<String>,
}

/// Health check. Never fails: an unreachable service is reported, not raised.
pub async fn service_health<S: MatchingService>(
    session: &Session<S>,
) -> Result<HealthReport, CommandError> {
    tracing::debug!("Health check called");
    let (upstream, upstream_error) = match session.service().health().await {
        Ok(health) => (Some(health), None),
        Err(e) => {
            tracing::warn!(error = %e, "Matching service health check failed");
            (None, Some(e.to_string()))
        }
    };

    Ok(HealthReport {
        status: "ok",
        version: config::APP_VERSION,
        api_base_url: session.service().base_url().to_string(),
        patients_cached: session.directory().snapshot()?.len(),
        search_in_progress: session.is_searching(),
        upstream,
        upstream_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeService;

    #[test]
    fn unavailable_patients_view_names_api_url() {
        let err = CommandError::PatientsUnavailable {
            api_base_url: "http://localhost:8000".into(),
            source: ApiError::Status {
                status: 503,
                message: "down".into(),
            },
        };
        assert_eq!(
            err.view(),
            ResultsView::patients_unavailable("http://localhost:8000")
        );
    }

    #[test]
    fn no_donors_view_is_empty_state() {
        let err = CommandError::NoDonors {
            patient_id: "P1".into(),
            need: Some("A-".into()),
        };
        assert_eq!(err.view(), ResultsView::no_donors(Some("A-")));
    }

    #[test]
    fn upstream_failure_view_carries_message() {
        let err = CommandError::Match(MatchError::Api(ApiError::Status {
            status: 500,
            message: "db down".into(),
        }));
        assert_eq!(err.view(), ResultsView::search_failed("db down"));
    }

    #[tokio::test]
    async fn health_reports_upstream_failure_without_failing() {
        let session = Session::new(FakeService::default());
        let report = service_health(&session).await.unwrap();
        assert_eq!(report.status, "ok");
        assert_eq!(report.upstream.as_ref().unwrap().donors_loaded, 3);

        session.service().fail_with(502, "bad gateway");
        let report = service_health(&session).await.unwrap();
        assert!(report.upstream.is_none());
        assert_eq!(report.upstream_error.as_deref(), Some("bad gateway"));
        assert_eq!(report.api_base_url, "http://matching.test");
    }
}
