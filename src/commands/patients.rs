//! Patient list, selection and emergency commands.

use serde::Serialize;

use crate::client::MatchingService;
use crate::models::PatientRecord;
use crate::session::Session;

use super::CommandError;

/// One entry of the patient dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientOption {
    pub patient_id: String,
    pub label: String,
}

impl From<&PatientRecord> for PatientOption {
    fn from(patient: &PatientRecord) -> Self {
        Self {
            patient_id: patient.patient_id.clone(),
            label: format!(
                "{}: {} - {} urgency",
                patient.patient_id,
                patient.blood_need().unwrap_or("Unknown"),
                patient.urgency().unwrap_or("Unknown"),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientList {
    /// Service order.
    pub options: Vec<PatientOption>,
    pub total: usize,
}

/// Form state after a patient is picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSelection {
    pub patient_id: String,
    pub blood_type: String,
    /// Upper-cased for display.
    pub urgency: String,
    pub search_enabled: bool,
}

impl PatientSelection {
    fn cleared() -> Self {
        Self {
            patient_id: String::new(),
            blood_type: String::new(),
            urgency: String::new(),
            search_enabled: false,
        }
    }
}

/// Reload the patient directory and build the dropdown.
///
/// On failure the previously loaded directory stays usable.
pub async fn load_patients<S: MatchingService>(
    session: &Session<S>,
) -> Result<PatientList, CommandError> {
    let directory = session
        .directory()
        .load_all(session.service())
        .await
        .map_err(|e| match e {
            crate::directory::DirectoryError::Api(source) => CommandError::PatientsUnavailable {
                api_base_url: session.service().base_url().to_string(),
                source,
            },
            crate::directory::DirectoryError::Session(e) => CommandError::Session(e),
        })?;

    Ok(PatientList {
        options: directory.records().iter().map(PatientOption::from).collect(),
        total: directory.len(),
    })
}

/// Fill the form for `patient_id`. Unknown or blank ids clear it.
pub fn select_patient<S: MatchingService>(
    session: &Session<S>,
    patient_id: &str,
) -> Result<PatientSelection, CommandError> {
    let patient_id = patient_id.trim();
    if patient_id.is_empty() {
        return Ok(PatientSelection::cleared());
    }
    let Some(patient) = session.directory().lookup(patient_id)? else {
        tracing::debug!(patient_id, "Selected patient not in directory");
        return Ok(PatientSelection::cleared());
    };

    Ok(PatientSelection {
        patient_id: patient.patient_id.clone(),
        blood_type: patient.blood_need().unwrap_or("Unknown").to_string(),
        urgency: patient.urgency().unwrap_or("Unknown").to_uppercase(),
        search_enabled: true,
    })
}

/// Fetch one patient from the service, bypassing the cached directory.
///
/// A 404 from the service is an unknown patient; any other failure means the
/// service could not be asked.
pub async fn fetch_patient<S: MatchingService>(
    session: &Session<S>,
    patient_id: &str,
) -> Result<PatientRecord, CommandError> {
    let patient_id = patient_id.trim();
    session
        .service()
        .patient(patient_id)
        .await
        .map_err(|source| match source.status() {
            Some(404) => CommandError::UnknownPatient(patient_id.to_string()),
            _ => CommandError::PatientsUnavailable {
                api_base_url: session.service().base_url().to_string(),
                source,
            },
        })
}

/// Patients the service flags as critical or high urgency.
pub async fn emergency_patients<S: MatchingService>(
    session: &Session<S>,
) -> Result<Vec<PatientRecord>, CommandError> {
    session
        .service()
        .emergency_patients()
        .await
        .map_err(|source| CommandError::PatientsUnavailable {
            api_base_url: session.service().base_url().to_string(),
            source,
        })
}
