use crate::client::MatchingService;
use crate::directory::PatientDirectory;
use crate::models::{Donor, MatchRequest, PatientRecord};

use super::builder::MatchRequestBuilder;
use super::normalizer::normalize;
use super::MatchError;

/// Result of one donor search.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub request: MatchRequest,
    /// Patient as selected from the directory.
    pub patient: PatientRecord,
    /// Patient as echoed by the service, when it sent one back.
    pub patient_info: Option<PatientRecord>,
    /// Best match first.
    pub donors: Vec<Donor>,
}

impl MatchOutcome {
    /// Patient record to place on the map: the service's copy wins.
    pub fn map_patient(&self) -> &PatientRecord {
        self.patient_info.as_ref().unwrap_or(&self.patient)
    }
}

/// Run the full pipeline for one patient: build, call, normalize.
pub async fn find_matching_donors<S: MatchingService>(
    service: &S,
    directory: &PatientDirectory,
    builder: &MatchRequestBuilder,
    patient_id: &str,
) -> Result<MatchOutcome, MatchError> {
    let request = builder.build(directory, patient_id)?;
    let patient = directory
        .lookup(patient_id)
        .cloned()
        .ok_or_else(|| MatchError::PatientNotFound(patient_id.to_string()))?;

    tracing::info!(
        patient_id,
        need = %request.need,
        top_k = request.top_k,
        "Requesting donor matches"
    );
    let response = service.request_matches(&request).await?;
    let donors = normalize(&response)?;
    tracing::info!(patient_id, donors = donors.len(), "Donor matches ready");

    Ok(MatchOutcome {
        request,
        patient,
        patient_info: response.patient_info,
        donors,
    })
}
