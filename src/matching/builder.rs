//! Match request builder.
//!
//! Turns a patient record into a [`MatchRequest`], filling every gap with a
//! fixed default so an incomplete record still produces a searchable query.

use crate::directory::PatientDirectory;
use crate::models::{GeoPoint, MatchRequest, PatientRecord};

use super::MatchError;

/// Blood type requested when the record does not name one.
pub const FALLBACK_NEED: &str = "Bombay(Oh)";
pub const FALLBACK_LOCATION: &str = "Unknown";
/// Mumbai. Used when the patient has no usable coordinates.
pub const FALLBACK_POSITION: GeoPoint = GeoPoint {
    lat: 19.0760,
    lon: 72.8777,
};
pub const DEFAULT_TOP_K: u32 = 10;
pub const MAX_TOP_K: u32 = 100;

/// Builds match requests for patients in a directory snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MatchRequestBuilder {
    top_k: u32,
}

impl Default for MatchRequestBuilder {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl MatchRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of donors to ask for, kept within `1..=MAX_TOP_K`.
    pub fn with_top_k(self, top_k: u32) -> Self {
        Self {
            top_k: top_k.clamp(1, MAX_TOP_K),
        }
    }

    /// Build the request for `patient_id`, which must be in `directory`.
    pub fn build(
        &self,
        directory: &PatientDirectory,
        patient_id: &str,
    ) -> Result<MatchRequest, MatchError> {
        let patient = directory
            .lookup(patient_id)
            .ok_or_else(|| MatchError::PatientNotFound(patient_id.to_string()))?;
        Ok(self.build_for(patient))
    }

    /// Build the request for a known patient record.
    pub fn build_for(&self, patient: &PatientRecord) -> MatchRequest {
        let position = patient.coordinates().unwrap_or_else(|| {
            tracing::debug!(
                patient_id = %patient.patient_id,
                "Patient has no usable coordinates, using fallback position"
            );
            FALLBACK_POSITION
        });

        MatchRequest {
            patient_id: patient.patient_id.clone(),
            need: patient.blood_need().unwrap_or(FALLBACK_NEED).to_string(),
            location: patient.place().unwrap_or(FALLBACK_LOCATION).to_string(),
            lat: position.lat,
            lon: position.lon,
            top_k: self.top_k,
        }
    }
}

/// Build a request with the default settings.
pub fn build_match_request(patient: &PatientRecord) -> MatchRequest {
    MatchRequestBuilder::default().build_for(patient)
}
