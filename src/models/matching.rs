use serde::{Deserialize, Serialize};

use super::fields::{id_string, LooseNumber};
use super::patient::PatientRecord;

/// Body of `POST /match`.
///
/// `lat`/`lon` are plain `f64` on purpose: a request always carries a
/// position, missing patient coordinates are replaced before this is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub patient_id: String,
    pub need: String,
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub top_k: u32,
}

/// One ranked donor as returned by the matching service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(deserialize_with = "id_string")]
    pub donor_id: String,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lat: Option<LooseNumber>,
    #[serde(default)]
    pub lon: Option<LooseNumber>,
    #[serde(default)]
    pub distance_km: Option<LooseNumber>,
    /// Match score, expected in `[0, 1]`.
    #[serde(default)]
    pub score: Option<LooseNumber>,
}

/// Body returned by `POST /match`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub need: Option<String>,
    /// Best match first.
    #[serde(default)]
    pub matches: Vec<MatchResult>,
    #[serde(default)]
    pub patient_info: Option<PatientRecord>,
    #[serde(default)]
    pub patient_hospital: Option<String>,
    #[serde(default)]
    pub patient_region: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub donors_loaded: u64,
}
