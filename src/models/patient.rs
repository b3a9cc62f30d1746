use serde::{Deserialize, Serialize};

use super::fields::{finite, id_string, non_blank, LooseNumber};
use super::geo::GeoPoint;

/// Urgency tokens that put a patient on the emergency board.
const EMERGENCY_URGENCIES: &[&str] = &["critical", "high"];

/// A patient as served by `GET /patients`.
///
/// Every field except the id may be missing; defaults are applied by the
/// consumers, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(deserialize_with = "id_string")]
    pub patient_id: String,
    /// Blood type the patient needs (e.g. `Bombay(Oh)`).
    #[serde(default)]
    pub need: Option<String>,
    /// Free-form severity token (`critical`, `high`, ...).
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub lat: Option<LooseNumber>,
    #[serde(default)]
    pub lon: Option<LooseNumber>,
}

impl PatientRecord {
    /// Needed blood type, if the record carries one.
    pub fn blood_need(&self) -> Option<&str> {
        non_blank(&self.need)
    }

    /// Human-readable place: region first, then location.
    pub fn place(&self) -> Option<&str> {
        non_blank(&self.region).or_else(|| non_blank(&self.location))
    }

    pub fn urgency(&self) -> Option<&str> {
        non_blank(&self.urgency)
    }

    /// Position, when both coordinates are usable numbers.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        GeoPoint::new(finite(&self.lat)?, finite(&self.lon)?)
    }

    /// Whether the urgency token marks an emergency (`critical` or `high`).
    pub fn is_emergency(&self) -> bool {
        self.urgency()
            .map(|u| EMERGENCY_URGENCIES.contains(&u.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// Body of `GET /patients`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientsResponse {
    #[serde(default)]
    pub patients: Vec<PatientRecord>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Body of `GET /patients/emergency/active`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyPatientsResponse {
    #[serde(default)]
    pub emergency_patients: Vec<PatientRecord>,
    #[serde(default)]
    pub count: Option<u64>,
}
