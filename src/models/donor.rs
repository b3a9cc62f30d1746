use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;

/// Contact number shown until donor contact details are exposed by the service.
pub const PHONE_PLACEHOLDER: &str = "+91 XXXXX XXXXX";
pub const DEFAULT_AVAILABILITY: &str = "Available";
pub const DEFAULT_LAST_DONATION: &str = "Recently";

/// A render-ready donor.
///
/// Only built by the match normalizer; `coordinates` is always a real
/// position and `confidence_percent` is always within 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: String,
    pub display_name: String,
    pub blood_type: String,
    pub location: String,
    pub coordinates: GeoPoint,
    pub confidence_percent: u8,
    pub distance_km: f64,
    /// Score as sent by the service (before clamping).
    pub score: f64,
    pub phone: String,
    pub availability: String,
    pub last_donation: String,
}

impl Donor {
    /// Display name derived from a donor id.
    pub fn display_name_for(id: &str) -> String {
        format!("Donor {id}")
    }
}
