use serde::{Deserialize, Serialize};

use crate::models::{Donor, PatientRecord};

/// One donor card in the results list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorCard {
    pub donor_id: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub blood_type: String,
    /// `"12.3 km"`, or `"N/A"` when the service gave no distance.
    pub distance_label: String,
    pub confidence_percent: u8,
    pub availability: String,
}

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsView {
    Donors {
        cards: Vec<DonorCard>,
    },
    /// Search succeeded but nobody compatible was found.
    Empty {
        message: String,
        hint: String,
    },
    /// Something failed; `detail` is shown under the title.
    Error {
        title: String,
        detail: String,
        hint: Option<String>,
    },
}

impl ResultsView {
    /// Results panel for a finished search.
    pub fn for_donors(donors: &[Donor], patient: &PatientRecord) -> Self {
        if donors.is_empty() {
            return Self::no_donors(patient.blood_need());
        }
        Self::Donors {
            cards: donors.iter().map(DonorCard::from).collect(),
        }
    }

    /// "No compatible donors" state, distinct from any failure.
    pub fn no_donors(need: Option<&str>) -> Self {
        Self::Empty {
            message: format!(
                "No compatible donors found for {}",
                need.unwrap_or("Unknown")
            ),
            hint: "Please try a different patient or check back later.".to_string(),
        }
    }

    /// Patient list could not be fetched (connectivity, not an empty dataset).
    pub fn patients_unavailable(api_base_url: &str) -> Self {
        Self::Error {
            title: "Failed to load patients from API. Please check if the backend server is running."
                .to_string(),
            detail: format!("API URL: {api_base_url}"),
            hint: None,
        }
    }

    /// Donor search failed.
    pub fn search_failed(detail: &str) -> Self {
        let detail = if detail.trim().is_empty() {
            "Unknown error occurred"
        } else {
            detail
        };
        Self::Error {
            title: "Failed to find donors".to_string(),
            detail: detail.to_string(),
            hint: Some("Check the server log for more details".to_string()),
        }
    }
}

impl From<&Donor> for DonorCard {
    fn from(donor: &Donor) -> Self {
        Self {
            donor_id: donor.id.clone(),
            name: donor.display_name.clone(),
            location: donor.location.clone(),
            phone: donor.phone.clone(),
            blood_type: donor.blood_type.clone(),
            distance_label: distance_label(donor.distance_km),
            confidence_percent: donor.confidence_percent,
            availability: donor.availability.clone(),
        }
    }
}

/// Distance with one decimal, `N/A` for zero (the service's "unknown").
pub fn distance_label(distance_km: f64) -> String {
    if distance_km == 0.0 || !distance_km.is_finite() {
        "N/A".to_string()
    } else {
        format!("{distance_km:.1} km")
    }
}
