//! Match response normalizer.
//!
//! Drops entries without a usable position, converts scores to confidence
//! percentages and keeps the service's ranking order untouched.

use crate::models::fields::{finite, non_blank};
use crate::models::{
    Donor, GeoPoint, MatchResponse, MatchResult, DEFAULT_AVAILABILITY, DEFAULT_LAST_DONATION,
    PHONE_PLACEHOLDER,
};

use super::MatchError;

const UNKNOWN: &str = "Unknown";

/// Convert a raw response into render-ready donors.
///
/// Fails with [`MatchError::EmptyMatch`] when the response has no matches or
/// when none of them has coordinates.
pub fn normalize(response: &MatchResponse) -> Result<Vec<Donor>, MatchError> {
    let received = response.matches.len();
    if received == 0 {
        tracing::warn!(patient_id = ?response.patient_id, "No matches in response");
        return Err(MatchError::EmptyMatch {
            received: 0,
            dropped: 0,
        });
    }

    let donors: Vec<Donor> = response.matches.iter().filter_map(to_donor).collect();

    let dropped = received - donors.len();
    if donors.is_empty() {
        return Err(MatchError::EmptyMatch { received, dropped });
    }
    tracing::debug!(received, dropped, kept = donors.len(), "Normalized match response");
    Ok(donors)
}

/// Confidence percentage for a score.
///
/// A missing or non-numeric score counts as 0. Scores outside `[0, 1]` are
/// clamped.
pub fn confidence_percent(score: Option<f64>) -> u8 {
    let score = score.filter(|s| s.is_finite()).unwrap_or(0.0);
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn to_donor(entry: &MatchResult) -> Option<Donor> {
    let Some(coordinates) = finite(&entry.lat)
        .zip(finite(&entry.lon))
        .and_then(|(lat, lon)| GeoPoint::new(lat, lon))
    else {
        tracing::warn!(donor_id = %entry.donor_id, "Donor without coordinates, dropped");
        return None;
    };

    let score = finite(&entry.score);
    if let Some(score) = score.filter(|s| !(0.0..=1.0).contains(s)) {
        tracing::warn!(donor_id = %entry.donor_id, score, "Score outside [0, 1], clamping");
    }

    Some(Donor {
        id: entry.donor_id.clone(),
        display_name: Donor::display_name_for(&entry.donor_id),
        blood_type: non_blank(&entry.blood_type).unwrap_or(UNKNOWN).to_string(),
        location: non_blank(&entry.location).unwrap_or(UNKNOWN).to_string(),
        coordinates,
        confidence_percent: confidence_percent(score),
        distance_km: finite(&entry.distance_km).unwrap_or(0.0),
        score: score.unwrap_or(0.0),
        phone: PHONE_PLACEHOLDER.to_string(),
        availability: DEFAULT_AVAILABILITY.to_string(),
        last_donation: DEFAULT_LAST_DONATION.to_string(),
    })
}
