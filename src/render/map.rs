//! Map surface: markers plus the viewport the page should show.

use serde::{Deserialize, Serialize};

use crate::models::{BoundingBox, Donor, GeoPoint, PatientRecord};

use super::results::distance_label;

/// Whole-country view shown before any search (centre of India).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 20.5937,
    lon: 78.9629,
};
pub const DEFAULT_ZOOM: u8 = 5;
/// Zoom used when only the patient can be shown.
pub const PATIENT_ZOOM: u8 = 10;
/// Extra margin around the fitted markers, as a share of the box size.
pub const FIT_PADDING: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Patient,
    Donor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub title: String,
    /// Popup body, one line each.
    pub popup: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    FitBounds { bounds: BoundingBox },
    Center { center: GeoPoint, zoom: u8 },
}

impl Viewport {
    pub fn default_view() -> Self {
        Self::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub viewport: Viewport,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            viewport: Viewport::default_view(),
        }
    }
}

impl MapView {
    /// One marker per donor, plus the patient when it has a position.
    ///
    /// The viewport fits every marker. When there is no area to fit (no
    /// donors, or everything on one spot) it centres on the patient, and
    /// without any position at all falls back to the default view.
    pub fn build(donors: &[Donor], patient: Option<&PatientRecord>) -> Self {
        let patient_position = patient.and_then(PatientRecord::coordinates);

        let mut markers = Vec::with_capacity(donors.len() + 1);
        if let (Some(patient), Some(position)) = (patient, patient_position) {
            markers.push(patient_marker(patient, position));
        }
        markers.extend(donors.iter().map(donor_marker));

        let bounds = BoundingBox::around(markers.iter().map(|m| &m.position));
        let viewport = match (bounds, patient_position) {
            (Some(bounds), _) if !bounds.is_point() => Viewport::FitBounds {
                bounds: bounds.pad(FIT_PADDING),
            },
            (_, Some(center)) => Viewport::Center {
                center,
                zoom: PATIENT_ZOOM,
            },
            (Some(bounds), None) => Viewport::Center {
                center: GeoPoint {
                    lat: bounds.south,
                    lon: bounds.west,
                },
                zoom: PATIENT_ZOOM,
            },
            (None, None) => Viewport::default_view(),
        };

        tracing::debug!(markers = markers.len(), "Map view built");
        Self { markers, viewport }
    }

    pub fn donor_marker_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|m| m.kind == MarkerKind::Donor)
            .count()
    }
}

fn patient_marker(patient: &PatientRecord, position: GeoPoint) -> MapMarker {
    let or_unknown = |v: Option<&str>| v.unwrap_or("Unknown").to_string();
    MapMarker {
        kind: MarkerKind::Patient,
        position,
        title: format!("Patient: {}", patient.patient_id),
        popup: vec![
            format!("Blood Type: {}", or_unknown(patient.blood_need())),
            format!(
                "Hospital: {}",
                or_unknown(patient.hospital.as_deref().filter(|h| !h.trim().is_empty()))
            ),
            format!("Urgency: {}", or_unknown(patient.urgency())),
        ],
    }
}

fn donor_marker(donor: &Donor) -> MapMarker {
    MapMarker {
        kind: MarkerKind::Donor,
        position: donor.coordinates,
        title: donor.display_name.clone(),
        popup: vec![
            donor.location.clone(),
            format!("Blood Type: {}", donor.blood_type),
            format!("Distance: {}", distance_label(donor.distance_km)),
            format!("Match: {}%", donor.confidence_percent),
        ],
    }
}
