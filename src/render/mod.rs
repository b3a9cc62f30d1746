//! Render sink: the three presentation surfaces fed by a donor search.
//!
//! Everything here is a pure function of the normalized donors and the
//! patient; the views serialize straight to the page.

pub mod graph;
pub mod map;
pub mod results;

pub use graph::GraphView;
pub use map::MapView;
pub use results::{DonorCard, ResultsView};

use serde::{Deserialize, Serialize};

use crate::matching::MatchOutcome;
use crate::models::{Donor, PatientRecord};

/// All three surfaces for one finished search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchView {
    pub patient_id: String,
    pub results: ResultsView,
    pub map: MapView,
    pub graph: GraphView,
}

impl SearchView {
    /// Fan the donors out to the list, map and graph.
    ///
    /// `map_patient` may differ from `patient` when the service echoed a
    /// fuller record back.
    pub fn render(donors: &[Donor], patient: &PatientRecord, map_patient: &PatientRecord) -> Self {
        Self {
            patient_id: patient.patient_id.clone(),
            results: ResultsView::for_donors(donors, patient),
            map: MapView::build(donors, Some(map_patient)),
            graph: GraphView::build(donors),
        }
    }

    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        Self::render(&outcome.donors, &outcome.patient, outcome.map_patient())
    }
}
