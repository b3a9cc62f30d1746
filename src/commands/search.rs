//! Donor search command.

use crate::client::MatchingService;
use crate::matching::{find_matching_donors, MatchError};
use crate::render::SearchView;
use crate::session::Session;

use super::CommandError;

/// Search donors for `patient_id` and render every surface.
///
/// Only one search runs at a time; a second trigger while one is pending is
/// rejected, not queued. The donors of a successful search become the chat
/// targets; an empty search clears them; any other failure leaves them as
/// they were.
pub async fn find_donors<S: MatchingService>(
    session: &Session<S>,
    patient_id: &str,
) -> Result<SearchView, CommandError> {
    let patient_id = patient_id.trim();
    let _slot = session.try_begin_search().ok_or_else(|| {
        tracing::warn!(patient_id, "Donor search rejected, another search is running");
        CommandError::SearchInProgress
    })?;
    tracing::info!(patient_id, "Donor search started");

    let directory = session.directory().snapshot()?;
    let outcome = find_matching_donors(
        session.service(),
        &directory,
        session.builder(),
        patient_id,
    )
    .await;

    match outcome {
        Ok(outcome) => {
            session.set_last_donors(outcome.donors.clone())?;
            tracing::info!(patient_id, donors = outcome.donors.len(), "Donor search complete");
            Ok(SearchView::from_outcome(&outcome))
        }
        Err(MatchError::PatientNotFound(id)) => Err(CommandError::UnknownPatient(id)),
        Err(MatchError::EmptyMatch { received, dropped }) => {
            tracing::info!(patient_id, received, dropped, "Donor search found no usable donors");
            session.set_last_donors(Vec::new())?;
            Err(CommandError::NoDonors {
                patient_id: patient_id.to_string(),
                need: directory
                    .lookup(patient_id)
                    .and_then(|p| p.blood_need())
                    .map(str::to_string),
            })
        }
        Err(e) => {
            tracing::error!(patient_id, error = %e, "Donor search failed");
            Err(e.into())
        }
    }
}
