//! Donor match pipeline: build the request, call the service, normalize.
//!
//! Request and response sides validate differently on purpose. A request
//! always gets *some* position (missing patient coordinates are replaced by
//! a fixed fallback), while a result without a position is dropped (it
//! cannot be placed on the map or ranked by distance).

pub mod builder;
pub mod normalizer;
pub mod orchestrator;

pub use builder::{build_match_request, MatchRequestBuilder};
pub use normalizer::normalize;
pub use orchestrator::{find_matching_donors, MatchOutcome};

use crate::client::ApiError;

/// Errors from the match pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Patient {0} not found. Please refresh the patient list.")]
    PatientNotFound(String),
    /// Nothing usable came back; not a connectivity problem.
    #[error("No matching donors found")]
    EmptyMatch {
        /// Entries in the raw response.
        received: usize,
        /// Entries dropped for missing coordinates.
        dropped: usize,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}
