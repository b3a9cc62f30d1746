//! Route handlers. One command per handler.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatExchange, ChatThread};
use crate::client::MatchingService;
use crate::commands::patients::{PatientList, PatientSelection};
use crate::commands::{self, CommandError, HealthReport};
use crate::models::PatientRecord;
use crate::render::SearchView;
use crate::session::Session;

use super::INDEX_HTML;

type SessionState<S> = State<Arc<Session<S>>>;

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub patient_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactBody {
    pub donor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EmergencyList {
    pub emergency_patients: Vec<PatientRecord>,
    pub count: usize,
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /ui/health`
pub async fn health<S: MatchingService + 'static>(
    State(session): SessionState<S>,
) -> Result<Json<HealthReport>, CommandError> {
    commands::service_health(&session).await.map(Json)
}

/// `GET /ui/patients` (reloads the directory)
pub async fn patients<S: MatchingService + 'static>(
    State(session): SessionState<S>,
) -> Result<Json<PatientList>, CommandError> {
    commands::load_patients(&session).await.map(Json)
}

/// `GET /ui/patients/emergency`
pub async fn emergency<S: MatchingService + 'static>(
    State(session): SessionState<S>,
) -> Result<Json<EmergencyList>, CommandError> {
    let emergency_patients = commands::emergency_patients(&session).await?;
    Ok(Json(EmergencyList {
        count: emergency_patients.len(),
        emergency_patients,
    }))
}

/// `GET /ui/patients/:id`
pub async fn select<S: MatchingService + 'static>(
    State(session): SessionState<S>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientSelection>, CommandError> {
    commands::select_patient(&session, &patient_id).map(Json)
}

/// `GET /ui/patients/:id/fetch`
pub async fn fetch<S: MatchingService + 'static>(
    State(session): SessionState<S>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientRecord>, CommandError> {
    commands::fetch_patient(&session, &patient_id).await.map(Json)
}

/// `POST /ui/search`
pub async fn search<S: MatchingService + 'static>(
    State(session): SessionState<S>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchView>, CommandError> {
    commands::find_donors(&session, &body.patient_id).await.map(Json)
}

/// `POST /ui/chat/contact`
pub async fn contact<S: MatchingService + 'static>(
    State(session): SessionState<S>,
    Json(body): Json<ContactBody>,
) -> Result<Json<ChatThread>, CommandError> {
    commands::contact_donor(&session, &body.donor_id).map(Json)
}

/// `POST /ui/chat/send`. Responds `null` for a blank message.
pub async fn send<S: MatchingService + 'static>(
    State(session): SessionState<S>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Option<ChatExchange>>, CommandError> {
    commands::send_chat_message(&session, &body.message).map(Json)
}
