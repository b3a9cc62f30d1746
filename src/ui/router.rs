//! UI router.
//!
//! Routes are generic over the matching service so tests can mount the
//! same router on an in-memory fake.

use std::sync::Arc;

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::client::MatchingService;
use crate::session::Session;

use super::endpoints;

/// Build the UI router over `session`.
///
/// NOTE: Path params use `:param` syntax (axum 0.7).
pub fn ui_router<S: MatchingService + 'static>(session: Arc<Session<S>>) -> Router {
    let ui = Router::new()
        .route("/health", get(endpoints::health::<S>))
        .route("/patients", get(endpoints::patients::<S>))
        .route("/patients/emergency", get(endpoints::emergency::<S>))
        .route("/patients/:id", get(endpoints::select::<S>))
        .route("/patients/:id/fetch", get(endpoints::fetch::<S>))
        .route("/search", post(endpoints::search::<S>))
        .route("/chat/contact", post(endpoints::contact::<S>))
        .route("/chat/send", post(endpoints::send::<S>))
        .with_state(session)
        // Results change between calls; never serve them from cache
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(endpoints::index))
        .nest("/ui", ui)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::client::fake::FakeService;
    use crate::models::{MatchResponse, PatientRecord};

    fn test_session() -> Arc<Session<FakeService>> {
        let patients: Vec<PatientRecord> = serde_json::from_value(json!([
            {"patient_id": "P001", "need": "Bombay(Oh)", "urgency": "critical", "lat": 19.0, "lon": 72.8},
            {"patient_id": "P002", "need": "A-", "urgency": "low"}
        ]))
        .unwrap();
        let service = FakeService::with_patients(patients);
        let response: MatchResponse = serde_json::from_value(json!({
            "matches": [
                {"donor_id": "D1", "lat": 19.1, "lon": 72.9, "score": 0.9, "distance_km": 3.2},
                {"donor_id": "D2", "lat": 19.2, "lon": 72.7, "score": 0.6}
            ]
        }))
        .unwrap();
        service.respond_with(response);
        Arc::new(Session::new(service))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn index_serves_landing_page() {
        let app = ui_router(test_session());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("api-base-url"));
    }

    #[tokio::test]
    async fn health_reports_upstream() {
        let app = ui_router(test_session());
        let (status, json) = call(&app, "GET", "/ui/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["upstream"]["model_loaded"], true);
    }

    #[tokio::test]
    async fn full_flow_patients_select_search_chat() {
        let app = ui_router(test_session());

        let (status, json) = call(&app, "GET", "/ui/patients", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["options"][0]["label"], "P001: Bombay(Oh) - critical urgency");

        let (_, json) = call(&app, "GET", "/ui/patients/P001", None).await;
        assert_eq!(json["urgency"], "CRITICAL");
        assert_eq!(json["search_enabled"], true);

        let (status, json) =
            call(&app, "POST", "/ui/search", Some(json!({"patient_id": "P001"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["results"]["state"], "donors");
        assert_eq!(json["results"]["cards"][0]["distance_label"], "3.2 km");
        assert_eq!(json["map"]["viewport"]["mode"], "fit_bounds");
        assert_eq!(json["graph"]["donors"][0]["label"], "90%");

        let (status, json) =
            call(&app, "POST", "/ui/chat/contact", Some(json!({"donor_id": "D2"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["donor_name"], "Donor D2");

        let (status, json) =
            call(&app, "POST", "/ui/chat/send", Some(json!({"message": "Are you near?"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sent"]["text"], "Are you near?");
        assert_eq!(json["request_confirmed"], false);
    }

    #[tokio::test]
    async fn emergency_route_is_not_a_patient_id() {
        let app = ui_router(test_session());
        let (status, json) = call(&app, "GET", "/ui/patients/emergency", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);
        assert_eq!(json["emergency_patients"][0]["patient_id"], "P001");
    }

    #[tokio::test]
    async fn fetch_route_asks_the_service() {
        let app = ui_router(test_session());
        let (status, json) = call(&app, "GET", "/ui/patients/P002/fetch", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["patient_id"], "P002");
        assert_eq!(json["need"], "A-");

        let (status, json) = call(&app, "GET", "/ui/patients/P999/fetch", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "PATIENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn search_errors_map_to_status() {
        let session = test_session();
        let app = ui_router(Arc::clone(&session));
        call(&app, "GET", "/ui/patients", None).await;

        let (status, json) =
            call(&app, "POST", "/ui/search", Some(json!({"patient_id": "P999"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "PATIENT_NOT_FOUND");

        session.service().fail_with(500, "db down");
        let (status, json) =
            call(&app, "POST", "/ui/search", Some(json!({"patient_id": "P001"}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["message"], "db down");
    }

    #[tokio::test]
    async fn unreachable_patient_list_is_502() {
        let session = test_session();
        session.service().fail_with(503, "maintenance");
        let app = ui_router(session);
        let (status, json) = call(&app, "GET", "/ui/patients", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "PATIENTS_UNAVAILABLE");
        assert_eq!(json["error"]["view"]["detail"], "API URL: http://matching.test");
    }

    #[tokio::test]
    async fn chat_before_contact_conflicts() {
        let app = ui_router(test_session());
        let (status, json) =
            call(&app, "POST", "/ui/chat/send", Some(json!({"message": "hi"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "NO_ACTIVE_CHAT");
    }

    #[tokio::test]
    async fn ui_responses_are_not_cached() {
        let app = ui_router(test_session());
        let response = app
            .oneshot(Request::builder().uri("/ui/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
    }
}
