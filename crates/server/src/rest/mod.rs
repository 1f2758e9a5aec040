pub mod case;
pub mod charge;
pub mod session;
pub mod stream;

use axum::{routing::{get, patch, post}, Router};
use crate::db::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Session
        .route("/api/session", get(session::current_session).post(session::sign_in))
        // Cases
        .route("/api/cases", get(case::list_cases).post(case::submit_case))
        .route("/api/cases/stream", get(stream::stream_cases))
        .route("/api/cases/{id}", get(case::get_case))
        .route("/api/cases/{id}/decision", post(case::decide_case))
        .route("/api/cases/{id}/notes", patch(case::save_notes))
        .route("/api/cases/{id}/summary", post(case::summarize_case))
        // Charge catalog
        .route("/api/charges", get(charge::list_charges))
}
