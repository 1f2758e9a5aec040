use axum::Router;
use shared_types::{
    AppError, AppErrorKind, Banner, BannerKind, CaseDetail, CaseListResponse, CaseRecord,
    CaseStatus, DashboardView, Decision, DecisionRequest, IntakeForm, SaveNotesRequest,
    SessionResponse, SignInRequest, StatusCounts, StatusFilter, SummaryPanel, SummaryStatus,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::identity::middleware::session_middleware;
use crate::rest;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Session
        rest::session::sign_in,
        rest::session::current_session,
        // Cases
        rest::case::submit_case,
        rest::case::list_cases,
        rest::case::get_case,
        rest::case::decide_case,
        rest::case::save_notes,
        rest::case::summarize_case,
        rest::stream::stream_cases,
        // Charges
        rest::charge::list_charges,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        SignInRequest, SessionResponse,
        IntakeForm, CaseRecord, CaseStatus, Decision, DecisionRequest, SaveNotesRequest,
        CaseDetail, CaseListResponse, DashboardView, StatusCounts, StatusFilter,
        Banner, BannerKind,
        SummaryPanel, SummaryStatus,
        HealthResponse,
    )),
    tags(
        (name = "session", description = "Sign-in and session endpoints"),
        (name = "cases", description = "Arrest intake, review and decision endpoints"),
        (name = "charges", description = "Charge catalog lookup"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Arrest Review API",
        description = "Arrest intake and case review service",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the full application router: REST API under `/api/*`, `/health`,
/// and the API docs at `/docs`.
///
/// The session middleware sits outside `OtelTraceLayer` so the span can
/// record the resolved actor.
pub fn api_router(state: AppState, telemetry: bool) -> Router {
    let identity = state.identity.clone();

    let mut router = Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    if telemetry {
        router = router.layer(crate::telemetry::OtelTraceLayer);
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            identity,
            session_middleware,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
