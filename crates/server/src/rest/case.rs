use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use shared_types::{
    AppError, CaseDetail, CaseListParams, CaseListResponse, CaseRecord, DashboardView,
    DecisionRequest, IntakeForm, SaveNotesRequest, SummaryPanel,
};
use crate::identity::extractors::SessionRequired;
use crate::intake::IntakeController;
use crate::lifecycle;
use crate::store::CaseStore;
use crate::summarize::SummarizationClient;
use crate::tenant::AppId;

const SUMMARIZER_DISABLED: &str = "Summarization is not configured.";

async fn find_case(store: &dyn CaseStore, app_id: &str, id: &str) -> Result<CaseRecord, AppError> {
    store
        .get(app_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))
}

// ── Intake ──────────────────────────────────────────────────────────

/// POST /api/cases
#[utoipa::path(
    post,
    path = "/api/cases",
    request_body = IntakeForm,
    params(
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 201, description = "Arrest submitted", body = CaseRecord),
        (status = 401, description = "Not signed in", body = AppError),
        (status = 422, description = "Missing required fields", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn submit_case(
    State(intake): State<Arc<IntakeController>>,
    app: AppId,
    SessionRequired(session): SessionRequired,
    Json(mut form): Json<IntakeForm>,
) -> Result<(StatusCode, Json<CaseRecord>), AppError> {
    let record = intake.submit(&app.0, &session, &mut form).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// ── Review ──────────────────────────────────────────────────────────

/// GET /api/cases
#[utoipa::path(
    get,
    path = "/api/cases",
    params(
        CaseListParams,
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 200, description = "Filtered cases, newest first", body = CaseListResponse),
        (status = 400, description = "Invalid status filter", body = AppError),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn list_cases(
    State(store): State<Arc<dyn CaseStore>>,
    app: AppId,
    SessionRequired(_session): SessionRequired,
    Query(params): Query<CaseListParams>,
) -> Result<Json<CaseListResponse>, AppError> {
    let query = params.to_query()?;
    let snapshot = store.list(&app.0, None).await?;
    let view = DashboardView::build(snapshot, &query, None);
    Ok(Json(CaseListResponse::from(view)))
}

/// GET /api/cases/{id}
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(
        ("id" = String, Path, description = "Case id"),
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 200, description = "Case detail", body = CaseDetail),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn get_case(
    State(store): State<Arc<dyn CaseStore>>,
    app: AppId,
    SessionRequired(_session): SessionRequired,
    Path(id): Path<String>,
) -> Result<Json<CaseDetail>, AppError> {
    let record = find_case(store.as_ref(), &app.0, &id).await?;
    Ok(Json(CaseDetail::from(record)))
}

/// POST /api/cases/{id}/decision
#[utoipa::path(
    post,
    path = "/api/cases/{id}/decision",
    request_body = DecisionRequest,
    params(
        ("id" = String, Path, description = "Case id"),
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 200, description = "Case decided", body = CaseRecord),
        (status = 401, description = "Not signed in", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn decide_case(
    State(store): State<Arc<dyn CaseStore>>,
    app: AppId,
    SessionRequired(session): SessionRequired,
    Path(id): Path<String>,
    Json(body): Json<DecisionRequest>,
) -> Result<Json<CaseRecord>, AppError> {
    let record =
        lifecycle::decide(store.as_ref(), &app.0, &session, &id, body.decision, &body.notes)
            .await?;
    Ok(Json(record))
}

/// PATCH /api/cases/{id}/notes
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/notes",
    request_body = SaveNotesRequest,
    params(
        ("id" = String, Path, description = "Case id"),
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 200, description = "Notes saved", body = CaseRecord),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn save_notes(
    State(store): State<Arc<dyn CaseStore>>,
    app: AppId,
    SessionRequired(_session): SessionRequired,
    Path(id): Path<String>,
    Json(body): Json<SaveNotesRequest>,
) -> Result<Json<CaseRecord>, AppError> {
    let record = lifecycle::save_notes(store.as_ref(), &app.0, &id, &body.notes).await?;
    Ok(Json(record))
}

/// POST /api/cases/{id}/summary
#[utoipa::path(
    post,
    path = "/api/cases/{id}/summary",
    params(
        ("id" = String, Path, description = "Case id"),
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 200, description = "Summary or summary error panel", body = SummaryPanel),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn summarize_case(
    State(store): State<Arc<dyn CaseStore>>,
    State(summarizer): State<Option<Arc<SummarizationClient>>>,
    app: AppId,
    SessionRequired(_session): SessionRequired,
    Path(id): Path<String>,
) -> Result<Json<SummaryPanel>, AppError> {
    let record = find_case(store.as_ref(), &app.0, &id).await?;
    let panel = match summarizer {
        Some(client) => client.summary_panel(&record).await,
        None => SummaryPanel::error(SUMMARIZER_DISABLED),
    };
    Ok(Json(panel))
}
