use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;

use shared_types::{AppError, CaseListParams, DashboardView};
use crate::dashboard::ReviewDashboard;
use crate::identity::extractors::SessionRequired;
use crate::store::CaseStore;
use crate::tenant::AppId;

fn snapshot_event(view: &DashboardView) -> Event {
    Event::default()
        .event("snapshot")
        .json_data(view)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// GET /api/cases/stream
#[utoipa::path(
    get,
    path = "/api/cases/stream",
    params(
        CaseListParams,
        ("X-App-Id" = Option<String>, Header, description = "Deployment/application id")
    ),
    responses(
        (status = 200, description = "Server-sent `snapshot` events carrying a DashboardView", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "cases"
)]
pub async fn stream_cases(
    State(store): State<Arc<dyn CaseStore>>,
    app: AppId,
    SessionRequired(session): SessionRequired,
    Query(params): Query<CaseListParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let query = params.to_query()?;
    let mut dashboard = ReviewDashboard::open(store, &app.0).await?;
    dashboard.set_query(query);
    tracing::info!(app_id = %app.0, actor = %session.actor_id, "Live case feed opened");

    let events = futures::stream::unfold((dashboard, true), |(mut dashboard, first)| async move {
        let next = if first {
            dashboard.ready().await
        } else {
            dashboard.changed().await
        };
        match next {
            Ok(()) => {
                let event = snapshot_event(&dashboard.view());
                Some((Ok::<_, Infallible>(event), (dashboard, false)))
            }
            Err(_) => None,
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
