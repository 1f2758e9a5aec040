use axum::{extract::Query, Json};

use shared_types::{search_charges, ChargeSearchParams};

/// GET /api/charges
#[utoipa::path(
    get,
    path = "/api/charges",
    params(ChargeSearchParams),
    responses(
        (status = 200, description = "Matching charge labels", body = Vec<String>)
    ),
    tag = "charges"
)]
pub async fn list_charges(Query(params): Query<ChargeSearchParams>) -> Json<Vec<String>> {
    let term = params.q.unwrap_or_default();
    Json(
        search_charges(&term, &[])
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}
