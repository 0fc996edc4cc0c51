//! Admin dashboard endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tomo_common::dashboard::{TableRow, EMPTY_CHART_MESSAGE};
use tomo_common::Page;
use uuid::Uuid;

use super::sessions::lookup;
use crate::chart::ChartJsHandle;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub rows: Vec<TableRow>,
    /// Table placeholder when nothing has been submitted
    pub placeholder: Option<String>,
    /// Chart-area placeholder when nothing has been submitted
    pub chart_placeholder: Option<String>,
    /// Chart.js configurations
    pub age_chart: Option<Value>,
    pub job_chart: Option<Value>,
}

/// GET /api/sessions/:id/dashboard
///
/// Re-reads the store and redraws both charts, destroying the previous
/// ones first.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DashboardResponse>> {
    let session = lookup(&state, &id).await?;
    let mut session = session.lock().await;

    if session.flow.page() != Page::AdminDashboard {
        return Err(ApiError::Forbidden(format!(
            "dashboard is not open (page {})",
            session.flow.page()
        )));
    }

    let submissions = state.store.load_all().await?;
    let view = session.dashboard.render(&submissions, &state.catalog);
    let chart_placeholder = view.is_empty().then(|| EMPTY_CHART_MESSAGE.to_string());
    let config = |handle: Option<&ChartJsHandle>| handle.map(|h| h.config().clone());

    Ok(Json(DashboardResponse {
        rows: view.rows,
        placeholder: view.placeholder,
        chart_placeholder,
        age_chart: config(session.dashboard.age_chart()),
        job_chart: config(session.dashboard.job_chart()),
    }))
}
