//! Flow session endpoints
//!
//! Each session wraps one [`FlowController`]. Handlers translate requests
//! into flow events and return the resulting [`SessionView`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tomo_common::events::TomoEvent;
use tomo_common::flow::{FlowEvent, ResultsView};
use tomo_common::scoring::{format_score, AnswerSet};
use tomo_common::{FlowController, Page};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::session::SharedSession;
use crate::AppState;

/// Client-facing snapshot of a session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub page: Page,
    pub name: String,
    pub age_group: Option<String>,
    pub job_function: Option<String>,
    pub answers: AnswerSet,
    pub answered: usize,
    pub total: usize,
    /// Two-decimal score once computed
    pub score: Option<String>,
    /// Present on the results page
    pub result: Option<ResultsView>,
}

impl SessionView {
    fn of(id: Uuid, flow: &FlowController) -> Self {
        let state = flow.state();
        Self {
            id,
            page: state.page,
            name: state.name.clone(),
            age_group: state.age_group.clone(),
            job_function: state.job_function.clone(),
            answers: state.answers.clone(),
            answered: state.answers.answered(),
            total: flow.catalog().len(),
            score: state.score.map(format_score),
            result: flow.results_view(),
        }
    }
}

pub(crate) async fn lookup(state: &AppState, id: &Uuid) -> ApiResult<SharedSession> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("session {}", id)))
}

/// Dispatch `event` on session `id`
///
/// Leaving the admin dashboard releases its charts; a stored submission is
/// announced on the event bus.
async fn apply(state: &AppState, id: Uuid, event: FlowEvent) -> ApiResult<Json<SessionView>> {
    let session = lookup(state, &id).await?;
    let mut session = session.lock().await;

    let outcome = session.flow.dispatch(event).await?;
    if outcome.page != Page::AdminDashboard {
        session.dashboard.close();
    }
    if let Some(submission) = &outcome.persisted {
        state.event_bus.emit_lossy(TomoEvent::SubmissionAppended {
            id: submission.id,
            timestamp: chrono::Utc::now(),
        });
    }

    Ok(Json(SessionView::of(id, &session.flow)))
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let id = state
        .sessions
        .create(state.catalog.clone(), state.store.clone())
        .await;
    info!("Created session {}", id);

    let session = lookup(&state, &id).await?;
    let session = session.lock().await;
    Ok((StatusCode::CREATED, Json(SessionView::of(id, &session.flow))))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let session = lookup(&state, &id).await?;
    let session = session.lock().await;
    Ok(Json(SessionView::of(id, &session.flow)))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.sessions.remove(&id).await {
        return Err(ApiError::NotFound(format!("session {}", id)));
    }
    info!("Closed session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Identity fields; absent fields are left unchanged, empty ones cleared
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRequest {
    pub name: Option<String>,
    pub age_group: Option<String>,
    pub job_function: Option<String>,
}

/// PUT /api/sessions/:id/identity
pub async fn set_identity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<IdentityRequest>,
) -> ApiResult<Json<SessionView>> {
    let session = lookup(&state, &id).await?;
    let mut session = session.lock().await;

    session.flow.set_identity(
        req.name.as_deref(),
        req.age_group.as_deref(),
        req.job_function.as_deref(),
    )?;

    Ok(Json(SessionView::of(id, &session.flow)))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub value: u8,
}

/// PUT /api/sessions/:id/answers/:index
pub async fn set_answer(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<AnswerRequest>,
) -> ApiResult<Json<SessionView>> {
    let session = lookup(&state, &id).await?;
    let mut session = session.lock().await;
    session.flow.answer(index, req.value)?;
    Ok(Json(SessionView::of(id, &session.flow)))
}

/// POST /api/sessions/:id/start
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    apply(&state, id, FlowEvent::Start).await
}

/// POST /api/sessions/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    apply(&state, id, FlowEvent::Complete).await
}

/// POST /api/sessions/:id/restart
pub async fn restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    apply(&state, id, FlowEvent::Restart).await
}

/// POST /api/sessions/:id/admin
pub async fn open_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    apply(&state, id, FlowEvent::Admin).await
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// POST /api/sessions/:id/login
pub async fn login(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionView>> {
    apply(&state, id, FlowEvent::Login(req.password)).await
}

/// POST /api/sessions/:id/back
pub async fn back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    apply(&state, id, FlowEvent::Back).await
}
