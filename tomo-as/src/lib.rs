//! tomo-as library - ToMo assessment server
//!
//! HTTP surface over the ToMo core: respondent flow sessions, the
//! password-gated admin dashboard, the catalog, and an SSE stream that
//! tells open dashboards when a submission arrives.

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tomo_common::events::EventBus;
use tomo_common::{QuestionCatalog, SubmissionStore};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod chart;
pub mod error;
pub mod session;

use session::SessionRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<QuestionCatalog>,
    pub store: SubmissionStore,
    pub sessions: SessionRegistry,
    pub event_bus: EventBus,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: QuestionCatalog, store: SubmissionStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            sessions: SessionRegistry::default(),
            event_bus: EventBus::new(100),
        }
    }

    /// Use `idle_ttl` for session eviction instead of the default
    pub fn with_session_ttl(mut self, idle_ttl: Duration) -> Self {
        self.sessions = SessionRegistry::new(idle_ttl);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let sessions = Router::new()
        .route("/api/sessions", post(api::create_session))
        .route(
            "/api/sessions/:id",
            get(api::get_session).delete(api::delete_session),
        )
        .route("/api/sessions/:id/identity", put(api::set_identity))
        .route("/api/sessions/:id/answers/:index", put(api::set_answer))
        .route("/api/sessions/:id/start", post(api::start))
        .route("/api/sessions/:id/complete", post(api::complete))
        .route("/api/sessions/:id/restart", post(api::restart))
        .route("/api/sessions/:id/admin", post(api::open_admin))
        .route("/api/sessions/:id/login", post(api::login))
        .route("/api/sessions/:id/back", post(api::back))
        .route("/api/sessions/:id/dashboard", get(api::get_dashboard));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/catalog", get(api::get_catalog))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/events", get(api::event_stream))
        .merge(api::health_routes());

    Router::new()
        .merge(sessions)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
