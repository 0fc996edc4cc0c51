//! HTTP API handlers for tomo-as

pub mod buildinfo;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod sessions;
pub mod sse;
pub mod ui;

pub use buildinfo::get_build_info;
pub use catalog::get_catalog;
pub use dashboard::get_dashboard;
pub use health::health_routes;
pub use sessions::{
    back, complete, create_session, delete_session, get_session, login, open_admin, restart,
    set_answer, set_identity, start,
};
pub use sse::event_stream;
pub use ui::{serve_app_js, serve_index};
