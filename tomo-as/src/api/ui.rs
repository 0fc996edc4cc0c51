//! Embedded questionnaire page and its script

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// GET /
pub async fn serve_index() -> Response {
    asset("text/html; charset=utf-8", INDEX_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    asset("application/javascript; charset=utf-8", APP_JS)
}
