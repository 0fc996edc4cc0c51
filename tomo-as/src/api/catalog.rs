//! Catalog endpoint
//!
//! Serves what the form and assessment pages render. Weights stay on the
//! server.

use axum::{extract::State, Json};
use serde::Serialize;
use tomo_common::catalog::{LIKERT_HIGH_CAPTION, LIKERT_LOW_CAPTION, LIKERT_MAX, LIKERT_MIN};

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikertScale {
    pub min: u8,
    pub max: u8,
    pub low_caption: &'static str,
    pub high_caption: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub age_groups: Vec<String>,
    pub job_functions: Vec<String>,
    pub questions: Vec<String>,
    pub scale: LikertScale,
}

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = &state.catalog;
    Json(CatalogResponse {
        age_groups: catalog.age_groups().to_vec(),
        job_functions: catalog.job_functions().to_vec(),
        questions: catalog.questions().iter().map(|q| q.prompt.clone()).collect(),
        scale: LikertScale {
            min: LIKERT_MIN,
            max: LIKERT_MAX,
            low_caption: LIKERT_LOW_CAPTION,
            high_caption: LIKERT_HIGH_CAPTION,
        },
    })
}
