use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::filters::{filter_visitors, VisitorCategory};
use crate::models::VisitorRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VisitorQuery {
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
}

impl VisitorQuery {
    fn category(&self) -> Result<VisitorCategory, ApiError> {
        match self.category.as_deref() {
            None | Some("") => Ok(VisitorCategory::All),
            Some(raw) => Ok(raw.parse::<VisitorCategory>()?),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorList {
    pub search: String,
    pub category: &'static str,
    pub total: usize,
    pub matched: usize,
    pub visitors: Vec<VisitorRecord>,
}

pub async fn list_visitors(
    State(state): State<AppState>,
    Query(query): Query<VisitorQuery>,
) -> ApiResult<Json<VisitorList>> {
    let category = query.category()?;
    let data = state.snapshot().await;
    let visitors = filter_visitors(&data.visitors, &query.search, category);

    debug!(
        "Visitor filter search={:?} category={} matched {}/{}",
        query.search,
        category,
        visitors.len(),
        data.visitors.len()
    );

    Ok(Json(VisitorList {
        search: query.search,
        category: category.as_str(),
        total: data.visitors.len(),
        matched: visitors.len(),
        visitors,
    }))
}

pub async fn export_visitors(
    State(state): State<AppState>,
    Query(query): Query<VisitorQuery>,
) -> ApiResult<impl IntoResponse> {
    let category = query.category()?;
    let data = state.snapshot().await;
    let visitors = filter_visitors(&data.visitors, &query.search, category);

    let csv = visitors_to_csv(&visitors)?;
    info!("Exporting {} visitors as CSV", visitors.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"visitors.csv\"",
            ),
        ],
        csv,
    ))
}

fn visitors_to_csv(visitors: &[VisitorRecord]) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for visitor in visitors {
        writer
            .serialize(visitor)
            .map_err(|e| ApiError::Internal(format!("CSV export failed: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(format!("CSV export failed: {}", e)))
}
