use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::aggregators::{Comparison, Metric};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    pub metric: Option<String>,
}

pub async fn get_comparison(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> ApiResult<Json<Comparison>> {
    let metric = match query.metric.as_deref() {
        None | Some("") => Metric::default(),
        Some(raw) => raw.parse::<Metric>()?,
    };

    let (data, selection) = state.view().await;

    Ok(Json(state.comparison.compare(&data.sites, metric, &selection)))
}
