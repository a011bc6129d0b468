use axum::{extract::State, Json};

use crate::aggregators::{summarize, SummaryMetrics};
use crate::AppState;

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryMetrics> {
    let data = state.snapshot().await;
    Json(summarize(&data.sites))
}
