use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::selection::SelectionSet;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub id: String,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub selected: bool,
    pub selection: SelectionSet,
}

pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionSet> {
    Json(state.selection.lock().await.clone())
}

pub async fn toggle_selection(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Json<ToggleResponse> {
    let mut selection = state.selection.lock().await;
    let selected = selection.toggle_in_place(&request.id);
    debug!(
        "Website {} selected={} ({} selected)",
        request.id,
        selected,
        selection.len()
    );

    Json(ToggleResponse {
        id: request.id,
        selected,
        selection: selection.clone(),
    })
}
