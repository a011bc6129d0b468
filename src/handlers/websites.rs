use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ApiResult, RegistrationError};
use crate::models::{SiteRecord, SiteStatus};
use crate::tracking::{register, validate_site_url, TrackedSite, WebsiteRegistration};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsitePatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub status: Option<SiteStatus>,
}

fn next_site_id(sites: &[SiteRecord]) -> String {
    let next = sites
        .iter()
        .filter_map(|s| s.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    next.to_string()
}

pub async fn list_websites(State(state): State<AppState>) -> Json<Vec<SiteRecord>> {
    let data = state.snapshot().await;
    Json(data.sites.clone())
}

pub async fn create_website(
    State(state): State<AppState>,
    Json(registration): Json<WebsiteRegistration>,
) -> ApiResult<(StatusCode, Json<TrackedSite>)> {
    let tracked = state
        .update_sites(|sites, selection| {
            let mut rng = StdRng::from_entropy();
            let tracked = register(&registration, next_site_id(sites), &mut rng)?;
            selection.insert(&tracked.site.id);
            sites.push(tracked.site.clone());
            Ok::<_, RegistrationError>(tracked)
        })
        .await?;

    info!(
        "Registered website {} ({}) with key {}",
        tracked.site.name, tracked.site.url, tracked.site_key
    );
    Ok((StatusCode::CREATED, Json(tracked)))
}

pub async fn update_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WebsitePatch>,
) -> StatusCode {
    let updated = state
        .update_sites(|sites, _| {
            let Some(site) = sites.iter_mut().find(|s| s.id == id) else {
                return false;
            };
            if let Some(name) = patch.name.as_deref().map(str::trim) {
                if name.chars().count() >= 2 {
                    site.name = name.to_string();
                } else {
                    warn!("Ignoring too short name for website {}", id);
                }
            }
            if let Some(url) = patch.url.as_deref() {
                match validate_site_url(url) {
                    Ok(parsed) => site.url = parsed.to_string(),
                    Err(e) => warn!("Ignoring invalid URL for website {}: {}", id, e),
                }
            }
            if let Some(status) = patch.status {
                site.status = Some(status);
            }
            true
        })
        .await;

    if updated {
        info!("Edited website {}", id);
    } else {
        warn!("Edit requested for unknown website {}", id);
    }
    StatusCode::NO_CONTENT
}

pub async fn delete_website(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let removed = state
        .update_sites(|sites, selection| {
            let before = sites.len();
            sites.retain(|s| s.id != id);
            selection.remove(&id);
            sites.len() != before
        })
        .await;

    if removed {
        info!("Deleted website {}", id);
    } else {
        warn!("Delete requested for unknown website {}", id);
    }
    StatusCode::NO_CONTENT
}
