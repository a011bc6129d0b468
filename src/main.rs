use axum::{
    routing::{get, patch, post},
    Router,
};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregators;
mod config;
mod dev_tools;
mod error;
mod filters;
mod handlers;
mod models;
mod realtime;
mod selection;
mod tracking;

use aggregators::ComparisonAggregator;
use config::Config;
use models::{DashboardData, SiteRecord};
use realtime::{RealtimeCounter, RealtimeFeed};
use selection::SelectionSet;

#[derive(Clone)]
pub struct AppState {
    data: Arc<RwLock<Arc<DashboardData>>>,
    pub selection: Arc<Mutex<SelectionSet>>,
    pub comparison: Arc<ComparisonAggregator>,
    pub realtime: Arc<RealtimeFeed>,
}

impl AppState {
    pub fn new(data: DashboardData, config: &Config) -> Self {
        let selection = SelectionSet::all(&data.sites);
        Self {
            data: Arc::new(RwLock::new(Arc::new(data))),
            selection: Arc::new(Mutex::new(selection)),
            comparison: Arc::new(ComparisonAggregator::new(config.chart.clone())),
            realtime: Arc::new(RealtimeFeed::new(RealtimeCounter::new(
                config.realtime_initial_visitors,
                config.realtime_max_delta,
            ))),
        }
    }

    /// The current snapshot. Every view built from one call sees the same data.
    pub async fn snapshot(&self) -> Arc<DashboardData> {
        self.data.read().await.clone()
    }

    /// The snapshot together with the selection, read under the data lock so
    /// a concurrent site edit cannot land between the two reads.
    pub async fn view(&self) -> (Arc<DashboardData>, SelectionSet) {
        let data = self.data.read().await;
        let selection = self.selection.lock().await.clone();
        (data.clone(), selection)
    }

    /// Applies `f` to a copy of the site list and swaps the copy in whole.
    pub async fn update_sites<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<SiteRecord>, &mut SelectionSet) -> R,
    {
        let mut data = self.data.write().await;
        let mut selection = self.selection.lock().await;

        let mut next = DashboardData::clone(&data);
        let result = f(&mut next.sites, &mut selection);
        *data = Arc::new(next);
        result
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/visitors", get(handlers::list_visitors))
        .route("/api/visitors/export", get(handlers::export_visitors))
        .route(
            "/api/websites",
            get(handlers::list_websites).post(handlers::create_website),
        )
        .route(
            "/api/websites/:id",
            patch(handlers::update_website).delete(handlers::delete_website),
        )
        .route("/api/comparison", get(handlers::get_comparison))
        .route("/api/selection", get(handlers::get_selection))
        .route("/api/selection/toggle", post(handlers::toggle_selection))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/realtime", get(handlers::get_realtime))
        .route("/api/realtime/refresh", post(handlers::refresh_realtime))
        .route("/api/realtime/ws", get(handlers::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trackwise=info,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    info!("Starting TrackWise dashboard server...");

    let config = Config::from_env()?;
    let state = AppState::new(dev_tools::mock_data::sample_dashboard(), &config);

    tokio::spawn(
        state
            .realtime
            .clone()
            .run(config.realtime_interval, StdRng::from_entropy()),
    );

    let app = build_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
