use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::realtime::{RealtimeFeed, RealtimeSnapshot};
use crate::AppState;

pub async fn get_realtime(State(state): State<AppState>) -> Json<RealtimeSnapshot> {
    Json(state.realtime.snapshot().await)
}

pub async fn refresh_realtime(State(state): State<AppState>) -> Json<RealtimeSnapshot> {
    Json(state.realtime.refresh().await)
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state.realtime))
}

async fn handle_socket(socket: WebSocket, feed: Arc<RealtimeFeed>) {
    let mut rx = feed.subscribe();

    info!("New real-time visitors connection established");

    let (mut sender, _receiver) = socket.split();

    let current = feed.snapshot().await;
    if send_snapshot(&mut sender, &current).await.is_err() {
        return;
    }

    loop {
        match rx.recv().await {
            Ok(snapshot) => {
                if send_snapshot(&mut sender, &snapshot).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Real-time subscriber lagged, skipped {} updates", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Real-time visitors connection closed");
}

async fn send_snapshot<S>(sender: &mut S, snapshot: &RealtimeSnapshot) -> Result<(), ()>
where
    S: futures_util::Sink<Message> + Unpin,
{
    let text = serde_json::to_string(snapshot).map_err(|_| ())?;
    sender.send(Message::Text(text)).await.map_err(|_| ())
}
