//! WebSocket adapter between sockets and the session manager.
//!
//! Each socket becomes one participant. A writer task forwards the
//! participant's outbox as JSON text frames; the read loop parses client
//! frames and dispatches them. Closing the socket counts as a departure.

use crate::{ClientMessage, ParticipantId, ServerConfig, SessionManager};
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::Request;
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Routes: `/ws` for play, `/health` for liveness.
pub fn router(sessions: SessionManager) -> Router {
    Router::new()
        .route("/ws", get(upgrade))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(sessions)
}

/// Binds the configured address and serves until the process ends.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let sessions = SessionManager::new(config.session_config());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Server ready at ws://{}/ws", addr);
    axum::serve(listener, router(sessions))
        .await
        .context("Server exited")?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn upgrade(
    ws: WebSocketUpgrade,
    State(sessions): State<SessionManager>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| bridge(socket, sessions))
}

#[instrument(skip_all)]
async fn bridge(socket: WebSocket, sessions: SessionManager) {
    let (participant, mut outbox) = sessions.connect().await;
    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(message) = outbox.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to encode server message");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => dispatch(&sessions, participant, text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(%participant, error = %e, "Socket error");
                break;
            }
        }
    }

    sessions.disconnect(participant).await;
    writer.abort();
}

/// Parses one text frame and hands it to the session manager.
///
/// Malformed frames and rejected requests are logged and dropped.
pub async fn dispatch(sessions: &SessionManager, participant: ParticipantId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(%participant, error = %e, "Dropping malformed frame");
            return;
        }
    };
    if let Err(e) = sessions.handle(participant, message).await {
        debug!(%participant, error = %e, "Request rejected");
    }
}
