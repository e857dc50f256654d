//! Server module
//!
//! HTTP routes and the per-connection WebSocket loop.
//!
//! Each upgraded connection runs in its own task. Within a connection,
//! frames are handled strictly one after another: the next read does not
//! start until the previous reply has been written.

use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::dispatcher::Dispatcher;
use crate::domain::RequestContext;
use crate::error::AppError;
use crate::protocol::Reply;

/// Build the application router
pub fn build_router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

/// Plain-text banner
async fn index() -> &'static str {
    "WebSocket API Server\nConnect to /ws\n"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Upgrade to a WebSocket and hand the socket to its own task
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(dispatcher): State<Dispatcher>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    let mut context = RequestContext::new();
    if let Some(ConnectInfo(addr)) = connect_info {
        context = context.with_remote_addr(addr);
    }

    let span = tracing::info_span!(
        "connection",
        connection_id = %context.connection_id,
        remote_addr = %context
    );

    ws.on_upgrade(move |socket| handle_socket(socket, dispatcher, context).instrument(span))
}

/// Read, dispatch and answer frames until the client goes away
async fn handle_socket(mut socket: WebSocket, dispatcher: Dispatcher, context: RequestContext) {
    tracing::info!(remote_addr = %context, "Client connected");

    while let Some(message) = socket.recv().await {
        let reply = match message {
            Ok(Message::Text(text)) => dispatcher.handle_frame(&text, &context).await,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => dispatcher.handle_frame(&text, &context).await,
                Err(_) => {
                    tracing::warn!(remote_addr = %context, "Binary frame is not UTF-8");
                    Reply::Single(AppError::InvalidMessageFormat.into_response())
                }
            },
            // Pings are answered by axum
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::warn!(remote_addr = %context, error = %e, "WebSocket error");
                break;
            }
        };

        if let Err(e) = send_reply(&mut socket, &reply).await {
            tracing::error!(remote_addr = %context, error = %e, "Write error");
            break;
        }
    }

    tracing::info!(remote_addr = %context, "Client disconnected");
}

async fn send_reply(socket: &mut WebSocket, reply: &Reply) -> Result<(), axum::Error> {
    let text = serde_json::to_string(reply).map_err(axum::Error::new)?;
    socket.send(Message::Text(text)).await
}
