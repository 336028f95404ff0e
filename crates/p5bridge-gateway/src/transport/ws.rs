//! WebSocket session loop.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS and assign a session id
//! - connect: attach to the hub, register, send `welcome`
//! - heartbeat: app-level `ping` events and WS Ping/Pong frames refresh liveness
//! - disconnect: remove from the registry, detach from the hub
//! - close on listener shutdown

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use p5bridge_core::error::Result;
use p5bridge_core::protocol::{ClientEnvelope, Event, ProjectState};

use crate::app_state::AppState;
use crate::realtime::{wall_clock_ms, PreparedMsg};
use crate::transport::codec::{decode, Inbound};
use crate::transport::hub::OUTBOUND_QUEUE;

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        let session_id = app.hub().next_session_id();
        if let Err(e) = run_session(&app, &session_id, socket).await {
            tracing::warn!(session_id = %session_id, error = %e, "session ended with error");
        }
        disconnect(&app, &session_id);
    })
}

fn disconnect(app: &AppState, session_id: &str) {
    app.registry().remove(session_id);
    app.hub().detach(session_id);
    let remaining = app.registry().count();
    tracing::info!(session_id = %session_id, remaining, "editor session disconnected");
    if remaining == 0 {
        tracing::info!("no editor sessions remaining");
    }
}

fn prepared(event: &Event) -> Result<Message> {
    Ok(PreparedMsg::prepare(event)?.to_ws_message())
}

// --------------------
// Core session loop
// --------------------
async fn run_session(app: &AppState, session_id: &str, socket: WebSocket) -> Result<()> {
    let mut shutdown = app.listener().shutdown_signal();
    if *shutdown.borrow() {
        return Ok(());
    }

    // ---- outbound channel
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);

    // ---- split socket
    let (mut ws_tx, mut ws_rx) = socket.split();

    // ---- connect
    app.hub().attach(session_id, out_tx.clone());
    app.registry().register(session_id);
    tracing::info!(
        session_id = %session_id,
        total = app.registry().count(),
        "editor session connected"
    );

    reply(
        &out_tx,
        session_id,
        prepared(&Event::welcome(session_id, wall_clock_ms()))?,
    );

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                if ws_tx.send(m).await.is_err() {
                    break;
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = match incoming {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(session_id = %session_id, error = %e, "socket read failed");
                        break;
                    }
                };

                match decode(msg) {
                    Ok(Inbound::Event(env)) => handle_event(app, session_id, env, &out_tx),
                    Ok(Inbound::Ping(payload)) => {
                        app.registry().touch(session_id);
                        reply(&out_tx, session_id, Message::Pong(payload));
                    }
                    Ok(Inbound::Pong) => {
                        app.registry().touch(session_id);
                    }
                    Ok(Inbound::Binary { bytes_len }) => {
                        tracing::debug!(session_id = %session_id, bytes_len, "ignoring binary frame");
                    }
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        tracing::warn!(session_id = %session_id, error = %e, "undecodable frame ignored");
                    }
                }
            }

            // listener stopped
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Queue a reply from inside the session loop. This task is the queue's only
/// reader, so it must never wait for room.
fn reply(out_tx: &mpsc::Sender<Message>, session_id: &str, msg: Message) {
    match out_tx.try_send(msg) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!(session_id = %session_id, "outbound queue full, reply dropped");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(session_id = %session_id, "outbound queue closed, reply dropped");
        }
    }
}

fn handle_event(
    app: &AppState,
    session_id: &str,
    env: ClientEnvelope,
    out_tx: &mpsc::Sender<Message>,
) {
    match env.event.as_str() {
        "ping" => {
            app.registry().touch(session_id);
            tracing::debug!(session_id = %session_id, "heartbeat");
            match prepared(&Event::pong(wall_clock_ms())) {
                Ok(m) => reply(out_tx, session_id, m),
                Err(e) => tracing::warn!(error = %e, "pong encode failed"),
            }
        }
        "projectState" => match env.data_as::<ProjectState>() {
            Ok(state) => tracing::info!(
                session_id = %session_id,
                project = %state.display_name(),
                files = state.files.len(),
                "received project state"
            ),
            Err(e) => tracing::warn!(session_id = %session_id, error = %e, "bad projectState"),
        },
        "getProjectState" => {
            tracing::info!(session_id = %session_id, "editor requested project state");
        }
        "clientError" => {
            let detail = env.data.as_ref().map(|d| d.get()).unwrap_or("null");
            tracing::error!(session_id = %session_id, detail = %detail, "editor reported error");
        }
        other => {
            tracing::debug!(session_id = %session_id, event = %other, "unhandled editor event");
        }
    }
}
