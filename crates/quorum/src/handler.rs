//! Per-connection handler: room binding, command dispatch, state pushes.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Read the room name the connection declared at upgrade time
//!   2. Unbound phase: decode commands until a `join` succeeds
//!   3. Joined phase: pump inbound commands and outbound state pushes
//!   4. On any exit: remove the player from the room (if it still exists)

use std::sync::Arc;

use quorum_protocol::{
    ClientCommand, Codec, ProtocolError, RoomName, ServerEvent,
};
use quorum_session::{
    apply_command, disconnect, CommandOutcome, Session, SessionError,
};
use quorum_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::QuorumError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), QuorumError> {
    let conn_id = conn.id();

    let room_name = match conn.room_name() {
        Some(name) => RoomName::new(name),
        None => {
            tracing::warn!(
                %conn_id,
                "connection without roomName parameter, closing"
            );
            let _ = conn.close().await;
            return Err(QuorumError::Protocol(
                ProtocolError::InvalidMessage(
                    "missing roomName query parameter".into(),
                ),
            ));
        }
    };

    let mut session = Session::open(room_name);
    tracing::debug!(
        %conn_id,
        room = %session.room_name(),
        player = %session.player_id(),
        "handling new connection"
    );

    let result = drive(&conn, &state, &mut session).await;

    // Disconnect runs on every exit path of `drive`: remove the player
    // from the room if the room still exists, terminate the session.
    {
        let mut registry = state.registry.lock().await;
        disconnect(&mut session, &mut registry);
    }

    result
}

/// Runs the connection's two phases: unbound until a `join` succeeds,
/// then the joined pump.
async fn drive(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    session: &mut Session,
) -> Result<(), QuorumError> {
    // --- Unbound: wait for a join to produce a subscription ---
    let mut views = loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(
                    player = %session.player_id(),
                    "connection closed before joining"
                );
                return Ok(());
            }
            Err(e) => return Err(QuorumError::Transport(e)),
        };

        let Some(cmd) = decode_command(state, session, &data) else {
            continue;
        };
        let outcome = {
            let mut registry = state.registry.lock().await;
            apply_command(session, &mut registry, cmd)
        };
        match outcome {
            Ok(CommandOutcome::Joined(views)) => break views,
            Ok(CommandOutcome::Applied) => {}
            Err(e) => log_rejected(session, &e),
        }
    };

    // --- Joined: forward state pushes, keep dispatching commands ---
    loop {
        tokio::select! {
            view = views.recv() => {
                // Senders live as long as the room, and rooms are never
                // destroyed; a closed channel just means we're done.
                let Some(view) = view else { break };
                forward_view(conn, state, view).await?;
            }
            result = conn.recv() => {
                match result {
                    Ok(Some(data)) => {
                        let Some(cmd) =
                            decode_command(state, session, &data)
                        else {
                            continue;
                        };
                        let mut registry = state.registry.lock().await;
                        if let Err(e) =
                            apply_command(session, &mut registry, cmd)
                        {
                            log_rejected(session, &e);
                        }
                    }
                    Ok(None) => {
                        tracing::info!(
                            player = %session.player_id(),
                            "connection closed cleanly"
                        );
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(
                            player = %session.player_id(),
                            error = %e,
                            "recv error"
                        );
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Encodes a room view as a `state` event and writes it out.
async fn forward_view(
    conn: &WebSocketConnection,
    state: &ServerState,
    view: quorum_protocol::RoomView,
) -> Result<(), QuorumError> {
    let bytes = state.codec.encode(&ServerEvent::State(view))?;
    conn.send(&bytes).await.map_err(QuorumError::Transport)?;
    Ok(())
}

/// Decodes a client command; malformed frames are logged and ignored —
/// no state change, no push.
fn decode_command(
    state: &ServerState,
    session: &Session,
    data: &[u8],
) -> Option<ClientCommand> {
    match state.codec.decode(data) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            tracing::debug!(
                player = %session.player_id(),
                error = %e,
                "failed to decode command"
            );
            None
        }
    }
}

/// A rejected command is dropped without affecting anything else — the
/// mutators guarantee nothing was partially applied.
fn log_rejected(session: &Session, err: &SessionError) {
    tracing::debug!(
        player = %session.player_id(),
        room = %session.room_name(),
        error = %err,
        "command rejected"
    );
}
