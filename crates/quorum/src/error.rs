//! Unified error type for the Quorum server.

use quorum_protocol::ProtocolError;
use quorum_room::RoomError;
use quorum_session::SessionError;
use quorum_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuorumError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (not joined, terminated).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (room or player not found).
    #[error(transparent)]
    Room(#[from] RoomError),
}
