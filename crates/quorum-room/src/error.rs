//! Error types for the room layer.

use quorum_protocol::{PlayerId, RoomName};

/// Errors that can occur during room and registry operations.
///
/// Lookups are strict on purpose: commands addressed to a room or player
/// that doesn't exist fail here, before any field has been touched, so a
/// failed command never leaves a partial mutation behind.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The named room is not registered.
    #[error("room {0} doesn't exist")]
    RoomNotFound(RoomName),

    /// The player id is not present in the room.
    #[error("player {0} doesn't exist in the room")]
    PlayerNotFound(PlayerId),
}
