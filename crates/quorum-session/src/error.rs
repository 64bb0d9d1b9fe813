//! Error types for the session layer.

/// Errors that can occur while dispatching a session's commands.
///
/// None of these are fatal to the process: the connection handler logs
/// the error and drops the command, and the failed command is guaranteed
/// not to have applied anything.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A command that requires a joined session arrived before `join`.
    #[error("session has not joined a room")]
    NotJoined,

    /// A command arrived after the session was terminated.
    #[error("session is terminated")]
    Terminated,

    /// The underlying room operation failed (room or player not found).
    #[error(transparent)]
    Room(#[from] quorum_room::RoomError),
}
