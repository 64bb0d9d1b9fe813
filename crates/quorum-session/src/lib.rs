//! Per-connection sessions for Quorum.
//!
//! A session binds one external connection to a room name and a player
//! id, and translates the connection's commands into room operations:
//!
//! 1. **State machine** — [`Session`] moves `Unbound → Joined →
//!    Terminated` over the connection's lifetime.
//! 2. **Command dispatch** — [`apply_command`] maps each
//!    [`ClientCommand`](quorum_protocol::ClientCommand) onto the
//!    [`Registry`](quorum_room::Registry) and the bound room.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)   ← owns the registry lock, pumps the connection
//!     ↕
//! Session (this crate)   ← who is this connection, what may it do
//!     ↕
//! Room layer (below)   ← the mutations themselves
//! ```

mod commands;
mod error;
mod session;

pub use commands::{apply_command, disconnect, CommandOutcome};
pub use error::SessionError;
pub use session::{Session, SessionPhase};
