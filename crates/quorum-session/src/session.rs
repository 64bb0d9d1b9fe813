//! Session types: the server's record of one connection.

use quorum_protocol::{PlayerId, RoomName};
use rand::Rng;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Where a connection is in its lifecycle.
///
/// ```text
///   Unbound ──(join)──→ Joined ──(disconnect)──→ Terminated
///      │                                             ↑
///      └────────────(disconnect)─────────────────────┘
/// ```
///
/// There is no way back: a terminated session is done, and a new
/// connection from the same person gets a brand-new player id with no
/// link to the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Connected, room name declared, but no `join` received yet.
    Unbound,
    /// The connection's player is in the room.
    Joined,
    /// The connection is gone; the session is dead.
    Terminated,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One connection's binding to a room and a player identity.
///
/// The room name comes from the connection's query parameter and is
/// immutable; the player id is generated here, once, at open.
#[derive(Debug, Clone)]
pub struct Session {
    player_id: PlayerId,
    room_name: RoomName,
    phase: SessionPhase,
}

impl Session {
    /// Opens a session for a connection scoped to `room_name`.
    pub fn open(room_name: RoomName) -> Self {
        Self {
            player_id: generate_player_id(),
            room_name,
            phase: SessionPhase::Unbound,
        }
    }

    /// The player id this connection acts as.
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// The room this connection is scoped to.
    pub fn room_name(&self) -> &RoomName {
        &self.room_name
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns `true` once the session's player has joined the room.
    pub fn is_joined(&self) -> bool {
        self.phase == SessionPhase::Joined
    }

    pub(crate) fn mark_joined(&mut self) {
        self.phase = SessionPhase::Joined;
    }

    /// Marks the session dead. Called when the connection closes.
    pub fn terminate(&mut self) {
        self.phase = SessionPhase::Terminated;
    }
}

/// Generates a random 32-character hex player id (128 bits of entropy).
///
/// Uniqueness within a room is the hard requirement; 128 random bits make
/// a collision practically impossible.
fn generate_player_id() -> PlayerId {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    PlayerId(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
