//! The registry: top-level map from room name to room.

use std::collections::HashMap;

use quorum_protocol::RoomName;

use crate::{Room, RoomError};

/// All rooms in the process, keyed by name.
///
/// Created once at startup and injected into the connection-handling
/// layer; rooms are created lazily on first join and never pruned — a
/// room outlives its last player for the process lifetime.
///
/// Lookup is strict: asking for a room that doesn't exist is an error,
/// never a silent default. This keeps a typo'd name from fanning commands
/// out to an implicitly created room.
///
/// Not thread-safe by itself — the server owns one instance behind a
/// mutex, and all command handlers go through that.
pub struct Registry {
    rooms: HashMap<RoomName, Room>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Returns `true` if a room is registered under this name.
    pub fn has_room(&self, name: &RoomName) -> bool {
        self.rooms.contains_key(name)
    }

    /// Looks up a room by name.
    pub fn room(&self, name: &RoomName) -> Result<&Room, RoomError> {
        self.rooms
            .get(name)
            .ok_or_else(|| RoomError::RoomNotFound(name.clone()))
    }

    /// Looks up a room by name for mutation.
    pub fn room_mut(
        &mut self,
        name: &RoomName,
    ) -> Result<&mut Room, RoomError> {
        self.rooms
            .get_mut(name)
            .ok_or_else(|| RoomError::RoomNotFound(name.clone()))
    }

    /// Registers a fresh room under `name` and returns it.
    ///
    /// Always creates — an existing room under the same name is replaced.
    /// Callers are expected to guard with [`has_room`](Self::has_room).
    pub fn create_room(&mut self, name: RoomName) -> &mut Room {
        tracing::info!(room = %name, "room created");
        self.rooms.insert(name.clone(), Room::new());
        self.rooms.get_mut(&name).expect("just inserted")
    }

    /// Number of registered rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
