//! Core protocol types for Quorum's wire format.
//!
//! Everything here gets serialized to JSON, sent over the wire, and
//! deserialized on the other side. The field and tag names are the wire
//! contract the browser client relies on, so the serde attributes in this
//! module are load-bearing — the shape tests at the bottom pin them down.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Assigned once when the connection opens (16 random bytes, hex-encoded)
/// and immutable afterwards. Uniqueness within a room is the hard
/// requirement; 128 bits of randomness gives it globally.
///
/// `#[serde(transparent)]` serializes this as the bare string, so a
/// `PlayerId` becomes `"4f2a…"` in JSON, not `{"0":"4f2a…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The name of a room, as supplied in the `roomName` query parameter.
///
/// Rooms are keyed by name — two connections declaring the same name land
/// in the same room. The value is taken verbatim from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomName(pub String);

impl RoomName {
    /// Creates a room name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// RoomView — the privacy-filtered projection pushed to subscribers
// ---------------------------------------------------------------------------

/// One player as seen from outside the room.
///
/// `vote` is present only while the room's votes are revealed AND the
/// player has voted; otherwise the key is omitted from the JSON entirely
/// (not `null`). `voted_at` is always passed through — it exposes *that*
/// someone voted, and when, without exposing the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// The player's identifier.
    pub id: PlayerId,
    /// Current display name.
    pub name: String,
    /// The vote value, if revealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<f64>,
    /// When the player last voted (epoch millis), hidden or not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted_at: Option<u64>,
}

/// The externally visible state of a room.
///
/// Player order matches the room's insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    /// Players in join order.
    pub players: Vec<PlayerView>,
    /// Whether votes are currently revealed.
    pub are_votes_visible: bool,
    /// When the room last changed (epoch millis).
    pub updated_at: u64,
}

// ---------------------------------------------------------------------------
// ClientCommand — inbound messages
// ---------------------------------------------------------------------------

/// Commands a client can send, one per WebSocket frame.
///
/// `#[serde(tag = "type", rename_all = "camelCase")]` produces internally
/// tagged camelCase JSON matching the wire contract:
///   `{ "type": "join", "playerName": "Foo" }`
///   `{ "type": "showVotes" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Join the connection's room (creating it if absent) under a display
    /// name. Must be the first command that binds the connection.
    #[serde(rename_all = "camelCase")]
    Join { player_name: String },

    /// Record a vote. May trigger an automatic reveal if everyone has now
    /// voted.
    Vote { vote: f64 },

    /// Reveal all votes in the room.
    ShowVotes,

    /// Hide votes again and clear every player's vote.
    ClearVotes,

    /// Change the caller's display name.
    #[serde(rename_all = "camelCase")]
    RenameSelf { player_name: String },
}

// ---------------------------------------------------------------------------
// ServerEvent — outbound pushes
// ---------------------------------------------------------------------------

/// Events the server pushes to every subscriber of a room.
///
/// Adjacently tagged:
///   `{ "type": "state", "data": { ...RoomView... } }`
///
/// Pushes are fire-and-forget broadcasts — there is no request/response
/// correlation, and the command's own originator receives them too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// The room's current projection, sent after every state change.
    State(RoomView),
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire format is consumed by a browser client, so these tests
    //! verify exact JSON shapes, not just round-trips.

    use super::*;

    // =====================================================================
    // Identity types: PlayerId, RoomName
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::from("abc123")).unwrap();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_string() {
        let pid: PlayerId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(pid, PlayerId::from("abc123"));
    }

    #[test]
    fn test_room_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomName::new("planning")).unwrap();
        assert_eq!(json, "\"planning\"");
    }

    #[test]
    fn test_room_name_display() {
        assert_eq!(RoomName::new("planning").to_string(), "planning");
    }

    // =====================================================================
    // ClientCommand — one test per variant to verify JSON shape
    // =====================================================================

    #[test]
    fn test_client_command_join_json_format() {
        let cmd = ClientCommand::Join {
            player_name: "Foo".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "join");
        assert_eq!(json["playerName"], "Foo");
    }

    #[test]
    fn test_client_command_vote_json_format() {
        let cmd = ClientCommand::Vote { vote: 1.5 };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "vote");
        assert_eq!(json["vote"], 1.5);
    }

    #[test]
    fn test_client_command_show_votes_json_format() {
        let json =
            serde_json::to_string(&ClientCommand::ShowVotes).unwrap();
        assert_eq!(json, r#"{"type":"showVotes"}"#);
    }

    #[test]
    fn test_client_command_clear_votes_json_format() {
        let json =
            serde_json::to_string(&ClientCommand::ClearVotes).unwrap();
        assert_eq!(json, r#"{"type":"clearVotes"}"#);
    }

    #[test]
    fn test_client_command_rename_self_json_format() {
        let cmd = ClientCommand::RenameSelf {
            player_name: "Cool Guy".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "renameSelf");
        assert_eq!(json["playerName"], "Cool Guy");
    }

    #[test]
    fn test_client_command_decodes_from_wire_json() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"join","playerName":"Foo"}"#)
                .unwrap();
        assert_eq!(
            cmd,
            ClientCommand::Join {
                player_name: "Foo".into()
            }
        );

        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"vote","vote":2.5}"#).unwrap();
        assert_eq!(cmd, ClientCommand::Vote { vote: 2.5 });
    }

    // =====================================================================
    // PlayerView / RoomView — vote visibility on the wire
    // =====================================================================

    #[test]
    fn test_player_view_hidden_vote_omits_keys() {
        // A hidden vote must not leak as `"vote": null` — the key has to
        // be absent entirely.
        let view = PlayerView {
            id: PlayerId::from("p1"),
            name: "Foo".into(),
            vote: None,
            voted_at: None,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert!(json.get("vote").is_none());
        assert!(json.get("votedAt").is_none());
        assert_eq!(json["id"], "p1");
        assert_eq!(json["name"], "Foo");
    }

    #[test]
    fn test_player_view_voted_at_without_vote() {
        // Votes hidden but cast: votedAt is on the wire, vote is not.
        let view = PlayerView {
            id: PlayerId::from("p1"),
            name: "Foo".into(),
            vote: None,
            voted_at: Some(1590254186705),
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert!(json.get("vote").is_none());
        assert_eq!(json["votedAt"], 1590254186705u64);
    }

    #[test]
    fn test_room_view_json_format() {
        let view = RoomView {
            players: vec![PlayerView {
                id: PlayerId::from("p1"),
                name: "Foo".into(),
                vote: Some(1.5),
                voted_at: Some(1590254186705),
            }],
            are_votes_visible: true,
            updated_at: 1590254186705,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert_eq!(json["areVotesVisible"], true);
        assert_eq!(json["updatedAt"], 1590254186705u64);
        assert_eq!(json["players"][0]["vote"], 1.5);
    }

    #[test]
    fn test_room_view_round_trip() {
        let view = RoomView {
            players: vec![
                PlayerView {
                    id: PlayerId::from("a"),
                    name: "Foo".into(),
                    vote: None,
                    voted_at: Some(5),
                },
                PlayerView {
                    id: PlayerId::from("b"),
                    name: "Bar".into(),
                    vote: Some(3.0),
                    voted_at: Some(6),
                },
            ],
            are_votes_visible: false,
            updated_at: 7,
        };
        let bytes = serde_json::to_vec(&view).unwrap();
        let decoded: RoomView = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(view, decoded);
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_server_event_state_json_format() {
        let event = ServerEvent::State(RoomView {
            players: vec![],
            are_votes_visible: false,
            updated_at: 42,
        });
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "state");
        assert_eq!(json["data"]["updatedAt"], 42);
        assert_eq!(json["data"]["areVotesVisible"], false);
    }

    // =====================================================================
    // Error cases — malformed input
    // =====================================================================

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientCommand, _> =
            serde_json::from_slice(garbage);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_command_type_returns_error() {
        let unknown = r#"{"type": "teleport", "where": "moon"}"#;
        let result: Result<ClientCommand, _> =
            serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_payload_field_returns_error() {
        // `join` without `playerName` is malformed, not defaulted.
        let result: Result<ClientCommand, _> =
            serde_json::from_str(r#"{"type":"join"}"#);
        assert!(result.is_err());
    }
}
