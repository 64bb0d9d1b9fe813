//! The projection: a room's internal state mapped to its external view.

use quorum_protocol::{PlayerView, RoomView};

use crate::Room;

/// Computes the privacy-filtered external view of a room.
///
/// Pure function of the room's current state, recomputed on every push —
/// never cached, since a stale view would leak votes or omit players.
///
/// The contract: a player's `vote` appears in the output iff the room's
/// votes are revealed AND the player has voted; `voted_at` is always
/// passed through, so clients can show who has voted without seeing the
/// values. Player order matches the room's insertion order.
pub fn project(room: &Room) -> RoomView {
    RoomView {
        players: room
            .players()
            .map(|player| PlayerView {
                id: player.id().clone(),
                name: player.name().to_string(),
                vote: if room.are_votes_visible() {
                    player.vote()
                } else {
                    None
                },
                voted_at: player.voted_at(),
            })
            .collect(),
        are_votes_visible: room.are_votes_visible(),
        updated_at: room.updated_at(),
    }
}
