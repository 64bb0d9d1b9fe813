//! The [`Room`] aggregate: players, voting state, and change propagation.
//!
//! Every mutator applies its change, bumps `updated_at`, and finishes by
//! pushing a freshly computed projection to all current subscribers —
//! synchronously, before the caller regains control. State and
//! notification can therefore never drift apart: a subscriber sees one
//! push per mutation, in mutation order.

use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use quorum_protocol::{PlayerId, RoomView};
use tokio::sync::mpsc;

use crate::{project, Player, RoomError};

/// Channel sender for delivering state pushes to a subscriber.
pub type ViewSender = mpsc::UnboundedSender<RoomView>;

/// A subscription to a room's state pushes, handed out by
/// [`Room::subscribe`].
pub type ViewReceiver = mpsc::UnboundedReceiver<RoomView>;

/// Current time as Unix-epoch milliseconds.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// An isolated voting session: players plus room-level visibility state.
///
/// Insertion order of players is meaningful — it is the display order and
/// the serialization order — and survives removals.
pub struct Room {
    players: IndexMap<PlayerId, Player>,
    are_votes_visible: bool,
    created_at: u64,
    updated_at: u64,
    /// Subscribers receiving a projection push after every mutation.
    subscribers: Vec<ViewSender>,
}

impl Room {
    /// Creates an empty room with votes hidden.
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            players: IndexMap::new(),
            are_votes_visible: false,
            created_at: now,
            updated_at: now,
            subscribers: Vec::new(),
        }
    }

    // -- Subscription -----------------------------------------------------

    /// Registers a new subscriber and returns its receiving end.
    ///
    /// The subscriber gets a push for every mutation from now on, starting
    /// with whichever mutation comes next (typically the subscriber's own
    /// join). Dropped receivers are pruned on the next push.
    pub fn subscribe(&mut self) -> ViewReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Number of live subscribers (dead ones linger until the next push).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // -- Mutators ---------------------------------------------------------

    /// Inserts a fresh voteless player under `id`.
    ///
    /// An existing player with the same id is silently overwritten — last
    /// writer wins, which also resets their vote. This covers duplicate
    /// `join` messages from the same connection.
    pub fn add_player(&mut self, id: PlayerId, name: impl Into<String>) {
        let player = Player::new(id.clone(), name);
        self.players.insert(id, player);
        self.touch();
        self.publish();
    }

    /// Removes the player if present; an absent id is not an error.
    ///
    /// Removal preserves the order of the remaining players.
    pub fn remove_player(&mut self, id: &PlayerId) {
        self.players.shift_remove(id);
        self.touch();
        self.publish();
    }

    /// Renames the player in place.
    ///
    /// Fails with [`RoomError::PlayerNotFound`] before touching any field,
    /// so a failed rename leaves the room unchanged.
    pub fn rename_player(
        &mut self,
        id: &PlayerId,
        name: impl Into<String>,
    ) -> Result<(), RoomError> {
        let player = self.player_mut(id)?;
        player.set_name(name);
        self.touch();
        self.publish();
        Ok(())
    }

    /// Records a vote for the player, stamping `voted_at` with the same
    /// clock read as the room's `updated_at`.
    ///
    /// Fails with [`RoomError::PlayerNotFound`] before touching any field.
    pub fn update_vote(
        &mut self,
        id: &PlayerId,
        vote: f64,
    ) -> Result<(), RoomError> {
        let now = now_millis();
        let player = self.player_mut(id)?;
        player.cast_vote(vote, now);
        self.updated_at = now;
        self.publish();
        Ok(())
    }

    /// Reveals all votes unconditionally.
    pub fn show_votes(&mut self) {
        self.are_votes_visible = true;
        self.touch();
        self.publish();
    }

    /// Reveals votes iff the room has at least one player and every player
    /// has voted; otherwise a complete no-op (no timestamp bump, no push).
    ///
    /// The player-count guard means zero-player rooms never auto-reveal.
    pub fn show_votes_if_everyone_voted(&mut self) {
        let everyone_voted = !self.players.is_empty()
            && self.players.values().all(Player::has_voted);
        if everyone_voted {
            self.show_votes();
        }
    }

    /// Hides votes again and clears every player's vote and timestamp.
    pub fn clear_votes(&mut self) {
        self.are_votes_visible = false;
        for player in self.players.values_mut() {
            player.clear_vote();
        }
        self.touch();
        self.publish();
    }

    // -- Accessors --------------------------------------------------------

    /// Players in insertion order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Returns `true` if a player with this id is in the room.
    pub fn contains_player(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    /// Number of players currently in the room.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether votes are currently revealed.
    pub fn are_votes_visible(&self) -> bool {
        self.are_votes_visible
    }

    /// When the room was created (epoch millis). Set once.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// When the room last changed (epoch millis).
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    // -- Internals --------------------------------------------------------

    fn player_mut(
        &mut self,
        id: &PlayerId,
    ) -> Result<&mut Player, RoomError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| RoomError::PlayerNotFound(id.clone()))
    }

    fn touch(&mut self) {
        self.updated_at = now_millis();
    }

    /// Computes the projection once and pushes it to every subscriber,
    /// pruning subscribers whose receiver is gone.
    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let view = project(self);
        self.subscribers
            .retain(|tx| tx.send(view.clone()).is_ok());
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: &str) -> PlayerId {
        PlayerId::from(id)
    }

    /// Checks the vote ⇔ voted_at invariant for every player in the room.
    fn assert_vote_invariant(room: &Room) {
        for player in room.players() {
            assert_eq!(
                player.vote().is_some(),
                player.voted_at().is_some(),
                "vote and voted_at must be present together for {}",
                player.id()
            );
        }
    }

    // =====================================================================
    // add_player / remove_player
    // =====================================================================

    #[test]
    fn test_add_player_inserts_voteless_player() {
        let mut room = Room::new();

        room.add_player(pid("p1"), "Tester");

        let player = room.player(&pid("p1")).expect("player should exist");
        assert_eq!(player.name(), "Tester");
        assert!(player.vote().is_none());
        assert!(player.voted_at().is_none());
        assert_vote_invariant(&room);
    }

    #[test]
    fn test_add_player_overwrites_existing_id() {
        // Last writer wins — no duplicate-id error, and the fresh player
        // starts voteless even if the old one had voted.
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");
        room.update_vote(&pid("p1"), 5.0).unwrap();

        room.add_player(pid("p1"), "Tester Again");

        assert_eq!(room.player_count(), 1);
        let player = room.player(&pid("p1")).unwrap();
        assert_eq!(player.name(), "Tester Again");
        assert!(player.vote().is_none());
        assert_vote_invariant(&room);
    }

    #[test]
    fn test_remove_player_deletes_player() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.remove_player(&pid("p1"));

        assert!(!room.contains_player(&pid("p1")));
        assert_eq!(room.player_count(), 0);
    }

    #[test]
    fn test_remove_player_absent_id_is_not_an_error() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.remove_player(&pid("no-one"));

        assert_eq!(room.player_count(), 1);
    }

    #[test]
    fn test_remove_player_preserves_order_of_remainder() {
        let mut room = Room::new();
        room.add_player(pid("foo"), "Foo");
        room.add_player(pid("bar"), "Bar");
        room.add_player(pid("zoo"), "Zoo");

        room.remove_player(&pid("bar"));

        let names: Vec<&str> =
            room.players().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Foo", "Zoo"]);
    }

    // =====================================================================
    // rename_player
    // =====================================================================

    #[test]
    fn test_rename_player_changes_name_in_place() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.rename_player(&pid("p1"), "Cool Guy").unwrap();

        assert_eq!(room.player(&pid("p1")).unwrap().name(), "Cool Guy");
    }

    #[test]
    fn test_rename_player_unknown_id_fails_without_side_effects() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");
        let before = room.updated_at();

        let result = room.rename_player(&pid("no-one"), "Ghost");

        assert!(matches!(result, Err(RoomError::PlayerNotFound(_))));
        assert_eq!(room.updated_at(), before, "failed rename must not touch the room");
        assert_eq!(room.player(&pid("p1")).unwrap().name(), "Tester");
    }

    // =====================================================================
    // update_vote
    // =====================================================================

    #[test]
    fn test_update_vote_sets_vote_and_voted_at() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.update_vote(&pid("p1"), 2.5).unwrap();

        let player = room.player(&pid("p1")).unwrap();
        assert_eq!(player.vote(), Some(2.5));
        assert_eq!(player.voted_at(), Some(room.updated_at()));
        assert_vote_invariant(&room);
    }

    #[test]
    fn test_update_vote_does_not_reveal_votes() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.update_vote(&pid("p1"), 2.5).unwrap();

        assert!(!room.are_votes_visible());
    }

    #[test]
    fn test_update_vote_unknown_id_fails_without_side_effects() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");
        let before = room.updated_at();

        let result = room.update_vote(&pid("no-one"), 2.5);

        assert!(matches!(result, Err(RoomError::PlayerNotFound(_))));
        assert_eq!(room.updated_at(), before);
        assert!(room.player(&pid("p1")).unwrap().vote().is_none());
        assert_vote_invariant(&room);
    }

    // =====================================================================
    // show_votes / show_votes_if_everyone_voted
    // =====================================================================

    #[test]
    fn test_show_votes_reveals_unconditionally() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.show_votes();

        assert!(room.are_votes_visible());
    }

    #[test]
    fn test_show_votes_if_everyone_voted_reveals_when_all_voted() {
        let mut room = Room::new();
        room.add_player(pid("foo"), "Foo");
        room.add_player(pid("bar"), "Bar");
        room.add_player(pid("zoo"), "Zoo");
        room.update_vote(&pid("foo"), 1.5).unwrap();
        room.update_vote(&pid("bar"), 2.5).unwrap();
        room.update_vote(&pid("zoo"), 3.0).unwrap();

        room.show_votes_if_everyone_voted();

        assert!(room.are_votes_visible());
    }

    #[test]
    fn test_show_votes_if_everyone_voted_noop_when_someone_abstains() {
        let mut room = Room::new();
        room.add_player(pid("foo"), "Foo");
        room.add_player(pid("bar"), "Bar");
        room.add_player(pid("zoo"), "Zoo");
        room.update_vote(&pid("foo"), 1.5).unwrap();
        room.update_vote(&pid("zoo"), 3.0).unwrap();
        let before = room.updated_at();

        room.show_votes_if_everyone_voted();

        assert!(!room.are_votes_visible());
        assert_eq!(room.updated_at(), before, "no-op must not touch the room");
    }

    #[test]
    fn test_show_votes_if_everyone_voted_noop_on_empty_room() {
        // Zero players means "everyone voted" is vacuously true; the
        // player-count guard keeps an empty room from auto-revealing.
        let mut room = Room::new();

        room.show_votes_if_everyone_voted();

        assert!(!room.are_votes_visible());
    }

    #[test]
    fn test_show_votes_twice_is_observably_idempotent() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");
        room.update_vote(&pid("p1"), 1.0).unwrap();

        room.show_votes();
        let first = crate::project(&room);
        room.show_votes();
        let second = crate::project(&room);

        assert_eq!(first.players, second.players);
        assert_eq!(first.are_votes_visible, second.are_votes_visible);
    }

    // =====================================================================
    // clear_votes
    // =====================================================================

    #[test]
    fn test_clear_votes_hides_and_clears_everything() {
        let mut room = Room::new();
        room.add_player(pid("foo"), "Foo");
        room.add_player(pid("bar"), "Bar");
        room.update_vote(&pid("foo"), 1.5).unwrap();
        room.update_vote(&pid("bar"), 2.5).unwrap();
        room.show_votes_if_everyone_voted();
        assert!(room.are_votes_visible());

        room.clear_votes();

        assert!(!room.are_votes_visible());
        for player in room.players() {
            assert!(player.vote().is_none());
            assert!(player.voted_at().is_none());
        }
        assert_vote_invariant(&room);
    }

    #[test]
    fn test_clear_votes_on_room_with_no_votes() {
        let mut room = Room::new();
        room.add_player(pid("p1"), "Tester");

        room.clear_votes();

        assert!(!room.are_votes_visible());
        assert_vote_invariant(&room);
    }

    // =====================================================================
    // Timestamps
    // =====================================================================

    #[test]
    fn test_created_at_is_stable_across_mutations() {
        let mut room = Room::new();
        let created = room.created_at();

        room.add_player(pid("p1"), "Tester");
        room.update_vote(&pid("p1"), 1.0).unwrap();
        room.show_votes();
        room.clear_votes();

        assert_eq!(room.created_at(), created);
        assert!(room.updated_at() >= created);
    }
}
