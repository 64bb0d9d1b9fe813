//! The [`Player`] entity: one participant and their optional vote.

use quorum_protocol::PlayerId;

/// A participant within a room.
///
/// Invariant: `vote` and `voted_at` are set and cleared together — a
/// player either has both (they voted, and we know when) or neither.
/// The only write paths are [`cast_vote`](Self::cast_vote) and
/// [`clear_vote`](Self::clear_vote), which keep the pair in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    id: PlayerId,
    name: String,
    vote: Option<f64>,
    voted_at: Option<u64>,
}

impl Player {
    /// Creates a voteless player. The id is fixed for the player's lifetime.
    pub(crate) fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vote: None,
            voted_at: None,
        }
    }

    /// The player's immutable identifier.
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Current display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The vote value, if one has been cast.
    pub fn vote(&self) -> Option<f64> {
        self.vote
    }

    /// When the vote was cast (epoch millis), if one has been cast.
    pub fn voted_at(&self) -> Option<u64> {
        self.voted_at
    }

    /// Returns `true` if the player has a vote on record.
    pub fn has_voted(&self) -> bool {
        self.vote.is_some()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn cast_vote(&mut self, vote: f64, at: u64) {
        self.vote = Some(vote);
        self.voted_at = Some(at);
    }

    pub(crate) fn clear_vote(&mut self) {
        self.vote = None;
        self.voted_at = None;
    }
}
