//! Command dispatch: translating client commands into room operations.

use quorum_protocol::ClientCommand;
use quorum_room::{Registry, ViewReceiver};

use crate::{Session, SessionError, SessionPhase};

/// What a successfully applied command produced.
pub enum CommandOutcome {
    /// A `join` bound the session: the receiver is the connection's
    /// subscription to the room's state pushes.
    Joined(ViewReceiver),
    /// The command was applied; pushes flow through the existing
    /// subscription.
    Applied,
}

/// Applies one client command to the registry on behalf of a session.
///
/// Runs synchronously under the caller's registry lock, so the whole
/// command — including the `vote` + auto-reveal pair and the pushes each
/// mutation fires — is atomic with respect to every other connection.
///
/// A returned error means nothing was applied: mutators that need an
/// existing room or player fail before touching any field.
pub fn apply_command(
    session: &mut Session,
    registry: &mut Registry,
    cmd: ClientCommand,
) -> Result<CommandOutcome, SessionError> {
    if session.phase() == SessionPhase::Terminated {
        return Err(SessionError::Terminated);
    }

    match cmd {
        ClientCommand::Join { player_name } => {
            let room_name = session.room_name().clone();

            // A repeated join while already bound re-adds the player
            // (overwrite semantics) without a second subscription.
            if session.is_joined() {
                let room = registry.room_mut(&room_name)?;
                room.add_player(session.player_id().clone(), player_name);
                return Ok(CommandOutcome::Applied);
            }

            if !registry.has_room(&room_name) {
                registry.create_room(room_name.clone());
            }
            let room = registry.room_mut(&room_name)?;

            // Subscribe before adding the player so the join's own push
            // reaches the joiner.
            let views = room.subscribe();
            room.add_player(session.player_id().clone(), player_name);
            session.mark_joined();

            tracing::info!(
                room = %room_name,
                player = %session.player_id(),
                "player joined"
            );
            Ok(CommandOutcome::Joined(views))
        }

        ClientCommand::Vote { vote } => {
            if !session.is_joined() {
                return Err(SessionError::NotJoined);
            }
            let room = registry.room_mut(session.room_name())?;
            // One uninterrupted unit: record the vote, then reveal if
            // this completed the round.
            room.update_vote(session.player_id(), vote)?;
            room.show_votes_if_everyone_voted();
            Ok(CommandOutcome::Applied)
        }

        ClientCommand::ShowVotes => {
            registry.room_mut(session.room_name())?.show_votes();
            Ok(CommandOutcome::Applied)
        }

        ClientCommand::ClearVotes => {
            registry.room_mut(session.room_name())?.clear_votes();
            Ok(CommandOutcome::Applied)
        }

        ClientCommand::RenameSelf { player_name } => {
            registry
                .room_mut(session.room_name())?
                .rename_player(session.player_id(), player_name)?;
            Ok(CommandOutcome::Applied)
        }
    }
}

/// Handles the connection going away: removes the session's player from
/// the room if the room still exists, and terminates the session.
///
/// Safe to call whether or not the session ever joined.
pub fn disconnect(session: &mut Session, registry: &mut Registry) {
    if registry.has_room(session.room_name()) {
        if let Ok(room) = registry.room_mut(session.room_name()) {
            room.remove_player(session.player_id());
        }
        tracing::info!(
            room = %session.room_name(),
            player = %session.player_id(),
            "player left"
        );
    }
    session.terminate();
}

// =========================================================================
// Tests
// =========================================================================
