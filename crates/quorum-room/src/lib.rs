//! Room and player state model for Quorum.
//!
//! This crate is the core of the system: the [`Room`] aggregate with its
//! mutators, the [`Registry`] mapping room names to rooms, the pure
//! [`project`] function that computes the privacy-filtered external view,
//! and the per-room subscriber list that pushes a fresh [`RoomView`]
//! (via [`project`]) to every subscriber after each mutation.
//!
//! # Key types
//!
//! - [`Room`] — players plus room-level voting state; owns all mutators
//! - [`Player`] — one participant and their optional vote
//! - [`Registry`] — name → room map with strict lookup
//! - [`project`] — `Room` → [`RoomView`] projection
//! - [`ViewReceiver`] — a subscription to a room's state pushes
//!
//! [`RoomView`]: quorum_protocol::RoomView

mod error;
mod player;
mod projection;
mod registry;
mod room;

pub use error::RoomError;
pub use player::Player;
pub use projection::project;
pub use registry::Registry;
pub use room::{Room, ViewReceiver, ViewSender};
