//! Wire protocol for Quorum.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientCommand`], [`ServerEvent`], [`RoomView`], etc.) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (player context). It doesn't know about connections or rooms — it only
//! knows how to serialize and deserialize messages.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientCommand, PlayerId, PlayerView, RoomName, RoomView, ServerEvent,
};
