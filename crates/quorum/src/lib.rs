//! # Quorum
//!
//! Realtime collaborative estimation server (planning poker).
//!
//! Participants connect over WebSocket with a `roomName` query parameter,
//! join the room under a display name, and cast votes. Every mutation of a
//! room's state pushes a privacy-filtered `state` event to all of that
//! room's subscribers — votes stay hidden until everyone has voted or
//! someone reveals them explicitly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quorum::QuorumServer;
//!
//! # async fn run() -> Result<(), quorum::QuorumError> {
//! let server = QuorumServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::QuorumError;
pub use server::{QuorumServer, QuorumServerBuilder};
