//! Room lifecycle management for Flipmatch.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! own board, player slots, spectators, and the mismatch-reveal timer.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates rooms, binds connections to them
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomConfig`] — room settings (player limits, reveal delay)
//! - [`ClientSender`] — outbound channel to one connection

mod config;
mod error;
mod registry;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{ClientSender, RoomHandle, RoomInfo};
