//! Game rules for Flipmatch: board generation and the two-flip turn engine.
//!
//! This crate is pure state — no I/O, no timers, no channels. The room
//! layer drives it and decides when to broadcast and when to schedule the
//! delayed mismatch reveal. Keeping the rules synchronous makes every
//! edge case unit-testable without a runtime.
//!
//! # Key types
//!
//! - [`Board`] — the shuffled card layout for one game
//! - [`TurnEngine`] — board + turn cursor + pending-flip buffer
//! - [`FlipResult`] / [`Resolution`] — what a flip did, for the caller
//!   to translate into broadcasts

mod board;
mod engine;

pub use board::{Board, Card, CardState, TOKENS, pair_count};
pub use engine::{FlipResult, Resolution, TurnAdvance, TurnEngine, winners};
