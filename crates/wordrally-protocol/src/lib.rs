//! Data model and wire types for Wordrally.
//!
//! This crate defines every value that crosses the store-of-record
//! boundary: room documents, per-player guess state, evaluated letter
//! states, sequence-numbered snapshots, and the typed events the
//! coordinator emits to the presentation layer.
//!
//! The protocol layer knows nothing about stores or coordinators — it
//! only defines the shapes they exchange.

mod room;
mod types;

pub use room::{Room, RoomPhase, RoomSnapshot, SnapshotUpdate};
pub use types::{
    Guess, LetterState, PlayerState, RoomCode, RoomEvent, RoomId, RoundIndex,
    Username,
};
