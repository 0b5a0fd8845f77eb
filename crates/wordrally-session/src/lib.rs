//! Session coordination for Wordrally.
//!
//! The [`SessionCoordinator`] owns one client's view of a room: it
//! subscribes to the store's snapshot stream, applies sequence-checked
//! snapshots, validates every operation against the latest accepted
//! state, and expresses each mutation as field-scoped writes that are
//! safe to race against other clients.
//!
//! ```text
//! operation → field mutation → store → snapshot → seq check → events
//! ```
//!
//! # Key types
//!
//! - [`SessionCoordinator`] — join/leave/start/close/submit_guess plus
//!   the reactive snapshot loop
//! - [`RoundAdvance`] — outbound trigger for the external round-advance
//!   service (HTTP implementation behind the `http` feature)
//! - [`SessionError`] — every way an operation can be rejected

#![allow(async_fn_in_trait)]

mod coordinator;
mod error;
mod events;
mod next_round;

pub use coordinator::SessionCoordinator;
pub use error::SessionError;
#[cfg(feature = "http")]
pub use next_round::HttpRoundAdvance;
pub use next_round::{NoRoundAdvance, RoundAdvance};
