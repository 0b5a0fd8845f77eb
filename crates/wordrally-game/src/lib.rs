//! Guess evaluation and game rules for Wordrally.
//!
//! The one genuinely tricky piece of this domain lives here: scoring a
//! guess against a target word correctly in the presence of duplicate
//! letters. Everything in this crate is pure — no I/O, no shared state.
//!
//! # Key items
//!
//! - [`evaluate`] — two-pass, duplicate-letter-correct guess scoring
//! - [`GameRules`] — word length, guess limit, round-advance policy
//! - [`round_finished`] — per-player round completion predicate

mod error;
mod evaluate;
mod rules;

pub use error::GameError;
pub use evaluate::evaluate;
pub use rules::{round_finished, GameRules, RoundAdvancePolicy};
