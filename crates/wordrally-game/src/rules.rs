//! Game rules: board dimensions, guess limits, and the round-advance
//! policy.

use serde::{Deserialize, Serialize};
use wordrally_protocol::Guess;

/// What happens once every member has individually finished a round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum RoundAdvancePolicy {
    /// The owner advances rounds explicitly.
    #[default]
    Manual,
    /// The coordinator triggers the next round as soon as the last
    /// unfinished member finishes.
    AutoOnAllFinished,
}

/// Configuration for a game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRules {
    /// Letters per target word (and per grid row).
    pub word_length: usize,
    /// Maximum guesses a player gets per round (grid row capacity).
    pub max_guesses: usize,
    /// Behavior once all members finish a round.
    pub round_advance: RoundAdvancePolicy,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            word_length: 5,
            max_guesses: 6,
            round_advance: RoundAdvancePolicy::Manual,
        }
    }
}

/// True when a player's round is individually over: their last guess
/// won, or they have used every row. Other players are unaffected —
/// completion is tracked per player, not globally.
pub fn round_finished(history: &[Guess], rules: &GameRules) -> bool {
    history.last().is_some_and(Guess::is_winning)
        || history.len() >= rules.max_guesses
}

// =========================================================================
// Tests
// =========================================================================
