//! The guess evaluator: scores a guess against a target word.

use std::collections::HashMap;

use wordrally_protocol::LetterState;

use crate::GameError;

/// Scores `guess` against `target`, producing one [`LetterState`] per
/// letter. Both words are ASCII case-normalized before comparison.
///
/// The algorithm is two-pass so duplicate letters are counted
/// correctly:
///
/// 1. Build a letter → remaining-count multiset from the target.
/// 2. Pass 1: exact positional matches become `Correct` and consume
///    their letter's count.
/// 3. Pass 2: remaining positions become `Present` while their letter
///    still has count left, otherwise `Absent`.
///
/// Consuming exact matches first is what prevents over-reporting
/// `Present` when a letter repeats more often in the guess than in the
/// target.
///
/// # Errors
/// Returns [`GameError::InvalidGuessLength`] when the two words have
/// different letter counts.
pub fn evaluate(
    guess: &str,
    target: &str,
) -> Result<Vec<LetterState>, GameError> {
    let guess: Vec<char> =
        guess.chars().map(|c| c.to_ascii_uppercase()).collect();
    let target: Vec<char> =
        target.chars().map(|c| c.to_ascii_uppercase()).collect();

    if guess.len() != target.len() {
        return Err(GameError::InvalidGuessLength {
            expected: target.len(),
            actual: guess.len(),
        });
    }

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for c in &target {
        *remaining.entry(*c).or_insert(0) += 1;
    }

    let mut states = vec![LetterState::Absent; guess.len()];

    // Pass 1: exact matches consume their letter first.
    for (i, c) in guess.iter().enumerate() {
        if *c == target[i] {
            states[i] = LetterState::Correct;
            if let Some(count) = remaining.get_mut(c) {
                *count -= 1;
            }
        }
    }

    // Pass 2: misplaced letters, bounded by what's left in the multiset.
    for (i, c) in guess.iter().enumerate() {
        if states[i] == LetterState::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(c) {
            if *count > 0 {
                states[i] = LetterState::Present;
                *count -= 1;
            }
        }
    }

    Ok(states)
}

// =========================================================================
// Tests
// =========================================================================
