//! Error types for guess evaluation.

/// Errors that can occur while evaluating a guess.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The guess and target words have different lengths.
    #[error("invalid guess length: expected {expected} letters, got {actual}")]
    InvalidGuessLength { expected: usize, actual: usize },
}
