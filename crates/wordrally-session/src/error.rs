//! Error types for session coordination.

use wordrally_game::GameError;
use wordrally_protocol::{RoomId, Username};
use wordrally_store::StoreError;

/// Errors that can occur during coordinator operations.
///
/// Authorization and validation failures are rejected before any
/// mutation is emitted, so the room is untouched when one of these is
/// returned. Transport failures leave the last accepted snapshot as-is
/// and are eligible for caller-driven retry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The room record is missing from the store. Callers should
    /// treat the room as closed.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// A non-owner attempted an owner-only operation.
    #[error("{0} is not the room owner")]
    Unauthorized(Username),

    /// The username is already taken in this room.
    #[error("username {0} is already in the room")]
    DuplicateUsername(Username),

    /// The username is not a member of this room.
    #[error("{0} is not a member of the room")]
    NotAMember(Username),

    /// The room has been closed; no further operations are accepted.
    #[error("the room is closed")]
    RoomClosed,

    /// A round has already started; the operation needs an open lobby.
    #[error("a round has already started")]
    AlreadyStarted,

    /// No round is currently active.
    #[error("no round is active")]
    RoundNotActive,

    /// Every target word has been played.
    #[error("no target word remains")]
    WordsExhausted,

    /// The player's round is individually over — winning guess or all
    /// rows used.
    #[error("{0} has no guesses left this round")]
    GuessLimitReached(Username),

    /// Guess evaluation rejected the input.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The store call failed; local state is last-known-good.
    #[error(transparent)]
    Store(StoreError),

    /// The round-advance trigger failed in transit.
    #[error("round-advance transport failure: {0}")]
    TransportFailure(String),
}

/// Maps store errors into session errors, promoting a missing room to
/// the session-level kind callers branch on.
pub(crate) fn store_err(err: StoreError) -> SessionError {
    match err {
        StoreError::RoomNotFound(id) => SessionError::RoomNotFound(id),
        other => SessionError::Store(other),
    }
}
