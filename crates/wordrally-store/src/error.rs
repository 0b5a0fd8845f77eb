//! Error types for the store boundary.

use wordrally_protocol::{RoomCode, RoomId};

/// Errors that can occur against the store of record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The room record does not exist. Callers should treat the room
    /// as closed.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// A room with this id already exists.
    #[error("room {0} already exists")]
    DuplicateRoom(RoomId),

    /// Another live room already uses this join code.
    #[error("join code {0} is already in use")]
    CodeInUse(RoomCode),

    /// A field write or delete addressed a path that is not present in
    /// the document. Missing keys are surfaced, never silently skipped.
    #[error("field path {0} not found")]
    PathNotFound(String),

    /// The store call itself failed (connection, backend, channel).
    /// Room state is left as last-known-good; callers may retry.
    #[error("store transport failure: {0}")]
    Transport(String),
}
