//! The `Broadcaster` trait: the contract the coordinator requires of
//! the store of record.

use std::fmt;

use tokio::sync::broadcast;
use wordrally_protocol::{
    Guess, PlayerState, RoomId, RoundIndex, SnapshotUpdate, Username,
};

use crate::StoreError;

// ---------------------------------------------------------------------------
// Field-scoped mutations
// ---------------------------------------------------------------------------

/// Addresses one field inside a room document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    /// `game.{username}` — one player's entire state.
    Player(Username),
    /// `game.{username}.{round}` — one player's history for one round.
    Round(Username, RoundIndex),
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(u) => write!(f, "game.{u}"),
            Self::Round(u, r) => write!(f, "game.{u}.{r}"),
        }
    }
}

/// One field-scoped write against a room document.
///
/// Writes from different clients commute: distinct players touch
/// distinct `game` keys, and a player's own guesses only ever append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWrite {
    /// Set `game.{username}` wholesale (used when a player joins).
    SetPlayer { username: Username, state: PlayerState },
    /// Set `game.{username}.{round}` wholesale (used to open a round
    /// with an empty history).
    SetRound {
        username: Username,
        round: RoundIndex,
        history: Vec<Guess>,
    },
    /// Append one guess to `game.{username}.{round}`.
    PushGuess {
        username: Username,
        round: RoundIndex,
        guess: Guess,
    },
}

impl FieldWrite {
    /// The path this write addresses.
    pub fn path(&self) -> FieldPath {
        match self {
            Self::SetPlayer { username, .. } => {
                FieldPath::Player(username.clone())
            }
            Self::SetRound { username, round, .. }
            | Self::PushGuess { username, round, .. } => {
                FieldPath::Round(username.clone(), *round)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A live snapshot stream for one room.
///
/// Delivery is at-least-once and non-reordering per room: every update
/// carries the full room state with a store-assigned sequence number,
/// so a receiver that falls behind resynchronizes on the next update it
/// does see. Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    room_id: RoomId,
    initial: Option<SnapshotUpdate>,
    rx: broadcast::Receiver<SnapshotUpdate>,
}

impl Subscription {
    pub fn new(
        room_id: RoomId,
        initial: SnapshotUpdate,
        rx: broadcast::Receiver<SnapshotUpdate>,
    ) -> Self {
        Self { room_id, initial: Some(initial), rx }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Receives the next update. The room's current snapshot is
    /// delivered first, then live updates in order. Returns `None`
    /// once the stream is closed and drained.
    pub async fn recv(&mut self) -> Option<SnapshotUpdate> {
        if let Some(update) = self.initial.take() {
            return Some(update);
        }
        loop {
            match self.rx.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Skipped snapshots are recovered by the next full
                    // snapshot; sequence checking upstream handles the
                    // rest.
                    tracing::warn!(
                        room_id = %self.room_id,
                        skipped,
                        "subscriber lagged, resynchronizing"
                    );
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Broadcaster
// ---------------------------------------------------------------------------

/// Contract required of the store of record.
///
/// The store serializes concurrent mutation: every successful call
/// advances the room's sequence number and pushes the resulting
/// snapshot to all subscribers. A batch passed to `atomic_update` is
/// applied all-or-nothing, so multi-field operations (like opening a
/// round for every player) never partially apply.
pub trait Broadcaster: Send + Sync + 'static {
    /// Subscribes to a room's snapshot stream.
    async fn subscribe(
        &self,
        room: &RoomId,
    ) -> Result<Subscription, StoreError>;

    /// Applies a batch of field writes atomically.
    async fn atomic_update(
        &self,
        room: &RoomId,
        writes: &[FieldWrite],
    ) -> Result<(), StoreError>;

    /// Deletes one field from the room document.
    async fn atomic_delete(
        &self,
        room: &RoomId,
        path: &FieldPath,
    ) -> Result<(), StoreError>;

    /// Deletes the room record. Subscribers observe
    /// [`SnapshotUpdate::Deleted`] and the room is gone.
    async fn delete_room(&self, room: &RoomId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        let path = FieldPath::Player(Username::from("alice"));
        assert_eq!(path.to_string(), "game.alice");

        let path = FieldPath::Round(Username::from("bob"), 2);
        assert_eq!(path.to_string(), "game.bob.2");
    }

    #[test]
    fn test_field_write_path() {
        let write = FieldWrite::SetPlayer {
            username: Username::from("alice"),
            state: PlayerState::new(),
        };
        assert_eq!(write.path(), FieldPath::Player(Username::from("alice")));

        let write = FieldWrite::SetRound {
            username: Username::from("bob"),
            round: 1,
            history: Vec::new(),
        };
        assert_eq!(
            write.path(),
            FieldPath::Round(Username::from("bob"), 1)
        );
    }
}
