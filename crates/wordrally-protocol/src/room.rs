//! The room document, its derived lifecycle phase, and snapshots.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PlayerState, RoomCode, RoomId, RoundIndex, Username};

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// The shared room document — the single source of truth for one game
/// session.
///
/// Subscribers never mutate a `Room` in place: every accepted snapshot
/// replaces the previous value wholesale, and all writes go through the
/// store's field-scoped mutation primitives.
///
/// Invariants: `owner` is a key of `game` for as long as the room
/// exists; usernames are unique by construction of the map; `code` is
/// unique among live rooms (enforced at creation by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub code: RoomCode,
    pub owner: Username,
    /// Target words, one per round, in play order.
    pub words: Vec<String>,
    /// Membership and per-player guess state, keyed by username.
    pub game: BTreeMap<Username, PlayerState>,
}

impl Room {
    /// Builds a fresh room with the owner as its only member.
    pub fn create(
        id: RoomId,
        code: RoomCode,
        owner: Username,
        words: Vec<String>,
    ) -> Self {
        let mut game = BTreeMap::new();
        game.insert(owner.clone(), PlayerState::new());
        Self { id, code, owner, words, game }
    }

    /// Number of rounds that have started, derived from the round
    /// entries present in player state.
    pub fn rounds_started(&self) -> u32 {
        self.game
            .values()
            .filter_map(PlayerState::latest_round)
            .map(|r| r + 1)
            .max()
            .unwrap_or(0)
    }

    /// The round currently in play, if any round has started.
    pub fn current_round(&self) -> Option<RoundIndex> {
        self.rounds_started().checked_sub(1)
    }

    /// The room's lifecycle phase. `Closed` has no representation here:
    /// a closed room is deleted from the store, so subscribers observe
    /// its absence instead.
    pub fn phase(&self) -> RoomPhase {
        if self.rounds_started() == 0 {
            RoomPhase::Open
        } else {
            RoomPhase::RoundActive
        }
    }

    pub fn is_member(&self, username: &Username) -> bool {
        self.game.contains_key(username)
    }

    /// Member names in sorted order.
    pub fn members(&self) -> impl Iterator<Item = &Username> {
        self.game.keys()
    }

    /// The target word for a round, if the room has one.
    pub fn target_word(&self, round: RoundIndex) -> Option<&str> {
        self.words.get(round as usize).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a live room.
///
/// ```text
/// Open ──(start)──→ RoundActive ──(close / owner leaves)──→ deleted
/// ```
///
/// - **Open**: accepting joins, no round started.
/// - **RoundActive**: a round is in play; members submit guesses.
///
/// The terminal `Closed` state is the deletion of the room record, so
/// it never appears as a phase of an existing `Room`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Open,
    RoundActive,
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::RoundActive => write!(f, "RoundActive"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// An immutable, versioned copy of a room as observed by a subscriber.
///
/// `seq` is assigned by the store and increases monotonically per room;
/// subscribers must discard any snapshot whose `seq` is not greater
/// than the last one they applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub seq: u64,
    pub room: Room,
}

/// What a subscriber receives on each store notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotUpdate {
    /// The room's current state.
    Snapshot(RoomSnapshot),
    /// The room record was deleted — the room is closed.
    Deleted,
}

// =========================================================================
// Tests
// =========================================================================
