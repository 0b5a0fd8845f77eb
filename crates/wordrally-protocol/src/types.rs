//! Identity types, letter states, and per-player guess state.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's name inside a room.
///
/// Usernames are the keys of a room's `game` map, so they are unique
/// within a room by construction. Newtype wrapper so a username can't
/// be confused with a room id or a guessed word.
///
/// `#[serde(transparent)]` keeps the wire form a plain string, which is
/// what the room document's `game` map keys require.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Username(pub String);

impl Username {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Username {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// The store-assigned document id of a room.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The short join code players type to find a room.
///
/// Codes must be unique among live rooms; the store enforces this at
/// room creation.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomCode(pub String);

/// Number of digits in a generated join code.
const CODE_LEN: usize = 6;

impl RoomCode {
    /// Generates a random six-digit join code.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..CODE_LEN)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

/// Zero-based index of a round within a room.
pub type RoundIndex = u32;

// ---------------------------------------------------------------------------
// Letter states and guesses
// ---------------------------------------------------------------------------

/// Per-letter outcome of evaluating a guess against a target word.
///
/// `Empty` is never produced by evaluation — it exists only so the view
/// projector can pad unfilled grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterState {
    /// Right letter, right position.
    Correct,
    /// Right letter, wrong position (and not already consumed by an
    /// exact match elsewhere).
    Present,
    /// Letter not available in the target.
    Absent,
    /// Unfilled placeholder cell.
    Empty,
}

/// A submitted word together with its evaluated per-letter outcome.
///
/// `states` always has exactly one entry per letter of `word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub word: String,
    pub states: Vec<LetterState>,
}

impl Guess {
    /// True when every letter was placed correctly — the guess that
    /// finishes the round for its player.
    pub fn is_winning(&self) -> bool {
        !self.states.is_empty()
            && self.states.iter().all(|s| *s == LetterState::Correct)
    }
}

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

/// One player's per-round guess histories.
///
/// An empty map is the bare membership marker: the player is in the
/// lobby and no round has started for them. Each started round adds an
/// entry (initially empty); guesses are appended within a round and
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerState(pub BTreeMap<RoundIndex, Vec<Guess>>);

impl PlayerState {
    /// A fresh membership marker with no rounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the player has no round entries yet (lobby view).
    pub fn is_lobby_only(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest round index the player has an entry for.
    pub fn latest_round(&self) -> Option<RoundIndex> {
        self.0.keys().next_back().copied()
    }

    /// The guess history for one round, if that round has started.
    pub fn history(&self, round: RoundIndex) -> Option<&[Guess]> {
        self.0.get(&round).map(Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// RoomEvent
// ---------------------------------------------------------------------------

/// Typed events emitted to the presentation layer as accepted snapshots
/// are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomEvent {
    PlayerJoined(Username),
    PlayerLeft(Username),
    RoundStarted { round: RoundIndex },
    GuessSubmitted { username: Username, guess: Guess },
    RoomClosed,
}

// =========================================================================
// Tests
// =========================================================================
