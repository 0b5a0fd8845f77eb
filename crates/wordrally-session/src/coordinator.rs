//! The session coordinator: one client's handle on a live room.

use std::sync::Arc;

use tokio::sync::mpsc;
use wordrally_game::{evaluate, round_finished, GameRules, RoundAdvancePolicy};
use wordrally_protocol::{
    Guess, PlayerState, Room, RoomEvent, RoomId, RoomPhase, RoomSnapshot,
    RoundIndex, SnapshotUpdate, Username,
};
use wordrally_store::{Broadcaster, FieldPath, FieldWrite, Subscription};

use crate::error::store_err;
use crate::events::diff_events;
use crate::next_round::{NoRoundAdvance, RoundAdvance};
use crate::SessionError;

/// Coordinates one client's session with a room.
///
/// The coordinator never mutates its local copy of the room. Every
/// operation validates against the last accepted snapshot, emits
/// field-scoped writes through the store, and waits for the resulting
/// snapshot to come back through [`process_next`]. That keeps every
/// client's view converging on the same store-ordered history no matter
/// how writes interleave.
///
/// [`process_next`]: SessionCoordinator::process_next
pub struct SessionCoordinator<B: Broadcaster, A: RoundAdvance = NoRoundAdvance> {
    store: Arc<B>,
    room_id: RoomId,
    rules: GameRules,
    advance: Option<A>,
    subscription: Subscription,
    latest: Option<RoomSnapshot>,
    events: mpsc::UnboundedSender<RoomEvent>,
    closed: bool,
}

impl<B: Broadcaster, A: RoundAdvance> std::fmt::Debug for SessionCoordinator<B, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("room_id", &self.room_id)
            .field("rules", &self.rules)
            .field("latest", &self.latest)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<B: Broadcaster> SessionCoordinator<B> {
    /// Connects to a room and waits for its first snapshot.
    ///
    /// The returned receiver carries the [`RoomEvent`]s derived from
    /// each accepted snapshot. The initial snapshot produces no events;
    /// it is the baseline later snapshots are diffed against.
    pub async fn connect(
        store: Arc<B>,
        room_id: RoomId,
        rules: GameRules,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RoomEvent>), SessionError>
    {
        Self::connect_inner(store, room_id, rules, None).await
    }
}

impl<B: Broadcaster, A: RoundAdvance> SessionCoordinator<B, A> {
    /// Like [`connect`](SessionCoordinator::connect), with an external
    /// round-advance trigger used instead of direct store writes when
    /// the auto-advance policy fires.
    pub async fn connect_with_advance(
        store: Arc<B>,
        room_id: RoomId,
        rules: GameRules,
        advance: A,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RoomEvent>), SessionError>
    {
        Self::connect_inner(store, room_id, rules, Some(advance)).await
    }

    async fn connect_inner(
        store: Arc<B>,
        room_id: RoomId,
        rules: GameRules,
        advance: Option<A>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RoomEvent>), SessionError>
    {
        let mut subscription =
            store.subscribe(&room_id).await.map_err(store_err)?;
        let latest = match subscription.recv().await {
            Some(SnapshotUpdate::Snapshot(snapshot)) => Some(snapshot),
            Some(SnapshotUpdate::Deleted) | None => {
                return Err(SessionError::RoomNotFound(room_id));
            }
        };
        tracing::info!(room_id = %room_id, "connected to room");

        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                store,
                room_id,
                rules,
                advance,
                subscription,
                latest,
                events: tx,
                closed: false,
            },
            rx,
        ))
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// The last accepted snapshot, if the room still exists.
    pub fn snapshot(&self) -> Option<&RoomSnapshot> {
        self.latest.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn require_room(&self) -> Result<&Room, SessionError> {
        if self.closed {
            return Err(SessionError::RoomClosed);
        }
        self.latest
            .as_ref()
            .map(|s| &s.room)
            .ok_or_else(|| SessionError::RoomNotFound(self.room_id.clone()))
    }

    /// Adds `username` to the room.
    ///
    /// Rejected once a round has started, and when the name is taken;
    /// either way the room is left untouched.
    pub async fn join(&self, username: &Username) -> Result<(), SessionError> {
        let room = self.require_room()?;
        if room.phase() != RoomPhase::Open {
            return Err(SessionError::AlreadyStarted);
        }
        if room.is_member(username) {
            return Err(SessionError::DuplicateUsername(username.clone()));
        }
        tracing::info!(room_id = %self.room_id, %username, "joining room");
        self.store
            .atomic_update(
                &self.room_id,
                &[FieldWrite::SetPlayer {
                    username: username.clone(),
                    state: PlayerState::new(),
                }],
            )
            .await
            .map_err(store_err)
    }

    /// Removes `username` from the room.
    ///
    /// The owner leaving closes the room for everyone, as does the last
    /// remaining member leaving. Any other member leaving deletes only
    /// their own `game` entry.
    pub async fn leave(&self, username: &Username) -> Result<(), SessionError> {
        let room = self.require_room()?;
        if !room.is_member(username) {
            return Err(SessionError::NotAMember(username.clone()));
        }
        if *username == room.owner || room.game.len() == 1 {
            tracing::info!(
                room_id = %self.room_id,
                %username,
                "leaving closes the room"
            );
            return self
                .store
                .delete_room(&self.room_id)
                .await
                .map_err(store_err);
        }
        tracing::info!(room_id = %self.room_id, %username, "leaving room");
        self.store
            .atomic_delete(
                &self.room_id,
                &FieldPath::Player(username.clone()),
            )
            .await
            .map_err(store_err)
    }

    /// Starts the first round. Owner-only, lobby-only.
    ///
    /// Opens round 0 for every current member in one atomic batch, so
    /// no snapshot ever shows a round started for some members but not
    /// others.
    pub async fn start(&self, caller: &Username) -> Result<(), SessionError> {
        let room = self.require_room()?;
        if *caller != room.owner {
            return Err(SessionError::Unauthorized(caller.clone()));
        }
        if room.phase() != RoomPhase::Open {
            return Err(SessionError::AlreadyStarted);
        }
        if room.words.is_empty() {
            return Err(SessionError::WordsExhausted);
        }
        tracing::info!(room_id = %self.room_id, "starting round 0");
        self.store
            .atomic_update(&self.room_id, &round_writes(room, 0))
            .await
            .map_err(store_err)
    }

    /// Closes the room for everyone. Owner-only.
    pub async fn close(&self, caller: &Username) -> Result<(), SessionError> {
        let room = self.require_room()?;
        if *caller != room.owner {
            return Err(SessionError::Unauthorized(caller.clone()));
        }
        tracing::info!(room_id = %self.room_id, "closing room");
        self.store.delete_room(&self.room_id).await.map_err(store_err)
    }

    /// Evaluates and records one guess for `username` in the current
    /// round. Returns the evaluated guess.
    pub async fn submit_guess(
        &self,
        username: &Username,
        word: &str,
    ) -> Result<Guess, SessionError> {
        let room = self.require_room()?;
        let round = room
            .current_round()
            .ok_or(SessionError::RoundNotActive)?;
        let state = room
            .game
            .get(username)
            .ok_or_else(|| SessionError::NotAMember(username.clone()))?;
        // Members always get a round entry when a round opens, but a
        // stale local snapshot may not carry it yet.
        let history =
            state.history(round).ok_or(SessionError::RoundNotActive)?;
        if round_finished(history, &self.rules) {
            return Err(SessionError::GuessLimitReached(username.clone()));
        }
        let target = room
            .target_word(round)
            .ok_or(SessionError::WordsExhausted)?;

        let guess = Guess {
            word: word.to_ascii_uppercase(),
            states: evaluate(word, target)?,
        };
        self.store
            .atomic_update(
                &self.room_id,
                &[FieldWrite::PushGuess {
                    username: username.clone(),
                    round,
                    guess: guess.clone(),
                }],
            )
            .await
            .map_err(store_err)?;
        tracing::debug!(
            room_id = %self.room_id,
            %username,
            round,
            word = %guess.word,
            "guess recorded"
        );

        if self.rules.round_advance == RoundAdvancePolicy::AutoOnAllFinished
            && self.all_finished_with(room, round, username, &guess)
        {
            self.trigger_next_round(room, round, username).await;
        }
        Ok(guess)
    }

    /// True when every member's round is over once `guess` is counted
    /// for `username` (the local snapshot does not include it yet).
    fn all_finished_with(
        &self,
        room: &Room,
        round: RoundIndex,
        username: &Username,
        guess: &Guess,
    ) -> bool {
        room.game.iter().all(|(name, state)| {
            let history = state.history(round).unwrap_or(&[]);
            if name == username {
                let mut with_guess = history.to_vec();
                with_guess.push(guess.clone());
                round_finished(&with_guess, &self.rules)
            } else {
                round_finished(history, &self.rules)
            }
        })
    }

    /// Best-effort round advancement. A failure here must not fail the
    /// guess that triggered it, so errors are logged and dropped.
    async fn trigger_next_round(
        &self,
        room: &Room,
        finished_round: RoundIndex,
        caller: &Username,
    ) {
        if let Some(advance) = &self.advance {
            if let Err(error) = advance.next_round(&room.code, caller).await {
                tracing::warn!(
                    room_id = %self.room_id,
                    %error,
                    "round-advance trigger failed"
                );
            }
            return;
        }

        let next = finished_round + 1;
        if room.target_word(next).is_none() {
            tracing::info!(
                room_id = %self.room_id,
                "no target word left, round stays finished"
            );
            return;
        }
        tracing::info!(room_id = %self.room_id, round = next, "opening next round");
        if let Err(error) = self
            .store
            .atomic_update(&self.room_id, &round_writes(room, next))
            .await
        {
            tracing::warn!(
                room_id = %self.room_id,
                %error,
                "failed to open next round"
            );
        }
    }

    /// Waits for the next accepted snapshot, emits its derived events,
    /// and replaces the local state wholesale.
    ///
    /// Snapshots whose sequence number is not greater than the last
    /// accepted one are discarded without effect; at-least-once
    /// delivery makes duplicates legal. Returns `Ok(false)` once the
    /// room is deleted or the stream ends, after emitting
    /// [`RoomEvent::RoomClosed`]; every later operation fails with
    /// [`SessionError::RoomClosed`].
    pub async fn process_next(&mut self) -> Result<bool, SessionError> {
        if self.closed {
            return Ok(false);
        }
        loop {
            match self.subscription.recv().await {
                Some(SnapshotUpdate::Snapshot(snapshot)) => {
                    if self.apply(snapshot) {
                        return Ok(true);
                    }
                }
                Some(SnapshotUpdate::Deleted) | None => {
                    tracing::info!(room_id = %self.room_id, "room closed");
                    self.closed = true;
                    self.latest = None;
                    let _ = self.events.send(RoomEvent::RoomClosed);
                    return Ok(false);
                }
            }
        }
    }

    /// Applies one snapshot. Returns false when it was stale.
    fn apply(&mut self, snapshot: RoomSnapshot) -> bool {
        if let Some(prev) = &self.latest {
            if snapshot.seq <= prev.seq {
                tracing::debug!(
                    room_id = %self.room_id,
                    seq = snapshot.seq,
                    accepted = prev.seq,
                    "discarding stale snapshot"
                );
                return false;
            }
            for event in diff_events(&prev.room, &snapshot.room) {
                let _ = self.events.send(event);
            }
        }
        self.latest = Some(snapshot);
        true
    }
}

/// One `SetRound` with an empty history per current member.
fn round_writes(room: &Room, round: RoundIndex) -> Vec<FieldWrite> {
    room.members()
        .map(|username| FieldWrite::SetRound {
            username: username.clone(),
            round,
            history: Vec::new(),
        })
        .collect()
}

// =========================================================================
// Tests
// =========================================================================
