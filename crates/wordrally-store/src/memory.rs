//! In-memory store of record built on tokio broadcast channels.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;
use wordrally_protocol::{Room, RoomId, RoomSnapshot, SnapshotUpdate};

use crate::{Broadcaster, FieldPath, FieldWrite, StoreError};

/// Default per-room snapshot buffer. Slow subscribers that overflow it
/// resynchronize from the next snapshot they receive.
const DEFAULT_BUFFER: usize = 64;

struct RoomEntry {
    room: Room,
    seq: u64,
    tx: broadcast::Sender<SnapshotUpdate>,
}

impl RoomEntry {
    /// Advances the sequence number and fans the current state out to
    /// all subscribers. Send failures just mean nobody is listening.
    fn publish(&mut self) {
        self.seq += 1;
        let snapshot = RoomSnapshot { seq: self.seq, room: self.room.clone() };
        let _ = self.tx.send(SnapshotUpdate::Snapshot(snapshot));
    }
}

/// An in-process [`Broadcaster`]: one broadcast channel per room,
/// sequence numbers assigned under the room table lock.
///
/// Suitable for a single-process deployment and for tests; a remote
/// realtime-database adapter would implement the same trait.
pub struct MemoryStore {
    rooms: Mutex<HashMap<RoomId, RoomEntry>>,
    buffer: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_BUFFER)
    }

    /// Creates a store with a custom per-room snapshot buffer.
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Inserts a new room record and publishes its first snapshot.
    ///
    /// Room creation happens outside the coordinator (the owner's
    /// initial action), so this lives on the store type rather than on
    /// the [`Broadcaster`] trait.
    ///
    /// # Errors
    /// Rejects duplicate room ids and join codes already in use by a
    /// live room.
    pub fn create_room(&self, room: Room) -> Result<(), StoreError> {
        let mut rooms = self.lock();
        if rooms.contains_key(&room.id) {
            return Err(StoreError::DuplicateRoom(room.id));
        }
        if rooms.values().any(|e| e.room.code == room.code) {
            return Err(StoreError::CodeInUse(room.code));
        }

        tracing::info!(room_id = %room.id, code = %room.code, "room created");
        let (tx, _rx) = broadcast::channel(self.buffer);
        let id = room.id.clone();
        let mut entry = RoomEntry { room, seq: 0, tx };
        entry.publish();
        rooms.insert(id, entry);
        Ok(())
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RoomId, RoomEntry>> {
        // Lock poisoning only happens if a writer panicked; the room
        // table itself is still consistent (writes go to a clone).
        self.rooms.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies one write to a working copy of the room.
fn apply_write(room: &mut Room, write: &FieldWrite) -> Result<(), StoreError> {
    match write {
        FieldWrite::SetPlayer { username, state } => {
            room.game.insert(username.clone(), state.clone());
        }
        FieldWrite::SetRound { username, round, history } => {
            let player = room
                .game
                .get_mut(username)
                .ok_or_else(|| path_not_found(write.path()))?;
            player.0.insert(*round, history.clone());
        }
        FieldWrite::PushGuess { username, round, guess } => {
            let player = room
                .game
                .get_mut(username)
                .ok_or_else(|| path_not_found(write.path()))?;
            let history = player
                .0
                .get_mut(round)
                .ok_or_else(|| path_not_found(write.path()))?;
            history.push(guess.clone());
        }
    }
    Ok(())
}

fn path_not_found(path: FieldPath) -> StoreError {
    StoreError::PathNotFound(path.to_string())
}

impl Broadcaster for MemoryStore {
    async fn subscribe(
        &self,
        room: &RoomId,
    ) -> Result<crate::Subscription, StoreError> {
        let rooms = self.lock();
        let entry = rooms
            .get(room)
            .ok_or_else(|| StoreError::RoomNotFound(room.clone()))?;
        let initial = SnapshotUpdate::Snapshot(RoomSnapshot {
            seq: entry.seq,
            room: entry.room.clone(),
        });
        Ok(crate::Subscription::new(
            room.clone(),
            initial,
            entry.tx.subscribe(),
        ))
    }

    async fn atomic_update(
        &self,
        room: &RoomId,
        writes: &[FieldWrite],
    ) -> Result<(), StoreError> {
        let mut rooms = self.lock();
        let entry = rooms
            .get_mut(room)
            .ok_or_else(|| StoreError::RoomNotFound(room.clone()))?;

        // All-or-nothing: apply the batch to a working copy, commit
        // only if every write lands.
        let mut next = entry.room.clone();
        for write in writes {
            apply_write(&mut next, write)?;
        }
        entry.room = next;
        entry.publish();
        tracing::debug!(
            room_id = %room,
            writes = writes.len(),
            seq = entry.seq,
            "atomic update applied"
        );
        Ok(())
    }

    async fn atomic_delete(
        &self,
        room: &RoomId,
        path: &FieldPath,
    ) -> Result<(), StoreError> {
        let mut rooms = self.lock();
        let entry = rooms
            .get_mut(room)
            .ok_or_else(|| StoreError::RoomNotFound(room.clone()))?;

        match path {
            FieldPath::Player(username) => {
                entry
                    .room
                    .game
                    .remove(username)
                    .ok_or_else(|| path_not_found(path.clone()))?;
            }
            FieldPath::Round(username, round) => {
                let player = entry
                    .room
                    .game
                    .get_mut(username)
                    .ok_or_else(|| path_not_found(path.clone()))?;
                player
                    .0
                    .remove(round)
                    .ok_or_else(|| path_not_found(path.clone()))?;
            }
        }
        entry.publish();
        tracing::debug!(room_id = %room, %path, "field deleted");
        Ok(())
    }

    async fn delete_room(&self, room: &RoomId) -> Result<(), StoreError> {
        let mut rooms = self.lock();
        let entry = rooms
            .remove(room)
            .ok_or_else(|| StoreError::RoomNotFound(room.clone()))?;
        let _ = entry.tx.send(SnapshotUpdate::Deleted);
        tracing::info!(room_id = %room, "room deleted");
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
