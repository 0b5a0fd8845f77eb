//! Projection of a room snapshot into per-player board grids.

use wordrally_game::{round_finished, GameRules};
use wordrally_protocol::{
    Guess, LetterState, Room, RoundIndex, Username,
};

/// Errors that can occur while projecting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The viewer is no longer a member of the room. Callers should
    /// treat this as a forced exit (kicked or removed).
    #[error("{0} is not in this room")]
    ViewerNotInRoom(Username),
}

/// One member's grid for the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBoard {
    pub username: Username,
    /// Exactly `max_guesses` rows of `word_length` states: evaluated
    /// guess states first, `Empty` padding below.
    pub rows: Vec<Vec<LetterState>>,
    /// Whether this player's round is individually over.
    pub finished: bool,
}

/// Everything a client renders for one accepted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    /// The round currently in play, if any.
    pub round: Option<RoundIndex>,
    /// True iff the viewer's own state carries at least one round
    /// entry — the signal for showing the board instead of the lobby.
    pub round_active: bool,
    /// The viewer's own guessed words this round, in order, so the UI
    /// can render its own letters (other boards expose states only).
    pub own_words: Vec<String>,
    /// The viewer's board first, then the other members in sorted
    /// order.
    pub boards: Vec<PlayerBoard>,
}

/// Projects `room` into the view model for `viewer`.
///
/// # Errors
/// Returns [`ProjectError::ViewerNotInRoom`] when the viewer's key is
/// missing from the room's membership map.
pub fn project(
    room: &Room,
    viewer: &Username,
    rules: &GameRules,
) -> Result<RoomView, ProjectError> {
    let viewer_state = room
        .game
        .get(viewer)
        .ok_or_else(|| ProjectError::ViewerNotInRoom(viewer.clone()))?;

    let round = room.current_round();

    let board_for = |username: &Username| -> PlayerBoard {
        let history: &[Guess] = round
            .and_then(|r| room.game[username].history(r))
            .unwrap_or(&[]);
        let mut rows = Vec::with_capacity(rules.max_guesses);
        for guess in history.iter().take(rules.max_guesses) {
            rows.push(guess.states.clone());
        }
        while rows.len() < rules.max_guesses {
            rows.push(vec![LetterState::Empty; rules.word_length]);
        }
        PlayerBoard {
            username: username.clone(),
            rows,
            finished: round_finished(history, rules),
        }
    };

    let mut boards = vec![board_for(viewer)];
    boards.extend(
        room.members().filter(|u| *u != viewer).map(board_for),
    );

    let own_words = round
        .and_then(|r| viewer_state.history(r))
        .map(|h| h.iter().map(|g| g.word.clone()).collect())
        .unwrap_or_default();

    Ok(RoomView {
        round,
        round_active: !viewer_state.is_lobby_only(),
        own_words,
        boards,
    })
}

// =========================================================================
// Tests
// =========================================================================
