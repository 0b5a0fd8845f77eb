//! Derivation of room events from consecutive accepted snapshots.

use wordrally_protocol::{Room, RoomEvent};

/// Diffs two accepted room states and returns the events that explain
/// the transition: membership changes first, then round starts, then
/// new guesses in the current round.
///
/// Guesses from earlier rounds are never revisited; a snapshot that
/// both opens a round and carries guesses (possible after a lag
/// resynchronization) yields `RoundStarted` followed by one
/// `GuessSubmitted` per recovered guess.
pub(crate) fn diff_events(old: &Room, new: &Room) -> Vec<RoomEvent> {
    let mut events = Vec::new();

    for name in new.game.keys() {
        if !old.game.contains_key(name) {
            events.push(RoomEvent::PlayerJoined(name.clone()));
        }
    }
    for name in old.game.keys() {
        if !new.game.contains_key(name) {
            events.push(RoomEvent::PlayerLeft(name.clone()));
        }
    }

    for round in old.rounds_started()..new.rounds_started() {
        events.push(RoomEvent::RoundStarted { round });
    }

    if let Some(round) = new.current_round() {
        for (name, state) in &new.game {
            let new_history = state.history(round).unwrap_or(&[]);
            let seen = old
                .game
                .get(name)
                .and_then(|s| s.history(round))
                .map_or(0, <[_]>::len);
            for guess in new_history.iter().skip(seen) {
                events.push(RoomEvent::GuessSubmitted {
                    username: name.clone(),
                    guess: guess.clone(),
                });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordrally_game::evaluate;
    use wordrally_protocol::{
        Guess, PlayerState, RoomCode, RoomId, Username,
    };

    fn room() -> Room {
        Room::create(
            RoomId::from("r1"),
            RoomCode::from("123456"),
            Username::from("alice"),
            vec!["BALLS".into(), "CRANE".into()],
        )
    }

    fn guess(word: &str, target: &str) -> Guess {
        Guess {
            word: word.to_owned(),
            states: evaluate(word, target).unwrap(),
        }
    }

    fn open_round(room: &mut Room, round: u32) {
        let names: Vec<Username> = room.game.keys().cloned().collect();
        for name in names {
            room.game.get_mut(&name).unwrap().0.insert(round, Vec::new());
        }
    }

    #[test]
    fn test_identical_states_produce_no_events() {
        let room = room();
        assert!(diff_events(&room, &room).is_empty());
    }

    #[test]
    fn test_join_and_leave_are_detected() {
        let old = room();
        let mut new = old.clone();
        new.game.insert(Username::from("bob"), PlayerState::new());
        assert_eq!(
            diff_events(&old, &new),
            vec![RoomEvent::PlayerJoined(Username::from("bob"))]
        );
        assert_eq!(
            diff_events(&new, &old),
            vec![RoomEvent::PlayerLeft(Username::from("bob"))]
        );
    }

    #[test]
    fn test_round_start_is_detected() {
        let old = room();
        let mut new = old.clone();
        open_round(&mut new, 0);
        assert_eq!(
            diff_events(&old, &new),
            vec![RoomEvent::RoundStarted { round: 0 }]
        );
    }

    #[test]
    fn test_new_guess_in_current_round_is_detected() {
        let mut old = room();
        open_round(&mut old, 0);
        let mut new = old.clone();
        let g = guess("STALL", "BALLS");
        new.game
            .get_mut(&Username::from("alice"))
            .unwrap()
            .0
            .get_mut(&0)
            .unwrap()
            .push(g.clone());

        assert_eq!(
            diff_events(&old, &new),
            vec![RoomEvent::GuessSubmitted {
                username: Username::from("alice"),
                guess: g,
            }]
        );
    }

    #[test]
    fn test_lag_recovery_emits_round_then_recovered_guesses() {
        // A subscriber that lagged can see a snapshot that is several
        // writes ahead of its last accepted one.
        let old = room();
        let mut new = old.clone();
        open_round(&mut new, 0);
        let g = guess("BALLS", "BALLS");
        new.game
            .get_mut(&Username::from("alice"))
            .unwrap()
            .0
            .get_mut(&0)
            .unwrap()
            .push(g.clone());

        assert_eq!(
            diff_events(&old, &new),
            vec![
                RoomEvent::RoundStarted { round: 0 },
                RoomEvent::GuessSubmitted {
                    username: Username::from("alice"),
                    guess: g,
                },
            ]
        );
    }

    #[test]
    fn test_previous_round_guesses_are_not_replayed() {
        let mut old = room();
        open_round(&mut old, 0);
        old.game
            .get_mut(&Username::from("alice"))
            .unwrap()
            .0
            .get_mut(&0)
            .unwrap()
            .push(guess("BALLS", "BALLS"));

        let mut new = old.clone();
        open_round(&mut new, 1);

        assert_eq!(
            diff_events(&old, &new),
            vec![RoomEvent::RoundStarted { round: 1 }]
        );
    }
}
