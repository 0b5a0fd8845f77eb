//! Two players race through one round of Wordrally against an
//! in-memory store, printing each board as snapshots arrive.
//!
//! Run with `RUST_LOG=debug` to watch the snapshot traffic.

use std::sync::Arc;

use rand::rng;
use tracing_subscriber::EnvFilter;
use wordrally_game::GameRules;
use wordrally_protocol::{LetterState, Room, RoomCode, RoomId, Username};
use wordrally_session::SessionCoordinator;
use wordrally_store::MemoryStore;
use wordrally_view::{project, RoomView};

fn render(view: &RoomView) {
    for board in &view.boards {
        println!("  {}{}", board.username, if board.finished { " (done)" } else { "" });
        for row in &board.rows {
            let cells: String = row
                .iter()
                .map(|state| match state {
                    LetterState::Correct => 'G',
                    LetterState::Present => 'Y',
                    LetterState::Absent => 'X',
                    LetterState::Empty => '.',
                })
                .collect();
            println!("    {cells}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let alice = Username::from("alice");
    let bob = Username::from("bob");
    let rules = GameRules::default();

    let store = Arc::new(MemoryStore::new());
    let code = RoomCode::generate(&mut rng());
    let room_id = RoomId::from("demo");
    store.create_room(Room::create(
        room_id.clone(),
        code.clone(),
        alice.clone(),
        vec!["BALLS".into()],
    ))?;
    println!("room {room_id} open, join code {code}");

    let (mut alice_session, _alice_events) = SessionCoordinator::connect(
        Arc::clone(&store),
        room_id.clone(),
        rules.clone(),
    )
    .await?;
    let (mut bob_session, mut bob_events) = SessionCoordinator::connect(
        Arc::clone(&store),
        room_id,
        rules.clone(),
    )
    .await?;

    bob_session.join(&bob).await?;
    alice_session.process_next().await?;
    bob_session.process_next().await?;

    alice_session.start(&alice).await?;
    alice_session.process_next().await?;
    bob_session.process_next().await?;

    let script = [
        (alice.clone(), "CRANE"),
        (bob.clone(), "STALL"),
        (alice.clone(), "BALLS"),
        (bob.clone(), "BALLS"),
    ];
    for (who, word) in script {
        let session = if who == alice { &alice_session } else { &bob_session };
        let guess = session.submit_guess(&who, word).await?;
        println!("{who} guessed {}", guess.word);
        alice_session.process_next().await?;
        bob_session.process_next().await?;
    }

    let snapshot = bob_session.snapshot().expect("room is live");
    println!("\nbob's view:");
    render(&project(&snapshot.room, &bob, &rules)?);

    alice_session.leave(&alice).await?;
    bob_session.process_next().await?;
    while let Ok(event) = bob_events.try_recv() {
        tracing::info!(?event, "bob observed");
    }
    println!("owner left, room closed");
    Ok(())
}
