//! Integration test: Hangman session flow
//!
//! Word assignment and guessing driven through the session controller.

use std::sync::Arc;
use uuid::Uuid;
use wallplay::games::hangman::{HangmanState, DEFAULT_MAX_GUESSES};
use wallplay::model::NewGame;
use wallplay::{
    GameMetadata, GameMove, GameSession, GameStatus, GameStore, InMemoryStore, SessionPhase,
};

async fn create_game(
    store: &Arc<InMemoryStore>,
    setter: Uuid,
    guesser: Uuid,
) -> wallplay::Game {
    store
        .create_game(NewGame {
            circle_id: Uuid::new_v4(),
            created_by: setter,
            title: "Hangman".to_string(),
            description: None,
            metadata: GameMetadata::Hangman(HangmanState::new(setter, guesser, DEFAULT_MAX_GUESSES)),
            status: None,
        })
        .await
        .expect("create game")
}

#[tokio::test]
async fn test_one_miss_then_full_reveal() {
    let store = Arc::new(InMemoryStore::new());
    let setter = Uuid::new_v4();
    let guesser = Uuid::new_v4();
    let game = create_game(&store, setter, guesser).await;

    let mut host = GameSession::new(store.clone(), game.id, setter);
    let mut player = GameSession::new(store.clone(), game.id, guesser);
    host.load().await.expect("load host");
    player.load().await.expect("load player");
    player.join().await.expect("join player");

    host.submit_move(GameMove::SetWord {
        word: "CAT".to_string(),
    })
    .await
    .expect("set word");
    assert!(host.drain_notices().is_empty());
    player.refresh().await.expect("refresh");

    for (i, letter) in ['X', 'C', 'A', 'T'].into_iter().enumerate() {
        player
            .submit_move(GameMove::Guess { letter })
            .await
            .expect("guess");
        assert!(player.drain_notices().is_empty(), "guess {} accepted", i);

        let GameMetadata::Hangman(state) = player.metadata().expect("metadata") else {
            panic!("expected hangman metadata");
        };
        // Only the opening miss moves the counter
        assert_eq!(state.incorrect_guesses, 1, "after guess {}", i);
    }

    assert_eq!(player.phase(), SessionPhase::Terminal);
    let finished = player.game().expect("game");
    assert_eq!(finished.status, GameStatus::Finished);
    assert_eq!(finished.metadata.winner(), Some(guesser));
    let GameMetadata::Hangman(state) = &finished.metadata else {
        panic!("expected hangman metadata");
    };
    assert_eq!(state.masked_word(), "CAT", "fully revealed");
}

#[tokio::test]
async fn test_monotone_counter_and_cap() {
    let store = Arc::new(InMemoryStore::new());
    let setter = Uuid::new_v4();
    let guesser = Uuid::new_v4();
    let game = store
        .create_game(NewGame {
            circle_id: Uuid::new_v4(),
            created_by: setter,
            title: "Hangman".to_string(),
            description: None,
            metadata: GameMetadata::Hangman(HangmanState::new(setter, guesser, 3)),
            status: None,
        })
        .await
        .expect("create game");

    let mut host = GameSession::new(store.clone(), game.id, setter);
    let mut player = GameSession::new(store.clone(), game.id, guesser);
    host.load().await.expect("load host");
    player.load().await.expect("load player");
    player.join().await.expect("join player");

    host.submit_move(GameMove::SetWord {
        word: "CAT".to_string(),
    })
    .await
    .expect("set word");
    player.refresh().await.expect("refresh");

    let mut last_count = 0;
    for letter in ['Q', 'Z', 'B'] {
        player
            .submit_move(GameMove::Guess { letter })
            .await
            .expect("guess");
        let GameMetadata::Hangman(state) = player.metadata().expect("metadata") else {
            panic!("expected hangman metadata");
        };
        assert!(state.incorrect_guesses >= last_count, "never decreases");
        assert!(state.incorrect_guesses <= state.max_guesses, "never exceeds cap");
        last_count = state.incorrect_guesses;
    }

    // Out of guesses: the setter takes it, and the game stops accepting
    assert_eq!(player.phase(), SessionPhase::Terminal);
    assert_eq!(player.game().expect("game").metadata.winner(), Some(setter));
    player
        .submit_move(GameMove::Guess { letter: 'C' })
        .await
        .expect("submit");
    let notices = player.drain_notices();
    assert!(matches!(
        notices.as_slice(),
        [wallplay::Notice::InvalidMove(wallplay::RulesError::GameOver)]
    ));
}
