//! Game engine simulator CLI.
//!
//! Plays complete bot-vs-bot games through the real session pipeline
//! (rules engines, store writes, change signals) over the in-memory
//! store and prints outcome tallies.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # 100 runs per game type
//!   cargo run --bin simulate -- -n 20 -t checkers
//!   cargo run --bin simulate -- --seed 42         # Reproducible run

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wallplay::games::registry::selector_for;
use wallplay::games::checkers::CheckersState;
use wallplay::games::chess::ChessState;
use wallplay::games::connect_four::ConnectFourState;
use wallplay::games::tictactoe::TicTacToeState;
use wallplay::model::NewGame;
use wallplay::{
    BotDifficulty, GameMetadata, GameSession, GameStore, GameType, InMemoryStore, SessionPhase,
    COMPUTER_USER_ID,
};

/// Ply cap before a run is written off as stalled.
const MAX_PLIES: u32 = 400;

struct SimConfig {
    runs: u32,
    game_types: Vec<GameType>,
    difficulty: BotDifficulty,
    seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            game_types: vec![
                GameType::TicTacToe,
                GameType::ConnectFour,
                GameType::Checkers,
            ],
            difficulty: BotDifficulty::Hard,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    CreatorWin,
    ComputerWin,
    Draw,
    Stalled,
}

#[derive(Default)]
struct Tally {
    creator_wins: u32,
    computer_wins: u32,
    draws: u32,
    stalled: u32,
    total_plies: u64,
}

impl Tally {
    fn record(&mut self, outcome: RunOutcome, plies: u32) {
        match outcome {
            RunOutcome::CreatorWin => self.creator_wins += 1,
            RunOutcome::ComputerWin => self.computer_wins += 1,
            RunOutcome::Draw => self.draws += 1,
            RunOutcome::Stalled => self.stalled += 1,
        }
        self.total_plies += plies as u64;
    }

    fn runs(&self) -> u32 {
        self.creator_wins + self.computer_wins + self.draws + self.stalled
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("wallplay engine simulator (built {})", wallplay::build_info::BUILD_DATE);
    println!(
        "  runs per type: {}   difficulty: {}   seed: {}",
        config.runs,
        config.difficulty.name(),
        config.seed
    );
    println!();

    let store = Arc::new(InMemoryStore::new());
    for game_type in &config.game_types {
        let mut tally = Tally::default();
        for run in 0..config.runs {
            let seed = config.seed ^ ((run as u64) << 8);
            let (outcome, plies) =
                simulate_one(store.clone(), *game_type, config.difficulty, seed).await;
            tally.record(outcome, plies);
        }
        let avg_plies = tally.total_plies as f64 / tally.runs().max(1) as f64;
        println!(
            "{:<20} creator {:>3}  computer {:>3}  draws {:>3}  stalled {:>3}  avg plies {:.1}",
            game_type.name(),
            tally.creator_wins,
            tally.computer_wins,
            tally.draws,
            tally.stalled,
            avg_plies
        );
    }
}

/// Play one full game. The creator's side is driven by the same
/// selector as the computer's, through the human submit path.
async fn simulate_one(
    store: Arc<InMemoryStore>,
    game_type: GameType,
    difficulty: BotDifficulty,
    seed: u64,
) -> (RunOutcome, u32) {
    let creator = Uuid::new_v4();
    let metadata = initial_metadata(game_type, creator);
    let game = store
        .create_game(NewGame {
            circle_id: Uuid::new_v4(),
            created_by: creator,
            title: format!("{} (simulated)", game_type.name()),
            description: None,
            metadata,
            status: None,
        })
        .await
        .expect("create simulated game");

    let mut session = GameSession::new(store, game.id, creator)
        .with_bot_difficulty(difficulty)
        .with_bot_delay(Duration::ZERO)
        .with_rng_seed(seed);
    session.load().await.expect("load simulated game");

    let selector = selector_for(game_type).expect("classic game has a selector");
    let mut creator_rng = StdRng::seed_from_u64(seed.wrapping_mul(0x9e37_79b9));
    let mut plies = 0u32;

    while session.phase() != SessionPhase::Terminal {
        if plies >= MAX_PLIES {
            return (RunOutcome::Stalled, plies);
        }
        if session.bot_turn_pending() {
            session.run_bot_turn().await.expect("bot turn");
        } else {
            let Some(metadata) = session.metadata().cloned() else {
                return (RunOutcome::Stalled, plies);
            };
            match selector.select_move(&metadata, difficulty, &mut creator_rng) {
                Some(mv) => session.submit_move(mv).await.expect("creator move"),
                None => return (RunOutcome::Stalled, plies),
            }
        }
        plies += 1;
    }

    let winner = session.game().and_then(|g| g.metadata.winner());
    let outcome = match winner {
        Some(user) if user == creator => RunOutcome::CreatorWin,
        Some(user) if user == COMPUTER_USER_ID => RunOutcome::ComputerWin,
        Some(_) => RunOutcome::Stalled,
        None => RunOutcome::Draw,
    };
    (outcome, plies)
}

fn initial_metadata(game_type: GameType, creator: Uuid) -> GameMetadata {
    match game_type {
        GameType::TicTacToe => {
            GameMetadata::TicTacToe(TicTacToeState::new(creator, Some(COMPUTER_USER_ID)))
        }
        GameType::ConnectFour => {
            GameMetadata::ConnectFour(ConnectFourState::new(creator, Some(COMPUTER_USER_ID)))
        }
        GameType::Checkers => {
            GameMetadata::Checkers(CheckersState::new(creator, Some(COMPUTER_USER_ID)))
        }
        GameType::Chess => GameMetadata::Chess(ChessState::new(creator, Some(COMPUTER_USER_ID))),
        other => panic!("{} has no computer opponent to simulate", other.name()),
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-t" | "--type" => {
                if i + 1 < args.len() {
                    config.game_types = match args[i + 1].as_str() {
                        "tictactoe" => vec![GameType::TicTacToe],
                        "connect_four" => vec![GameType::ConnectFour],
                        "checkers" => vec![GameType::Checkers],
                        "chess" => vec![GameType::Chess],
                        _ => SimConfig::default().game_types,
                    };
                    i += 1;
                }
            }
            "-d" | "--difficulty" => {
                if i + 1 < args.len() {
                    config.difficulty = match args[i + 1].as_str() {
                        "easy" => BotDifficulty::Easy,
                        "medium" => BotDifficulty::Medium,
                        _ => BotDifficulty::Hard,
                    };
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().unwrap_or(7);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    config
}
