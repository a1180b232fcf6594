// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The bot glues the API surface to the decision engine: it validates the
// incoming snapshot, runs the search off the async runtime and maps the
// chosen cell back to a direction.
// For more info see docs.battlesnake.com

use log::{error, info};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::search::{Decision, Searcher};
use crate::simulation::SimState;
use crate::types::{Battlesnake, Board, Coord, Direction, Game, GameState};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Creates a Bot that records every decision through `debug_logger`
    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        Bot {
            config,
            debug_logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "lookahead-snake",
            "color": "#00DEAD",
            "head": "default",
            "tail": "default",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, _you: &Battlesnake) {
        info!(
            "GAME START {} ({} ruleset, {}x{}, {} snakes)",
            game.id,
            game.ruleset.name,
            board.width,
            board.height,
            board.snakes.len()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, board: &Board, you: &Battlesnake) {
        let outcome = match board.snake(&you.id) {
            Some(_) if board.snakes.len() == 1 => "won",
            Some(_) => "survived",
            None => "eliminated",
        };
        info!("GAME OVER {} after {} turns: {}", game.id, turn, outcome);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search is CPU bound and runs on tokio's blocking pool. A snapshot that
    /// fails validation is rejected before any search work starts.
    ///
    /// # Returns
    /// * `Result<Value, String>` - JSON response containing the chosen move direction,
    ///   or the validation error
    pub async fn get_move(
        &self,
        game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, String> {
        let start_time = Instant::now();

        let state = GameState {
            game: game.clone(),
            turn: *turn,
            board: board.clone(),
            you: you.clone(),
        };
        state.validate()?;

        let config = self.config.clone();
        let budget = Duration::from_millis(config.timing.effective_budget_ms());
        let wrapped = SimState::from_game_state(&state, &config.game_rules).is_wrapped();

        let outcome =
            tokio::task::spawn_blocking(move || Bot::decide(&config, &state, budget)).await;

        let chosen_move = match outcome {
            Ok((direction, decision)) => {
                info!(
                    "Turn {}: Chose {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
                    turn,
                    direction.as_str(),
                    decision.score,
                    decision.depth,
                    decision.nodes,
                    start_time.elapsed().as_millis()
                );
                direction
            }
            Err(e) => {
                error!("Turn {}: search task failed: {}", turn, e);
                Self::fallback_direction(you.head, board, wrapped)
            }
        };

        self.debug_logger.log_move(
            *turn,
            &game.ruleset.name,
            &you.id,
            board.clone(),
            chosen_move,
        );

        Ok(json!({ "move": chosen_move.as_str() }))
    }

    /// Runs the search synchronously on a validated snapshot
    pub fn decide(config: &Config, state: &GameState, budget: Duration) -> (Direction, Decision) {
        let sim = SimState::from_game_state(state, &config.game_rules);
        let mut searcher = Searcher::new(config);
        let decision = searcher.decide(&sim, budget);
        let direction =
            Self::choose_direction(state.you.head, decision.mv, &state.board, sim.is_wrapped());
        (direction, decision)
    }

    /// Maps the chosen cell to a direction, falling back when it is not a single step away
    pub fn choose_direction(head: Coord, target: Coord, board: &Board, wrapped: bool) -> Direction {
        Direction::between(head, target, board.width, board.height, wrapped)
            .unwrap_or_else(|| Self::fallback_direction(head, board, wrapped))
    }

    /// First direction that keeps the head on the board, or left
    pub fn fallback_direction(head: Coord, board: &Board, wrapped: bool) -> Direction {
        Direction::all()
            .iter()
            .copied()
            .find(|dir| wrapped || board.in_bounds(dir.apply(&head)))
            .unwrap_or(Direction::Left)
    }
}
