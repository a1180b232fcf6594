// Replay of recorded decisions
//
// Reads the JSONL log written by the debug logger, re-runs the decision engine
// on the recorded boards and compares the outcome with what was played.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bot::Bot;
use crate::config::Config;
use crate::types::{Board, Coord, Direction, Game, GameState, Ruleset};

/// One line of the debug log
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    /// Missing in hand-written logs; the first snake on the board is used instead
    #[serde(default)]
    pub you_id: String,
    #[serde(default = "default_ruleset")]
    pub ruleset: String,
    pub chosen_move: String,
    pub board: Board,
    #[serde(default)]
    pub timestamp: String,
}

fn default_ruleset() -> String {
    "standard".to_string()
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub replayed_score: f64,
    pub search_depth: u8,
    pub nodes: u64,
    pub computation_time_ms: u128,
}

#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file, skipping blank lines
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Rebuilds the request the bot saw for `entry`
    pub fn game_state(entry: &LogEntry) -> Result<GameState, String> {
        let you = if entry.you_id.is_empty() {
            entry.board.snakes.first()
        } else {
            entry.board.snake(&entry.you_id)
        }
        .ok_or_else(|| format!("Turn {}: our snake is not on the board", entry.turn))?
        .clone();

        let state = GameState {
            game: Game {
                id: format!("replay-{}", entry.turn),
                ruleset: Ruleset::named(&entry.ruleset),
                timeout: 500,
                source: "replay".to_string(),
            },
            turn: entry.turn,
            board: entry.board.clone(),
            you,
        };
        state.validate()?;
        Ok(state)
    }

    /// Runs the decision engine on one recorded turn.
    /// Returns the move, its score, the completed depth, node count and elapsed time.
    pub fn replay_turn(&self, entry: &LogEntry) -> Result<(Direction, f64, u8, u64, u128), String> {
        let state = Self::game_state(entry)?;
        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());

        let start_time = Instant::now();
        let (direction, decision) = Bot::decide(&self.config, &state, budget);

        Ok((
            direction,
            decision.score,
            decision.depth,
            decision.nodes,
            start_time.elapsed().as_millis(),
        ))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Self::parse_direction(&entry.chosen_move)?;
        let (replayed_move, replayed_score, search_depth, nodes, computation_time) =
            self.replay_turn(entry)?;

        let matches = original_move == replayed_move;

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    replayed_move.as_str(),
                    replayed_score,
                    search_depth,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH logged {}, replayed {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    original_move.as_str(),
                    replayed_move.as_str(),
                    replayed_score,
                    search_depth,
                    computation_time
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            replayed_score,
            search_depth,
            nodes,
            computation_time_ms: computation_time,
        })
    }

    /// Replays every entry; entries that fail are logged and skipped
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays the given turns; a turn missing from the log is an error
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay turn {}: {}", turn_num, e),
            }
        }

        Ok(results)
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n===========================================================");
        println!("                    REPLAY REPORT");
        println!("===========================================================");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("===========================================================\n");

        if !results.is_empty() {
            let count = results.len() as f64;
            let avg_time =
                results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>() / count;
            let avg_depth = results.iter().map(|r| r.search_depth as f64).sum::<f64>() / count;
            let avg_nodes = results.iter().map(|r| r.nodes as f64).sum::<f64>() / count;

            println!("Average Search Depth:       {:.1}", avg_depth);
            println!("Average Nodes:              {:.0}", avg_nodes);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("DETAILED MISMATCHES");
            for result in mismatches {
                println!(
                    "Turn {}: {} -> {} (score: {}, depth: {}, time: {}ms)",
                    result.turn,
                    result.original_move.as_str(),
                    result.replayed_move.as_str(),
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Checks that the logged move of each listed turn is one of the acceptable ones
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Self::parse_direction(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }

    fn parse_direction(s: &str) -> Result<Direction, String> {
        s.parse()
    }
}

/// Text picture of a board, top row first.
/// Heads show the snake's initial, `s` marks body, `f` food, `x` hazard.
pub fn render_board(board: &Board) -> String {
    let width = board.width.max(0) as usize;
    let height = board.height.max(0) as usize;
    let mut cells = vec![vec!['.'; width]; height];

    let mut put = |coord: &Coord, ch: char| {
        if board.in_bounds(*coord) {
            cells[coord.y as usize][coord.x as usize] = ch;
        }
    };

    for hazard in &board.hazards {
        put(hazard, 'x');
    }
    for food in &board.food {
        put(food, 'f');
    }
    for snake in &board.snakes {
        for segment in snake.body.iter().skip(1) {
            put(segment, 's');
        }
    }
    for snake in &board.snakes {
        let initial = snake.name.chars().next().unwrap_or('?');
        put(&snake.head, initial);
    }

    cells
        .iter()
        .rev()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
