// Prints logged boards as text
//
// Usage:
//   cargo run --bin show_board -- <log_file> [turn ...]
//
// Without turn numbers every entry in the log is drawn.

use std::env;
use std::process;

use lookahead_snake::config::Config;
use lookahead_snake::replay::{render_board, LogEntry, ReplayEngine};

fn describe(entry: &LogEntry) {
    println!(
        "Turn {} ({}), chose {}",
        entry.turn, entry.ruleset, entry.chosen_move
    );
    for snake in &entry.board.snakes {
        let marker = if snake.id == entry.you_id { " (us)" } else { "" };
        println!(
            "  {}{}: health {}, length {}",
            snake.name,
            marker,
            snake.health,
            snake.body.len()
        );
    }
    println!("{}\n", render_board(&entry.board));
}

fn run(args: &[String]) -> Result<(), String> {
    let log_file = args
        .get(1)
        .ok_or("Usage: show_board <log_file> [turn ...]")?;
    let turns = args[2..]
        .iter()
        .map(|t| {
            t.parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine.load_log_file(log_file)?;

    if turns.is_empty() {
        entries.iter().for_each(describe);
        return Ok(());
    }

    for turn in turns {
        let entry = entries
            .iter()
            .find(|e| e.turn == turn)
            .ok_or_else(|| format!("Turn {} not found in log file", turn))?;
        describe(entry);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
