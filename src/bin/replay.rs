// Replays decisions recorded in a debug log
//
// Usage:
//   cargo run --bin replay -- <log_file> (--all | --turns 5,10 | --validate 5:up,10:left|right)
//                              [--verbose] [--config Snake.toml]

use std::env;
use std::process;

use lookahead_snake::config::Config;
use lookahead_snake::replay::ReplayEngine;
use lookahead_snake::types::Direction;

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

struct Args {
    log_file: String,
    config_path: String,
    verbose: bool,
    mode: Mode,
}

fn print_usage() {
    eprintln!("Lookahead snake replay tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay every turn in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns");
    eprintln!("  --validate <T:M,...>    Check logged moves (turn:move, alternatives split by '|')");
    eprintln!("  --verbose               Log every replayed turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let mut parts = pair.trim().splitn(2, ':');
            let (turn, moves) = match (parts.next(), parts.next()) {
                (Some(turn), Some(moves)) => (turn, moves),
                _ => return Err(format!("Invalid format '{}'. Expected 'turn:move'", pair)),
            };

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;
            let moves = moves
                .split('|')
                .map(str::parse::<Direction>)
                .collect::<Result<Vec<_>, _>>()?;

            Ok((turn, moves))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let log_file = args.get(1).ok_or("Missing log file")?.clone();
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        let mut value = |name: &str| {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} requires an argument", name))
        };
        match arg.as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => mode = Some(Mode::Turns(parse_turns(&value("--turns")?)?)),
            "--validate" => {
                mode = Some(Mode::Validate(parse_expected_moves(&value("--validate")?)?))
            }
            "--config" => config_path = value("--config")?,
            "--verbose" => verbose = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    let mode = mode.ok_or("Must specify --all, --turns, or --validate")?;
    Ok(Args {
        log_file,
        config_path,
        verbose,
        mode,
    })
}

fn run(args: Args) -> Result<(), String> {
    let config = Config::from_file(&args.config_path).unwrap_or_else(|e| {
        eprintln!("Warning: {}; using default configuration", e);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, args.verbose);
    let entries = engine.load_log_file(&args.log_file)?;
    if entries.is_empty() {
        return Err("Log file is empty".to_string());
    }
    println!("Loaded {} log entries from {}\n", entries.len(), args.log_file);

    match args.mode {
        Mode::All => {
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            let results = engine.replay_turns(&entries, &turns)?;
            engine.print_report(&results);
        }
        Mode::Validate(expected) => {
            engine.validate_expected_moves(&entries, &expected)?;
            println!("All {} expected move(s) validated", expected.len());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        print_usage();
        return;
    }

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(parsed) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
