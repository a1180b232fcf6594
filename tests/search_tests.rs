// End-to-end decisions and randomised pathfinding checks

use rand::Rng;
use std::time::Duration;

use lookahead_snake::bot::Bot;
use lookahead_snake::config::Config;
use lookahead_snake::grid::Grid;
use lookahead_snake::pathfinding::{distances, shortest_path};
use lookahead_snake::rules::Rules;
use lookahead_snake::search::Searcher;
use lookahead_snake::simulation::SimState;
use lookahead_snake::territory::territory;
use lookahead_snake::types::{Battlesnake, Board, Coord, Direction, Game, GameState, Ruleset};

fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

/// Health 2, food one step up: every other move starves
fn hungry_solo_board() -> Board {
    let mut board = Board::new(5, 5);
    board.food = vec![c(1, 3)];
    board.snakes = vec![Battlesnake::from_body(
        "me",
        vec![c(1, 2), c(1, 1), c(1, 0), c(2, 0), c(3, 0), c(4, 0)],
        2,
    )];
    board
}

fn solo_rules(config: &Config) -> Rules {
    Rules::from_ruleset(&Ruleset::named("solo"), &config.game_rules)
}

#[test]
fn test_hungry_solo_snake_eats_at_every_depth() {
    let config = Config::default_hardcoded();
    let state = SimState::new(hungry_solo_board(), solo_rules(&config), 0, "me");

    for depth in 1..=6u8 {
        let mut searcher = Searcher::new(&config);
        let node = searcher
            .minimax(
                &state,
                c(1, 2),
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                true,
            )
            .expect("no deadline is armed");
        assert_eq!(node.mv, c(1, 3), "depth {}", depth);
        assert!(node.score.is_finite(), "depth {}", depth);
    }
}

#[test]
fn test_bot_decides_up_towards_food() {
    let config = Config::default_hardcoded();
    let board = hungry_solo_board();
    let state = GameState {
        game: Game {
            id: "solo-food".to_string(),
            ruleset: Ruleset::named("solo"),
            timeout: 500,
            source: "test".to_string(),
        },
        turn: 40,
        you: board.snakes[0].clone(),
        board,
    };

    let (direction, decision) = Bot::decide(&config, &state, Duration::from_millis(100));
    assert_eq!(direction, Direction::Up);
    assert_eq!(decision.mv, c(1, 3));
    assert!(decision.depth >= config.timing.initial_depth);
    assert!(decision.nodes > 0);
}

#[test]
fn test_adjacent_food_is_eaten_at_any_health() {
    let config = Config::default_hardcoded();

    for &health in [100, 50, 10].iter() {
        let mut board = Board::new(5, 5);
        board.food = vec![c(2, 3)];
        board.snakes = vec![Battlesnake::from_body(
            "me",
            vec![c(2, 2), c(2, 1), c(2, 0)],
            health,
        )];
        let state = SimState::new(board, solo_rules(&config), 0, "me");

        let decision = Searcher::new(&config).decide(&state, Duration::from_millis(50));
        assert_eq!(decision.mv, c(2, 3), "health {}", health);
    }
}

#[test]
fn test_zero_budget_still_returns_a_legal_move() {
    let config = Config::default_hardcoded();
    let state = SimState::new(hungry_solo_board(), solo_rules(&config), 0, "me");

    let mut searcher = Searcher::new(&config);
    let decision = searcher.decide(&state, Duration::from_millis(0));
    assert_eq!(decision.depth, config.timing.initial_depth);
    assert!([c(0, 2), c(2, 2), c(1, 3)].contains(&decision.mv));
}

#[test]
fn test_shortest_path_matches_manhattan_on_empty_boards() {
    let mut rng = rand::rng();

    for _ in 0..200 {
        let width = rng.random_range(1..=19);
        let height = rng.random_range(1..=19);
        let wrapped = rng.random_bool(0.5);
        let grid = Grid::from_board(&Board::new(width, height));

        let from = c(rng.random_range(0..width), rng.random_range(0..height));
        let to = c(rng.random_range(0..width), rng.random_range(0..height));

        let path = shortest_path(&grid, from, to, wrapped);
        let manhattan = from.manhattan(to, width, height, wrapped) as usize;
        assert_eq!(
            path.len(),
            manhattan + 1,
            "{:?} -> {:?} on {}x{} (wrapped: {})",
            from,
            to,
            width,
            height,
            wrapped
        );
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));

        let steps = distances(&grid, from, wrapped);
        assert_eq!(steps[grid.index(to).unwrap()], Some(manhattan));
    }
}

#[test]
fn test_territory_never_exceeds_free_cells() {
    let mut rng = rand::rng();

    for _ in 0..100 {
        let width = rng.random_range(2..=11);
        let height = rng.random_range(2..=11);
        let grid = Grid::from_board(&Board::new(width, height));

        let roots: Vec<Coord> = (0..rng.random_range(1..=4))
            .map(|_| c(rng.random_range(0..width), rng.random_range(0..height)))
            .collect();

        let counts = territory(&grid, &roots, rng.random_bool(0.5));
        assert_eq!(counts.len(), roots.len());
        let owned: i32 = counts.iter().sum();
        assert!(owned <= width * height - 1);
        assert!(counts.iter().all(|&n| n >= 0));
    }
}
