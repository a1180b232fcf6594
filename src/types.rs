// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    pub ruleset: Ruleset,
    pub timeout: u32,
    #[serde(default)]
    pub source: String,
}

/// Ruleset name, version and the settings the engine cares about
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub settings: RulesetSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RulesetSettings {
    #[serde(default)]
    pub hazard_damage_per_turn: Option<i32>,
}

impl Ruleset {
    pub fn named(name: &str) -> Self {
        Ruleset {
            name: name.to_string(),
            ..Ruleset::default()
        }
    }
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

impl Board {
    /// Creates an empty board of the given size
    pub fn new(width: i32, height: i32) -> Self {
        Board {
            height,
            width,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        }
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    pub fn snake(&self, id: &str) -> Option<&Battlesnake> {
        self.snakes.iter().find(|s| s.id == id)
    }
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
    #[serde(default)]
    pub squad: String,
}

impl Battlesnake {
    /// Builds a snake from its body, deriving head and length
    pub fn from_body(id: &str, body: Vec<Coord>, health: i32) -> Self {
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health,
            head: body.first().copied().unwrap_or_default(),
            length: body.len() as i32,
            body,
            latency: "0".to_string(),
            shout: None,
            squad: String::new(),
        }
    }

    pub fn tail(&self) -> Option<Coord> {
        self.body.last().copied()
    }
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Manhattan distance, folded across the edges on wrapped boards
    pub fn manhattan(&self, other: Coord, width: i32, height: i32, wrapped: bool) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        if wrapped {
            dx.min(width - dx) + dy.min(height - dy)
        } else {
            dx + dy
        }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Returns all directions in neighbor resolution order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Calculates the next coordinate when moving in this direction (no wrapping)
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }

    /// The single step leading from `from` to `to`, if there is one
    pub fn between(from: Coord, to: Coord, width: i32, height: i32, wrapped: bool) -> Option<Direction> {
        Direction::all().iter().copied().find(|dir| {
            let next = dir.apply(&from);
            if wrapped && width > 0 && height > 0 {
                Coord::new(next.x.rem_euclid(width), next.y.rem_euclid(height)) == to
            } else {
                next == to
            }
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

impl GameState {
    /// Rejects snapshots the engine cannot reason about.
    /// The search assumes every check here holds.
    pub fn validate(&self) -> Result<(), String> {
        validate_board(&self.board)?;
        if self.board.snake(&self.you.id).is_none() {
            return Err(format!("Snake '{}' is not on the board", self.you.id));
        }
        Ok(())
    }
}

/// Structural checks for a board snapshot
pub fn validate_board(board: &Board) -> Result<(), String> {
    if board.width <= 0 || board.height <= 0 {
        return Err(format!(
            "Invalid board dimensions {}x{}",
            board.width, board.height
        ));
    }

    for snake in &board.snakes {
        let head = snake
            .body
            .first()
            .ok_or_else(|| format!("Snake '{}' has an empty body", snake.id))?;
        if *head != snake.head {
            return Err(format!(
                "Snake '{}' head {:?} does not match first body segment {:?}",
                snake.id, snake.head, head
            ));
        }
        if !(0..=100).contains(&snake.health) {
            return Err(format!(
                "Snake '{}' has out of range health {}",
                snake.id, snake.health
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(you: Battlesnake, board: Board) -> GameState {
        GameState {
            game: Game {
                id: "g".to_string(),
                ruleset: Ruleset::named("standard"),
                timeout: 500,
                source: String::new(),
            },
            turn: 0,
            board,
            you,
        }
    }

    #[test]
    fn test_direction_between_plain_and_wrapped() {
        let head = Coord::new(0, 0);
        assert_eq!(
            Direction::between(head, Coord::new(1, 0), 5, 5, false),
            Some(Direction::Right)
        );
        assert_eq!(Direction::between(head, Coord::new(4, 0), 5, 5, false), None);
        assert_eq!(
            Direction::between(head, Coord::new(4, 0), 5, 5, true),
            Some(Direction::Left)
        );
        assert_eq!(
            Direction::between(head, Coord::new(0, 4), 5, 5, true),
            Some(Direction::Down)
        );
        assert_eq!(Direction::between(head, head, 5, 5, true), None);
    }

    #[test]
    fn test_direction_parsing_is_case_insensitive() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("Left".parse::<Direction>(), Ok(Direction::Left));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_wrapped_manhattan_folds_edges() {
        let a = Coord::new(0, 0);
        let b = Coord::new(10, 10);
        assert_eq!(a.manhattan(b, 11, 11, false), 20);
        assert_eq!(a.manhattan(b, 11, 11, true), 2);
    }

    #[test]
    fn test_validate_rejects_mismatched_head() {
        let mut snake = Battlesnake::from_body("a", vec![Coord::new(1, 1), Coord::new(1, 0)], 90);
        snake.head = Coord::new(3, 3);
        let mut board = Board::new(5, 5);
        board.snakes.push(snake.clone());
        assert!(state_with(snake, board).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_you() {
        let snake = Battlesnake::from_body("a", vec![Coord::new(1, 1)], 90);
        let board = Board::new(5, 5);
        let err = state_with(snake, board).validate().unwrap_err();
        assert!(err.contains("not on the board"));
    }

    #[test]
    fn test_validate_accepts_well_formed_state() {
        let snake = Battlesnake::from_body("a", vec![Coord::new(1, 1), Coord::new(1, 0)], 90);
        let mut board = Board::new(5, 5);
        board.snakes.push(snake.clone());
        assert!(state_with(snake, board).validate().is_ok());
    }

    #[test]
    fn test_game_state_parses_api_payload() {
        let payload = r#"{
            "game": {"id": "g1", "ruleset": {"name": "wrapped", "version": "v1.2.3",
                     "settings": {"hazardDamagePerTurn": 14, "foodSpawnChance": 15}},
                     "timeout": 500, "source": "league"},
            "turn": 3,
            "board": {"height": 11, "width": 11, "food": [{"x": 5, "y": 5}],
                      "hazards": [],
                      "snakes": [{"id": "me", "name": "me", "health": 90,
                                  "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}],
                                  "head": {"x": 1, "y": 1}, "length": 2,
                                  "latency": "12", "shout": ""}]},
            "you": {"id": "me", "name": "me", "health": 90,
                    "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}],
                    "head": {"x": 1, "y": 1}, "length": 2, "latency": "12", "shout": ""}
        }"#;
        let state: GameState = serde_json::from_str(payload).unwrap();
        assert_eq!(state.game.ruleset.name, "wrapped");
        assert_eq!(state.game.ruleset.settings.hazard_damage_per_turn, Some(14));
        assert_eq!(state.board.food, vec![Coord::new(5, 5)]);
        assert!(state.validate().is_ok());
    }
}
