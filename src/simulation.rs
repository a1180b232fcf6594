// Turn resolution engine
//
// SimState owns a board snapshot plus the moves queued for the coming turn.
// Resolving a turn never touches the input state; it returns a fresh state
// with a rebuilt grid.

use log::trace;

use crate::config::GameRulesConfig;
use crate::grid::Grid;
use crate::rules::Rules;
use crate::types::{Battlesnake, Board, Coord, GameState};

/// A move queued for one snake, applied on the next resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub snake_id: String,
    pub target: Coord,
}

/// Board, rules and queued moves for one node of the game tree
#[derive(Debug, Clone)]
pub struct SimState {
    board: Board,
    rules: Rules,
    turn: i32,
    you_id: String,
    pending: Vec<PendingMove>,
    grid: Grid,
    /// Food our snake has eaten since the root of the search
    eaten: u32,
}

impl SimState {
    pub fn new(board: Board, rules: Rules, turn: i32, you_id: &str) -> Self {
        let grid = Grid::from_board(&board);
        SimState {
            board,
            rules,
            turn,
            you_id: you_id.to_string(),
            pending: Vec::new(),
            grid,
            eaten: 0,
        }
    }

    /// Builds the root state of a search from an API snapshot
    pub fn from_game_state(state: &GameState, config: &GameRulesConfig) -> Self {
        let rules = Rules::from_ruleset(&state.game.ruleset, config);
        Self::new(state.board.clone(), rules, state.turn, &state.you.id)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn turn(&self) -> i32 {
        self.turn
    }

    pub fn you_id(&self) -> &str {
        &self.you_id
    }

    pub fn is_wrapped(&self) -> bool {
        self.rules.is_wrapped()
    }

    pub fn eaten(&self) -> u32 {
        self.eaten
    }

    pub fn pending_moves(&self) -> &[PendingMove] {
        &self.pending
    }

    /// Our snake, if it is still alive
    pub fn you(&self) -> Option<&Battlesnake> {
        self.board.snake(&self.you_id)
    }

    /// Every living snake except ours, in board order
    pub fn opponents(&self) -> impl Iterator<Item = &Battlesnake> + '_ {
        let you_id = self.you_id.as_str();
        self.board.snakes.iter().filter(move |s| s.id != you_id)
    }

    /// Queues a move for `snake_id`, replacing any move already queued for it
    pub fn add_move(&mut self, snake_id: &str, target: Coord) {
        match self.pending.iter_mut().find(|m| m.snake_id == snake_id) {
            Some(existing) => existing.target = target,
            None => self.pending.push(PendingMove {
                snake_id: snake_id.to_string(),
                target,
            }),
        }
    }

    /// Resolves the queued moves into the next state
    pub fn resolve(&self) -> SimState {
        resolve_turn(self)
    }

    /// One survivor outside solo, or nobody left
    pub fn is_game_over(&self) -> bool {
        match self.board.snakes.len() {
            0 => true,
            1 => self.rules.last_survivor_wins(),
            _ => false,
        }
    }

    pub fn is_win(&self) -> bool {
        self.rules.last_survivor_wins()
            && self.board.snakes.len() == 1
            && self.board.snakes[0].id == self.you_id
    }

    pub fn is_loss(&self) -> bool {
        self.you().is_none()
    }
}

/// Applies one full turn: movement, decay, feeding, eliminations.
pub fn resolve_turn(state: &SimState) -> SimState {
    let rules = state.rules;
    let mut board = state.board.clone();

    for snake in board.snakes.iter_mut() {
        if let Some(pending) = state.pending.iter().find(|m| m.snake_id == snake.id) {
            snake.body.insert(0, pending.target);
            snake.head = pending.target;
        }
    }

    let hazards = &board.hazards;
    for snake in board.snakes.iter_mut() {
        snake.health -= rules.turn_damage;
        if hazards.contains(&snake.head) {
            snake.health -= rules.hazard_damage;
        }
        if snake.body.len() > 1 {
            snake.body.pop();
        }
    }

    let mut eaten = Vec::new();
    let mut you_ate = false;
    let food = &board.food;
    for snake in board.snakes.iter_mut() {
        if food.contains(&snake.head) {
            snake.health = rules.max_health;
            if let Some(tail) = snake.tail() {
                snake.body.push(tail);
            }
            eaten.push(snake.head);
            you_ate |= snake.id == state.you_id;
        }
    }
    board.food.retain(|f| !eaten.contains(f));

    let survivors = eliminate(&board, &rules);
    let mut index = 0;
    board.snakes.retain(|snake| {
        let keep = survivors[index];
        index += 1;
        if !keep {
            trace!("Turn {}: {} eliminated", state.turn + 1, snake.id);
        }
        keep
    });

    for snake in board.snakes.iter_mut() {
        snake.length = snake.body.len() as i32;
    }

    let mut next = SimState::new(board, rules, state.turn + 1, &state.you_id);
    next.eaten = state.eaten + u32::from(you_ate);
    next
}

/// Survival flag per snake, in board order
fn eliminate(board: &Board, rules: &Rules) -> Vec<bool> {
    let wrapped = rules.is_wrapped();

    let mut alive: Vec<bool> = board
        .snakes
        .iter()
        .enumerate()
        .map(|(idx, snake)| {
            if snake.health <= 0 {
                return false;
            }
            if !wrapped && !snake.body.iter().all(|&c| board.in_bounds(c)) {
                return false;
            }
            if snake.body.iter().skip(1).any(|&c| c == snake.head) {
                return false;
            }
            // Snakes already eliminated this turn still block
            !board
                .snakes
                .iter()
                .enumerate()
                .any(|(other, o)| other != idx && o.body.iter().skip(1).any(|&c| c == snake.head))
        })
        .collect();

    let contenders: Vec<usize> = (0..board.snakes.len()).filter(|&i| alive[i]).collect();
    for &i in &contenders {
        let snake = &board.snakes[i];
        let beats_all = contenders
            .iter()
            .filter(|&&j| j != i && board.snakes[j].head == snake.head)
            .all(|&j| snake.body.len() > board.snakes[j].body.len());
        if !beats_all {
            alive[i] = false;
        }
    }

    alive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Ruleset;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn state(size: i32, food: Vec<Coord>, snakes: Vec<Battlesnake>, hazards: Vec<Coord>) -> SimState {
        let mut board = Board::new(size, size);
        board.food = food;
        board.hazards = hazards;
        let you = snakes[0].id.clone();
        board.snakes = snakes;
        let rules = Rules::standard(&Config::default_hardcoded().game_rules);
        SimState::new(board, rules, 0, &you)
    }

    fn snake(id: &str, body: Vec<Coord>) -> Battlesnake {
        Battlesnake::from_body(id, body, 100)
    }

    #[test]
    fn test_snake_moves_without_growing() {
        let mut gs = state(3, vec![], vec![snake("s", vec![c(0, 0), c(0, 1), c(0, 2)])], vec![]);
        gs.add_move("s", c(1, 0));
        let ns = gs.resolve();

        let s = ns.you().unwrap();
        assert_eq!(s.health, 99);
        assert_eq!(s.head, c(1, 0));
        assert_eq!(s.body, vec![c(1, 0), c(0, 0), c(0, 1)]);
        assert_eq!(ns.turn(), 1);
        assert!(ns.pending_moves().is_empty());
    }

    #[test]
    fn test_resolution_leaves_input_untouched() {
        let mut gs = state(3, vec![], vec![snake("s", vec![c(0, 0), c(0, 1), c(0, 2)])], vec![]);
        gs.add_move("s", c(1, 0));
        let _ = gs.resolve();

        assert_eq!(gs.you().unwrap().health, 100);
        assert_eq!(gs.you().unwrap().head, c(0, 0));
        assert_eq!(gs.pending_moves().len(), 1);
    }

    #[test]
    fn test_snake_eats_and_grows() {
        let mut gs = state(
            3,
            vec![c(1, 0)],
            vec![snake("s", vec![c(0, 0), c(0, 1), c(0, 2)])],
            vec![],
        );
        if let Some(s) = gs.board.snakes.get_mut(0) {
            s.health = 40;
        }
        gs.add_move("s", c(1, 0));
        let ns = gs.resolve();

        let s = ns.you().unwrap();
        assert_eq!(s.health, 100);
        assert_eq!(s.body, vec![c(1, 0), c(0, 0), c(0, 1), c(0, 1)]);
        assert_eq!(s.length, 4);
        assert!(ns.board().food.is_empty());
    }

    #[test]
    fn test_food_eaten_by_us_is_counted_along_the_line() {
        let mut gs = state(
            5,
            vec![c(1, 0), c(4, 4)],
            vec![
                snake("me", vec![c(0, 0), c(0, 1), c(0, 2)]),
                snake("other", vec![c(4, 3), c(3, 3), c(2, 3)]),
            ],
            vec![],
        );
        assert_eq!(gs.eaten(), 0);

        gs.add_move("me", c(1, 0));
        gs.add_move("other", c(4, 4));
        let ns = gs.resolve();
        assert_eq!(ns.eaten(), 1);
        assert!(ns.board().food.is_empty());

        let mut later = ns.clone();
        later.add_move("me", c(2, 0));
        later.add_move("other", c(3, 4));
        assert_eq!(later.resolve().eaten(), 1);
    }

    #[test]
    fn test_two_snakes_share_one_food() {
        let mut gs = state(
            5,
            vec![c(2, 2), c(4, 4)],
            vec![
                snake("a", vec![c(1, 2), c(0, 2), c(0, 1)]),
                snake("b", vec![c(2, 3), c(2, 4), c(1, 4)]),
            ],
            vec![],
        );
        gs.add_move("a", c(2, 2));
        gs.add_move("b", c(2, 2));
        let ns = gs.resolve();

        // Equal lengths collide head to head, but the food is gone either way
        assert!(ns.board().snakes.is_empty());
        assert_eq!(ns.board().food, vec![c(4, 4)]);
    }

    #[test]
    fn test_self_collision_eliminates() {
        let mut gs = state(
            3,
            vec![],
            vec![snake("s", vec![c(1, 0), c(0, 0), c(0, 1), c(1, 1), c(2, 1)])],
            vec![],
        );
        gs.add_move("s", c(1, 1));
        let ns = gs.resolve();
        assert!(ns.board().snakes.is_empty());
        assert!(ns.is_loss());
        assert!(ns.is_game_over());
    }

    #[test]
    fn test_out_of_bounds_eliminates() {
        let mut gs = state(3, vec![], vec![snake("s", vec![c(2, 0), c(1, 0), c(0, 0)])], vec![]);
        gs.add_move("s", c(3, 0));
        assert!(gs.resolve().board().snakes.is_empty());
    }

    #[test]
    fn test_wrapped_board_never_eliminates_for_bounds() {
        let mut gs = state(3, vec![], vec![snake("s", vec![c(2, 0), c(1, 0), c(0, 0)])], vec![]);
        gs.rules = Rules::from_ruleset(
            &Ruleset::named("wrapped"),
            &Config::default_hardcoded().game_rules,
        );
        gs.add_move("s", c(0, 0));
        let ns = gs.resolve();
        assert_eq!(ns.you().unwrap().body, vec![c(0, 0), c(2, 0), c(1, 0)]);
    }

    #[test]
    fn test_body_collision_eliminates_only_the_mover() {
        let mut gs = state(
            3,
            vec![],
            vec![
                snake("s", vec![c(2, 0), c(1, 0), c(0, 0)]),
                snake("e", vec![c(1, 1), c(2, 1), c(2, 2)]),
            ],
            vec![],
        );
        gs.add_move("s", c(2, 1));
        let ns = gs.resolve();

        assert_eq!(ns.board().snakes.len(), 1);
        assert_eq!(ns.board().snakes[0].id, "e");
    }

    #[test]
    fn test_head_to_head_longer_snake_survives() {
        let mut gs = state(
            3,
            vec![],
            vec![
                snake("s", vec![c(2, 0), c(1, 0), c(0, 0)]),
                snake("e", vec![c(2, 2), c(1, 2), c(0, 2), c(0, 1)]),
            ],
            vec![],
        );
        gs.add_move("s", c(2, 1));
        gs.add_move("e", c(2, 1));
        let ns = gs.resolve();

        assert_eq!(ns.board().snakes.len(), 1);
        let e = &ns.board().snakes[0];
        assert_eq!(e.id, "e");
        assert_eq!(e.head, c(2, 1));
        assert_eq!(e.body.len(), 4);
    }

    #[test]
    fn test_head_to_head_equal_lengths_both_die() {
        let mut gs = state(
            3,
            vec![],
            vec![
                snake("s", vec![c(2, 0), c(1, 0), c(0, 0)]),
                snake("e", vec![c(2, 2), c(1, 2), c(0, 2)]),
            ],
            vec![],
        );
        gs.add_move("s", c(2, 1));
        gs.add_move("e", c(2, 1));
        assert!(gs.resolve().board().snakes.is_empty());
    }

    #[test]
    fn test_hazard_damage_stacks_with_turn_damage() {
        let mut gs = state(
            3,
            vec![],
            vec![snake("s", vec![c(2, 0), c(1, 0), c(0, 0)])],
            vec![c(2, 1)],
        );
        gs.add_move("s", c(2, 1));
        assert_eq!(gs.resolve().you().unwrap().health, 85);
    }

    #[test]
    fn test_starvation_eliminates() {
        let mut gs = state(3, vec![], vec![snake("s", vec![c(0, 0), c(0, 1)])], vec![]);
        if let Some(s) = gs.board.snakes.get_mut(0) {
            s.health = 1;
        }
        gs.add_move("s", c(1, 0));
        assert!(gs.resolve().is_loss());
    }

    #[test]
    fn test_later_move_replaces_earlier() {
        let mut gs = state(3, vec![], vec![snake("s", vec![c(1, 1), c(1, 0)])], vec![]);
        gs.add_move("s", c(0, 1));
        gs.add_move("s", c(2, 1));
        assert_eq!(gs.pending_moves().len(), 1);
        assert_eq!(gs.resolve().you().unwrap().head, c(2, 1));
    }

    #[test]
    fn test_crowded_board_resolves() {
        let mut s = snake("s", vec![c(5, 4), c(5, 3), c(5, 2)]);
        s.health = 98;
        let mut s2 = snake("s2", vec![c(0, 9), c(0, 10), c(1, 10), c(1, 9)]);
        s2.health = 10;
        let mut s3 = snake("s3", vec![c(5, 6), c(5, 7), c(5, 8)]);
        s3.health = 10;
        let mut gs = state(
            11,
            vec![c(6, 0), c(4, 10), c(5, 5), c(2, 9)],
            vec![s, s2, s3],
            vec![],
        );
        gs.add_move("s", c(5, 6));
        gs.add_move("s2", c(4, 7));
        gs.add_move("s3", c(3, 9));
        let ns = gs.resolve();

        assert_eq!(ns.board().snakes.len(), 2);
        assert!(ns.is_loss());
    }

    #[test]
    fn test_win_and_game_over_predicates() {
        let mut gs = state(
            5,
            vec![],
            vec![
                snake("me", vec![c(4, 4), c(4, 3), c(4, 2)]),
                snake("them", vec![c(0, 0), c(1, 0)]),
            ],
            vec![],
        );
        assert!(!gs.is_game_over());
        gs.add_move("me", c(3, 4));
        gs.add_move("them", c(0, -1));
        let ns = gs.resolve();

        assert!(ns.is_win());
        assert!(ns.is_game_over());
        assert!(!ns.is_loss());
    }

    #[test]
    fn test_solo_survivor_is_not_a_win() {
        let mut gs = state(5, vec![], vec![snake("me", vec![c(2, 2), c(2, 1)])], vec![]);
        gs.rules = Rules::from_ruleset(&Ruleset::named("solo"), &Config::default_hardcoded().game_rules);
        assert!(!gs.is_game_over());
        assert!(!gs.is_win());
        assert!(!gs.is_loss());
    }

    #[test]
    fn test_opponents_exclude_us() {
        let gs = state(
            5,
            vec![],
            vec![
                snake("me", vec![c(4, 4)]),
                snake("a", vec![c(0, 0)]),
                snake("b", vec![c(2, 2)]),
            ],
            vec![],
        );
        let ids: Vec<&str> = gs.opponents().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
