// Position evaluator
//
// Scores are from our snake's point of view; higher is better. Terminal
// outcomes map to the infinities so no heuristic term can outweigh them.

use log::trace;

use crate::config::ScoresConfig;
use crate::grid::just_ate;
use crate::neighbors::neighbors;
use crate::pathfinding::shortest_path;
use crate::simulation::SimState;
use crate::territory::territory;
use crate::types::Coord;

pub struct Evaluator {
    weights: ScoresConfig,
}

impl Evaluator {
    pub fn new(weights: &ScoresConfig) -> Self {
        Evaluator {
            weights: weights.clone(),
        }
    }

    /// Static evaluation of a resolved state
    pub fn score_state(&self, state: &SimState) -> f64 {
        let you = match state.you() {
            Some(you) => you,
            None => return f64::NEG_INFINITY,
        };
        if state.is_win() {
            return f64::INFINITY;
        }

        let opponents = state.opponents().count().max(1) as f64;
        let mut total = self.weights.opponent_weight / opponents;

        total += self.food_score(state);
        total += self.weights.eaten_food_weight * state.eaten() as f64;
        total += self.weights.territory_weight * self.territory_score(state) as f64;

        let on_hazard = state.grid().cell(you.head).map_or(false, |cell| cell.hazard);
        if on_hazard {
            total -= self.weights.hazard_penalty / you.health.max(1) as f64;
        }

        total
    }

    /// Urgency of every reachable food item still on the board, sharper at low health
    fn food_score(&self, state: &SimState) -> f64 {
        let you = match state.you() {
            Some(you) => you,
            None => return 0.0,
        };
        let grid = state.grid();
        let hazard_damage = state.rules().hazard_damage as f64;
        let health = you.health as f64;

        state
            .board()
            .food
            .iter()
            .map(|&food| shortest_path(grid, you.head, food, state.is_wrapped()))
            .filter(|path| !path.is_empty())
            .map(|path| {
                let hazards = path
                    .iter()
                    .filter(|&&c| grid.cell(c).map_or(false, |cell| cell.hazard))
                    .count();
                let cost = if hazards > 0 {
                    hazards as f64 * hazard_damage + 1.0
                } else {
                    1.0
                };
                let len = path.len() as f64;
                self.weights.food_weight * (health - len * cost / self.weights.food_softness).atan()
            })
            .sum()
    }

    /// Cells we reach strictly before every opponent
    fn territory_score(&self, state: &SimState) -> i32 {
        let you = match state.you() {
            Some(you) => you,
            None => return 0,
        };
        let mut roots = vec![you.head];
        roots.extend(state.opponents().map(|s| s.head));
        territory(state.grid(), &roots, state.is_wrapped())
            .first()
            .copied()
            .unwrap_or(0)
    }

    /// One-ply threat check for moving our head into `target`, evaluated on the
    /// state before the turn resolves.
    ///
    /// Negative results are meant to override the branch score.
    pub fn score_move(&self, state: &SimState, target: Coord) -> f64 {
        let you = match state.you() {
            Some(you) => you,
            None => return f64::NEG_INFINITY,
        };
        let grid = state.grid();

        let fed_tail = grid.cell(target).map_or(false, |cell| cell.tail)
            && state
                .board()
                .snakes
                .iter()
                .any(|s| s.tail() == Some(target) && just_ate(&s.body));
        if fed_tail {
            trace!("({}, {}) is the tail of a snake that just ate", target.x, target.y);
            return f64::NEG_INFINITY;
        }

        let mut total = 0.0;
        for opponent in state.opponents() {
            let contested = neighbors(grid, opponent.head, state.is_wrapped()).any(|c| c == target);
            if !contested {
                continue;
            }
            if opponent.body.len() >= you.body.len() {
                trace!(
                    "({}, {}) reachable by {} (length {} vs {})",
                    target.x,
                    target.y,
                    opponent.id,
                    opponent.body.len(),
                    you.body.len()
                );
                total += self.weights.threat_penalty;
            } else {
                total += self.weights.kill_bonus;
            }
        }
        total
    }
}
