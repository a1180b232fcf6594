// Adversarial search: minimax with alpha-beta pruning and iterative deepening
//
// Our snake is the maximizing player. The minimizing ply searches only the
// opponent nearest to our move; every other opponent takes its first legal
// move. Every branch works on its own clone of the simulation state.

use log::{debug, trace};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::evaluation::Evaluator;
use crate::neighbors::{adjacent, neighbors};
use crate::pathfinding::nearest_snake;
use crate::simulation::SimState;
use crate::types::{Battlesnake, Coord};

/// Result of one minimax call
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Cell our head moves into
    pub mv: Coord,
    pub score: f64,
    /// State after queueing `mv`, before the turn resolves
    pub state: SimState,
}

/// Outcome of an iterative deepening run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub mv: Coord,
    pub score: f64,
    /// Deepest fully completed iteration
    pub depth: u8,
    pub nodes: u64,
}

pub struct Searcher {
    evaluator: Evaluator,
    initial_depth: u8,
    max_depth: u8,
    deadline: Option<Instant>,
    nodes: u64,
    cutoffs: u64,
}

impl Searcher {
    pub fn new(config: &Config) -> Self {
        Searcher {
            evaluator: Evaluator::new(&config.scores),
            initial_depth: config.timing.initial_depth.max(1),
            max_depth: config.timing.max_search_depth.max(1),
            deadline: None,
            nodes: 0,
            cutoffs: 0,
        }
    }

    /// Nodes visited since the last `decide` started
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn expired(&self) -> bool {
        self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// Minimax over `depth` plies.
    ///
    /// Returns `None` only when a deadline is armed and has passed; the caller
    /// must then discard the whole iteration.
    pub fn minimax(
        &mut self,
        state: &SimState,
        mv: Coord,
        depth: u8,
        alpha: f64,
        beta: f64,
        maximizing: bool,
    ) -> Option<SearchNode> {
        if self.expired() {
            return None;
        }
        self.nodes += 1;

        if depth == 0 || state.is_game_over() || state.is_loss() {
            return Some(SearchNode {
                mv,
                score: self.evaluator.score_state(state),
                state: state.clone(),
            });
        }

        if maximizing {
            self.max_ply(state, mv, depth, alpha, beta)
        } else {
            self.min_ply(state, mv, depth, alpha, beta)
        }
    }

    fn max_ply(
        &mut self,
        state: &SimState,
        mv: Coord,
        depth: u8,
        mut alpha: f64,
        beta: f64,
    ) -> Option<SearchNode> {
        let (you_id, head) = match state.you() {
            Some(you) => (you.id.clone(), you.head),
            None => {
                return Some(SearchNode {
                    mv,
                    score: f64::NEG_INFINITY,
                    state: state.clone(),
                })
            }
        };

        let moves: Vec<Coord> = neighbors(state.grid(), head, state.is_wrapped()).collect();
        if moves.is_empty() {
            trace!("depth {}: no legal move from ({}, {})", depth, head.x, head.y);
            return Some(SearchNode {
                mv: head,
                score: f64::NEG_INFINITY,
                state: state.clone(),
            });
        }

        let mut best: Option<SearchNode> = None;
        for target in moves {
            let mut child = state.clone();
            child.add_move(&you_id, target);

            let move_score = self.evaluator.score_move(&child, target);
            let reply = self.minimax(&child, target, depth - 1, alpha, beta, false)?;
            let score = if move_score < 0.0 {
                reply.score.min(move_score)
            } else {
                reply.score + move_score
            };
            trace!(
                "depth {}: ({}, {}) scored {} (move score {})",
                depth,
                target.x,
                target.y,
                score,
                move_score
            );

            let improves = best.as_ref().map_or(true, |b| score > b.score);
            if improves {
                best = Some(SearchNode {
                    mv: target,
                    score,
                    state: child,
                });
            }

            let value = best.as_ref().map_or(f64::NEG_INFINITY, |b| b.score);
            if value >= beta {
                self.cutoffs += 1;
                break;
            }
            alpha = alpha.max(value);
        }

        best
    }

    fn min_ply(
        &mut self,
        state: &SimState,
        mv: Coord,
        depth: u8,
        alpha: f64,
        mut beta: f64,
    ) -> Option<SearchNode> {
        let wrapped = state.is_wrapped();
        let opponents: Vec<&Battlesnake> = state.opponents().collect();

        let adversary = match nearest_snake(state.grid(), mv, &opponents, wrapped) {
            Some(idx) => opponents[idx],
            None => {
                // Solo: nobody to play against, just let the clock run
                let next = state.resolve();
                let reply = self.minimax(&next, mv, depth - 1, alpha, beta, true)?;
                return Some(SearchNode {
                    mv,
                    score: reply.score,
                    state: state.clone(),
                });
            }
        };

        let bystanders: Vec<(String, Coord)> = opponents
            .iter()
            .filter(|s| s.id != adversary.id)
            .map(|s| (s.id.clone(), first_move(state, s)))
            .collect();

        let mut replies: Vec<Coord> = neighbors(state.grid(), adversary.head, wrapped).collect();
        if replies.is_empty() {
            replies.push(forced_move(state, adversary));
        }
        let adversary_id = adversary.id.clone();

        let mut value = f64::INFINITY;
        for target in replies {
            let mut child = state.clone();
            child.add_move(&adversary_id, target);
            for (id, other) in &bystanders {
                child.add_move(id, *other);
            }

            let next = child.resolve();
            let reply = self.minimax(&next, mv, depth - 1, alpha, beta, true)?;
            if reply.score < value {
                value = reply.score;
            }
            if value <= alpha {
                self.cutoffs += 1;
                break;
            }
            beta = beta.min(value);
        }

        Some(SearchNode {
            mv,
            score: value,
            state: state.clone(),
        })
    }

    /// One full-window search from the root.
    ///
    /// A finished game still expands our moves so the reply is a real step.
    fn search_root(&mut self, state: &SimState, head: Coord, depth: u8) -> Option<SearchNode> {
        if depth == 0 || state.is_loss() || !state.is_game_over() {
            return self.minimax(state, head, depth, f64::NEG_INFINITY, f64::INFINITY, true);
        }
        if self.expired() {
            return None;
        }
        self.nodes += 1;
        self.max_ply(state, head, depth, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Iterative deepening within `budget`.
    ///
    /// The first iteration always completes. Deeper iterations stop at the
    /// deadline and an unfinished one is thrown away.
    pub fn decide(&mut self, state: &SimState, budget: Duration) -> Decision {
        let start = Instant::now();
        self.nodes = 0;
        self.cutoffs = 0;
        self.deadline = None;

        let head = state.you().map(|you| you.head).unwrap_or_default();
        let mut depth = self.initial_depth;

        let mut decision = match self.search_root(state, head, depth) {
            Some(node) => Decision {
                mv: node.mv,
                score: node.score,
                depth,
                nodes: self.nodes,
            },
            None => Decision {
                mv: head,
                score: f64::NEG_INFINITY,
                depth: 0,
                nodes: self.nodes,
            },
        };
        debug!(
            "Depth {} complete: ({}, {}) score {} ({} nodes, {} cutoffs, {}ms)",
            depth,
            decision.mv.x,
            decision.mv.y,
            decision.score,
            self.nodes,
            self.cutoffs,
            start.elapsed().as_millis()
        );

        self.deadline = Some(start + budget);
        while depth < self.max_depth && decision.score != f64::INFINITY && !self.expired() {
            depth += 1;
            match self.search_root(state, head, depth) {
                Some(node) => {
                    decision = Decision {
                        mv: node.mv,
                        score: node.score,
                        depth,
                        nodes: self.nodes,
                    };
                    debug!(
                        "Depth {} complete: ({}, {}) score {} ({} nodes, {} cutoffs, {}ms)",
                        depth,
                        decision.mv.x,
                        decision.mv.y,
                        decision.score,
                        self.nodes,
                        self.cutoffs,
                        start.elapsed().as_millis()
                    );
                }
                None => {
                    debug!("Depth {} abandoned at deadline", depth);
                    break;
                }
            }
        }
        self.deadline = None;

        decision.nodes = self.nodes;
        decision
    }
}

/// Naive policy for opponents that are not searched
fn first_move(state: &SimState, snake: &Battlesnake) -> Coord {
    neighbors(state.grid(), snake.head, state.is_wrapped())
        .next()
        .unwrap_or_else(|| forced_move(state, snake))
}

/// A trapped snake still has to move; it takes the first adjacent cell and
/// dies in resolution
fn forced_move(state: &SimState, snake: &Battlesnake) -> Coord {
    let grid = state.grid();
    adjacent(snake.head, grid.width(), grid.height(), state.is_wrapped())
        .next()
        .unwrap_or(snake.head)
}
