// Breadth-first shortest paths over the grid index
//
// Edges come from the neighbor resolver, so bodies that persist through the
// next turn are walls and vacating tails are walkable.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::neighbors::{adjacent, neighbors};
use crate::types::{Battlesnake, Coord};

/// Shortest path from `source` to `target`, both inclusive.
///
/// Returns `[source]` when the two coincide and an empty vector when the target
/// cannot be reached or either endpoint lies off the board.
pub fn shortest_path(grid: &Grid, source: Coord, target: Coord, wrapped: bool) -> Vec<Coord> {
    let (src_idx, dst_idx) = match (grid.index(source), grid.index(target)) {
        (Some(s), Some(t)) => (s, t),
        _ => return vec![],
    };
    if src_idx == dst_idx {
        return vec![source];
    }

    let mut parents: Vec<Option<usize>> = vec![None; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();

    visited[src_idx] = true;
    queue.push_back(src_idx);

    while let Some(current) = queue.pop_front() {
        for next in neighbors(grid, grid.coord(current), wrapped) {
            let idx = match grid.index(next) {
                Some(idx) => idx,
                None => continue,
            };
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            parents[idx] = Some(current);

            if idx == dst_idx {
                return rebuild_path(grid, &parents, dst_idx);
            }
            queue.push_back(idx);
        }
    }

    vec![]
}

fn rebuild_path(grid: &Grid, parents: &[Option<usize>], target: usize) -> Vec<Coord> {
    let mut path = vec![grid.coord(target)];
    let mut cursor = target;
    while let Some(parent) = parents[cursor] {
        path.push(grid.coord(parent));
        cursor = parent;
    }
    path.reverse();
    path
}

/// Step counts from `source` to every cell, `None` where unreachable
pub fn distances(grid: &Grid, source: Coord, wrapped: bool) -> Vec<Option<usize>> {
    let mut dist = vec![None; grid.len()];
    let src_idx = match grid.index(source) {
        Some(idx) => idx,
        None => return dist,
    };

    let mut queue = VecDeque::new();
    dist[src_idx] = Some(0);
    queue.push_back(src_idx);

    while let Some(current) = queue.pop_front() {
        let step = dist[current].unwrap_or(0) + 1;
        for next in neighbors(grid, grid.coord(current), wrapped) {
            if let Some(idx) = grid.index(next) {
                if dist[idx].is_none() {
                    dist[idx] = Some(step);
                    queue.push_back(idx);
                }
            }
        }
    }

    dist
}

/// Index into `snakes` of the snake whose head is nearest to `from` by path distance.
///
/// Heads are occupied cells, so a head counts as reached one step after any of
/// its adjacent cells. Snakes that cannot be reached rank after every reachable
/// one and are ordered among themselves by Manhattan distance. Ties keep the
/// earlier snake.
pub fn nearest_snake(
    grid: &Grid,
    from: Coord,
    snakes: &[&Battlesnake],
    wrapped: bool,
) -> Option<usize> {
    let dist = distances(grid, from, wrapped);

    let rank = |snake: &Battlesnake| -> (bool, usize) {
        if snake.head == from {
            return (false, 0);
        }
        let by_path = adjacent(snake.head, grid.width(), grid.height(), wrapped)
            .filter_map(|cell| grid.index(cell).and_then(|idx| dist[idx]))
            .min()
            .map(|steps| steps + 1);
        match by_path {
            Some(steps) => (false, steps),
            None => {
                let manhattan = from.manhattan(snake.head, grid.width(), grid.height(), wrapped);
                (true, manhattan.max(0) as usize)
            }
        }
    };

    snakes
        .iter()
        .enumerate()
        .min_by_key(|(idx, snake)| (rank(**snake), *idx))
        .map(|(idx, _)| idx)
}
