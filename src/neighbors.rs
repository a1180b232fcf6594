// Board topology and neighbor resolution
//
// Neighbors are always produced in up, right, down, left order; the search and
// the pathfinder rely on it for deterministic tie-breaking.

use crate::grid::Grid;
use crate::types::{Coord, Direction};

/// Maps a coordinate onto a toroidal board
pub fn wrap(coord: Coord, width: i32, height: i32) -> Coord {
    if width <= 0 || height <= 0 {
        return coord;
    }
    Coord::new(coord.x.rem_euclid(width), coord.y.rem_euclid(height))
}

/// Adjacent cells that exist on the board, ignoring occupancy
pub fn adjacent(
    coord: Coord,
    width: i32,
    height: i32,
    wrapped: bool,
) -> impl Iterator<Item = Coord> {
    Direction::all().to_vec().into_iter().filter_map(move |dir| {
        let next = dir.apply(&coord);
        if wrapped {
            Some(wrap(next, width, height))
        } else if next.x >= 0 && next.x < width && next.y >= 0 && next.y < height {
            Some(next)
        } else {
            None
        }
    })
}

/// Cells a head at `coord` may legally enter: free cells and tails that will move away
pub fn neighbors<'a>(grid: &'a Grid, coord: Coord, wrapped: bool) -> impl Iterator<Item = Coord> + 'a {
    let wrapped = wrapped && !grid.is_empty();
    adjacent(coord, grid.width(), grid.height(), wrapped).filter(move |&next| grid.is_passable(next))
}
