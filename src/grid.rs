// Grid index: per-cell facts derived from a board snapshot
//
// A grid is a pure function of its board and is rebuilt after every simulated
// turn, never edited in place.

use crate::types::{Board, Coord};

/// Cached facts about one board cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    /// Any body segment rests here
    pub occupied: bool,
    /// Last segment of some snake
    pub tail: bool,
    /// A tail that will move away this turn: its snake did not just eat and
    /// nothing else shares the cell
    pub vacates: bool,
    pub food: bool,
    pub hazard: bool,
    /// Index into `board.snakes` of the first snake found on this cell
    pub owner: Option<usize>,
}

impl Cell {
    /// Whether a head may enter this cell this turn
    pub fn is_passable(&self) -> bool {
        !self.occupied || self.vacates
    }
}

/// Dense row-major grid mirroring the board dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn from_board(board: &Board) -> Self {
        let width = board.width.max(0);
        let height = board.height.max(0);
        let mut grid = Grid {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        };
        let mut segments = vec![0u16; grid.cells.len()];

        for (owner, snake) in board.snakes.iter().enumerate() {
            for &segment in &snake.body {
                if let Some(idx) = grid.index(segment) {
                    let cell = &mut grid.cells[idx];
                    cell.occupied = true;
                    if cell.owner.is_none() {
                        cell.owner = Some(owner);
                    }
                    segments[idx] = segments[idx].saturating_add(1);
                }
            }
        }

        for snake in &board.snakes {
            let tail = match snake.body.last() {
                Some(&tail) => tail,
                None => continue,
            };
            if let Some(idx) = grid.index(tail) {
                let cell = &mut grid.cells[idx];
                cell.tail = true;
                if !just_ate(&snake.body) && segments[idx] == 1 {
                    cell.vacates = true;
                }
            }
        }

        for &food in &board.food {
            if let Some(idx) = grid.index(food) {
                grid.cells[idx].food = true;
            }
        }
        for &hazard in &board.hazards {
            if let Some(idx) = grid.index(hazard) {
                grid.cells[idx].hazard = true;
            }
        }

        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Row-major index of an in-bounds coordinate
    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    pub fn coord(&self, index: usize) -> Coord {
        let index = index as i32;
        Coord::new(index % self.width, index / self.width)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    pub fn is_passable(&self, coord: Coord) -> bool {
        self.cell(coord).map_or(false, Cell::is_passable)
    }
}

/// A snake that ate last turn carries a duplicated tail segment
pub fn just_ate(body: &[Coord]) -> bool {
    match body {
        [.., a, b] => a == b,
        _ => false,
    }
}
