// Territory estimation by simultaneous flood fill
//
// Every root expands one ring per step. A cell belongs to the root that reaches
// it strictly first; cells reached at the same distance by different owners are
// contested and count for nobody.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::neighbors::neighbors;
use crate::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unseen,
    Owned(usize),
    Contested,
}

/// Cells owned by each root, indexed like `roots`. Root cells themselves are not counted.
pub fn territory(grid: &Grid, roots: &[Coord], wrapped: bool) -> Vec<i32> {
    let mut counts = vec![0; roots.len()];
    let mut labels = vec![Label::Unseen; grid.len()];
    let mut dist = vec![0usize; grid.len()];
    let mut queue = VecDeque::new();

    for (owner, &root) in roots.iter().enumerate() {
        let idx = match grid.index(root) {
            Some(idx) => idx,
            None => continue,
        };
        match labels[idx] {
            Label::Unseen => {
                labels[idx] = Label::Owned(owner);
                queue.push_back(idx);
            }
            Label::Owned(other) if other != owner => labels[idx] = Label::Contested,
            _ => {}
        }
    }

    while let Some(current) = queue.pop_front() {
        let label = labels[current];
        let step = dist[current] + 1;

        for next in neighbors(grid, grid.coord(current), wrapped) {
            let idx = match grid.index(next) {
                Some(idx) => idx,
                None => continue,
            };
            match labels[idx] {
                Label::Unseen => {
                    labels[idx] = label;
                    dist[idx] = step;
                    queue.push_back(idx);
                }
                seen if dist[idx] == step && seen != label => {
                    labels[idx] = Label::Contested;
                }
                _ => {}
            }
        }
    }

    for (idx, label) in labels.iter().enumerate() {
        if let Label::Owned(owner) = *label {
            if dist[idx] > 0 {
                counts[owner] += 1;
            }
        }
    }

    counts
}
