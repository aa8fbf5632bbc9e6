use std::collections::VecDeque;

use crate::grid::{Cell, Direction, Grid, Pos};

/// Shortest four-connected route from `start` to `goal`, as a list of moves.
///
/// Everything except pillars is traversable. The goal is accepted as soon as it
/// is generated as a neighbor, so it may itself be a wall. Neighbors are expanded
/// in `Direction::ALL` order, which fixes the winner among equal-length routes.
///
/// Returns `Some(vec![])` when `start == goal` and `None` when the goal cannot be
/// reached.
pub fn find_path(grid: &Grid, start: Pos, goal: Pos) -> Option<Vec<Direction>> {
    if start == goal {
        return Some(Vec::new());
    }
    if !grid.in_bounds(start) {
        return None;
    }

    let width = grid.width();
    let index = |pos: Pos| pos.y as usize * width + pos.x as usize;

    // For every discovered cell: the cell it was reached from and the move taken.
    let mut came_from: Vec<Option<(Pos, Direction)>> = vec![None; width * grid.height()];
    let mut visited = vec![false; width * grid.height()];
    let mut queue = VecDeque::new();
    visited[index(start)] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for dir in Direction::ALL {
            let next = pos.step(dir);
            if next == goal {
                return Some(unwind(&came_from, index, start, pos, dir));
            }
            let Some(cell) = grid.get(next) else {
                continue;
            };
            if cell == Cell::Pillar || visited[index(next)] {
                continue;
            }
            visited[index(next)] = true;
            came_from[index(next)] = Some((pos, dir));
            queue.push_back(next);
        }
    }

    None
}

fn unwind(
    came_from: &[Option<(Pos, Direction)>],
    index: impl Fn(Pos) -> usize,
    start: Pos,
    last: Pos,
    final_step: Direction,
) -> Vec<Direction> {
    let mut path = vec![final_step];
    let mut pos = last;
    while pos != start {
        let Some((prev, dir)) = came_from[index(pos)] else {
            break;
        };
        path.push(dir);
        pos = prev;
    }
    path.reverse();
    path
}
