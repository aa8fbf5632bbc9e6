use std::collections::HashSet;

use crate::bombs::Bomb;
use crate::grid::{Cell, Direction, Grid, Pos};
use crate::pathfinding::find_path;
use crate::session::{Action, Snapshot};

/// Bombs this close (Manhattan) trigger a retreat.
pub const DANGER_RADIUS: u32 = 2;
/// Repeated-position decisions tolerated before forcing a bomb.
pub const STALL_LIMIT: u32 = 3;

/// Scripted opponent with a fixed priority policy:
/// retreat from nearby bombs, wait out any bomb, hunt the nearest wall,
/// and break deadlocks by bombing in place.
#[derive(Debug, Clone, Default)]
pub struct BotPlayer {
    player_index: usize,
    visited: HashSet<Pos>,
    stall_count: u32,
}

impl BotPlayer {
    pub fn new(player_index: usize) -> Self {
        Self {
            player_index,
            ..Self::default()
        }
    }

    pub fn stall_count(&self) -> u32 {
        self.stall_count
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn reset(&mut self) {
        self.visited.clear();
        self.stall_count = 0;
    }

    pub fn decide(&mut self, snapshot: &Snapshot) -> Action {
        let Some(me) = snapshot.bombers.get(self.player_index) else {
            return Action::Noop;
        };
        let pos = me.pos;
        let grid = &snapshot.grid;

        if let Some(danger) = nearest_danger(pos, &snapshot.bombs) {
            return retreat(grid, pos, danger);
        }

        // Coarse on purpose: any live bomb anywhere pauses exploration.
        if !snapshot.bombs.is_empty() {
            return Action::Noop;
        }

        if let Some((target, path)) = nearest_resource(grid, pos) {
            if pos.manhattan(target) == 1 {
                return Action::PlaceBomb;
            }
            if let Some(&first) = path.first() {
                return first.into();
            }
        }

        if self.visited.contains(&pos) {
            self.stall_count += 1;
            if self.stall_count > STALL_LIMIT {
                tracing::debug!(x = pos.x, y = pos.y, "bot stalled, forcing a bomb");
                self.reset();
                return Action::PlaceBomb;
            }
        } else {
            self.visited.insert(pos);
            self.stall_count = 0;
        }
        Action::Noop
    }
}

/// Closest bomb within `DANGER_RADIUS`; the earliest placed wins ties.
pub fn nearest_danger(pos: Pos, bombs: &[Bomb]) -> Option<Pos> {
    bombs
        .iter()
        .map(|bomb| (bomb.pos.manhattan(pos), bomb.pos))
        .filter(|&(distance, _)| distance <= DANGER_RADIUS)
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, bomb)| bomb)
}

/// The wall with the shortest route from `from`, with that route.
/// Ties go to the first wall in row-major order.
pub fn nearest_resource(grid: &Grid, from: Pos) -> Option<(Pos, Vec<Direction>)> {
    let mut best: Option<(Pos, Vec<Direction>)> = None;
    for target in grid.positions_of(Cell::Wall) {
        let Some(path) = find_path(grid, from, target) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, shortest)| path.len() < shortest.len()) {
            best = Some((target, path));
        }
    }
    best
}

/// Steps away from `danger` along the axis with the larger offset first
/// (horizontal on ties). Two-cell escapes beat one-cell escapes.
pub fn retreat(grid: &Grid, pos: Pos, danger: Pos) -> Action {
    let dx = pos.x - danger.x;
    let dy = pos.y - danger.y;
    let horizontal = away(dx, Direction::Left, Direction::Right);
    let vertical = away(dy, Direction::Up, Direction::Down);

    let candidates: Vec<Direction> = if dx.abs() >= dy.abs() {
        horizontal.into_iter().chain(vertical).collect()
    } else {
        vertical.into_iter().chain(horizontal).collect()
    };

    let far = candidates.iter().find(|&&dir| {
        grid.is_passable_for_player(pos.offset(dir, 1))
            && grid.is_passable_for_player(pos.offset(dir, 2))
    });
    if let Some(&dir) = far {
        return dir.into();
    }
    candidates
        .iter()
        .find(|&&dir| grid.is_passable_for_player(pos.step(dir)))
        .map_or(Action::Noop, |&dir| dir.into())
}

fn away(offset: i32, negative: Direction, positive: Direction) -> Vec<Direction> {
    match offset.signum() {
        1 => vec![positive],
        -1 => vec![negative],
        _ => vec![negative, positive],
    }
}
