use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Direction, Pos};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Pos,
}

/// A uniformly random ordering of the four directions.
pub fn shuffled_directions<R: Rng + ?Sized>(rng: &mut R) -> [Direction; 4] {
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    dirs
}

/// Lets every spawner, in row-major order, drop one enemy onto a random free
/// neighbor while the population is below the cap. Returns the new positions.
pub fn spawn_enemies(session: &mut Session) -> Vec<Pos> {
    let cap = session.config.enemy_cap;
    let mut spawned = Vec::new();

    for spawner in session.grid.positions_of(Cell::Spawner) {
        if session.enemies.len() >= cap {
            break;
        }
        let dirs = shuffled_directions(&mut session.rng);
        let Some(pos) = dirs
            .into_iter()
            .map(|dir| spawner.step(dir))
            .find(|&pos| session.can_enemy_enter(pos))
        else {
            continue;
        };
        session.enemies.push(Enemy { pos });
        session.grid.place_mark(pos, Cell::Enemy);
        spawned.push(pos);
        tracing::debug!(x = pos.x, y = pos.y, population = session.enemies.len(), "enemy spawned");
    }
    spawned
}

/// Moves each enemy one step in a random free direction; boxed-in enemies stay.
/// Returns how many moved.
pub fn move_enemies(session: &mut Session) -> usize {
    let mut moved = 0;
    for index in 0..session.enemies.len() {
        let from = session.enemies[index].pos;
        let dirs = shuffled_directions(&mut session.rng);
        let Some(to) = dirs
            .into_iter()
            .map(|dir| from.step(dir))
            .find(|&pos| session.can_enemy_enter(pos))
        else {
            continue;
        };
        session.grid.clear(from);
        session.grid.place_mark(to, Cell::Enemy);
        session.enemies[index].pos = to;
        moved += 1;
    }
    moved
}
