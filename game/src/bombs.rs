use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Direction, Grid, Pos};
use crate::session::{Session, WALL_SCORE};

pub type BombId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: BombId,
    pub pos: Pos,
    pub range: u32,
    pub fuse: u32,
}

impl Bomb {
    /// Burns one tick of fuse; `true` once it is spent.
    pub fn tick(&mut self) -> bool {
        self.fuse = self.fuse.saturating_sub(1);
        self.fuse == 0
    }
}

/// Outcome of one detonation, including every bomb it chained into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detonation {
    pub bombs: Vec<BombId>,
    pub blast: Vec<Pos>,
    pub walls_destroyed: u32,
    pub enemies_destroyed: u32,
    pub power_ups_destroyed: u32,
    pub player_hits: u32,
}

pub(crate) fn place_bomb(session: &mut Session) -> Option<BombId> {
    if session.bombs.len() >= session.max_bombs {
        return None;
    }
    let id = session.next_bomb_id;
    session.next_bomb_id += 1;
    let pos = session.player.pos;
    session.bombs.push(Bomb {
        id,
        pos,
        range: session.blast_range,
        fuse: session.config.fuse_ticks,
    });
    session.grid.place_mark(pos, Cell::Bomb);
    tracing::debug!(bomb = id, x = pos.x, y = pos.y, "bomb placed");
    Some(id)
}

/// Burns every fuse by one tick and resolves the bombs that run out, in
/// placement order. Explosion marks are cleared before returning.
pub fn tick_bombs(session: &mut Session) -> Vec<Detonation> {
    let ids: Vec<BombId> = session.bombs.iter().map(|bomb| bomb.id).collect();
    let mut in_progress = HashSet::new();
    let mut detonations = Vec::new();

    for id in ids {
        // Gone already when an earlier bomb chained into it.
        let Some(bomb) = session.bombs.iter_mut().find(|bomb| bomb.id == id) else {
            continue;
        };
        if bomb.tick() {
            let mut report = Detonation::default();
            cascade(session, id, &mut in_progress, &mut report);
            detonations.push(report);
        } else {
            let pos = bomb.pos;
            session.grid.place_mark(pos, Cell::Bomb);
        }
    }

    for report in &detonations {
        clear_explosions(&mut session.grid, &report.blast);
    }
    detonations
}

/// Detonates bomb `id` right away, fuse or not. `None` if no such bomb is live.
pub fn detonate(session: &mut Session, id: BombId) -> Option<Detonation> {
    if !session.bombs.iter().any(|bomb| bomb.id == id) {
        return None;
    }
    let mut report = Detonation::default();
    cascade(session, id, &mut HashSet::new(), &mut report);
    clear_explosions(&mut session.grid, &report.blast);
    Some(report)
}

fn cascade(
    session: &mut Session,
    id: BombId,
    in_progress: &mut HashSet<BombId>,
    report: &mut Detonation,
) {
    if !in_progress.insert(id) {
        return;
    }
    let Some(index) = session.bombs.iter().position(|bomb| bomb.id == id) else {
        return;
    };
    let bomb = session.bombs.remove(index);
    report.bombs.push(bomb.id);
    session.grid.clear(bomb.pos);
    tracing::debug!(bomb = bomb.id, x = bomb.pos.x, y = bomb.pos.y, "bomb detonated");

    for dir in Direction::ALL {
        for distance in 1..=bomb.range as i32 {
            let pos = bomb.pos.offset(dir, distance);
            let Some(cell) = session.grid.get(pos) else {
                break;
            };
            match cell {
                Cell::Pillar => break,
                Cell::Wall => {
                    session.grid.place_mark(pos, Cell::Explosion);
                    session.score += WALL_SCORE;
                    report.walls_destroyed += 1;
                    report.blast.push(pos);
                    break;
                }
                Cell::Enemy => {
                    let before = session.enemies.len();
                    session.enemies.retain(|enemy| enemy.pos != pos);
                    let destroyed = (before - session.enemies.len()) as u32;
                    report.enemies_destroyed += destroyed;
                    session.grid.place_mark(pos, Cell::PowerUp);
                    report.blast.push(pos);
                    tracing::debug!(x = pos.x, y = pos.y, "enemy destroyed");
                    break;
                }
                Cell::Player => {
                    session.player.health = session.player.health.saturating_sub(1);
                    report.player_hits += 1;
                    report.blast.push(pos);
                    tracing::debug!(health = session.player.health, "player caught in blast");
                    break;
                }
                Cell::PowerUp => {
                    session.grid.place_mark(pos, Cell::Explosion);
                    report.power_ups_destroyed += 1;
                    report.blast.push(pos);
                    break;
                }
                Cell::Bomb => {
                    let chained = session
                        .bombs
                        .iter()
                        .find(|other| other.pos == pos && !in_progress.contains(&other.id))
                        .map(|other| other.id);
                    if let Some(other) = chained {
                        cascade(session, other, in_progress, report);
                    }
                    session.grid.place_mark(pos, Cell::Explosion);
                    report.blast.push(pos);
                }
                // A spawner burns like open floor and is gone after clean-up.
                Cell::Empty | Cell::Explosion | Cell::Spawner => {
                    session.grid.place_mark(pos, Cell::Explosion);
                    report.blast.push(pos);
                }
            }
        }
    }
}

fn clear_explosions(grid: &mut Grid, blast: &[Pos]) {
    for &pos in blast {
        if grid.get(pos) == Some(Cell::Explosion) {
            grid.clear(pos);
        }
    }
}
