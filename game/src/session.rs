use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::bombs::{self, Bomb, BombId, Detonation};
use crate::config::GameConfig;
use crate::enemies::{self, Enemy};
use crate::error::MapError;
use crate::grid::{Cell, Direction, Grid, Pos};

pub const WALL_SCORE: u32 = 1;
pub const PICKUP_SCORE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    PlaceBomb,
    Noop,
}

impl Action {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::PlaceBomb | Action::Noop => None,
        }
    }
}

impl From<Direction> for Action {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Action::Up,
            Direction::Down => Action::Down,
            Direction::Left => Action::Left,
            Direction::Right => Action::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub health: u32,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    PlayerDefeated,
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Running,
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupEffect {
    ExtraHealth,
    LongerBlast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub level: u32,
    pub effect: PickupEffect,
}

/// What one turn did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u32,
    pub player_moved: bool,
    pub bomb_placed: Option<BombId>,
    pub spawned: Vec<Pos>,
    pub detonations: Vec<Detonation>,
    pub pickups: Vec<Pickup>,
    pub contact_hits: u32,
    pub status: Status,
}

impl TickReport {
    fn new(tick: u32, status: Status) -> Self {
        Self {
            tick,
            player_moved: false,
            bomb_placed: None,
            spawned: Vec::new(),
            detonations: Vec::new(),
            pickups: Vec::new(),
            contact_hits: 0,
            status,
        }
    }
}

/// Everything the decision agent is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub bombers: Vec<Player>,
    pub bombs: Vec<Bomb>,
    pub enemies: Vec<Pos>,
    pub tick: u32,
    pub ticks_remaining: u32,
    pub score: u32,
}

/// One game: the grid plus every object living on it.
///
/// Grid marks and object collections are kept in step: each enemy and bomb has
/// its mark, and the player has one unless it stands on its own bomb or on the
/// cell that bomb left behind.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) grid: Grid,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) bombs: Vec<Bomb>,
    pub(crate) next_bomb_id: BombId,
    pub(crate) score: u32,
    pub(crate) blast_range: u32,
    pub(crate) max_bombs: usize,
    pub(crate) config: GameConfig,
    pub(crate) rng: SmallRng,
    tick: u32,
    ticks_remaining: u32,
    spawn_countdown: u32,
    status: Status,
}

impl Session {
    pub fn new<S: AsRef<str>>(rows: &[S], config: GameConfig) -> Result<Self, MapError> {
        Self::with_rng(rows, config, SmallRng::seed_from_u64(config.seed))
    }

    pub fn with_rng<S: AsRef<str>>(
        rows: &[S],
        config: GameConfig,
        rng: SmallRng,
    ) -> Result<Self, MapError> {
        let config = config.sanitized();
        let mut grid = Grid::parse(rows)?;

        let player_pos = match grid.positions_of(Cell::Player).as_slice() {
            [] => return Err(MapError::MissingPlayer),
            [pos] => *pos,
            many => return Err(MapError::MultiplePlayers { count: many.len() }),
        };

        for pos in grid.positions_of(Cell::Explosion) {
            grid.clear(pos);
        }
        let enemies = grid
            .positions_of(Cell::Enemy)
            .into_iter()
            .map(|pos| Enemy { pos })
            .collect();
        let bombs: Vec<Bomb> = grid
            .positions_of(Cell::Bomb)
            .into_iter()
            .zip(0..)
            .map(|(pos, id)| Bomb {
                id,
                pos,
                range: config.starting_blast_range,
                fuse: config.fuse_ticks,
            })
            .collect();
        grid.reset_touched();

        Ok(Self {
            grid,
            player: Player {
                pos: player_pos,
                health: config.starting_health,
                level: 0,
            },
            enemies,
            next_bomb_id: bombs.len() as BombId,
            bombs,
            score: 0,
            blast_range: config.starting_blast_range,
            max_bombs: config.max_bombs,
            config,
            rng,
            tick: 0,
            ticks_remaining: config.tick_budget,
            spawn_countdown: config.spawn_period,
            status: Status::Running,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn blast_range(&self) -> u32 {
        self.blast_range
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::GameOver(_))
    }

    /// Cells written since the last `take_touched`.
    pub fn touched_cells(&self) -> &[Pos] {
        self.grid.touched()
    }

    /// Hands the pending changed cells to a presenter and starts a new batch.
    pub fn take_touched(&mut self) -> Vec<Pos> {
        let cells = self.grid.touched().to_vec();
        self.grid.reset_touched();
        cells
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            bombers: vec![self.player],
            bombs: self.bombs.clone(),
            enemies: self.enemies.iter().map(|enemy| enemy.pos).collect(),
            tick: self.tick,
            ticks_remaining: self.ticks_remaining,
            score: self.score,
        }
    }

    /// One full turn: the player's action, an immediate pickup check, then a tick.
    /// Ignored once the game is over.
    pub fn handle_input(&mut self, action: Action) -> TickReport {
        let mut report = TickReport::new(self.tick, self.status);
        if self.is_over() {
            return report;
        }

        match action {
            Action::Up | Action::Down | Action::Left | Action::Right => {
                if let Some(dir) = action.direction() {
                    report.player_moved = self.move_player(dir);
                }
            }
            Action::PlaceBomb => report.bomb_placed = self.place_bomb(),
            Action::Noop => {}
        }
        report.pickups.extend(self.resolve_pickup());

        self.advance(&mut report);
        report
    }

    /// Advances the world one tick without a player action.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::new(self.tick, self.status);
        if !self.is_over() {
            self.advance(&mut report);
        }
        report
    }

    /// Blocked moves are silently refused.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        let from = self.player.pos;
        let to = from.step(dir);
        if !self.grid.is_passable_for_player(to) {
            return false;
        }

        if self.grid.get(from) == Some(Cell::Player) {
            self.grid.clear(from);
        }
        // A power-up keeps its mark until the pickup step consumes it.
        if self.grid.get(to) != Some(Cell::PowerUp) {
            self.grid.place_mark(to, Cell::Player);
        }
        self.player.pos = to;
        true
    }

    /// Refused silently when the bomb limit is reached.
    pub fn place_bomb(&mut self) -> Option<BombId> {
        if self.is_over() {
            return None;
        }
        bombs::place_bomb(self)
    }

    pub(crate) fn can_enemy_enter(&self, pos: Pos) -> bool {
        self.grid.is_passable_for_enemy(pos) && pos != self.player.pos
    }

    fn advance(&mut self, report: &mut TickReport) {
        if self.player.health == 0 {
            self.finish(GameOverReason::PlayerDefeated);
            report.status = self.status;
            return;
        }

        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining == 0 {
            self.finish(GameOverReason::TimeUp);
            report.status = self.status;
            return;
        }

        if self.spawn_countdown > 0 {
            self.spawn_countdown -= 1;
        }
        if self.spawn_countdown == 0 {
            report.spawned = enemies::spawn_enemies(self);
            self.spawn_countdown = self.config.spawn_period;
        }

        enemies::move_enemies(self);
        report.detonations = bombs::tick_bombs(self);
        report.pickups.extend(self.resolve_pickup());
        report.contact_hits = self.resolve_contact_damage();

        self.tick += 1;
        report.tick = self.tick;
        report.status = self.status;
        tracing::trace!(
            tick = self.tick,
            remaining = self.ticks_remaining,
            score = self.score,
            "tick"
        );
    }

    fn resolve_pickup(&mut self) -> Option<Pickup> {
        let pos = self.player.pos;
        if self.grid.get(pos) != Some(Cell::PowerUp) {
            return None;
        }

        self.grid.place_mark(pos, Cell::Player);
        self.player.level += 1;
        self.score += PICKUP_SCORE;
        let effect = if self.player.level % 2 == 1 {
            self.player.health += 1;
            PickupEffect::ExtraHealth
        } else {
            self.blast_range += 1;
            PickupEffect::LongerBlast
        };
        tracing::debug!(
            level = self.player.level,
            health = self.player.health,
            blast_range = self.blast_range,
            score = self.score,
            "power-up collected"
        );
        Some(Pickup {
            level: self.player.level,
            effect,
        })
    }

    fn resolve_contact_damage(&mut self) -> u32 {
        // A blast earlier in the tick may already have finished the player.
        if self.player.health == 0 {
            return 0;
        }
        let player_pos = self.player.pos;
        let adjacent = self
            .enemies
            .iter()
            .filter(|enemy| enemy.pos.manhattan(player_pos) == 1)
            .count();

        let mut hits = 0;
        for _ in 0..adjacent {
            self.player.health = self.player.health.saturating_sub(1);
            hits += 1;
            tracing::debug!(health = self.player.health, "player caught by an enemy");
            if self.player.health == 0 {
                self.finish(GameOverReason::PlayerDefeated);
                break;
            }
        }
        hits
    }

    fn finish(&mut self, reason: GameOverReason) {
        self.status = Status::GameOver(reason);
        tracing::info!(score = self.score, tick = self.tick, ?reason, "game over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(rows: &[&str]) -> Session {
        Session::new(rows, GameConfig::default()).expect("test map should load")
    }

    #[test]
    fn construction_requires_exactly_one_player() {
        assert_eq!(
            Session::new(&["   ", " M "], GameConfig::default()).err(),
            Some(MapError::MissingPlayer)
        );
        assert_eq!(
            Session::new(&["P P"], GameConfig::default()).err(),
            Some(MapError::MultiplePlayers { count: 2 })
        );
        assert!(Session::new(&["P  "], GameConfig::default()).is_ok());
    }

    #[test]
    fn construction_adopts_map_objects() {
        let s = session(&["PF B", "X  F"]);
        assert_eq!(s.player().pos, Pos::new(0, 0));
        assert_eq!(s.enemies().len(), 2);
        assert_eq!(s.bombs().len(), 1);
        assert_eq!(s.bombs()[0].pos, Pos::new(3, 0));
        assert_eq!(s.grid().get(Pos::new(0, 1)), Some(Cell::Empty));
        assert!(s.touched_cells().is_empty());
    }

    #[test]
    fn blocked_moves_are_noops() {
        let mut s = session(&["CPM", " B "]);
        for dir in [Direction::Left, Direction::Right, Direction::Down, Direction::Up] {
            assert!(!s.move_player(dir), "{dir:?}");
        }
        assert_eq!(s.player().pos, Pos::new(1, 0));
        assert!(s.touched_cells().is_empty());
    }

    #[test]
    fn moving_transfers_the_player_mark() {
        let mut s = session(&["P  "]);
        let report = s.handle_input(Action::Right);
        assert!(report.player_moved);
        assert_eq!(s.grid().rows(), vec![" P ".to_string()]);
        assert_eq!(s.touched_cells(), &[Pos::new(0, 0), Pos::new(1, 0)]);
    }

    #[test]
    fn bomb_limit_is_enforced_silently() {
        let mut s = session(&["P  "]);
        assert_eq!(s.place_bomb(), Some(0));
        s.move_player(Direction::Right);
        assert_eq!(s.place_bomb(), None);
        assert_eq!(s.bombs().len(), 1);
        assert_eq!(s.grid().rows(), vec!["BP ".to_string()]);
    }

    #[test]
    fn tick_budget_ends_the_game() {
        let config = GameConfig {
            tick_budget: 3,
            ..GameConfig::default()
        };
        let mut s = Session::new(&["P "], config).expect("map loads");
        assert_eq!(s.tick().status, Status::Running);
        assert_eq!(s.tick().status, Status::Running);
        let report = s.tick();
        assert_eq!(report.status, Status::GameOver(GameOverReason::TimeUp));
        assert_eq!(s.ticks_remaining(), 0);
        assert_eq!(s.tick_count(), 2);

        // No further ticks are processed.
        let after = s.handle_input(Action::Right);
        assert!(!after.player_moved);
        assert_eq!(s.player().pos, Pos::new(0, 0));
        assert_eq!(s.tick_count(), 2);
    }

    #[test]
    fn enemy_contact_damages_once_per_adjacent_enemy() {
        let mut s = session(&["CFC", "FPF", "CCC"]);
        // Enemies are boxed in; none can move.
        let report = s.tick();
        assert_eq!(report.contact_hits, 3);
        assert_eq!(s.player().health, 0);
        assert_eq!(s.status(), Status::GameOver(GameOverReason::PlayerDefeated));
    }

    #[test]
    fn contact_damage_stops_at_zero_health() {
        let config = GameConfig {
            starting_health: 2,
            ..GameConfig::default()
        };
        let mut s = Session::new(&["CFC", "FPF", "CCC"], config).expect("map loads");
        let report = s.tick();
        assert_eq!(report.contact_hits, 2);
        assert_eq!(s.player().health, 0);
        assert!(s.is_over());
    }

    #[test]
    fn defeated_player_ends_the_game_on_next_tick() {
        let mut s = session(&["P  "]);
        s.player.health = 0;
        let report = s.tick();
        assert_eq!(report.status, Status::GameOver(GameOverReason::PlayerDefeated));
        assert_eq!(s.ticks_remaining(), GameConfig::default().tick_budget);
    }

    #[test]
    fn touched_cells_accumulate_until_taken() {
        let mut s = session(&["P   "]);
        s.move_player(Direction::Right);
        s.tick();
        s.handle_input(Action::Right);
        assert_eq!(
            s.take_touched(),
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
        );
        assert!(s.touched_cells().is_empty());
    }

    #[test]
    fn no_contact_hits_once_a_blast_has_emptied_health() {
        let config = GameConfig {
            starting_health: 1,
            fuse_ticks: 1,
            ..GameConfig::default()
        };
        let mut s = Session::new(&["CFC", "BPC", "CCC"], config).expect("map loads");

        let report = s.tick();
        assert_eq!(report.detonations.len(), 1);
        assert_eq!(report.detonations[0].player_hits, 1);
        assert_eq!(report.contact_hits, 0);
        assert_eq!(s.player().health, 0);

        assert_eq!(
            s.tick().status,
            Status::GameOver(GameOverReason::PlayerDefeated)
        );
    }

    #[test]
    fn snapshot_mirrors_session() {
        let mut s = session(&["P M", "  F"]);
        s.place_bomb();
        let snap = s.snapshot();
        assert_eq!(snap.bombers, vec![*s.player()]);
        assert_eq!(snap.bombs.len(), 1);
        assert_eq!(snap.enemies, vec![Pos::new(2, 1)]);
        assert_eq!(snap.grid, *s.grid());
        assert_eq!(snap.ticks_remaining, s.ticks_remaining());
    }
}
