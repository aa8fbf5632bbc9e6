use bomber::bombs::detonate;
use bomber::config::GameConfig;
use bomber::grid::{Cell, Pos};
use bomber::session::{Action, GameOverReason, PickupEffect, Session, Status};

fn session(rows: &[&str], config: GameConfig) -> Session {
    Session::new(rows, config).expect("test map should load")
}

#[test]
fn bomb_destroys_adjacent_wall_after_five_ticks() {
    let mut s = session(
        &["     ", " P   ", " M   ", "     ", "     "],
        GameConfig::default(),
    );
    assert_eq!(s.place_bomb(), Some(0));
    assert_eq!(s.grid().get(Pos::new(1, 1)), Some(Cell::Bomb));

    for _ in 0..4 {
        assert!(s.tick().detonations.is_empty());
    }
    let report = s.tick();

    assert_eq!(report.detonations.len(), 1);
    assert_eq!(s.score(), 1);
    assert_eq!(s.grid().get(Pos::new(1, 2)), Some(Cell::Empty));
    assert_eq!(s.grid().get(Pos::new(1, 1)), Some(Cell::Empty));
    assert!(s.bombs().is_empty());
    // Standing on the bomb's own cell is safe.
    assert_eq!(s.player().health, 3);
    assert_eq!(s.tick_count(), 5);
}

#[test]
fn chain_reaction_scores_each_wall_once() {
    let mut s = session(
        &["P      ", "MB B M ", "       "],
        GameConfig::default(),
    );
    let report = detonate(&mut s, 0).expect("bomb exists");

    assert_eq!(report.bombs, vec![0, 1]);
    assert_eq!(report.walls_destroyed, 2);
    assert_eq!(s.score(), 2);
    assert!(s.bombs().is_empty());
    assert_eq!(s.grid().count(Cell::Wall), 0);
    assert_eq!(s.grid().count(Cell::Explosion), 0);
}

#[test]
fn chain_reaction_removes_each_enemy_once() {
    let mut s = session(&["P     ", "FB BF ", "      "], GameConfig::default());
    let report = detonate(&mut s, 0).expect("bomb exists");

    assert_eq!(report.enemies_destroyed, 2);
    assert!(s.enemies().is_empty());
    assert_eq!(s.grid().count(Cell::PowerUp), 2);
}

#[test]
fn six_pickups_alternate_health_and_range() {
    let mut s = session(&["PUUUUUU"], GameConfig::default());
    let mut effects = Vec::new();
    for _ in 0..6 {
        let report = s.handle_input(Action::Right);
        assert!(report.player_moved);
        assert_eq!(report.pickups.len(), 1);
        effects.push(report.pickups[0].effect);
    }

    assert_eq!(
        effects,
        [
            PickupEffect::ExtraHealth,
            PickupEffect::LongerBlast,
            PickupEffect::ExtraHealth,
            PickupEffect::LongerBlast,
            PickupEffect::ExtraHealth,
            PickupEffect::LongerBlast,
        ]
    );
    assert_eq!(s.player().level, 6);
    assert_eq!(s.player().health, 6);
    assert_eq!(s.blast_range(), 5);
    assert_eq!(s.score(), 18);
    assert_eq!(s.grid().rows(), vec!["      P".to_string()]);
}

#[test]
fn new_bombs_use_the_current_blast_range() {
    let mut s = session(&["PUU      "], GameConfig::default());
    s.handle_input(Action::Right);
    s.handle_input(Action::Right);
    assert_eq!(s.blast_range(), 3);

    s.place_bomb();
    assert_eq!(s.bombs()[0].range, 3);
}

#[test]
fn health_never_goes_below_zero() {
    let config = GameConfig {
        starting_health: 1,
        ..GameConfig::default()
    };
    let mut s = session(&["   ", "BBP", "   "], config);
    let report = detonate(&mut s, 0).expect("bomb exists");

    assert_eq!(report.bombs, vec![0, 1]);
    assert_eq!(report.player_hits, 2);
    assert_eq!(s.player().health, 0);

    let report = s.tick();
    assert_eq!(
        report.status,
        Status::GameOver(GameOverReason::PlayerDefeated)
    );
    assert_eq!(s.player().health, 0);
}

#[test]
fn enemies_spawn_on_the_tenth_tick() {
    let config = GameConfig::default().with_seed(7);
    let mut s = session(&["PC    ", "C     ", "  E   ", "      "], config);
    for _ in 0..9 {
        assert!(s.tick().spawned.is_empty());
    }
    let report = s.tick();
    assert_eq!(report.spawned.len(), 1);
    assert_eq!(report.spawned[0].manhattan(Pos::new(2, 2)), 1);
    assert_eq!(s.enemies().len(), 1);

    for _ in 0..9 {
        assert!(s.tick().spawned.is_empty());
    }
    assert_eq!(s.tick().spawned.len(), 1);
}

#[test]
fn enemy_population_stops_at_the_cap() {
    let config = GameConfig {
        spawn_period: 1,
        enemy_cap: 3,
        tick_budget: 100,
        ..GameConfig::default()
    };
    let mut s = session(&["PC        ", "C  E  E   ", "          "], config);
    for _ in 0..20 {
        s.tick();
        assert!(s.enemies().len() <= 3);
        assert_eq!(s.grid().count(Cell::Enemy), s.enemies().len());
        if s.is_over() {
            break;
        }
    }
    assert_eq!(s.enemies().len(), 3);
}

#[test]
fn seeded_sessions_replay_identically() {
    let rows = ["P       ", "  E     ", "     E  ", "        "];
    let config = GameConfig::default().with_seed(2024);
    let mut a = session(&rows, config);
    let mut b = session(&rows, config);
    for step in 0..60 {
        let action = if step % 7 == 0 { Action::Down } else { Action::Noop };
        let ra = a.handle_input(action);
        let rb = b.handle_input(action);
        assert_eq!(ra, rb);
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn time_up_stops_the_session() {
    let config = GameConfig {
        tick_budget: 4,
        ..GameConfig::default()
    };
    let mut s = session(&["P M"], config);
    let mut last = s.tick();
    while !s.is_over() {
        last = s.tick();
    }
    assert_eq!(last.status, Status::GameOver(GameOverReason::TimeUp));
    assert_eq!(s.ticks_remaining(), 0);

    let frozen = s.snapshot();
    s.handle_input(Action::PlaceBomb);
    s.tick();
    assert_eq!(s.snapshot(), frozen);
}

#[test]
fn bombed_spawner_stops_spawning() {
    let mut s = session(
        &["PC    ", "C     ", "  EB  ", "      "],
        GameConfig::default().with_seed(1),
    );
    for _ in 0..5 {
        s.tick();
    }
    assert_eq!(s.grid().count(Cell::Spawner), 0);
    assert_eq!(s.grid().get(Pos::new(2, 2)), Some(Cell::Empty));

    for _ in 0..10 {
        assert!(s.tick().spawned.is_empty());
    }
    assert!(s.enemies().is_empty());
}
