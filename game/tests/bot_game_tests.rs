use bomber::bot::BotPlayer;
use bomber::config::GameConfig;
use bomber::grid::{Cell, Pos};
use bomber::logic::{BomberGame, run_bot};
use bomber::session::{Action, Session, Status};
use engine::{GameLogic, HeadlessRunner};

#[test]
fn bot_bombs_a_wall_and_escapes_the_blast() {
    let game = BomberGame::new(&["     ", " P M ", "     "], GameConfig::default())
        .expect("map loads");
    let run = run_bot(game, 6);

    assert_eq!(
        run.actions,
        vec![
            Action::Right,
            Action::PlaceBomb,
            Action::Left,
            Action::Left,
            Action::Up,
            Action::Noop,
        ]
    );
    assert_eq!(run.score, 1);
    assert_eq!(run.health, 3);
    assert_eq!(run.bomb_requests, 1);
    assert_eq!(run.status, Status::Running);
}

#[test]
fn bot_waits_while_a_distant_bomb_is_live() {
    let mut session =
        Session::new(&["P  M      ", "        B "], GameConfig::default()).expect("map loads");
    let mut bot = BotPlayer::new(0);
    assert_eq!(bot.decide(&session.snapshot()), Action::Noop);

    // Once the bomb is gone the wall hunt resumes.
    while !session.bombs().is_empty() {
        session.tick();
    }
    assert_eq!(bot.decide(&session.snapshot()), Action::Right);
}

#[test]
fn boxed_bot_forces_a_bomb_after_stalling() {
    let game = BomberGame::new(&["CCC", "CPC", "CCC"], GameConfig::default()).expect("map loads");
    let run = run_bot(game, 5);
    assert_eq!(
        run.actions,
        vec![
            Action::Noop,
            Action::Noop,
            Action::Noop,
            Action::Noop,
            Action::PlaceBomb,
        ]
    );
}

#[test]
fn classic_bot_game_is_reproducible() {
    let config = GameConfig::default().with_seed(17);
    let first = run_bot(BomberGame::classic(config).expect("classic loads"), 200);
    let second = run_bot(BomberGame::classic(config).expect("classic loads"), 200);
    assert_eq!(first, second);
    assert!(first.frames <= 200);
    assert_eq!(first.seed, 17);
}

#[test]
fn classic_bot_game_finishes_within_the_tick_budget() {
    let game = BomberGame::classic(GameConfig::default().with_seed(3)).expect("classic loads");
    let run = run_bot(game, 10_000);
    assert!(matches!(run.status, Status::GameOver(_)));
    assert!(run.frames <= 500);
}

#[test]
fn rewinding_the_runner_replays_the_same_world() {
    let game = BomberGame::classic(GameConfig::default().with_seed(8)).expect("classic loads");
    let mut runner = HeadlessRunner::new(game);
    let mut bot = BotPlayer::new(0);
    let mut actions = Vec::new();
    let played = runner.run_policy(40, |session| {
        let action = bot.decide(&session.snapshot());
        actions.push(action);
        action
    });
    let end = runner.state().snapshot();

    let back = played.min(15);
    runner.rewind(back);
    runner.run(actions[played - back..].iter().copied());
    assert_eq!(runner.state().snapshot(), end);
}

#[test]
fn bomber_game_starts_from_a_clean_template() {
    let game = BomberGame::classic(GameConfig::default()).expect("classic loads");
    let state = game.initial_state();
    assert_eq!(state.player().pos, Pos::new(3, 4));
    assert_eq!(state.grid().count(Cell::Spawner), 2);
    assert!(state.enemies().is_empty());
    assert!(!game.is_terminal(&state));
}
