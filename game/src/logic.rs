use engine::{GameLogic, HeadlessRunner};
use serde::Serialize;

use crate::bot::BotPlayer;
use crate::config::GameConfig;
use crate::error::MapError;
use crate::maps;
use crate::session::{Action, Session, Status};

/// Session rules behind the engine's `GameLogic` seam. Every step clones the
/// previous session, so runners can rewind and replay.
#[derive(Debug, Clone)]
pub struct BomberGame {
    template: Session,
}

impl BomberGame {
    pub fn new<S: AsRef<str>>(rows: &[S], config: GameConfig) -> Result<Self, MapError> {
        Ok(Self {
            template: Session::new(rows, config)?,
        })
    }

    pub fn classic(config: GameConfig) -> Result<Self, MapError> {
        Self::new(&maps::CLASSIC, config)
    }

    pub fn config(&self) -> &GameConfig {
        self.template.config()
    }

    pub fn columns(&self) -> usize {
        self.template.grid().width()
    }

    pub fn rows(&self) -> usize {
        self.template.grid().height()
    }
}

impl GameLogic for BomberGame {
    type State = Session;
    type Input = Action;

    fn initial_state(&self) -> Session {
        self.template.clone()
    }

    fn step(&self, state: &Session, input: Action) -> Session {
        let mut next = state.clone();
        // Each frame carries only the cells its own turn changed.
        next.grid.reset_touched();
        next.handle_input(input);
        next
    }

    fn is_terminal(&self, state: &Session) -> bool {
        state.is_over()
    }
}

/// Summary of a headless game played by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotRun {
    pub seed: u64,
    pub frames: usize,
    pub ticks: u32,
    pub score: u32,
    pub level: u32,
    pub health: u32,
    pub status: Status,
    pub bomb_requests: usize,
    pub actions: Vec<Action>,
}

pub fn run_bot(game: BomberGame, max_steps: usize) -> BotRun {
    let seed = game.config().seed;
    let mut runner = HeadlessRunner::new(game);
    let mut bot = BotPlayer::new(0);
    let mut actions = Vec::new();

    let frames = runner.run_policy(max_steps, |session| {
        let action = bot.decide(&session.snapshot());
        actions.push(action);
        action
    });

    let session = runner.state();
    let run = BotRun {
        seed,
        frames,
        ticks: session.tick_count(),
        score: session.score(),
        level: session.player().level,
        health: session.player().health,
        status: session.status(),
        bomb_requests: actions.iter().filter(|&&a| a == Action::PlaceBomb).count(),
        actions,
    };
    tracing::info!(
        seed = run.seed,
        frames = run.frames,
        score = run.score,
        status = ?run.status,
        "bot run finished"
    );
    run
}
