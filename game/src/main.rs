use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use engine::GameLogic;
use engine::canvas::{Canvas, DEFAULT_CELL_SIZE};
use engine::window::{WindowApp, WindowConfig, run_window};
use winit::event::VirtualKeyCode;

use bomber::bot::BotPlayer;
use bomber::config::ConfigStore;
use bomber::input::action_for_key;
use bomber::logic::{BomberGame, run_bot};
use bomber::render::{self, RedrawObserver};
use bomber::session::{Action, Session};

#[derive(Parser, Debug)]
#[command(name = "bomber", about = "Grid bomber game with a scripted opponent")]
struct Cli {
    /// JSON rules file; falls back to BOMBER_CONFIG_PATH, then the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured RNG seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open a window and play with the arrow keys and space
    Play {
        /// Let the bot play instead of the keyboard
        #[arg(long)]
        bot: bool,

        /// Milliseconds between bot turns
        #[arg(long, default_value_t = 200)]
        tick_ms: u64,
    },
    /// Play a headless bot game and print its summary as JSON
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        max_steps: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = cli
        .config
        .map_or_else(ConfigStore::from_env, |path| ConfigStore::at(path));
    let mut config = store.load();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let game = BomberGame::classic(config).context("failed to load the classic map")?;

    match cli.command {
        Commands::Play { bot, tick_ms } => play(game, bot, Duration::from_millis(tick_ms.max(1))),
        Commands::Simulate { max_steps } => {
            let run = run_bot(game, max_steps);
            println!("{}", serde_json::to_string_pretty(&run)?);
            Ok(())
        }
    }
}

fn play(game: BomberGame, bot: bool, tick_interval: Duration) -> Result<()> {
    let window = WindowConfig {
        title: "Bomber".to_string(),
        columns: game.columns(),
        rows: game.rows(),
        cell_size: DEFAULT_CELL_SIZE,
        tick_interval: bot.then_some(tick_interval),
    };
    let app = PlayApp {
        session: game.initial_state(),
        bot: bot.then(|| BotPlayer::new(0)),
        observer: RedrawObserver::new(),
    };
    run_window(window, app).map_err(|err| anyhow!("window failed: {err}"))
}

/// Plays straight on one session; the observer drains its changed cells.
struct PlayApp {
    session: Session,
    bot: Option<BotPlayer>,
    observer: RedrawObserver,
}

impl PlayApp {
    fn advance(&mut self, action: Action, canvas: &mut dyn Canvas) {
        if self.session.is_over() {
            return;
        }
        self.session.handle_input(action);
        self.observer.present(&mut self.session, canvas);
    }
}

impl WindowApp for PlayApp {
    fn init(&mut self, canvas: &mut dyn Canvas) {
        render::draw_full(self.session.grid(), canvas);
        self.session.take_touched();
    }

    fn on_key(&mut self, key: VirtualKeyCode, canvas: &mut dyn Canvas) {
        if self.bot.is_some() {
            return;
        }
        if let Some(action) = action_for_key(key) {
            self.advance(action, canvas);
        }
    }

    fn on_timer(&mut self, canvas: &mut dyn Canvas) {
        let Some(bot) = self.bot.as_mut() else {
            return;
        };
        let action = bot.decide(&self.session.snapshot());
        self.advance(action, canvas);
    }
}
