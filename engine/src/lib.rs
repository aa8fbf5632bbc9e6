pub mod canvas;
pub mod window;

use serde::{Deserialize, Serialize};

/// Frame history for a turn-based game.
///
/// Recording after a rewind drops the frames ahead of the cursor, so history always
/// describes one linear timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeMachine<State> {
    states: Vec<State>,
    frame: usize,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
            frame: 0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self) -> &State {
        &self.states[self.frame]
    }

    pub fn state_at(&self, frame: usize) -> Option<&State> {
        self.states.get(frame)
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.frame = self.frame.saturating_sub(frames);
        self.frame
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        let last = self.states.len().saturating_sub(1);
        self.frame = (self.frame + frames).min(last);
        self.frame
    }

    pub fn record(&mut self, state: State) -> usize {
        self.states.truncate(self.frame + 1);
        self.states.push(state);
        self.frame += 1;
        self.frame
    }
}

/// Pure turn logic: every input produces a fresh state from the previous one.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;

    /// Terminal states accept no further input.
    fn is_terminal(&self, _state: &Self::State) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timemachine: TimeMachine<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            timemachine: TimeMachine::new(initial_state),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timemachine.history()
    }

    pub fn timemachine(&self) -> &TimeMachine<G::State> {
        &self.timemachine
    }

    pub fn is_terminal(&self) -> bool {
        self.game.is_terminal(self.state())
    }

    /// Advances one frame. Returns `None` without recording anything once the
    /// current state is terminal.
    pub fn step(&mut self, input: G::Input) -> Option<usize> {
        if self.is_terminal() {
            return None;
        }
        let next_state = self.game.step(self.timemachine.state(), input);
        Some(self.timemachine.record(next_state))
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        for input in inputs {
            if self.step(input).is_none() {
                break;
            }
        }
        self.frame()
    }

    /// Lets `policy` choose every input until the game ends or `max_steps` frames
    /// have been played. Returns the number of frames played.
    pub fn run_policy<F>(&mut self, max_steps: usize, mut policy: F) -> usize
    where
        F: FnMut(&G::State) -> G::Input,
    {
        let mut played = 0;
        while played < max_steps && !self.is_terminal() {
            let input = policy(self.state());
            if self.step(input).is_none() {
                break;
            }
            played += 1;
        }
        played
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.timemachine.rewind(frames)
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        self.timemachine.forward(frames)
    }

    pub fn reset(&mut self) {
        self.timemachine = TimeMachine::new(self.game.initial_state());
    }
}
