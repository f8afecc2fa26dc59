//! Game session engine.
//!
//! The engine owns the only mutable session state. A host drives it through
//! [`Engine::start`], [`Engine::submit`], [`Engine::next`],
//! [`Engine::complete`] and [`Engine::advance`] and learns about changes
//! through an [`EngineObserver`]. Observers only ever see shared references,
//! so nothing flows back into the engine except through its operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::AppConfig,
    normalize::AnswerNormalizer,
    puzzle::Puzzle,
    selection::{selector_for, SessionRng},
    timer::Countdown,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("no puzzles available to start game")]
    NoPuzzles,
    #[error("game not started")]
    NotStarted,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompletionReason {
    Timeup,
    Completed,
    Exit,
}

/// Final tally of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub correct: u32,
    pub total: u32,
    pub reason: CompletionReason,
}

impl Summary {
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

/// State of the session in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    mode: String,
    play_order: Vec<Puzzle>,
    index: usize,
    correct: u32,
    total: u32,
    time_left: Option<u32>,
}

impl GameState {
    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn play_order(&self) -> &[Puzzle] {
        &self.play_order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &Puzzle {
        &self.play_order[self.index]
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whole seconds left; only present in a timed session
    pub fn time_left(&self) -> Option<u32> {
        self.time_left
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.play_order.len()
    }
}

/// Host-side hooks, all invoked synchronously from inside engine operations
pub trait EngineObserver {
    /// After every state change
    fn on_render(&mut self, state: &GameState);
    /// Once per correct submit, before the render
    fn on_correct(&mut self, _state: &GameState) {}
    /// Once per incorrect submit, before the render
    fn on_incorrect(&mut self, _state: &GameState) {}
    /// Exactly once per finished session
    fn on_complete(&mut self, _summary: &Summary) {}
    /// Once per elapsed timer second, before the render
    fn on_tick(&mut self, _state: &GameState) {}
}

type StateHook<'a> = Box<dyn FnMut(&GameState) + 'a>;
type SummaryHook<'a> = Box<dyn FnMut(&Summary) + 'a>;

/// Closure-backed observer for hosts that don't want a dedicated type
#[derive(Default)]
pub struct Callbacks<'a> {
    render: Option<StateHook<'a>>,
    correct: Option<StateHook<'a>>,
    incorrect: Option<StateHook<'a>>,
    complete: Option<SummaryHook<'a>>,
    tick: Option<StateHook<'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new(render: impl FnMut(&GameState) + 'a) -> Self {
        Self {
            render: Some(Box::new(render)),
            ..Self::default()
        }
    }

    pub fn on_correct(mut self, f: impl FnMut(&GameState) + 'a) -> Self {
        self.correct = Some(Box::new(f));
        self
    }

    pub fn on_incorrect(mut self, f: impl FnMut(&GameState) + 'a) -> Self {
        self.incorrect = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut(&Summary) + 'a) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn on_tick(mut self, f: impl FnMut(&GameState) + 'a) -> Self {
        self.tick = Some(Box::new(f));
        self
    }
}

impl EngineObserver for Callbacks<'_> {
    fn on_render(&mut self, state: &GameState) {
        if let Some(f) = self.render.as_mut() {
            f(state)
        }
    }

    fn on_correct(&mut self, state: &GameState) {
        if let Some(f) = self.correct.as_mut() {
            f(state)
        }
    }

    fn on_incorrect(&mut self, state: &GameState) {
        if let Some(f) = self.incorrect.as_mut() {
            f(state)
        }
    }

    fn on_complete(&mut self, summary: &Summary) {
        if let Some(f) = self.complete.as_mut() {
            f(summary)
        }
    }

    fn on_tick(&mut self, state: &GameState) {
        if let Some(f) = self.tick.as_mut() {
            f(state)
        }
    }
}

pub struct Engine<O: EngineObserver> {
    config: AppConfig,
    puzzles: Vec<Puzzle>,
    observer: O,
    normalizer: AnswerNormalizer,
    rng: SessionRng,
    state: Option<GameState>,
    timer: Option<Countdown>,
}

impl<O: EngineObserver> Engine<O> {
    pub fn new(config: AppConfig, puzzles: Vec<Puzzle>, observer: O) -> Self {
        let normalizer = AnswerNormalizer::from(&config.input);
        let rng = SessionRng::new(config.selection.seed);
        Self {
            config,
            puzzles,
            observer,
            normalizer,
            rng,
            state: None,
            timer: None,
        }
    }

    /// Begin a new session in `mode`.
    ///
    /// A session that is still active is dropped without a summary and its
    /// timer is replaced.
    pub fn start(&mut self, mode: &str) -> Result<(), EngineError> {
        let strategy = self.config.selection.strategy;
        let play_order = selector_for(strategy).select(&self.puzzles, &mut self.rng);
        if play_order.is_empty() {
            return Err(EngineError::NoPuzzles);
        }

        if let Some(old) = &self.state {
            log::debug!(
                "discarding active {} session at {}/{} without summary",
                old.mode,
                old.correct,
                old.total
            );
        }

        let timed = self.config.is_timed(mode);
        self.timer = timed.then(Countdown::default);

        log::info!(
            "starting {mode} session with {} puzzles ({strategy})",
            play_order.len()
        );

        let state = self.state.insert(GameState {
            mode: mode.to_string(),
            play_order,
            index: 0,
            correct: 0,
            total: 0,
            time_left: timed.then_some(self.config.timer.default),
        });
        self.observer.on_render(state);
        Ok(())
    }

    /// Evaluate an answer for the current puzzle. Does not advance.
    pub fn submit(&mut self, answer: &str) -> Result<bool, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NotStarted)?;

        let is_correct = self.normalizer.matches(answer, &state.current().answer);
        state.total += 1;
        if is_correct {
            state.correct += 1;
        }
        log::debug!(
            "puzzle {} answered {}",
            state.current().id,
            if is_correct { "correctly" } else { "incorrectly" }
        );

        let state = &*state;
        if is_correct {
            self.observer.on_correct(state);
        } else {
            self.observer.on_incorrect(state);
        }
        self.observer.on_render(state);

        Ok(is_correct)
    }

    /// Move to the next puzzle, finishing the session after the last one.
    pub fn next(&mut self) -> Result<(), EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NotStarted)?;

        let next = state.index + 1;
        if next >= state.play_order.len() {
            self.complete(CompletionReason::Completed);
            return Ok(());
        }

        state.index = next;
        self.observer.on_render(state);
        Ok(())
    }

    /// Finish the session. Does nothing when no session is active.
    pub fn complete(&mut self, reason: CompletionReason) {
        let Some(state) = self.state.take() else {
            return;
        };
        self.timer = None;

        let summary = Summary {
            correct: state.correct,
            total: state.total,
            reason,
        };
        log::info!(
            "{} session finished: {}/{} ({reason})",
            state.mode,
            summary.correct,
            summary.total
        );
        self.observer.on_complete(&summary);
    }

    /// Feed elapsed wall time to the session timer.
    pub fn advance(&mut self, elapsed: Duration) {
        let due = match self.timer.as_mut() {
            Some(timer) => timer.advance(elapsed),
            None => return,
        };
        for _ in 0..due {
            if self.timer.is_none() {
                break;
            }
            self.tick();
        }
    }

    fn tick(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(time_left) = state.time_left.as_mut() else {
            return;
        };

        *time_left = time_left.saturating_sub(1);
        log::trace!("tick: {time_left}s left");

        if *time_left == 0 {
            self.complete(CompletionReason::Timeup);
            return;
        }

        self.observer.on_tick(state);
        self.observer.on_render(state);
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
