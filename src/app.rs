//! Terminal host: owns the engine, the strings table and everything that is
//! presentation only (typed text, answer card, effects, summary screen).

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    config::AppConfig,
    effects::EffectsLayer,
    engine::{CompletionReason, Engine, EngineError, EngineObserver, GameState, Summary},
    loader::LoadedData,
    puzzle::Puzzle,
    strings::Strings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    AnswerCard,
    Summary,
}

/// What the engine reported since the host last looked
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Correct,
    Incorrect,
    Tick(Option<u32>),
    Completed(Summary),
}

/// Observer handed to the engine; queues notifications for the app loop
#[derive(Debug, Default)]
pub struct HostObserver {
    events: Vec<HostEvent>,
    renders: u64,
}

impl HostObserver {
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl EngineObserver for HostObserver {
    fn on_render(&mut self, _state: &GameState) {
        self.renders += 1;
    }

    fn on_correct(&mut self, _state: &GameState) {
        self.events.push(HostEvent::Correct);
    }

    fn on_incorrect(&mut self, _state: &GameState) {
        self.events.push(HostEvent::Incorrect);
    }

    fn on_complete(&mut self, summary: &Summary) {
        self.events.push(HostEvent::Completed(*summary));
    }

    fn on_tick(&mut self, state: &GameState) {
        self.events.push(HostEvent::Tick(state.time_left()));
    }
}

/// The answer card shown between a submit and the next puzzle
#[derive(Debug, Clone)]
pub struct Reveal {
    pub puzzle: Puzzle,
    pub given: String,
    pub correct: bool,
    pub remaining: Duration,
}

pub struct App {
    pub engine: Engine<HostObserver>,
    pub strings: Strings,
    pub state: AppState,
    pub mode: String,
    pub input: String,
    pub reveal: Option<Reveal>,
    pub summary: Option<Summary>,
    pub effects: EffectsLayer,
    pub should_quit: bool,
    screen: (u16, u16),
}

impl App {
    pub fn new(data: LoadedData, mode: Option<String>) -> Result<Self, EngineError> {
        let mode = mode.unwrap_or_else(|| data.app.default_mode.clone());
        let effects = EffectsLayer::new(data.app.effects.clone());
        let engine = Engine::new(data.app, data.puzzles, HostObserver::default());

        let mut app = Self {
            engine,
            strings: data.strings,
            state: AppState::Playing,
            mode: mode.clone(),
            input: String::new(),
            reveal: None,
            summary: None,
            effects,
            should_quit: false,
            screen: (80, 24),
        };
        app.start(&mode)?;
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        self.engine.config()
    }

    pub fn game(&self) -> Option<&GameState> {
        self.engine.state()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = (width, height);
    }

    pub fn start(&mut self, mode: &str) -> Result<(), EngineError> {
        self.mode = mode.to_string();
        self.input.clear();
        self.reveal = None;
        self.summary = None;
        self.effects.clear();
        self.engine.start(mode)?;
        self.state = AppState::Playing;
        self.drain_events();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), EngineError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return Ok(());
        }

        match self.state {
            AppState::Playing => self.handle_playing_key(key),
            AppState::AnswerCard => self.handle_answer_card_key(key),
            AppState::Summary => self.handle_summary_key(key),
        }
    }

    fn handle_playing_key(&mut self, key: KeyEvent) -> Result<(), EngineError> {
        match key.code {
            KeyCode::Esc => self.exit_session(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Tab => {
                let mode = self.config().mode_after(&self.mode);
                return self.start(&mode);
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_answer_card_key(&mut self, key: KeyEvent) -> Result<(), EngineError> {
        match key.code {
            KeyCode::Esc => {
                self.exit_session();
                Ok(())
            }
            _ if self.config().answer_card.dismiss_on_click => self.dismiss_answer_card(),
            _ => Ok(()),
        }
    }

    fn handle_summary_key(&mut self, key: KeyEvent) -> Result<(), EngineError> {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => {
                let mode = self.mode.clone();
                self.start(&mode)
            }
            KeyCode::Char('m') | KeyCode::Tab => {
                let mode = self.config().mode_after(&self.mode);
                self.start(&mode)
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.quit();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn submit(&mut self) -> Result<(), EngineError> {
        if self.input.trim().is_empty() {
            return Ok(());
        }
        let puzzle = match self.engine.state() {
            Some(state) => state.current().clone(),
            None => return Err(EngineError::NotStarted),
        };

        let given = std::mem::take(&mut self.input);
        let correct = self.engine.submit(&given)?;

        self.reveal = Some(Reveal {
            puzzle,
            given,
            correct,
            remaining: Duration::from_millis(self.config().answer_card.duration_ms),
        });
        self.state = AppState::AnswerCard;
        self.drain_events();
        Ok(())
    }

    pub fn dismiss_answer_card(&mut self) -> Result<(), EngineError> {
        if self.reveal.take().is_none() {
            return Ok(());
        }
        self.engine.next()?;
        if self.state == AppState::AnswerCard {
            self.state = AppState::Playing;
        }
        self.drain_events();
        Ok(())
    }

    pub fn exit_session(&mut self) {
        self.engine.complete(CompletionReason::Exit);
        self.drain_events();
    }

    pub fn quit(&mut self) {
        self.exit_session();
        self.should_quit = true;
    }

    pub fn on_tick(&mut self, elapsed: Duration) -> Result<(), EngineError> {
        self.engine.advance(elapsed);
        self.effects.update(elapsed);
        self.drain_events();

        let expired = match self.reveal.as_mut() {
            Some(reveal) => {
                reveal.remaining = reveal.remaining.saturating_sub(elapsed);
                reveal.remaining.is_zero()
            }
            None => false,
        };
        if expired {
            self.dismiss_answer_card()?;
        }
        Ok(())
    }

    /// Whether the screen needs redrawing on every tick
    pub fn is_animating(&self) -> bool {
        self.effects.is_animating() || self.reveal.is_some()
    }

    fn drain_events(&mut self) {
        let events = std::mem::take(&mut self.engine.observer_mut().events);
        for event in events {
            match event {
                HostEvent::Correct => self.effects.on_correct(),
                HostEvent::Incorrect => self.effects.on_incorrect(),
                HostEvent::Tick(_) => {}
                HostEvent::Completed(summary) => {
                    self.reveal = None;
                    self.summary = Some(summary);
                    self.state = AppState::Summary;
                    if summary.reason == CompletionReason::Completed && summary.is_perfect() {
                        let (width, height) = self.screen;
                        self.effects.on_perfect_round(width, height);
                    }
                }
            }
        }
    }
}
