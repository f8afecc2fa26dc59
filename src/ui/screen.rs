use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::{App, AppState},
    ui::{render_answer_card, render_play, render_summary},
};

/// A UI Screen boundary: everything drawn for one app state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Header, picture cards and input dock
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_play(app, area, buf);
    }
}

/// The play screen with the answer card on top
pub struct AnswerCardScreen;

impl Screen for AnswerCardScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_play(app, area, buf);
        if let Some(reveal) = &app.reveal {
            render_answer_card(app, reveal, area, buf);
        }
    }
}

pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(summary) = &app.summary {
            render_summary(app, summary, area, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Playing => Box::new(PlayScreen),
        AppState::AnswerCard => Box::new(AnswerCardScreen),
        AppState::Summary => Box::new(SummaryScreen),
    }
}
