pub mod cards;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Reveal},
    config::{IncorrectKind, Motion, Transition},
    effects::{Confetti, Feedback},
    engine::{GameState, Summary},
    ui::{
        cards::{centered_rect, PartCard},
        screen::Screen,
    },
    util::{format_clock, percent},
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const FADE_OUT_MS: u128 = 300;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.state).render(self, area, buf);

        if self.effects.confetti.is_active() {
            render_confetti_particles(&self.effects.confetti, area, buf);
        }
    }
}

fn mode_label(app: &App, mode: &str) -> String {
    let key = format!("ui.modes.{mode}");
    if app.strings.contains(&key) {
        app.strings.get(&key)
    } else {
        mode.to_string()
    }
}

fn render_header(app: &App, game: &GameState, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(app.strings.get("ui.title"), bold_style),
        Span::raw("  "),
        Span::styled(mode_label(app, game.mode()), dim_style),
    ]))
    .render(chunks[0], buf);

    let score = app.strings.get_with(
        "ui.correctOfTotal",
        &[
            ("correct", game.correct().to_string()),
            ("total", game.total().to_string()),
        ],
    );
    Paragraph::new(Span::styled(score, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if let Some(time_left) = game.time_left() {
        let style = if time_left <= 10 {
            Style::default().patch(bold_style).fg(Color::Red)
        } else {
            bold_style
        };
        let timer = app
            .strings
            .get_with("ui.timeLeft", &[("time", format_clock(time_left))]);
        Paragraph::new(Span::styled(timer, style))
            .alignment(Alignment::Right)
            .render(chunks[2], buf);
    }
}

/// Header, the two part cards and the input dock
pub fn render_play(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(game) = app.game() else {
        return;
    };
    let puzzle = game.current();
    let feedback = app.effects.feedback();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1),
            Constraint::Min(5), // cards
            Constraint::Length(1),
            Constraint::Length(3), // input
            Constraint::Length(1), // legend
        ])
        .split(area);

    render_header(app, game, chunks[0], buf);

    let (border, emphasis, joiner) = match feedback {
        Some(Feedback::Correct(motion)) => (
            Style::default().fg(Color::Green),
            match motion {
                Motion::Flash => Modifier::REVERSED,
                Motion::Bounce => Modifier::UNDERLINED,
                Motion::Collide | Motion::None => Modifier::empty(),
            },
            if motion == Motion::Collide { "=" } else { "+" },
        ),
        Some(Feedback::Incorrect {
            kind: IncorrectKind::Border,
            ..
        }) => (Style::default().fg(Color::Red), Modifier::empty(), "+"),
        _ => (Style::default().fg(Color::DarkGray), Modifier::empty(), "+"),
    };

    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(46),
            Constraint::Percentage(8),
            Constraint::Percentage(46),
        ])
        .split(chunks[2]);

    let labels = ["accessibility.firstImage", "accessibility.secondImage"];
    for ((image, label), chunk) in puzzle
        .parts()
        .into_iter()
        .zip(labels)
        .zip([card_chunks[0], card_chunks[2]])
    {
        let label = app
            .strings
            .get_with(label, &[("alt", image.alt.clone())]);
        PartCard::new(image, label)
            .border(border)
            .emphasis(emphasis)
            .render(chunk, buf);
    }

    let joiner_area = Rect {
        y: card_chunks[1].y + card_chunks[1].height / 2,
        height: card_chunks[1].height.min(1),
        ..card_chunks[1]
    };
    Paragraph::new(Span::styled(
        joiner,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(joiner_area, buf);

    if let Some(Feedback::Incorrect {
        overlay_size_pct: Some(pct),
        ..
    }) = feedback
    {
        let pct = (pct as u16).min(100);
        let overlay = centered_rect(pct, pct, chunks[2]);
        Clear.render(overlay, buf);
        Block::bordered()
            .border_style(Style::default().fg(Color::Red))
            .render(overlay, buf);
        let mark = Rect {
            y: overlay.y + overlay.height / 2,
            height: overlay.height.min(1),
            ..overlay
        };
        Paragraph::new(Span::styled(
            "✗",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(mark, buf);
    }

    render_input(app, chunks[4], buf);

    Paragraph::new(Span::styled(
        format!(
            "(enter) {}   (tab) {}   (esc) {}",
            app.strings.get("ui.submit"),
            app.strings.get("ui.changeMode"),
            app.strings.get("ui.exit")
        ),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[5], buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let offset = app.effects.shake_offset();
    let x = (area.x as i32 + offset as i32).clamp(
        buf.area.x as i32,
        (buf.area.right() - area.width) as i32,
    );
    let area = Rect { x: x as u16, ..area };

    let border = match app.effects.feedback() {
        Some(Feedback::Incorrect { .. }) => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border);

    let line = if app.input.is_empty() {
        Line::from(Span::styled(
            app.strings.get("ui.placeholder"),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                app.input.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ])
    };

    let inner_width = block.inner(area).width as usize;
    let scroll = (app.input.width() + 1).saturating_sub(inner_width) as u16;
    Paragraph::new(line)
        .block(block)
        .scroll((0, scroll))
        .render(area, buf);
}

/// The answer for the puzzle just guessed, drawn over the cards
pub fn render_answer_card(app: &App, reveal: &Reveal, area: Rect, buf: &mut Buffer) {
    let config = &app.config().answer_card;
    let card = centered_rect(60, 60, area);

    let (verdict, color) = if reveal.correct {
        (app.strings.get("ui.correct"), Color::Green)
    } else {
        (app.strings.get("ui.incorrect"), Color::Red)
    };

    let mut base = Style::default();
    if config.transition == Transition::Fade && reveal.remaining.as_millis() < FADE_OUT_MS {
        base = base.add_modifier(Modifier::DIM);
    }

    let mut lines = vec![
        Line::from(Span::styled(
            verdict,
            base.fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            reveal.puzzle.answer_image.word.to_uppercase(),
            base.add_modifier(Modifier::BOLD),
        )),
    ];
    if config.show_image {
        lines.push(Line::from(Span::styled(
            app.strings.get_with(
                "accessibility.answerImage",
                &[("alt", reveal.puzzle.answer_image.alt.clone())],
            ),
            base.add_modifier(Modifier::ITALIC),
        )));
    }
    if !reveal.correct {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("\u{201c}{}\u{201d}", reveal.given),
            base.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
        )));
    }
    if config.dismiss_on_click {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            app.strings.get("ui.continue"),
            base.add_modifier(Modifier::DIM),
        )));
    }

    Clear.render(card, buf);
    let block = Block::bordered()
        .border_type(BorderType::Double)
        .border_style(base.fg(color));
    let inner = block.inner(card).inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    block.render(card, buf);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

pub fn render_summary(app: &App, summary: &Summary, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let params = [
        ("correct", summary.correct.to_string()),
        ("total", summary.total.to_string()),
    ];

    let score_color = if summary.is_perfect() {
        Color::Green
    } else {
        Color::Yellow
    };
    let mut score = vec![Span::styled(
        app.strings.get_with("summary.scoreText", &params),
        Style::default().patch(bold_style).fg(score_color),
    )];
    if let Some(pct) = percent(summary.correct, summary.total) {
        score.push(Span::styled(
            format!("  ({pct}%)"),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(app.strings.get("summary.title"), bold_style)),
        Line::default(),
        Line::from(score),
        Line::from(Span::styled(
            app.strings
                .get(&format!("summary.reason.{}", summary.reason)),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
        Line::from(Span::styled(
            app.strings
                .get_with("ui.mode", &[("mode", mode_label(app, &app.mode))]),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::default(),
        Line::from(Span::styled(
            app.strings.get("summary.keys"),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let modal = centered_rect(70, 60, area);
    let block = Block::bordered().border_type(BorderType::Rounded);
    let inner = block.inner(modal);
    block.render(modal, buf);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

/// Render confetti particles on top of whatever screen is showing
fn render_confetti_particles(confetti: &Confetti, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &confetti.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];

            let alpha = particle.fade();
            let style = if alpha > 0.7 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}
