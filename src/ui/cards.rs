use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::puzzle::PartImage;

/// One half of the puzzle: the picture's description with its word part
/// underneath, standing in for the image itself.
pub struct PartCard<'a> {
    pub image: &'a PartImage,
    pub label: String,
    pub border: Style,
    pub emphasis: Modifier,
}

impl<'a> PartCard<'a> {
    pub fn new(image: &'a PartImage, label: String) -> Self {
        Self {
            image,
            label,
            border: Style::default().fg(Color::DarkGray),
            emphasis: Modifier::empty(),
        }
    }

    pub fn border(mut self, style: Style) -> Self {
        self.border = style;
        self
    }

    pub fn emphasis(mut self, modifier: Modifier) -> Self {
        self.emphasis = modifier;
        self
    }
}

impl Widget for PartCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.border)
            .title(Span::styled(
                self.label,
                Style::default().add_modifier(Modifier::DIM),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        Paragraph::new(Span::styled(
            self.image.alt.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

        Paragraph::new(Line::from(Span::styled(
            self.image.word_part.to_uppercase(),
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(self.emphasis),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }
}

/// A rectangle of the given percentages, centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
