use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

use crate::dashboard::controller::{AnimatedCard, Screen};
use crate::formatters::Tone;

pub fn draw_cards(f: &mut Frame, area: Rect, screen: &Screen, now: Instant) {
    if !screen.cards_visible || screen.cards.is_empty() {
        return;
    }

    let count = screen.cards.len() as u32;
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, chunk) in screen.cards.iter().zip(chunks.iter()) {
        draw_card(f, *chunk, card, now);
    }
}

fn draw_card(f: &mut Frame, area: Rect, card: &AnimatedCard, now: Instant) {
    let text = card.text_at(now);
    let tone_color = match text.tone {
        Tone::Positive => Color::Green,
        Tone::Negative => Color::LightRed,
        Tone::Neutral => Color::Cyan,
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{}: ", text.primary_caption)),
            Span::styled(
                text.primary_with_unit(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(format!("{}: ", text.secondary_caption)),
            Span::styled(
                text.secondary_with_unit(),
                Style::default().fg(tone_color).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", text.label))
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
