use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use super::controller::{Controller, Indicator};
use super::widgets::{cards::draw_cards, chart::draw_chart};
use crate::models::ViewMode;

/// Height of the card row, borders included
const CARD_HEIGHT: u16 = 4;

pub fn draw(f: &mut Frame, controller: &Controller, next_refresh: Duration, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),           // Header
                Constraint::Length(CARD_HEIGHT), // Loading indicator or cards
                Constraint::Min(8),              // Chart
                Constraint::Length(2),           // Help
            ]
            .as_ref(),
        )
        .split(f.size());

    draw_header(f, chunks[0], controller, next_refresh);

    let screen = controller.screen();
    match screen.indicator {
        Indicator::Hidden => draw_cards(f, chunks[1], screen, now),
        indicator => draw_indicator(f, chunks[1], indicator),
    }

    if screen.chart_visible {
        if let Some(chart) = controller.chart().current() {
            draw_chart(f, chunks[2], chart);
        }
    }

    draw_help(f, chunks[3]);
}

fn draw_header(f: &mut Frame, area: Rect, controller: &Controller, next_refresh: Duration) {
    let mut spans = vec![Span::raw("View: ")];
    for mode in [ViewMode::Crypto, ViewMode::Weather] {
        let style = if mode == controller.mode() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mode.title()), style));
        spans.push(Span::raw(" "));
    }

    let last_update = controller
        .screen()
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    spans.push(Span::raw("| Last Update: "));
    spans.push(Span::raw(last_update));
    spans.push(Span::raw(format!(" | Next refresh: {}s", next_refresh.as_secs())));

    let header = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .title(" Skyticker ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn draw_indicator(f: &mut Frame, area: Rect, indicator: Indicator) {
    let style = match indicator {
        Indicator::Error(_) => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Yellow),
    };
    let text = indicator.text().unwrap_or_default();
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Span::raw("["),
        Span::styled("c", key),
        Span::raw("]rypto ["),
        Span::styled("w", key),
        Span::raw("]eather ["),
        Span::styled("tab", key),
        Span::raw("] switch ["),
        Span::styled("r", key),
        Span::raw("]efresh ["),
        Span::styled("q", key),
        Span::raw("]uit"),
    ];

    let help = Paragraph::new(Line::from(help_text))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}
