use chrono::{DateTime, Local};
use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::{app::App, session::SessionState};

pub struct CategorySummary<'a> {
    pub title: &'a str,
    pub total: usize,
    pub state: &'a SessionState,
    pub last_reviewed: Option<String>,
}

/// "5 minutes ago" style age of a review timestamp
pub fn humanize_since(when: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - when).to_std().unwrap_or_default();
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

fn word_list(words: &[String]) -> String {
    if words.is_empty() {
        "—".to_string()
    } else {
        words.iter().join(", ")
    }
}

/// Pure presenter for one category block
pub fn present_category(data: &CategorySummary) -> Vec<Line<'static>> {
    let mut heading = vec![
        Span::styled(
            data.title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  card {} / {}", data.state.cursor + 1, data.total)),
    ];
    if let Some(ref when) = data.last_reviewed {
        heading.push(Span::styled(
            format!("  · last reviewed {when}"),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    vec![
        Line::from(heading),
        Line::from(vec![
            Span::styled(
                format!("  known ({}): ", data.state.known.len()),
                Style::default().fg(Color::Green),
            ),
            Span::raw(word_list(&data.state.known)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("  unknown ({}): ", data.state.unknown.len()),
                Style::default().fg(Color::Red),
            ),
            Span::raw(word_list(&data.state.unknown)),
        ]),
        Line::default(),
    ]
}

/// Render the summary screen
pub fn render_summary(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // categories
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = Paragraph::new(format!(
        "Session summary{}",
        if app.study.is_persistent() {
            ""
        } else {
            " (not saved)"
        }
    ))
    .block(Block::default().borders(Borders::ALL).title("Summary"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let now = Local::now();
    let manager = app.study.manager();
    let mut lines = Vec::new();
    for deck in manager.catalog().decks() {
        let Ok(state) = manager.session(&deck.name) else {
            continue;
        };
        let data = CategorySummary {
            title: deck.title(),
            total: deck.entries.len(),
            state,
            last_reviewed: app
                .last_reviewed(&deck.name)
                .map(|when| humanize_since(when, now)),
        };
        lines.extend(present_category(&data));
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });

    // long word lists wrap, so clamp against rendered rows
    let rows = body.line_count(chunks[1].width);
    let max_scroll = rows.saturating_sub(chunks[1].height as usize);
    if app.summary_scroll > max_scroll {
        app.summary_scroll = max_scroll;
    }

    let body = body.scroll((app.summary_scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(body, chunks[1]);

    let legend = Paragraph::new(Span::styled(
        "(s)/(b) back / (↑↓) scroll / (tab) category / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(legend, chunks[2]);
}
