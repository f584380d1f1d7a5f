pub mod screen;
pub mod summary;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, session::CardView};

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

const LEGEND: &str =
    "(space) flip / (n)ext / (k)nown / (u)nknown / (tab) category / (r)eset / (s)ummary / (esc)ape";

/// Rows `lines` occupy when wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 {
                1
            } else {
                w.div_ceil(width)
            }
        })
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

/// Text of the visible card face.
pub fn card_face(view: &CardView) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let hint_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC | Modifier::DIM);

    if view.flipped {
        vec![
            Line::from(Span::raw(view.entry.definition.clone())),
            Line::default(),
            Line::from(Span::styled(
                format!("\u{201c}{}\u{201d}", view.entry.example),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ]
    } else {
        vec![
            Line::from(Span::styled(
                view.entry.word.clone(),
                Style::default().patch(bold_style).fg(Color::Cyan),
            )),
            Line::default(),
            Line::from(Span::styled(view.entry.grammatical_role.clone(), hint_style)),
        ]
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // tabs
                Constraint::Min(5),    // card
                Constraint::Length(1), // "3 / 20"
                Constraint::Length(1), // gauge
                Constraint::Length(1), // known / unknown
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let titles = self
            .study
            .manager()
            .catalog()
            .decks()
            .iter()
            .enumerate()
            .map(|(i, deck)| format!("{} {}", i + 1, deck.title()));
        Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("lexicard"))
            .select(self.selected())
            .highlight_style(Style::default().patch(bold_style).fg(Color::Yellow))
            .render(chunks[0], buf);

        let face = card_face(view);
        let card_block = Block::default()
            .borders(Borders::ALL)
            .title(if view.flipped { " back " } else { " front " })
            .border_style(if view.flipped {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::Cyan)
            });
        let inner = card_block.inner(chunks[1]);
        card_block.render(chunks[1], buf);

        // centre the face vertically inside the card
        let text_height = wrapped_height(&face, inner.width).min(inner.height);
        let top_pad = (inner.height - text_height) / 2;
        let text_area = Rect {
            y: inner.y + top_pad,
            height: inner.height - top_pad,
            ..inner
        };
        Paragraph::new(face)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        Paragraph::new(Span::styled(view.progress.label(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .ratio(view.progress.ratio())
            .label(format!("{:.0}%", view.progress.percent))
            .render(chunks[3], buf);

        let counters = Line::from(vec![
            Span::styled(
                format!("known {}", view.known_count),
                Style::default().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled(
                format!("unknown {}", view.unknown_count),
                Style::default().fg(Color::Red),
            ),
        ]);
        Paragraph::new(counters)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let legend = if LEGEND.width() > chunks[6].width as usize {
            "(space) (n) (k) (u) (tab) (r) (s) (esc)"
        } else {
            LEGEND
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[6], buf);
    }
}
