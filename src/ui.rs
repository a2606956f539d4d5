pub mod screen;
pub mod staff;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::{app::App, session::Outcome};
use staff::{NoteState, StaffView};

const HORIZONTAL_MARGIN: u16 = 5;
const NOTE_SPACING: usize = 4;
const NOTE_GLYPH: &str = "●";

fn note_style(state: NoteState) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match state {
        NoteState::Default => bold.fg(Color::White),
        NoteState::Highlight => bold.fg(Color::Yellow),
        NoteState::Correct => bold.fg(Color::Green),
        NoteState::Wrong => bold.fg(Color::Red),
    }
}

/// One text line per staff line, notes placed left to right in play order
pub fn staff_lines(view: &StaffView) -> Vec<Line<'static>> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let width = view.notes.len().max(1) * NOTE_SPACING + 1;

    (0..view.lines.len())
        .map(|row| {
            let label = view.lines[view.lines.len() - 1 - row];
            let mut spans = vec![Span::styled(format!("{label} "), dim)];
            let mut col = 0;
            for (idx, note) in view.notes.iter().enumerate() {
                if view.line_of(note.symbol) != Some(row) {
                    continue;
                }
                let at = idx * NOTE_SPACING + NOTE_SPACING / 2;
                spans.push(Span::styled("─".repeat(at - col), dim));
                spans.push(Span::styled(NOTE_GLYPH, note_style(note.state)));
                col = at + 1;
            }
            spans.push(Span::styled("─".repeat(width.saturating_sub(col)), dim));
            Line::from(spans)
        })
        .collect()
}

pub fn time_label(remaining: Option<f64>) -> Option<String> {
    remaining.map(|secs| format!("Time: {:.1}s", secs.max(0.0)))
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view.borrow();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let staff_height = view.lines.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(staff_height),
                    Constraint::Length(1),
                    Constraint::Length(2),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        let mut header = vec![
            Span::styled(view.level_label(), bold_style),
            Span::raw("   "),
            Span::styled(view.score_label(), bold_style),
        ];
        if let Some(label) = time_label(self.engine.session().time_remaining) {
            header.push(Span::raw("   "));
            header.push(Span::styled(label, Style::default().fg(Color::Magenta)));
        }
        Paragraph::new(Line::from(header))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(staff_lines(&view))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(view.status.clone(), bold_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);

        let help = format!(
            "keys: {}   (n)ew game   (space) restart   (esc) quit",
            self.engine.alphabet().key_list()
        );
        Paragraph::new(Span::styled(help, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

/// Centered summary box drawn over the staff once a game has ended
pub struct ResultBanner {
    pub outcome: Outcome,
    pub score: u32,
}

impl Widget for ResultBanner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, color) = match self.outcome {
            Outcome::Won => ("You win!", Color::Green),
            Outcome::TimedOut => ("Time's up!", Color::Red),
        };
        let width = 30.min(area.width);
        let height = 5.min(area.height);
        let rect = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        Clear.render(rect, buf);
        Paragraph::new(vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("final score {}", self.score)),
            Line::from(Span::styled(
                "space to play again",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(rect, buf);
    }
}
