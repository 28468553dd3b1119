use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::session::Mode;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// Key hints for the current mode
pub fn mode_hints(mode: &Mode, notes_visible: bool) -> &'static str {
    match mode {
        Mode::Week => "\u{2190}/\u{2192} day  Tab section  q quit",
        Mode::Habits if notes_visible => "e edit note  n close  \u{2190}/\u{2192} day  q quit",
        Mode::Habits => {
            "\u{2190}/\u{2192} day  \u{2191}/\u{2193} habit  Space done  a add  e edit  d delete  n notes  c calendar"
        }
        Mode::Tasks => "\u{2191}/\u{2193} task  Space done  a add  d delete  Tab section",
        Mode::Stats => "Tab section  q quit",
        Mode::Calendar => "\u{2190}/\u{2192} month  \u{2191}/\u{2193} habit  Esc back",
        Mode::Archived => "\u{2191}/\u{2193} habit  r restore  Esc back  Tab section",
        Mode::ChoosingHabitType => "\u{2191}/\u{2193} type  Enter next  Esc cancel",
        Mode::AddingHabit | Mode::EditingHabit { .. } | Mode::AddingTask => {
            "Tab field  Enter save  Esc cancel"
        }
        Mode::NoteEditor { .. } => "Enter save  Esc cancel",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let session = &app.session;

    let line = match &session.status_message {
        Some(msg) => Line::from(Span::styled(
            format!(" {}", truncate_to_width(msg, width.saturating_sub(1))),
            Style::default().fg(app.theme.yellow).bg(bg),
        )),
        None => {
            let hints = mode_hints(&session.mode, session.notes_visible);
            let date = session.today.format("%a %d %b %Y").to_string();
            let mut spans = vec![Span::styled(
                format!(" {hints}"),
                Style::default().fg(app.theme.dim).bg(bg),
            )];
            let content_width = display_width(hints) + 1;
            let date_width = display_width(&date) + 1;
            if content_width + date_width < width {
                let padding = width - content_width - date_width;
                spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
                spans.push(Span::styled(date, Style::default().fg(app.theme.text).bg(bg)));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
