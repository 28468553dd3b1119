use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::pad_line;

/// Archived habits, restorable with 'r'
pub fn render_archived_view(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Archived Habits",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if session.archived.is_empty() {
        lines.push(Line::from(Span::styled(
            " Nothing archived.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    for (i, habit) in session.archived.iter().enumerate() {
        let is_cursor = i == session.selected_archived_index;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let mut spans = vec![
            Span::styled(format!("   {}", habit.name), Style::default().fg(app.theme.text).bg(row_bg)),
            Span::styled(
                format!("  {}", habit.kind.label()),
                Style::default().fg(app.theme.dim).bg(row_bg),
            ),
        ];
        if is_cursor {
            pad_line(&mut spans, width, Style::default().bg(row_bg));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
