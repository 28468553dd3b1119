use chrono::{Datelike, Duration};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::calendar::{days_in_month, month_grid, month_start};
use crate::ops::streak::CompletionHistory;
use crate::tui::app::App;

const CELL_W: usize = 5;

/// Month grid for the selected habit, done days checked
pub fn render_calendar_view(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let bg = app.theme.background;
    let month = session.calendar_month;

    let Some(habit) = session.selected_habit() else {
        let empty = Paragraph::new(" No habits yet. Esc to go back and press 'a' to add one.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    };

    // One range scan for the whole month
    let first = month_start(month);
    let last = first + Duration::days(i64::from(days_in_month(first)) - 1);
    let history = match app.store.completed_dates(&habit.id, first, last) {
        Ok(dates) => CompletionHistory::from_dates(&habit.id, dates),
        Err(e) => {
            tracing::warn!(error = %e, habit = %habit.id, "could not load month");
            CompletionHistory::default()
        }
    };

    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(format!(" {}", habit.name), header_style),
            Span::styled(
                format!("  {}", month.format("%B %Y")),
                Style::default().fg(app.theme.highlight).bg(bg),
            ),
        ]),
        Line::from(""),
    ];

    // Weekday header, starting on the configured first day
    let mut header: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    let mut day = session.week_start;
    for _ in 0..7 {
        let name = format!("{day}");
        header.push(Span::styled(
            format!("{:>4} ", name),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        day = day.succ();
    }
    lines.push(Line::from(header));

    let mut done_days = 0;
    for row in month_grid(month, session.week_start) {
        let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
        for slot in row {
            let Some(date) = slot else {
                spans.push(Span::styled(" ".repeat(CELL_W), Style::default().bg(bg)));
                continue;
            };
            let done = history.contains(date);
            if done {
                done_days += 1;
            }
            let mut style = Style::default().fg(app.theme.text).bg(bg);
            if done {
                style = style.fg(app.theme.green);
            }
            if date == session.today {
                style = style.bg(app.theme.selection_bg).add_modifier(Modifier::BOLD);
            }
            let mark = if done { "\u{2713}" } else { " " };
            spans.push(Span::styled(format!("{:>3}{} ", date.day(), mark), style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {} of {} days done", done_days, days_in_month(first)),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
