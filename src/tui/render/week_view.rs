use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::{done_count, pad_line, progress_dots};

/// Rows used by the week strip: weekday, day of month, dots, blank
pub const STRIP_HEIGHT: u16 = 4;

/// Seven day columns across the top, with a progress gauge per day
pub fn render_week_strip(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let bg = app.theme.background;
    let col_w = ((area.width as usize) / session.visible_dates.len().max(1)).max(4);
    let total = session.habits.len();

    let mut names: Vec<Span> = Vec::new();
    let mut days: Vec<Span> = Vec::new();
    let mut dots: Vec<Span> = Vec::new();
    for (i, date) in session.visible_dates.iter().enumerate() {
        let style = day_style(app, i, *date);
        names.push(Span::styled(center(&date.format("%a").to_string(), col_w), style));
        days.push(Span::styled(center(&date.format("%d %b").to_string(), col_w), style));
        let gauge = progress_dots(done_count(app, *date), total);
        dots.push(Span::styled(
            center(gauge, col_w),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }

    let lines = vec![Line::from(names), Line::from(days), Line::from(dots)];
    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn day_style(app: &App, index: usize, date: NaiveDate) -> Style {
    let theme = &app.theme;
    if index == app.session.selected_date_index {
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else if date == app.session.today {
        Style::default().fg(theme.highlight).bg(theme.background)
    } else {
        Style::default().fg(theme.text).bg(theme.background)
    }
}

/// Center `s` in a field `width` chars wide (ASCII and dots only)
fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

/// Per-day summary for the visible week
pub fn render_week_view(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let bg = app.theme.background;
    let width = area.width as usize;

    if session.habits.is_empty() {
        let empty = Paragraph::new(" No habits yet. Tab to Habits and press 'a' to add one.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let total = session.habits.len();
    let mut lines: Vec<Line> = Vec::new();
    let first = session.visible_dates.first().copied().unwrap_or(session.today);
    lines.push(Line::from(Span::styled(
        format!(" Week of {}", first.format("%B %-d, %Y")),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for (i, date) in session.visible_dates.iter().enumerate() {
        let done = done_count(app, *date);
        let is_cursor = i == session.selected_date_index;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let label_style = if *date == session.today {
            Style::default().fg(app.theme.highlight).bg(row_bg)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        let mut spans = vec![
            Span::styled(format!("  {}  ", date.format("%a %d %b")), label_style),
            Span::styled(
                progress_dots(done, total),
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ),
            Span::styled(
                format!("  {done}/{total} done"),
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
