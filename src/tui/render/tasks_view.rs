use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::{check_mark, pad_line, spans_width};

/// Render the task list
pub fn render_tasks_view(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let bg = app.theme.background;
    let width = area.width as usize;

    let open = session.tasks.iter().filter(|t| !t.completed).count();
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(
                " Tasks",
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {open} open"),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]),
        Line::from(""),
    ];

    if session.tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            " No tasks yet. Press 'a' to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let visible = (area.height as usize).saturating_sub(2).max(1);
    let scroll = session.selected_task_index.saturating_sub(visible - 1);
    for (i, task) in session.tasks.iter().enumerate().skip(scroll).take(visible) {
        let is_cursor = i == session.selected_task_index;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let mut name_style = Style::default().fg(app.theme.text).bg(row_bg);
        if task.completed {
            name_style = name_style.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT);
        } else if is_cursor {
            name_style = name_style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(
                check_mark(task.completed),
                Style::default().fg(app.theme.done_color(task.completed)).bg(row_bg),
            ),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(truncate_to_width(&task.name, width.saturating_sub(20).max(1)), name_style),
        ];
        if let Some(due) = task.due_date {
            let color = if task.is_overdue(session.today) {
                app.theme.red
            } else {
                app.theme.yellow
            };
            spans.push(Span::styled(
                format!("  due {}", due.format("%Y-%m-%d")),
                Style::default().fg(color).bg(row_bg),
            ));
        }
        if !task.description.is_empty() {
            let room = width.saturating_sub(spans_width(&spans) + 2);
            if room > 3 {
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&task.description, room)),
                    Style::default().fg(app.theme.dim).bg(row_bg),
                ));
            }
        }
        if is_cursor {
            pad_line(&mut spans, width, Style::default().bg(row_bg));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use chrono::NaiveDate;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 10, |frame, area| render_tasks_view(frame, app, area))
    }

    #[test]
    fn test_empty_hint() {
        let (_tmp, app) = test_app();
        assert!(render(&app).contains("No tasks yet"));
    }

    #[test]
    fn test_lists_tasks_with_state_and_due() {
        let (_tmp, mut app) = test_app();
        add_tasks(&mut app, &["Groceries", "Taxes"]);
        app.store.toggle_task("t000").unwrap();
        let mut taxes = app.store.get_task("t001").unwrap().unwrap();
        taxes.due_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        app.store.put_task(&taxes).unwrap();
        app.session.refresh_tasks(&app.store);

        let out = render(&app);
        assert!(out.contains("Tasks  1 open"));
        assert!(out.contains("✓ Groceries"));
        assert!(out.contains("○ Taxes  due 2025-05-01"));
    }
}
