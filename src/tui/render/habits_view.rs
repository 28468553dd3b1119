use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::{centered_rect_fixed, check_mark, is_done, pad_line};

/// Habit list with done state for the selected date
pub fn render_habits_view(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let bg = app.theme.background;
    let width = area.width as usize;
    let date = session.selected_date();

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(" Habits for {}", date.format("%a %b %d")),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    if session.habits.is_empty() {
        lines.push(Line::from(Span::styled(
            " No habits yet. Press 'a' to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let visible = (area.height as usize).saturating_sub(2).max(1);
    let scroll = session.selected_habit_index.saturating_sub(visible - 1);
    for (i, habit) in session.habits.iter().enumerate().skip(scroll).take(visible) {
        let done = is_done(app, &habit.id, date);
        let is_cursor = i == session.selected_habit_index;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let name_style = if is_cursor {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };

        let mut spans = vec![
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(
                check_mark(done),
                Style::default().fg(app.theme.done_color(done)).bg(row_bg),
            ),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(truncate_to_width(&habit.name, width.saturating_sub(16).max(1)), name_style),
            Span::styled(
                format!("  {}", habit.kind.label()),
                Style::default().fg(app.theme.kind_color(habit.kind)).bg(row_bg),
            ),
        ];
        if !habit.description.is_empty() {
            let used = super::helpers::spans_width(&spans);
            let room = width.saturating_sub(used + 2);
            if room > 3 {
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&habit.description, room)),
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

/// Note for the selected habit on the selected date, boxed over the list
pub fn render_notes_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let Some(habit) = session.selected_habit() else {
        return;
    };
    let date = session.selected_date();
    let bg = app.theme.background;
    let note = habit.note_on(date);

    let title = format!(" {} \u{00B7} {} ", habit.name, habit.note_key(date).as_str());
    let body = if note.is_empty() {
        Line::from(Span::styled(
            "No note yet",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(
            note.to_string(),
            Style::default().fg(app.theme.text).bg(bg),
        ))
    };
    let hint = Line::from(vec![
        Span::styled("e", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(" edit  ", Style::default().fg(app.theme.text).bg(bg)),
        Span::styled("n", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(" close", Style::default().fg(app.theme.text).bg(bg)),
    ]);

    let popup_w = 50.min(area.width.saturating_sub(2));
    let popup_h = 7.min(area.height);
    let overlay = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(app.theme.highlight).bg(bg)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(vec![body, Line::from(""), hint])
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render_list(app: &App) -> String {
        render_to_string(TERM_W, 10, |frame, area| render_habits_view(frame, app, area))
    }

    #[test]
    fn test_empty_list_hint() {
        let (_tmp, app) = test_app();
        assert!(render_list(&app).contains("No habits yet. Press 'a' to add one."));
    }

    #[test]
    fn test_marks_done_for_selected_date() {
        let (_tmp, mut app) = test_app();
        add_habits(&mut app, &["Read", "Run"]);
        app.store.toggle_completion("h001", test_today()).unwrap();

        let out = render_list(&app);
        assert!(out.contains("Habits for Wed May 14"));
        assert!(out.contains("○ Read"));
        assert!(out.contains("✓ Run"));

        // Move to yesterday: nothing done
        app.session.selected_date_index -= 1;
        let out = render_list(&app);
        assert!(out.contains("○ Run"));
    }

    #[test]
    fn test_shows_kind_and_description() {
        let (_tmp, mut app) = test_app();
        add_habits(&mut app, &["Read"]);
        let mut habit = app.session.habits[0].clone();
        habit.description = "ten pages".into();
        app.store.put_habit(&habit).unwrap();
        app.session.refresh_habits(&app.store);

        let out = render_list(&app);
        assert!(out.contains("Read  General  ten pages"));
    }

    #[test]
    fn test_notes_overlay_shows_note_for_key() {
        let (_tmp, mut app) = test_app();
        add_habits(&mut app, &["Meditate"]);
        let mut habit = app.session.habits[0].clone();
        habit.set_note_on(test_today(), "ten breaths");
        app.store.put_habit(&habit).unwrap();
        app.session.refresh_habits(&app.store);
        app.session.notes_visible = true;

        let out = render_to_string(TERM_W, 12, |frame, area| {
            render_notes_overlay(frame, &app, area)
        });
        assert!(out.contains("Meditate · general"));
        assert!(out.contains("ten breaths"));
    }

    #[test]
    fn test_notes_overlay_empty_note() {
        let (_tmp, mut app) = test_app();
        add_habits(&mut app, &["Meditate"]);
        let out = render_to_string(TERM_W, 12, |frame, area| {
            render_notes_overlay(frame, &app, area)
        });
        assert!(out.contains("No note yet"));
    }
}
