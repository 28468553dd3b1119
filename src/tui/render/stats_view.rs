use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Habit;
use crate::ops::streak::{CompletionHistory, Streaks, streaks};
use crate::tui::app::App;

/// Streaks for one habit. A failed read shows as zero.
fn habit_streaks(app: &App, habit: &Habit) -> Streaks {
    let today = app.session.today;
    match CompletionHistory::load(&app.store, &habit.id, today) {
        Ok(history) => match streaks(&history, &habit.id, today) {
            Ok(s) => s,
            Err(never) => match never {},
        },
        Err(e) => {
            tracing::warn!(error = %e, habit = %habit.id, "could not load completions");
            Streaks::default()
        }
    }
}

/// Current and best streak for every active habit
pub fn render_stats_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Habit Statistics",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if app.session.habits.is_empty() {
        lines.push(Line::from(Span::styled(
            " No habits to show statistics for.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    for habit in &app.session.habits {
        let s = habit_streaks(app, habit);
        let color = if s.current >= 7 {
            app.theme.green
        } else if s.current > 0 {
            app.theme.yellow
        } else {
            app.theme.dim
        };
        lines.push(Line::from(Span::styled(
            format!(" {}", habit.name),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "   Current: {} {} | Best: {} {}",
                s.current,
                days(s.current),
                s.longest,
                days(s.longest)
            ),
            Style::default().fg(color).bg(bg),
        )));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn days(n: u32) -> &'static str {
    if n == 1 { "day" } else { "days" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use chrono::Duration;

    #[test]
    fn test_shows_current_and_best() {
        let (_tmp, mut app) = test_app();
        add_habits(&mut app, &["Read", "Run"]);
        let today = test_today();
        for back in [0, 1, 2, 5, 6, 7, 8] {
            app.store
                .toggle_completion("h000", today - Duration::days(back))
                .unwrap();
        }
        app.store
            .toggle_completion("h001", today - Duration::days(3))
            .unwrap();

        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_stats_view(frame, &app, area)
        });
        assert!(out.contains("Habit Statistics"));
        assert!(out.contains("Current: 3 days | Best: 4 days"));
        assert!(out.contains("Current: 0 days | Best: 1 day"));
    }

    #[test]
    fn test_empty_hint() {
        let (_tmp, app) = test_app();
        let out = render_to_string(TERM_W, 5, |frame, area| {
            render_stats_view(frame, &app, area)
        });
        assert!(out.contains("No habits to show statistics for."));
    }
}
