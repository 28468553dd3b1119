use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::HabitKind;
use crate::session::{Field, Mode};
use crate::tui::app::App;

use super::helpers::centered_rect_fixed;

const POPUP_W: u16 = 56;

/// Draw a bordered popup of `lines` centered in `area`
fn render_popup(frame: &mut Frame, app: &App, area: Rect, title: &str, lines: Vec<Line>) {
    let bg = app.theme.background;
    let popup_w = POPUP_W.min(area.width.saturating_sub(2));
    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

/// One labelled input row; the active one gets a cursor
fn field_line<'a>(app: &App, label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let bg = app.theme.background;
    let label_style = if active {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let mut spans = vec![
        Span::styled(format!("  {label:<12}"), label_style),
        Span::styled(value, Style::default().fg(app.theme.text_bright).bg(bg)),
    ];
    if active {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    Line::from(spans)
}

fn hint_line(app: &App, hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled("  ", Style::default().bg(bg))];
    for (key, what) in hints {
        spans.push(Span::styled(*key, Style::default().fg(app.theme.dim).bg(bg)));
        spans.push(Span::styled(
            format!(" {what}  "),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }
    Line::from(spans)
}

/// General / Daily picker shown before the add form
pub fn render_type_chooser(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut lines = vec![Line::from("")];
    for kind in [HabitKind::General, HabitKind::Daily] {
        let selected = kind == app.session.pending_kind;
        let (marker, style) = if selected {
            (
                "\u{25B8} ",
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default().fg(app.theme.text).bg(bg))
        };
        let blurb = match kind {
            HabitKind::General => "one note for the habit",
            HabitKind::Daily => "a note per weekday",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {marker}{}", kind.label()), style),
            Span::styled(format!("  {blurb}"), Style::default().fg(app.theme.dim).bg(bg)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(hint_line(app, &[("\u{2191}\u{2193}", "switch"), ("Enter", "next"), ("Esc", "cancel")]));
    render_popup(frame, app, area, "Habit type", lines);
}

/// Name and description form for adding or editing a habit
pub fn render_habit_form(frame: &mut Frame, app: &App, area: Rect) {
    let pending = &app.session.pending;
    let title = match app.session.mode {
        Mode::EditingHabit { .. } => "Edit habit".to_string(),
        _ => format!("New {} habit", app.session.pending_kind.label().to_lowercase()),
    };
    let lines = vec![
        Line::from(""),
        field_line(app, "Name", &pending.name, pending.field == Field::Name),
        field_line(app, "Description", &pending.description, pending.field == Field::Description),
        Line::from(""),
        hint_line(app, &[("Tab", "field"), ("Enter", "next/save"), ("Esc", "cancel")]),
    ];
    render_popup(frame, app, area, &title, lines);
}

/// Name, description and due date form for a new task
pub fn render_task_form(frame: &mut Frame, app: &App, area: Rect) {
    let pending = &app.session.pending;
    let lines = vec![
        Line::from(""),
        field_line(app, "Name", &pending.name, pending.field == Field::Name),
        field_line(app, "Description", &pending.description, pending.field == Field::Description),
        field_line(app, "Due", &pending.due_date, pending.field == Field::DueDate),
        Line::from(""),
        hint_line(app, &[("Tab", "field"), ("Enter", "save"), ("Esc", "cancel")]),
    ];
    render_popup(frame, app, area, "New task", lines);
}

/// Note text being edited, with the key it will be saved under
pub fn render_note_editor(frame: &mut Frame, app: &App, area: Rect) {
    let Mode::NoteEditor { habit_id, date } = &app.session.mode else {
        return;
    };
    let key = app
        .session
        .habits
        .iter()
        .find(|h| &h.id == habit_id)
        .map(|h| h.note_key(*date).as_str())
        .unwrap_or("note");
    let bg = app.theme.background;
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Style::default().bg(bg)),
            Span::styled(
                app.session.pending.note.as_str(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        ]),
        Line::from(""),
        hint_line(app, &[("Enter", "save"), ("Esc", "cancel")]),
    ];
    render_popup(frame, app, area, &format!("Note \u{00B7} {key}"), lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Action, apply};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn test_type_chooser_marks_pending_kind() {
        let (_tmp, mut app) = test_app();
        app.session.mode = Mode::Habits;
        apply(&mut app.session, &mut app.store, Action::StartAdd);
        apply(&mut app.session, &mut app.store, Action::Down);

        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_type_chooser(frame, &app, area)
        });
        assert!(out.contains("Habit type"));
        assert!(out.contains("▸ Daily"));
        assert!(!out.contains("▸ General"));
    }

    #[test]
    fn test_habit_form_shows_buffers_and_cursor() {
        let (_tmp, mut app) = test_app();
        app.session.mode = Mode::Habits;
        apply(&mut app.session, &mut app.store, Action::StartAdd);
        apply(&mut app.session, &mut app.store, Action::Confirm);
        for c in "Run".chars() {
            apply(&mut app.session, &mut app.store, Action::Insert(c));
        }

        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_habit_form(frame, &app, area)
        });
        assert!(out.contains("New general habit"));
        assert!(out.contains("Name        Run▌"));
    }

    #[test]
    fn test_task_form_has_due_field() {
        let (_tmp, mut app) = test_app();
        app.session.mode = Mode::Tasks;
        apply(&mut app.session, &mut app.store, Action::StartAdd);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_form(frame, &app, area)
        });
        assert!(out.contains("New task"));
        assert!(out.contains("Due"));
    }

    #[test]
    fn test_note_editor_names_the_weekday_key() {
        let (_tmp, mut app) = test_app();
        add_habits(&mut app, &["Gym"]);
        let mut habit = app.session.habits[0].clone();
        habit.kind = HabitKind::Daily;
        app.store.put_habit(&habit).unwrap();
        app.session.refresh_habits(&app.store);
        app.session.mode = Mode::Habits;
        apply(&mut app.session, &mut app.store, Action::ToggleNotes);
        apply(&mut app.session, &mut app.store, Action::EditNote);
        apply(&mut app.session, &mut app.store, Action::Insert('x'));

        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_note_editor(frame, &app, area)
        });
        assert!(out.contains("Note · Wednesday"));
        assert!(out.contains("x▌"));
    }
}
