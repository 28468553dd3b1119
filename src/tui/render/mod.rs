pub mod archived_view;
pub mod calendar_view;
pub mod habits_view;
mod helpers;
pub mod popups;
pub mod stats_view;
pub mod status_row;
pub mod tab_bar;
pub mod tasks_view;
pub mod week_view;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::session::Mode;

use super::app::App;

/// Main render function. Dispatches to sub-renderers.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | week strip | content | status row (1 row)
    let strip_height = if shows_week_strip(&app.session.mode) {
        week_view::STRIP_HEIGHT
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(strip_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    if strip_height > 0 {
        week_view::render_week_strip(frame, app, chunks[1]);
    }

    let content = chunks[2];
    match &app.session.mode {
        Mode::Week => week_view::render_week_view(frame, app, content),
        Mode::Habits
        | Mode::ChoosingHabitType
        | Mode::AddingHabit
        | Mode::EditingHabit { .. }
        | Mode::NoteEditor { .. } => habits_view::render_habits_view(frame, app, content),
        Mode::Tasks | Mode::AddingTask => tasks_view::render_tasks_view(frame, app, content),
        Mode::Stats => stats_view::render_stats_view(frame, app, content),
        Mode::Calendar => calendar_view::render_calendar_view(frame, app, content),
        Mode::Archived => archived_view::render_archived_view(frame, app, content),
    }

    // Popups (rendered on top of content)
    match &app.session.mode {
        Mode::ChoosingHabitType => popups::render_type_chooser(frame, app, area),
        Mode::AddingHabit | Mode::EditingHabit { .. } => popups::render_habit_form(frame, app, area),
        Mode::AddingTask => popups::render_task_form(frame, app, area),
        Mode::NoteEditor { .. } => popups::render_note_editor(frame, app, area),
        Mode::Habits if app.session.notes_visible => {
            habits_view::render_notes_overlay(frame, app, content)
        }
        _ => {}
    }

    status_row::render_status_row(frame, app, chunks[3]);
}

/// The week strip shows where the selected date matters
fn shows_week_strip(mode: &Mode) -> bool {
    matches!(mode.section(), crate::session::Section::Week | crate::session::Section::Habits)
        && *mode != Mode::Calendar
}
