use chrono::{NaiveDate, Weekday};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::store::{Store, StoreOptions};
use crate::model::{Habit, HabitKind, Task};
use crate::session::Session;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Wednesday 2025-05-14; the week strip runs Sun 11 .. Sat 17.
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
}

/// An App over an empty store in a temp dir. Keep the TempDir alive.
pub fn test_app() -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let store = Store::open(&tmp.path().join("tally.db"), StoreOptions::default()).unwrap();
    let session = Session::start(&store, test_today(), Weekday::Sun);
    (tmp, App::new(session, store, Theme::default()))
}

/// Store General habits with ids sorting in the given order, then refresh.
pub fn add_habits(app: &mut App, names: &[&str]) {
    let offset = app.session.habits.len() + app.session.archived.len();
    for (i, name) in names.iter().enumerate() {
        let habit = Habit::new(format!("h{:03}", offset + i), *name, HabitKind::General);
        app.store.put_habit(&habit).unwrap();
    }
    app.session.refresh_habits(&app.store);
}

/// Store tasks in the given order, then refresh.
pub fn add_tasks(app: &mut App, names: &[&str]) {
    let offset = app.session.tasks.len();
    for (i, name) in names.iter().enumerate() {
        let mut task = Task::new(format!("t{:03}", offset + i), *name);
        task.created_at += chrono::Duration::seconds(i as i64);
        app.store.put_task(&task).unwrap();
    }
    app.session.refresh_tasks(&app.store);
}
