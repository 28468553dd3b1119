//! The interaction state machine: one input action in, session and store
//! updated in place.
//!
//! Writes go straight to the store. A failed write is reported through
//! `status_message` and never rolls back the session.

use chrono::NaiveDate;

use crate::io::store::{Store, StoreError};
use crate::model::{Habit, Task};
use crate::ops::calendar::{WEEK_LEN, month_start, parse_date, shift_month};
use crate::session::form::{Field, PendingInput};
use crate::session::{Mode, Session};

/// One logical input, already decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move to the next top-level section (Tab)
    CycleSection,
    /// Start adding a habit or task ('a')
    StartAdd,
    /// Edit the selected habit ('e' in Habits)
    StartEdit,
    /// Enter
    Confirm,
    /// Esc
    Cancel,
    /// Move focus to the next form field (Tab inside forms)
    NextField,
    /// Space
    ToggleCompletion,
    /// 'd'
    Delete,
    /// 'r' in Archived
    Restore,
    /// 'n' shows or hides the notes overlay
    ToggleNotes,
    /// 'e' while the notes overlay is visible
    EditNote,
    /// 'c' in Habits
    OpenCalendar,
    Up,
    Down,
    Left,
    Right,
    /// A printable character typed into a form
    Insert(char),
    Backspace,
    /// 'q' or Ctrl+C
    Quit,
}

/// Apply one action to the session
pub fn apply(session: &mut Session, store: &mut Store, action: Action) {
    session.status_message = None;

    if action == Action::Quit {
        session.should_quit = true;
        return;
    }
    if action == Action::CycleSection {
        if session.mode.is_section() {
            cycle_section(session);
        }
        return;
    }

    match session.mode.clone() {
        Mode::Week => week(session, action),
        Mode::Habits => habits(session, store, action),
        Mode::Tasks => tasks(session, store, action),
        Mode::Stats => {}
        Mode::Calendar => calendar(session, action),
        Mode::Archived => archived(session, store, action),
        Mode::ChoosingHabitType => choosing_habit_type(session, action),
        Mode::AddingHabit => habit_form(session, store, None, action),
        Mode::EditingHabit { habit_id } => habit_form(session, store, Some(&habit_id), action),
        Mode::AddingTask => task_form(session, store, action),
        Mode::NoteEditor { habit_id, date } => note_editor(session, store, &habit_id, date, action),
    }
}

fn cycle_section(session: &mut Session) {
    session.notes_visible = false;
    session.mode = session.mode.section().next().mode();
}

fn move_date(session: &mut Session, action: Action) {
    match action {
        Action::Left => {
            session.selected_date_index = session.selected_date_index.saturating_sub(1);
        }
        Action::Right => {
            if session.selected_date_index + 1 < WEEK_LEN {
                session.selected_date_index += 1;
            }
        }
        _ => {}
    }
}

fn move_cursor(cursor: &mut usize, len: usize, action: Action) {
    match action {
        Action::Up => *cursor = cursor.saturating_sub(1),
        Action::Down => {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        }
        _ => {}
    }
}

/// Record a failed write as the visible notice
fn report(session: &mut Session, what: &str, err: StoreError) {
    tracing::warn!(error = %err, "{what} failed");
    session.status_message = Some(format!("{what} failed: {err}"));
}

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn week(session: &mut Session, action: Action) {
    if matches!(action, Action::Left | Action::Right) {
        move_date(session, action);
    }
}

fn habits(session: &mut Session, store: &mut Store, action: Action) {
    match action {
        Action::Up | Action::Down => {
            let len = session.habits.len();
            move_cursor(&mut session.selected_habit_index, len, action);
        }
        Action::Left | Action::Right => move_date(session, action),
        Action::StartAdd => {
            session.notes_visible = false;
            session.pending_kind = Default::default();
            session.mode = Mode::ChoosingHabitType;
        }
        Action::StartEdit => {
            let Some(habit) = session.selected_habit() else {
                return;
            };
            let habit_id = habit.id.clone();
            session.pending = PendingInput {
                field: Field::Name,
                name: habit.name.clone(),
                description: habit.description.clone(),
                ..Default::default()
            };
            session.mode = Mode::EditingHabit { habit_id };
        }
        Action::EditNote => {
            if session.notes_visible {
                start_note_edit(session);
            }
        }
        Action::ToggleCompletion => {
            let Some(habit) = session.selected_habit() else {
                return;
            };
            let habit_id = habit.id.clone();
            let date = session.selected_date();
            match store.toggle_completion(&habit_id, date) {
                Ok(done) => tracing::debug!(habit = %habit_id, %date, done, "toggled completion"),
                Err(e) => report(session, "Toggle", e),
            }
        }
        Action::Delete => {
            let Some(habit) = session.selected_habit() else {
                return;
            };
            let habit_id = habit.id.clone();
            match store.delete_habit(&habit_id) {
                Ok(_) => tracing::info!(habit = %habit_id, policy = ?store.delete_policy(), "deleted habit"),
                Err(e) => report(session, "Delete", e),
            }
            session.refresh_habits(store);
        }
        Action::ToggleNotes => {
            if !session.habits.is_empty() {
                session.notes_visible = !session.notes_visible;
            }
        }
        Action::Cancel => session.notes_visible = false,
        Action::OpenCalendar => {
            session.notes_visible = false;
            session.calendar_month = month_start(session.today);
            session.mode = Mode::Calendar;
        }
        _ => {}
    }
}

fn start_note_edit(session: &mut Session) {
    let date = session.selected_date();
    let Some(habit) = session.selected_habit() else {
        return;
    };
    let habit_id = habit.id.clone();
    let mut pending = PendingInput::starting_at(Field::Note);
    pending.note = habit.note_on(date).to_string();
    session.pending = pending;
    session.mode = Mode::NoteEditor { habit_id, date };
}

fn tasks(session: &mut Session, store: &mut Store, action: Action) {
    match action {
        Action::Up | Action::Down => {
            let len = session.tasks.len();
            move_cursor(&mut session.selected_task_index, len, action);
        }
        Action::StartAdd => {
            session.pending = PendingInput::starting_at(Field::Name);
            session.mode = Mode::AddingTask;
        }
        Action::ToggleCompletion => {
            let Some(task) = session.selected_task() else {
                return;
            };
            let task_id = task.id.clone();
            match store.toggle_task(&task_id) {
                Ok(done) => tracing::debug!(task = %task_id, ?done, "toggled task"),
                Err(e) => report(session, "Toggle", e),
            }
            session.refresh_tasks(store);
        }
        Action::Delete => {
            let Some(task) = session.selected_task() else {
                return;
            };
            let task_id = task.id.clone();
            if let Err(e) = store.delete_task(&task_id) {
                report(session, "Delete", e);
            }
            session.refresh_tasks(store);
        }
        _ => {}
    }
}

fn calendar(session: &mut Session, action: Action) {
    match action {
        Action::Left => session.calendar_month = shift_month(session.calendar_month, -1),
        Action::Right => session.calendar_month = shift_month(session.calendar_month, 1),
        Action::Up | Action::Down => {
            let len = session.habits.len();
            move_cursor(&mut session.selected_habit_index, len, action);
        }
        Action::Cancel => session.mode = Mode::Habits,
        _ => {}
    }
}

fn archived(session: &mut Session, store: &mut Store, action: Action) {
    match action {
        Action::Up | Action::Down => {
            let len = session.archived.len();
            move_cursor(&mut session.selected_archived_index, len, action);
        }
        Action::Restore => {
            let Some(habit) = session.selected_archived() else {
                return;
            };
            let habit_id = habit.id.clone();
            match store.set_archived(&habit_id, false) {
                Ok(_) => tracing::info!(habit = %habit_id, "restored habit"),
                Err(e) => report(session, "Restore", e),
            }
            session.refresh_habits(store);
        }
        Action::Cancel => session.mode = Mode::Habits,
        _ => {}
    }
}

fn choosing_habit_type(session: &mut Session, action: Action) {
    match action {
        Action::Up | Action::Down => session.pending_kind = session.pending_kind.flipped(),
        Action::Confirm => {
            session.pending = PendingInput::starting_at(Field::Name);
            session.mode = Mode::AddingHabit;
        }
        Action::Cancel => session.mode = Mode::Habits,
        _ => {}
    }
}

/// Add form when `editing` is None, edit form for that habit otherwise
fn habit_form(session: &mut Session, store: &mut Store, editing: Option<&str>, action: Action) {
    match action {
        Action::Insert(c) => session.pending.push(c),
        Action::Backspace => session.pending.backspace(),
        Action::NextField => {
            session.pending.field = match session.pending.field {
                Field::Name => Field::Description,
                _ => Field::Name,
            };
        }
        Action::Confirm if session.pending.field == Field::Name => {
            session.pending.field = Field::Description;
        }
        Action::Confirm => {
            let name = session.pending.name.trim().to_string();
            if name.is_empty() {
                return;
            }
            let description = session.pending.description.trim().to_string();
            let saved_id = match editing {
                Some(id) => save_edited_habit(session, store, id, name, description),
                None => save_new_habit(session, store, name, description),
            };
            session.pending.clear();
            session.mode = Mode::Habits;
            session.refresh_habits(store);
            if let Some(id) = saved_id
                && let Some(idx) = session.habits.iter().position(|h| h.id == id)
            {
                session.selected_habit_index = idx;
            }
        }
        Action::Cancel => {
            session.pending.clear();
            session.mode = Mode::Habits;
        }
        _ => {}
    }
}

fn save_new_habit(
    session: &mut Session,
    store: &mut Store,
    name: String,
    description: String,
) -> Option<String> {
    let mut habit = Habit::new(new_id(), name, session.pending_kind);
    habit.description = description;
    match store.put_habit(&habit) {
        Ok(()) => {
            tracing::info!(habit = %habit.id, kind = habit.kind.label(), "added habit");
            Some(habit.id)
        }
        Err(e) => {
            report(session, "Save", e);
            None
        }
    }
}

fn save_edited_habit(
    session: &mut Session,
    store: &mut Store,
    id: &str,
    name: String,
    description: String,
) -> Option<String> {
    let existing = match store.get_habit(id) {
        Ok(Some(h)) => h,
        Ok(None) => {
            session.status_message = Some("Habit no longer exists".to_string());
            return None;
        }
        Err(e) => {
            report(session, "Save", e);
            return None;
        }
    };
    let habit = Habit {
        name,
        description,
        ..existing
    };
    match store.put_habit(&habit) {
        Ok(()) => Some(habit.id),
        Err(e) => {
            report(session, "Save", e);
            None
        }
    }
}

fn task_form(session: &mut Session, store: &mut Store, action: Action) {
    match action {
        Action::Insert(c) => session.pending.push(c),
        Action::Backspace => session.pending.backspace(),
        Action::NextField => {
            session.pending.field = match session.pending.field {
                Field::Name => Field::Description,
                Field::Description => Field::DueDate,
                _ => Field::Name,
            };
        }
        Action::Confirm => {
            let name = session.pending.name.trim().to_string();
            if name.is_empty() {
                return;
            }
            let mut task = Task::new(new_id(), name);
            task.description = session.pending.description.trim().to_string();
            let due = session.pending.due_date.trim();
            let mut notice = None;
            if !due.is_empty() {
                match parse_date(due) {
                    Some(date) => task.due_date = Some(date),
                    None => notice = Some(format!("Ignored due date '{due}' (use YYYY-MM-DD)")),
                }
            }
            match store.put_task(&task) {
                Ok(()) => tracing::info!(task = %task.id, "added task"),
                Err(e) => report(session, "Save", e),
            }
            if let Some(msg) = notice
                && session.status_message.is_none()
            {
                session.status_message = Some(msg);
            }
            session.pending.clear();
            session.mode = Mode::Tasks;
            session.refresh_tasks(store);
            if let Some(idx) = session.tasks.iter().position(|t| t.id == task.id) {
                session.selected_task_index = idx;
            }
        }
        Action::Cancel => {
            session.pending.clear();
            session.mode = Mode::Tasks;
        }
        _ => {}
    }
}

fn note_editor(
    session: &mut Session,
    store: &mut Store,
    habit_id: &str,
    date: NaiveDate,
    action: Action,
) {
    match action {
        Action::Insert(c) => session.pending.push(c),
        Action::Backspace => session.pending.backspace(),
        Action::Confirm => {
            match store.get_habit(habit_id) {
                Ok(Some(mut habit)) => {
                    habit.set_note_on(date, &session.pending.note);
                    match store.put_habit(&habit) {
                        Ok(()) => tracing::debug!(habit = %habit_id, key = habit.note_key(date).as_str(), "saved note"),
                        Err(e) => report(session, "Save note", e),
                    }
                }
                Ok(None) => session.status_message = Some("Habit no longer exists".to_string()),
                Err(e) => report(session, "Save note", e),
            }
            session.pending.clear();
            session.mode = Mode::Habits;
            session.refresh_habits(store);
        }
        Action::Cancel => {
            session.pending.clear();
            session.mode = Mode::Habits;
        }
        _ => {}
    }
}
