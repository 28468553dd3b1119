use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{Action, Mode};

/// Keys outside the text forms
pub(super) fn navigate_action(mode: &Mode, notes_visible: bool, key: KeyEvent) -> Option<Action> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    // Movement keys mean the same thing in every list
    let movement = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Right),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    };
    if movement.is_some() {
        return movement;
    }

    match mode {
        Mode::ChoosingHabitType => match key.code {
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        Mode::Calendar => match key.code {
            KeyCode::Char('[') => Some(Action::Left),
            KeyCode::Char(']') => Some(Action::Right),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        Mode::Habits => match key.code {
            KeyCode::Tab => Some(Action::CycleSection),
            KeyCode::Char('a') => Some(Action::StartAdd),
            KeyCode::Char('e') if notes_visible => Some(Action::EditNote),
            KeyCode::Char('e') => Some(Action::StartEdit),
            KeyCode::Char(' ') => Some(Action::ToggleCompletion),
            KeyCode::Char('d') => Some(Action::Delete),
            KeyCode::Char('n') => Some(Action::ToggleNotes),
            KeyCode::Char('c') => Some(Action::OpenCalendar),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        Mode::Tasks => match key.code {
            KeyCode::Tab => Some(Action::CycleSection),
            KeyCode::Char('a') => Some(Action::StartAdd),
            KeyCode::Char(' ') => Some(Action::ToggleCompletion),
            KeyCode::Char('d') => Some(Action::Delete),
            _ => None,
        },
        Mode::Archived => match key.code {
            KeyCode::Tab => Some(Action::CycleSection),
            KeyCode::Char('r') => Some(Action::Restore),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        Mode::Week | Mode::Stats => match key.code {
            KeyCode::Tab => Some(Action::CycleSection),
            _ => None,
        },
        Mode::AddingHabit | Mode::EditingHabit { .. } | Mode::AddingTask | Mode::NoteEditor { .. } => {
            None
        }
    }
}
