//! In-memory session state: what the user is doing right now.
//!
//! Nothing here is persisted. The lists are snapshots of the store, refreshed
//! by the controller after each write, and are what the cursors index into.

pub mod controller;
pub mod form;

use chrono::{NaiveDate, Weekday};

use crate::io::store::Store;
use crate::model::{Habit, HabitKind, Task};
use crate::ops::calendar::{month_start, week_containing};

pub use controller::{Action, apply};
pub use form::{Field, PendingInput};

/// Top-level sections reachable with cycle-section, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Week,
    Habits,
    Tasks,
    Stats,
    Archived,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Week,
        Section::Habits,
        Section::Tasks,
        Section::Stats,
        Section::Archived,
    ];

    pub fn next(self) -> Section {
        let idx = Section::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Section::ALL[(idx + 1) % Section::ALL.len()]
    }

    pub fn mode(self) -> Mode {
        match self {
            Section::Week => Mode::Week,
            Section::Habits => Mode::Habits,
            Section::Tasks => Mode::Tasks,
            Section::Stats => Mode::Stats,
            Section::Archived => Mode::Archived,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Week => "Week",
            Section::Habits => "Habits",
            Section::Tasks => "Tasks",
            Section::Stats => "Stats",
            Section::Archived => "Archived",
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Week,
    Habits,
    Tasks,
    Stats,
    /// Month grid for the selected habit
    Calendar,
    Archived,
    ChoosingHabitType,
    AddingHabit,
    EditingHabit { habit_id: String },
    AddingTask,
    /// Editing the note that applies to `habit_id` on `date`
    NoteEditor { habit_id: String, date: NaiveDate },
}

impl Mode {
    /// Modes where printable keys are typed into a buffer
    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            Mode::AddingHabit | Mode::EditingHabit { .. } | Mode::AddingTask | Mode::NoteEditor { .. }
        )
    }

    /// The section this mode belongs to (for the tab bar)
    pub fn section(&self) -> Section {
        match self {
            Mode::Week => Section::Week,
            Mode::Habits
            | Mode::Calendar
            | Mode::ChoosingHabitType
            | Mode::AddingHabit
            | Mode::EditingHabit { .. }
            | Mode::NoteEditor { .. } => Section::Habits,
            Mode::Tasks | Mode::AddingTask => Section::Tasks,
            Mode::Stats => Section::Stats,
            Mode::Archived => Section::Archived,
        }
    }

    /// True for the five modes that take part in cycle-section
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            Mode::Week | Mode::Habits | Mode::Tasks | Mode::Stats | Mode::Archived
        )
    }
}

/// Main session state
#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Mode,
    pub today: NaiveDate,
    pub week_start: Weekday,
    /// The seven dates of the week containing `today`
    pub visible_dates: Vec<NaiveDate>,
    pub selected_date_index: usize,
    pub selected_habit_index: usize,
    pub selected_task_index: usize,
    pub selected_archived_index: usize,
    pub pending: PendingInput,
    /// Kind picked in the type chooser
    pub pending_kind: HabitKind,
    /// First day of the month shown in Calendar mode
    pub calendar_month: NaiveDate,
    /// Notes overlay visible over the habits list
    pub notes_visible: bool,
    /// Active habits, creation order
    pub habits: Vec<Habit>,
    /// Archived habits, creation order
    pub archived: Vec<Habit>,
    /// Tasks, creation order
    pub tasks: Vec<Task>,
    /// Transient notice shown until the next key press
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl Session {
    /// A fresh session with empty lists, anchored on `today`
    pub fn new(today: NaiveDate, week_start: Weekday) -> Self {
        let visible_dates = week_containing(today, week_start);
        let selected_date_index = visible_dates
            .iter()
            .position(|d| *d == today)
            .unwrap_or(0);
        Session {
            mode: Mode::Week,
            today,
            week_start,
            visible_dates,
            selected_date_index,
            selected_habit_index: 0,
            selected_task_index: 0,
            selected_archived_index: 0,
            pending: PendingInput::default(),
            pending_kind: HabitKind::General,
            calendar_month: month_start(today),
            notes_visible: false,
            habits: Vec::new(),
            archived: Vec::new(),
            tasks: Vec::new(),
            status_message: None,
            should_quit: false,
        }
    }

    /// A fresh session with lists loaded from `store`
    pub fn start(store: &Store, today: NaiveDate, week_start: Weekday) -> Self {
        let mut session = Session::new(today, week_start);
        session.refresh_all(store);
        session
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.visible_dates
            .get(self.selected_date_index)
            .copied()
            .unwrap_or(self.today)
    }

    pub fn selected_habit(&self) -> Option<&Habit> {
        self.habits.get(self.selected_habit_index)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected_task_index)
    }

    pub fn selected_archived(&self) -> Option<&Habit> {
        self.archived.get(self.selected_archived_index)
    }

    /// Reload habits (active and archived). A failed read leaves both lists
    /// empty so the session stays usable.
    pub fn refresh_habits(&mut self, store: &Store) {
        match store.list_habits(true) {
            Ok(mut all) => {
                all.sort_by(|a, b| a.id.cmp(&b.id));
                let (archived, active) = all.into_iter().partition(|h| h.archived);
                self.habits = active;
                self.archived = archived;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read habits");
                self.habits.clear();
                self.archived.clear();
            }
        }
        self.clamp_cursors();
    }

    /// Reload tasks. A failed read leaves the list empty.
    pub fn refresh_tasks(&mut self, store: &Store) {
        match store.list_tasks() {
            Ok(mut tasks) => {
                tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
                self.tasks = tasks;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read tasks");
                self.tasks.clear();
            }
        }
        self.clamp_cursors();
    }

    pub fn refresh_all(&mut self, store: &Store) {
        self.refresh_habits(store);
        self.refresh_tasks(store);
    }

    /// Keep every cursor inside its list (0 when the list is empty)
    pub fn clamp_cursors(&mut self) {
        self.selected_date_index = clamp(self.selected_date_index, self.visible_dates.len());
        self.selected_habit_index = clamp(self.selected_habit_index, self.habits.len());
        self.selected_task_index = clamp(self.selected_task_index, self.tasks.len());
        self.selected_archived_index = clamp(self.selected_archived_index, self.archived.len());
        if self.habits.is_empty() {
            self.notes_visible = false;
        }
    }

    /// Note text for the selected habit on the selected date
    pub fn selected_note(&self) -> Option<&str> {
        let date = self.selected_date();
        self.selected_habit().map(|h| h.note_on(date))
    }
}

fn clamp(idx: usize, len: usize) -> usize {
    if len == 0 { 0 } else { idx.min(len - 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
    }

    #[test]
    fn test_new_session_starts_in_week_on_today() {
        let s = Session::new(wed(), Weekday::Sun);
        assert_eq!(s.mode, Mode::Week);
        assert_eq!(s.visible_dates.len(), 7);
        assert_eq!(s.selected_date(), wed());
        assert_eq!(s.selected_date_index, 3);
        assert_eq!(s.calendar_month, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    }

    #[test]
    fn test_section_cycle_has_length_five() {
        let mut section = Section::Week;
        for _ in 0..5 {
            section = section.next();
        }
        assert_eq!(section, Section::Week);
        assert_eq!(Section::Archived.next(), Section::Week);
    }

    #[test]
    fn test_overlays_belong_to_their_section() {
        assert_eq!(Mode::Calendar.section(), Section::Habits);
        assert_eq!(Mode::AddingTask.section(), Section::Tasks);
        assert!(!Mode::Calendar.is_section());
        assert!(Mode::AddingTask.is_text_input());
        assert!(!Mode::ChoosingHabitType.is_text_input());
    }

    #[test]
    fn test_clamp_cursors_handles_empty_and_short_lists() {
        let mut s = Session::new(wed(), Weekday::Sun);
        s.selected_habit_index = 4;
        s.selected_task_index = 2;
        s.notes_visible = true;
        s.clamp_cursors();
        assert_eq!(s.selected_habit_index, 0);
        assert_eq!(s.selected_task_index, 0);
        assert!(!s.notes_visible);

        s.habits = vec![
            Habit::new("a", "A", HabitKind::General),
            Habit::new("b", "B", HabitKind::General),
        ];
        s.selected_habit_index = 9;
        s.clamp_cursors();
        assert_eq!(s.selected_habit_index, 1);
    }
}
