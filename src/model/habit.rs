use chrono::{Datelike, NaiveDate, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ops::calendar::weekday_name;

/// Note key used by every general habit
pub const GENERAL_NOTE_KEY: &str = "general";

/// How a habit keys its notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    /// One note for the whole habit
    #[default]
    General,
    /// One note per weekday
    Daily,
}

impl HabitKind {
    /// The other kind (used by the type chooser)
    pub fn flipped(self) -> Self {
        match self {
            HabitKind::General => HabitKind::Daily,
            HabitKind::Daily => HabitKind::General,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HabitKind::General => "General",
            HabitKind::Daily => "Daily",
        }
    }
}

/// Key into a habit's note map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKey {
    General,
    Day(Weekday),
}

impl NoteKey {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteKey::General => GENERAL_NOTE_KEY,
            NoteKey::Day(day) => weekday_name(day),
        }
    }
}

/// A recurring, trackable activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: HabitKind,
    /// Note text by note key. Always present, possibly empty.
    #[serde(default)]
    pub notes: IndexMap<String, String>,
    #[serde(default)]
    pub archived: bool,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: HabitKind) -> Self {
        Habit {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            notes: IndexMap::new(),
            archived: false,
        }
    }

    /// The note key this habit uses for `date`: the constant general key,
    /// or the weekday name for daily habits.
    pub fn note_key(&self, date: NaiveDate) -> NoteKey {
        match self.kind {
            HabitKind::General => NoteKey::General,
            HabitKind::Daily => NoteKey::Day(date.weekday()),
        }
    }

    /// Note text that applies on `date` (empty if none)
    pub fn note_on(&self, date: NaiveDate) -> &str {
        self.notes
            .get(self.note_key(date).as_str())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Replace the note that applies on `date`. Empty text removes the entry.
    pub fn set_note_on(&mut self, date: NaiveDate, text: &str) {
        let key = self.note_key(date).as_str();
        if text.is_empty() {
            self.notes.shift_remove(key);
        } else {
            self.notes.insert(key.to_string(), text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 14).unwrap()
    }

    #[test]
    fn test_general_habit_uses_constant_key() {
        let mut h = Habit::new("h1", "Read", HabitKind::General);
        h.set_note_on(wed(), "chapter 3");
        assert_eq!(h.notes.keys().collect::<Vec<_>>(), vec!["general"]);
        // Any other date reads the same note
        assert_eq!(h.note_on(wed().succ_opt().unwrap()), "chapter 3");
    }

    #[test]
    fn test_daily_habit_uses_weekday_key() {
        let mut h = Habit::new("h1", "Run", HabitKind::Daily);
        h.set_note_on(wed(), "5k");
        assert_eq!(h.notes.get("Wednesday").map(String::as_str), Some("5k"));
        assert_eq!(h.note_on(wed().succ_opt().unwrap()), "");
    }

    #[test]
    fn test_empty_note_removes_entry() {
        let mut h = Habit::new("h1", "Run", HabitKind::Daily);
        h.set_note_on(wed(), "5k");
        h.set_note_on(wed(), "");
        assert!(h.notes.is_empty());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let h: Habit = serde_json::from_str(r#"{"id":"x","name":"Walk"}"#).unwrap();
        assert_eq!(h.kind, HabitKind::General);
        assert!(h.notes.is_empty());
        assert!(!h.archived);
        assert_eq!(h.description, "");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let h: Habit = serde_json::from_str(
            r#"{"id":"x","name":"Walk","kind":"daily","color":"red","notes":{"Monday":"park"}}"#,
        )
        .unwrap();
        assert_eq!(h.kind, HabitKind::Daily);
        assert_eq!(h.notes.get("Monday").map(String::as_str), Some("park"));
    }
}
