use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A one-off to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Optional due date, stored as `YYYY-MM-DD`
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new, incomplete task stamped with the current time
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            due_date: None,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// True if the task is open and its due date is before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_incomplete() {
        let t = Task::new("t1", "Groceries");
        assert!(!t.completed);
        assert!(t.due_date.is_none());
    }

    #[test]
    fn test_due_date_serializes_as_iso() {
        let mut t = Task::new("t1", "File taxes");
        t.due_date = NaiveDate::from_ymd_opt(2025, 4, 15);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(r#""due_date":"2025-04-15""#));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_overdue_only_when_open_and_past() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        let mut t = Task::new("t1", "Call");
        assert!(!t.is_overdue(today));
        t.due_date = today.pred_opt();
        assert!(t.is_overdue(today));
        t.completed = true;
        assert!(!t.is_overdue(today));
    }
}
