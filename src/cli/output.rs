use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Habit, HabitKind, Task};
use crate::ops::streak::Streaks;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HabitJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: HabitKind,
    pub archived: bool,
    pub done_today: bool,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub overdue: bool,
}

#[derive(Serialize)]
pub struct HabitStatsJson {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub streaks: Streaks,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub date: NaiveDate,
    pub habits: Vec<HabitStatsJson>,
}

#[derive(Serialize)]
pub struct DoneJson {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub done: bool,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn habit_to_json(habit: &Habit, done_today: bool) -> HabitJson {
    HabitJson {
        id: habit.id.clone(),
        name: habit.name.clone(),
        description: habit.description.clone(),
        kind: habit.kind,
        archived: habit.archived,
        done_today,
    }
}

pub fn task_to_json(task: &Task, today: NaiveDate) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        name: task.name.clone(),
        description: task.description.clone(),
        due_date: task.due_date,
        completed: task.completed,
        overdue: task.is_overdue(today),
    }
}
