use chrono::{Local, NaiveDate};

use crate::cli::commands::{Cli, Commands, DoneArgs, HabitsArgs};
use crate::cli::output::*;
use crate::io::config_io::{load_config, resolve_store_path, store_options};
use crate::io::logging;
use crate::io::store::Store;
use crate::model::Habit;
use crate::ops::calendar::parse_date;
use crate::ops::streak::{CompletionHistory, Streaks, streaks};
use crate::util::unicode::{display_width, pad_to_width};

/// Run a one-shot subcommand against the configured store
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    logging::init_stderr_logging();

    let config = load_config(cli.config.as_deref())?;
    let store_path = resolve_store_path(&config, cli.db.as_deref());
    let mut store = Store::open(&store_path, store_options(&config))?;
    let today = Local::now().date_naive();

    let result = match cli.command {
        // No subcommand launches the TUI in main.rs
        None => Ok(()),
        Some(cmd) => match cmd {
            Commands::Habits(args) => cmd_habits(&store, args, today, json),
            Commands::Tasks => cmd_tasks(&store, today, json),
            Commands::Stats => cmd_stats(&store, today, json),
            Commands::Done(args) => cmd_done(&mut store, args, today, json),
        },
    };
    store.close()?;
    result
}

fn sorted_habits(store: &Store, include_archived: bool) -> Result<Vec<Habit>, Box<dyn std::error::Error>> {
    let mut habits = store.list_habits(include_archived)?;
    habits.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(habits)
}

fn cmd_habits(
    store: &Store,
    args: HabitsArgs,
    today: NaiveDate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let habits = sorted_habits(store, args.archived)?;
    let mut rows = Vec::with_capacity(habits.len());
    for habit in &habits {
        rows.push((habit, store.is_completed(&habit.id, today)?));
    }

    if json {
        let out: Vec<HabitJson> = rows.iter().map(|(h, done)| habit_to_json(h, *done)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No habits yet.");
        return Ok(());
    }
    let name_w = rows.iter().map(|(h, _)| display_width(&h.name)).max().unwrap_or(0);
    for (habit, done) in rows {
        let mark = if done { "\u{2713}" } else { "\u{25CB}" };
        let archived = if habit.archived { "  [archived]" } else { "" };
        println!(
            "{} {}  {}{}",
            mark,
            pad_to_width(&habit.name, name_w),
            habit.kind.label(),
            archived
        );
    }
    Ok(())
}

fn cmd_tasks(store: &Store, today: NaiveDate, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut tasks = store.list_tasks()?;
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    if json {
        let out: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t, today)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }
    for task in &tasks {
        let mark = if task.completed { "\u{2713}" } else { "\u{25CB}" };
        let mut line = format!("{} {}", mark, task.name);
        if let Some(due) = task.due_date {
            line.push_str(&format!("  due {}", due.format("%Y-%m-%d")));
            if task.is_overdue(today) {
                line.push_str(" (overdue)");
            }
        }
        println!("{}", line);
    }
    Ok(())
}

fn habit_streaks(store: &Store, habit: &Habit, today: NaiveDate) -> Result<Streaks, Box<dyn std::error::Error>> {
    let history = CompletionHistory::load(store, &habit.id, today)?;
    match streaks(&history, &habit.id, today) {
        Ok(s) => Ok(s),
        Err(never) => match never {},
    }
}

fn cmd_stats(store: &Store, today: NaiveDate, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let habits = sorted_habits(store, false)?;
    let mut rows = Vec::with_capacity(habits.len());
    for habit in &habits {
        rows.push((habit, habit_streaks(store, habit, today)?));
    }

    if json {
        let out = StatsJson {
            date: today,
            habits: rows
                .iter()
                .map(|(h, s)| HabitStatsJson {
                    id: h.id.clone(),
                    name: h.name.clone(),
                    streaks: *s,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No habits to show statistics for.");
        return Ok(());
    }
    let name_w = rows.iter().map(|(h, _)| display_width(&h.name)).max().unwrap_or(0);
    for (habit, s) in rows {
        println!(
            "{}  current {:>3}  best {:>3}",
            pad_to_width(&habit.name, name_w),
            s.current,
            s.longest
        );
    }
    Ok(())
}

/// Find an active habit by exact id, else by case-insensitive name
fn resolve_habit(habits: &[Habit], query: &str) -> Result<Habit, String> {
    if let Some(h) = habits.iter().find(|h| h.id == query) {
        return Ok(h.clone());
    }
    let matches: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.name.eq_ignore_ascii_case(query.trim()))
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => Err(format!("no habit named '{}'", query)),
        _ => Err(format!(
            "'{}' matches {} habits; use the id instead",
            query,
            matches.len()
        )),
    }
}

fn cmd_done(
    store: &mut Store,
    args: DoneArgs,
    today: NaiveDate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let date = match args.date.as_deref() {
        Some(s) => parse_date(s).ok_or_else(|| format!("invalid date '{}' (use YYYY-MM-DD)", s))?,
        None => today,
    };
    let habits = sorted_habits(store, false)?;
    let habit = resolve_habit(&habits, &args.habit)?;
    let done = store.toggle_completion(&habit.id, date)?;
    tracing::info!(habit = %habit.id, %date, done, "toggled completion from cli");

    if json {
        let out = DoneJson {
            id: habit.id,
            name: habit.name,
            date,
            done,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let state = if done { "done" } else { "not done" };
        println!("{}: {} on {}", habit.name, state, date.format("%Y-%m-%d"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HabitKind;

    fn habits() -> Vec<Habit> {
        vec![
            Habit::new("h1", "Read", HabitKind::General),
            Habit::new("h2", "Run", HabitKind::Daily),
            Habit::new("h3", "run", HabitKind::General),
        ]
    }

    #[test]
    fn test_resolves_by_id_first() {
        assert_eq!(resolve_habit(&habits(), "h2").unwrap().name, "Run");
    }

    #[test]
    fn test_resolves_by_name_ignoring_case() {
        assert_eq!(resolve_habit(&habits(), "READ").unwrap().id, "h1");
    }

    #[test]
    fn test_ambiguous_and_missing_names_fail() {
        let err = resolve_habit(&habits(), "run").unwrap_err();
        assert!(err.contains("matches 2 habits"));
        let err = resolve_habit(&habits(), "swim").unwrap_err();
        assert!(err.contains("no habit named 'swim'"));
    }
}
