use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally", about = concat!("tally v", env!("CARGO_PKG_VERSION"), " - habits, streaks and tasks in your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Store file to use instead of the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file to read instead of the default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List habits with today's state
    Habits(HabitsArgs),
    /// List tasks
    Tasks,
    /// Show current and longest streak per habit
    Stats,
    /// Toggle a habit's completion for today (or --date)
    Done(DoneArgs),
}

#[derive(Args)]
pub struct HabitsArgs {
    /// Include archived habits
    #[arg(long)]
    pub archived: bool,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Habit id or name (case-insensitive)
    pub habit: String,
    /// Date as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
}
