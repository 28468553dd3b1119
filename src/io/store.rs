//! Durable, namespaced key-value storage for habits, completions and tasks.
//!
//! The store is an SQLite file used as a plain bucket/key/value table. Each
//! record is JSON, so fields can be added later without a migration. Every
//! mutating call runs in its own transaction.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::io::lock::{LockError, StoreLock};
use crate::model::{DeletePolicy, Habit, Task};
use crate::ops::calendar::date_key;

const SCHEMA_VERSION: i32 = 1;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("could not open store at {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not encode or decode record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The three independent collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Habits,
    Completions,
    Tasks,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Habits => "habits",
            Bucket::Completions => "completions",
            Bucket::Tasks => "tasks",
        }
    }
}

/// Presence record for "habit was done on date"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub habit_id: String,
    pub date: NaiveDate,
}

/// Options fixed for the lifetime of an open store
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    pub lock_timeout: Duration,
    pub delete_policy: DeletePolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            lock_timeout: Duration::from_secs(1),
            delete_policy: DeletePolicy::Archive,
        }
    }
}

/// An open store. Owns the database connection and the process lock.
pub struct Store {
    // Field order matters: the connection closes before the lock is released.
    conn: Connection,
    path: PathBuf,
    policy: DeletePolicy,
    _lock: StoreLock,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish()
    }
}

fn completion_key(habit_id: &str, date: NaiveDate) -> String {
    format!("{}/{}", habit_id, date_key(date))
}

/// Exclusive upper bound for keys starting with `prefix`
/// (prefix always ends in '/', and '0' is the next byte).
fn prefix_upper_bound(prefix: &str) -> String {
    let mut upper = prefix.trim_end_matches('/').to_string();
    upper.push('0');
    upper
}

impl Store {
    /// Open (creating if needed) the store at `path`, taking the process lock
    /// first. Fails with [`LockError::InUse`] if another process holds it.
    pub fn open(path: &Path, options: StoreOptions) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let lock = StoreLock::acquire(path, options.lock_timeout)?;

        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        init_schema(&conn).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!(
            path = %path.display(),
            policy = ?options.delete_policy,
            "store opened"
        );

        Ok(Store {
            conn,
            path: path.to_path_buf(),
            policy: options.delete_policy,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.policy
    }

    /// Close the connection and release the lock.
    pub fn close(self) -> Result<(), StoreError> {
        let Store {
            conn, path, _lock, ..
        } = self;
        conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
        drop(_lock);
        tracing::info!(path = %path.display(), "store closed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Habits

    /// Habits in storage order. Archived habits only when asked for.
    pub fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, StoreError> {
        let habits: Vec<Habit> = scan(&self.conn, Bucket::Habits)?;
        Ok(habits
            .into_iter()
            .filter(|h| include_archived || !h.archived)
            .collect())
    }

    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>, StoreError> {
        get(&self.conn, Bucket::Habits, id)
    }

    /// Insert or fully replace a habit by id
    pub fn put_habit(&mut self, habit: &Habit) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        put(&tx, Bucket::Habits, &habit.id, habit)?;
        tx.commit()?;
        tracing::debug!(id = %habit.id, "habit saved");
        Ok(())
    }

    /// Delete a habit according to the store's policy. Returns false if the
    /// habit did not exist.
    pub fn delete_habit(&mut self, id: &str) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let Some(mut habit) = get::<Habit>(&tx, Bucket::Habits, id)? else {
            return Ok(false);
        };

        match self.policy {
            DeletePolicy::Archive => {
                habit.archived = true;
                put(&tx, Bucket::Habits, id, &habit)?;
                tx.commit()?;
                tracing::info!(id, "habit archived");
            }
            DeletePolicy::Cascade => {
                delete(&tx, Bucket::Habits, id)?;
                let removed = delete_completions_of(&tx, id)?;
                tx.commit()?;
                tracing::info!(id, completions = removed, "habit deleted");
            }
        }
        Ok(true)
    }

    /// Archive or restore a habit. Completions are untouched either way.
    pub fn set_archived(&mut self, id: &str, archived: bool) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let Some(mut habit) = get::<Habit>(&tx, Bucket::Habits, id)? else {
            return Ok(false);
        };
        habit.archived = archived;
        put(&tx, Bucket::Habits, id, &habit)?;
        tx.commit()?;
        tracing::info!(id, archived, "habit archive flag changed");
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Completions

    /// Flip the completion for (habit, date) and return the new state.
    /// Missing habits report `false`; archived habits are left alone and
    /// report whatever is stored.
    pub fn toggle_completion(&mut self, habit_id: &str, date: NaiveDate) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let key = completion_key(habit_id, date);
        match get::<Habit>(&tx, Bucket::Habits, habit_id)? {
            Some(h) if !h.archived => {}
            Some(_) => {
                tracing::debug!(habit_id, "toggle ignored: habit is archived");
                return Ok(get_raw(&tx, Bucket::Completions, &key)?.is_some());
            }
            None => {
                tracing::debug!(habit_id, "toggle ignored: no such habit");
                return Ok(false);
            }
        }

        let now_done = if delete(&tx, Bucket::Completions, &key)? {
            false
        } else {
            let record = Completion {
                habit_id: habit_id.to_string(),
                date,
            };
            put(&tx, Bucket::Completions, &key, &record)?;
            true
        };
        tx.commit()?;
        tracing::debug!(habit_id, date = %date, done = now_done, "completion toggled");
        Ok(now_done)
    }

    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> Result<bool, StoreError> {
        let key = completion_key(habit_id, date);
        Ok(get_raw(&self.conn, Bucket::Completions, &key)?.is_some())
    }

    /// Completed dates for a habit in `from..=to`, from a single range scan
    pub fn completed_dates(
        &self,
        habit_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeSet<NaiveDate>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT value FROM kv WHERE bucket = ?1 AND key >= ?2 AND key <= ?3",
        )?;
        let rows = stmt.query_map(
            params![
                Bucket::Completions.as_str(),
                completion_key(habit_id, from),
                completion_key(habit_id, to)
            ],
            |row| row.get::<_, String>(0),
        )?;

        let mut dates = BTreeSet::new();
        for raw in rows {
            let record: Completion = serde_json::from_str(&raw?)?;
            if record.habit_id == habit_id {
                dates.insert(record.date);
            }
        }
        Ok(dates)
    }

    // -----------------------------------------------------------------------
    // Tasks

    pub fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        scan(&self.conn, Bucket::Tasks)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        get(&self.conn, Bucket::Tasks, id)
    }

    pub fn put_task(&mut self, task: &Task) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        put(&tx, Bucket::Tasks, &task.id, task)?;
        tx.commit()?;
        tracing::debug!(id = %task.id, "task saved");
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let existed = delete(&tx, Bucket::Tasks, id)?;
        tx.commit()?;
        tracing::debug!(id, existed, "task deleted");
        Ok(existed)
    }

    /// Flip a task's completed flag. `None` if there is no such task.
    pub fn toggle_task(&mut self, id: &str) -> Result<Option<bool>, StoreError> {
        let tx = self.conn.transaction()?;
        let Some(mut task) = get::<Task>(&tx, Bucket::Tasks, id)? else {
            return Ok(None);
        };
        task.completed = !task.completed;
        put(&tx, Bucket::Tasks, id, &task)?;
        tx.commit()?;
        tracing::debug!(id, completed = task.completed, "task toggled");
        Ok(Some(task.completed))
    }

    /// Remove the backing table so every later call fails
    #[cfg(test)]
    pub(crate) fn break_storage(&self) {
        self.conn.execute_batch("DROP TABLE kv").unwrap();
    }
}

fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=FULL;
        CREATE TABLE IF NOT EXISTS kv (
            bucket TEXT NOT NULL,
            key    TEXT NOT NULL,
            value  TEXT NOT NULL,
            PRIMARY KEY (bucket, key)
        );
        "#,
    )?;
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
    }
    Ok(())
}

fn get_raw(conn: &Connection, bucket: Bucket, key: &str) -> Result<Option<String>, StoreError> {
    let value = conn
        .query_row(
            "SELECT value FROM kv WHERE bucket = ?1 AND key = ?2",
            params![bucket.as_str(), key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

fn get<T: DeserializeOwned>(
    conn: &Connection,
    bucket: Bucket,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match get_raw(conn, bucket, key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Upsert that keeps the row's storage position
fn put<T: Serialize>(conn: &Connection, bucket: Bucket, key: &str, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO kv (bucket, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT(bucket, key) DO UPDATE SET value = excluded.value",
        params![bucket.as_str(), key, raw],
    )?;
    Ok(())
}

fn delete(conn: &Connection, bucket: Bucket, key: &str) -> Result<bool, StoreError> {
    let n = conn.execute(
        "DELETE FROM kv WHERE bucket = ?1 AND key = ?2",
        params![bucket.as_str(), key],
    )?;
    Ok(n > 0)
}

fn scan<T: DeserializeOwned>(conn: &Connection, bucket: Bucket) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE bucket = ?1 ORDER BY rowid")?;
    let rows = stmt.query_map(params![bucket.as_str()], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for raw in rows {
        out.push(serde_json::from_str(&raw?)?);
    }
    Ok(out)
}

/// Remove every completion recorded for `habit_id`
fn delete_completions_of(conn: &Connection, habit_id: &str) -> Result<usize, StoreError> {
    let prefix = format!("{}/", habit_id);
    let upper = prefix_upper_bound(&prefix);

    let keys: Vec<String> = {
        let mut stmt = conn.prepare(
            "SELECT key, value FROM kv WHERE bucket = ?1 AND key >= ?2 AND key < ?3",
        )?;
        let rows = stmt.query_map(
            params![Bucket::Completions.as_str(), prefix, upper],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;
        let mut keys = Vec::new();
        for row in rows {
            let (key, raw) = row?;
            // Ids containing '/' can share a key prefix; trust the record,
            // or the exact key shape when the record is unreadable
            match serde_json::from_str::<Completion>(&raw) {
                Ok(c) if c.habit_id == habit_id => keys.push(key),
                Ok(_) => {}
                Err(e) => {
                    let owned = key
                        .strip_prefix(&prefix)
                        .is_some_and(|date| date.parse::<NaiveDate>().is_ok());
                    tracing::warn!(%key, error = %e, owned, "unreadable completion record");
                    if owned {
                        keys.push(key);
                    }
                }
            }
        }
        keys
    };

    for key in &keys {
        delete(conn, Bucket::Completions, key)?;
    }
    Ok(keys.len())
}
