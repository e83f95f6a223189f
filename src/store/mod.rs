//! Habit state lives in three JSON documents under the per-user data
//! directory: `habits.json` (map keyed by habit name), `logs.json` (flat
//! append-only array) and `config.json` (string map). Everything is read
//! into memory when a store opens; mutating commands call [Store::save]
//! explicitly. A missing or unreadable document loads as empty so damaged
//! state never blocks the tool.

pub mod defaults;
pub mod entities;

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use self::entities::{Habit, LogEntry};

pub const HABITS_FILE: &str = "habits.json";
pub const LOGS_FILE: &str = "logs.json";
pub const CONFIG_FILE: &str = "config.json";

pub struct Store {
    data_dir: PathBuf,
    habits: HashMap<String, Habit>,
    logs: Vec<LogEntry>,
    config: HashMap<String, String>,
}

impl Store {
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("couldn't create data directory {data_dir:?}"))?;
        Ok(Self {
            data_dir: data_dir.to_owned(),
            habits: load_document(&data_dir.join(HABITS_FILE)),
            logs: load_document(&data_dir.join(LOGS_FILE)),
            config: load_document(&data_dir.join(CONFIG_FILE)),
        })
    }

    /// All habits in creation order.
    pub fn habits(&self) -> Vec<Habit> {
        let mut habits: Vec<Habit> = self.habits.values().cloned().collect();
        habits.sort_by_key(|habit| habit.id);
        habits
    }

    pub fn habit(&self, name: &str) -> Option<&Habit> {
        self.habits.get(&normalize_name(name))
    }

    /// Looks a habit up by name, creating it with seed defaults on first
    /// touch. Names are normalized to trimmed lowercase here so the
    /// primary-key invariant holds no matter which command came first.
    pub fn get_or_create_habit(&mut self, name: &str) -> Habit {
        let name = normalize_name(name);
        if let Some(habit) = self.habits.get(&name) {
            return habit.clone();
        }
        let seed = defaults::seed_for(&name);
        let habit = Habit {
            id: self.habits.len() as u32 + 1,
            name: name.as_str().into(),
            emoji: seed.emoji.to_string(),
            default_duration: seed.default_duration.to_string(),
            daily_goal: seed.daily_goal,
            goal_type: seed.goal_type,
            created_at: Utc::now(),
        };
        debug!("Created habit {:?}", habit.name);
        self.habits.insert(name, habit.clone());
        habit
    }

    pub fn update_habit(&mut self, habit: Habit) {
        self.habits.insert(habit.name.to_string(), habit);
    }

    pub fn append_log(
        &mut self,
        habit_id: u32,
        habit_name: &str,
        duration: &str,
        count: u32,
        notes: &str,
    ) {
        self.logs.push(LogEntry {
            id: self.logs.len() as u32 + 1,
            habit_id,
            habit_name: habit_name.into(),
            duration: duration.to_string(),
            count,
            logged_at: Utc::now(),
            notes: notes.to_string(),
        });
    }

    /// Log entries for one habit strictly inside (start, end). Both bounds
    /// are exclusive, matching how summaries window their data.
    pub fn logs_for_habit(
        &self,
        name: &str,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Vec<LogEntry> {
        let name = normalize_name(name);
        self.logs
            .iter()
            .filter(|log| log.habit_name.as_ref() == name)
            .filter(|log| {
                let logged = log.logged_at.with_timezone(&Local);
                start < logged && logged < end
            })
            .cloned()
            .collect()
    }

    pub fn config(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    pub fn set_config(&mut self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Writes the three documents back, habits first, then logs, then
    /// config. The first failure wins; later documents are left untouched.
    #[instrument(skip(self))]
    pub fn save(&self) -> Result<()> {
        self.save_document(HABITS_FILE, &self.habits)
            .context("couldn't save habits")?;
        self.save_document(LOGS_FILE, &self.logs)
            .context("couldn't save logs")?;
        self.save_document(CONFIG_FILE, &self.config)
            .context("couldn't save config")?;
        Ok(())
    }

    fn save_document<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        std::fs::write(self.data_dir.join(file_name), data)?;
        Ok(())
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn load_document<T: DeserializeOwned + Default>(path: &Path) -> T {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!("Couldn't read {path:?}, starting empty: {e}");
            return T::default();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            // ignore damaged documents. Might happen after shutdowns
            warn!("Found illegal json in {path:?}, starting empty: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::TimeZone;
    use tempfile::tempdir;

    use crate::store::entities::GoalType;

    use super::*;

    #[test]
    fn open_without_documents_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::open(dir.path())?;
        assert!(store.habits().is_empty());
        assert!(store.config("notifications").is_none());
        Ok(())
    }

    #[test]
    fn first_touch_applies_seed_defaults() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;

        let water = store.get_or_create_habit("water");
        assert_eq!(water.goal_type, GoalType::Count);
        assert_eq!(water.daily_goal, 8);
        assert_eq!(water.emoji, "💧");
        assert_eq!(water.default_duration, "1x");

        let other = store.get_or_create_habit("juggling");
        assert_eq!(other.goal_type, GoalType::Duration);
        assert_eq!(other.daily_goal, 0);
        assert_eq!(other.default_duration, "30m");
        Ok(())
    }

    #[test]
    fn names_normalize_to_trimmed_lowercase() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;

        let first = store.get_or_create_habit("  Water ");
        assert_eq!(first.name.as_ref(), "water");
        let second = store.get_or_create_habit("water");
        assert_eq!(second.id, first.id);
        assert_eq!(store.habits().len(), 1);
        assert!(store.habit("WATER").is_some());
        Ok(())
    }

    #[test]
    fn ids_follow_creation_order() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;
        store.get_or_create_habit("code");
        store.get_or_create_habit("read");
        store.get_or_create_habit("walk");

        let names: Vec<_> = store
            .habits()
            .into_iter()
            .map(|habit| habit.name.to_string())
            .collect();
        assert_eq!(names, vec!["code", "read", "walk"]);
        Ok(())
    }

    #[test]
    fn saved_state_survives_reopen() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;
        let habit = store.get_or_create_habit("code");
        store.append_log(habit.id, &habit.name, "1h30m", 0, "evening session");
        store.set_config("notifications", "off");
        store.save()?;

        let reopened = Store::open(dir.path())?;
        assert_eq!(reopened.habits(), store.habits());
        assert_eq!(reopened.logs, store.logs);
        assert_eq!(reopened.config("notifications"), Some("off"));
        Ok(())
    }

    #[test]
    fn damaged_documents_load_as_empty() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join(HABITS_FILE), b"{ definitely not json")?;
        std::fs::write(dir.path().join(LOGS_FILE), b"[1, 2")?;

        let store = Store::open(dir.path())?;
        assert!(store.habits().is_empty());
        assert!(store.logs.is_empty());
        Ok(())
    }

    #[test]
    fn log_queries_filter_by_name_and_window() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;
        let code = store.get_or_create_habit("code");
        let read = store.get_or_create_habit("read");
        store.append_log(code.id, &code.name, "1h", 0, "");
        store.append_log(read.id, &read.name, "30m", 0, "");

        let now = Local::now();
        let logs = store.logs_for_habit(
            "code",
            now - chrono::Duration::hours(1),
            now + chrono::Duration::hours(1),
        );
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].duration, "1h");
        Ok(())
    }

    #[test]
    fn window_bounds_are_exclusive() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;
        let habit = store.get_or_create_habit("code");

        let moment = Local.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        store.logs.push(LogEntry {
            id: 1,
            habit_id: habit.id,
            habit_name: habit.name.clone(),
            duration: "1h".to_string(),
            count: 0,
            logged_at: moment.with_timezone(&Utc),
            notes: String::new(),
        });

        let hour = chrono::Duration::hours(1);
        assert_eq!(store.logs_for_habit("code", moment, moment + hour).len(), 0);
        assert_eq!(store.logs_for_habit("code", moment - hour, moment).len(), 0);
        assert_eq!(
            store
                .logs_for_habit("code", moment - hour, moment + hour)
                .len(),
            1
        );
        Ok(())
    }
}
