//! Desktop reminders. The core hands `(title, message)` pairs to a
//! [Notifier]; delivery goes through the platform backend picked at
//! startup. Failures here are logged by callers and never interrupt the
//! command that triggered them.

pub mod backend;

use anyhow::Result;

use crate::{
    store::Store,
    store::entities::{GoalType, Habit},
    summary::HabitSummary,
};

use self::backend::Backend;

pub const REMINDER_TITLE: &str = "Didit Reminder";
pub const LATE_REMINDER_TITLE: &str = "Didit Late Reminder";

/// Environment kill-switch; set to `1` to silence every popup.
pub const DISABLE_ENV: &str = "DIDIT_NOTIFICATIONS_DISABLED";

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> Result<()>;
}

pub struct DesktopNotifier {
    backend: Backend,
}

impl DesktopNotifier {
    pub fn detect() -> Self {
        Self {
            backend: Backend::detect(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<()> {
        self.backend.deliver(title, message)
    }
}

pub fn notifications_enabled(store: &Store) -> bool {
    if std::env::var(DISABLE_ENV).as_deref() == Ok("1") {
        return false;
    }
    store.config("notifications") != Some("off")
}

/// Nudge for one habit that still has distance to today's goal.
pub fn goal_reminder(habit: &Habit, today: &HabitSummary) -> (String, String) {
    let message = match habit.goal_type {
        GoalType::Count => format!(
            "You've completed {}/{} {} today. Don't forget to reach your goal!",
            today.total_count, habit.daily_goal, habit.name
        ),
        GoalType::Duration => format!(
            "You've logged {:.1} hours of {} today. Keep going!",
            today.total_time, habit.name
        ),
    };
    (REMINDER_TITLE.to_string(), message)
}

pub fn late_reminder(pending_names: &[String]) -> (String, String) {
    (
        LATE_REMINDER_TITLE.to_string(),
        format!(
            "It's getting late! You still have pending goals: {}",
            join_names(pending_names)
        ),
    )
}

/// Joins habit names the way a sentence would: "a", "a and b",
/// "a, b and c". An empty list reads as "none".
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => "none".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn joins_names_naturally() {
        assert_eq!(join_names(&[]), "none");
        assert_eq!(join_names(&names(&["water"])), "water");
        assert_eq!(join_names(&names(&["water", "code"])), "water and code");
        assert_eq!(
            join_names(&names(&["water", "code", "read"])),
            "water, code and read"
        );
    }

    #[test]
    fn goal_reminder_matches_goal_type() {
        let mut habit = Habit {
            id: 1,
            name: "water".into(),
            emoji: "💧".to_string(),
            default_duration: "1x".to_string(),
            daily_goal: 8,
            goal_type: GoalType::Count,
            created_at: Utc::now(),
        };
        let mut today = HabitSummary {
            habit_name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            total_time: 0.0,
            total_count: 3,
            goal_progress: 37.5,
            streak: 1,
            bar_chart: String::new(),
        };

        let (title, message) = goal_reminder(&habit, &today);
        assert_eq!(title, REMINDER_TITLE);
        assert_eq!(
            message,
            "You've completed 3/8 water today. Don't forget to reach your goal!"
        );

        habit.goal_type = GoalType::Duration;
        today.total_time = 1.5;
        let (_, message) = goal_reminder(&habit, &today);
        assert_eq!(message, "You've logged 1.5 hours of water today. Keep going!");
    }

    #[test]
    fn late_reminder_lists_pending_names() {
        let (title, message) = late_reminder(&names(&["water", "code"]));
        assert_eq!(title, LATE_REMINDER_TITLE);
        assert_eq!(
            message,
            "It's getting late! You still have pending goals: water and code"
        );
    }

    #[test]
    fn config_switch_disables_notifications() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut store = Store::open(dir.path())?;
        assert!(notifications_enabled(&store));
        store.set_config("notifications", "off");
        assert!(!notifications_enabled(&store));
        Ok(())
    }
}
