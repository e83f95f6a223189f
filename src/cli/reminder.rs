use std::path::Path;

use anyhow::Result;
use chrono::Local;
use clap::Parser;

use crate::{
    daemon::{is_late, pending_goals, LATE_HOUR},
    notify::{
        goal_reminder, join_names, late_reminder, notifications_enabled, DesktopNotifier, Notifier,
    },
    store::{
        entities::{GoalType, Habit},
        Store,
    },
    summary::HabitSummary,
};

#[derive(Debug, Parser)]
pub struct ReminderCommand {
    #[arg(short, long, help = "Show late reminder only (after 8 PM)")]
    late: bool,
}

pub fn process_reminder_command(command: ReminderCommand, data_dir: &Path) -> Result<()> {
    let store = Store::open(data_dir)?;
    let now = Local::now();
    let pending = pending_goals(&store, now);

    if pending.is_empty() {
        if !command.late {
            println!("✅ All goals completed for today!");
        }
        return Ok(());
    }

    let notifier = DesktopNotifier::detect();
    if command.late {
        // Outside the late hours this command stays quiet, it exists for
        // cron-style invocations.
        if is_late(now, LATE_HOUR) {
            send_late_reminder(&store, &notifier, &pending);
        }
    } else {
        send_goal_reminders(&store, &notifier, &pending);
    }
    Ok(())
}

fn send_late_reminder(store: &Store, notifier: &impl Notifier, pending: &[(Habit, HabitSummary)]) {
    let names: Vec<String> = pending
        .iter()
        .map(|(habit, _)| habit.name.to_string())
        .collect();

    if notifications_enabled(store) {
        let (title, message) = late_reminder(&names);
        if let Err(error) = notifier.notify(&title, &message) {
            println!("⚠️  Late reminder notification failed: {error:#}");
        }
    }
    println!(
        "🌙 Late reminder: You still have pending goals: {}",
        join_names(&names)
    );
}

fn send_goal_reminders(store: &Store, notifier: &impl Notifier, pending: &[(Habit, HabitSummary)]) {
    let enabled = notifications_enabled(store);
    let mut progress_entries = Vec::with_capacity(pending.len());

    for (habit, today) in pending {
        progress_entries.push(progress_entry(habit, today));
        if enabled {
            let (title, message) = goal_reminder(habit, today);
            if let Err(error) = notifier.notify(&title, &message) {
                println!("⚠️  Goal reminder notification failed: {error:#}");
            }
        }
    }

    println!("📋 Pending goals: {}", join_names(&progress_entries));
}

fn progress_entry(habit: &Habit, today: &HabitSummary) -> String {
    match habit.goal_type {
        GoalType::Count => format!("{} ({}/{})", habit.name, today.total_count, habit.daily_goal),
        GoalType::Duration => {
            format!("{} ({:.1}/{})", habit.name, today.total_time, habit.daily_goal)
        }
    }
}
