use std::{collections::HashMap, path::Path};

use ansi_term::Colour::{Cyan, Green, Yellow};
use anyhow::Result;
use chrono::{DateTime, Duration, Local};
use clap::Parser;

use crate::{
    store::{
        entities::{GoalType, Habit, LogEntry},
        Store,
    },
    summary::{
        motivational_message, summarize_habit, summarize_window, HabitSummary, Window,
        WindowSummary,
    },
    utils::time::{long_date, short_date},
};

#[derive(Debug, Parser)]
pub struct SummaryCommand {
    #[arg(short, long, help = "Show weekly summary", conflicts_with = "daily")]
    weekly: bool,
    #[arg(short, long, help = "Show daily summary")]
    daily: bool,
}

pub fn process_summary_command(command: SummaryCommand, data_dir: &Path) -> Result<()> {
    let store = Store::open(data_dir)?;
    let habits = store.habits();
    if habits.is_empty() {
        print_welcome();
        return Ok(());
    }

    let now = Local::now();
    if command.weekly || !command.daily {
        print_weekly_summary(&store, &habits, now);
    } else {
        print_daily_summary(&store, &habits, now);
    }
    Ok(())
}

fn print_weekly_summary(store: &Store, habits: &[Habit], now: DateTime<Local>) {
    let window = Window::weekly(now);
    let logs_by_habit = window_logs(store, habits, &window);
    let summary = summarize_window(habits, &logs_by_habit, &window);

    println!("{}", render_weekly_summary(&summary));
    println!();
    println!(
        "{}",
        Cyan.bold().paint(format!("\n{}", motivational_message(&summary.habits)))
    );
}

fn print_daily_summary(store: &Store, habits: &[Habit], now: DateTime<Local>) {
    let window = Window::daily(now);

    println!(
        "{}",
        Cyan.bold().paint(format!("📅 Daily Summary - {}", long_date(&now)))
    );
    println!("{}", Cyan.bold().paint("=".repeat(50)));

    let mut total_time = 0.0;
    let mut total_count = 0;
    for habit in habits {
        let logs = store.logs_for_habit(&habit.name, window.start, window.end);
        if logs.is_empty() {
            continue;
        }
        let today = summarize_habit(habit, &logs, &window);

        let mut line = format!(
            "{} {} {}",
            habit.emoji,
            habit.name,
            Green.paint(daily_value(habit, &today))
        );
        if habit.daily_goal > 0 && today.goal_progress > 0.0 {
            line.push_str(&format!(
                " {}",
                Yellow.paint(format!("({:.0}% of daily goal)", today.goal_progress))
            ));
        }
        println!("{line}");

        match habit.goal_type {
            GoalType::Count => total_count += today.total_count,
            GoalType::Duration => total_time += today.total_time,
        }
    }

    println!("\n{}", "=".repeat(50));
    if total_time > 0.0 {
        println!("🎯 Total Time Today: {total_time:.1} hours");
    }
    if total_count > 0 {
        println!("🎯 Total Count Today: {total_count}");
    }
}

fn window_logs(store: &Store, habits: &[Habit], window: &Window) -> HashMap<String, Vec<LogEntry>> {
    habits
        .iter()
        .map(|habit| {
            let logs = store.logs_for_habit(&habit.name, window.start, window.end);
            (habit.name.to_string(), logs)
        })
        .collect()
}

fn render_weekly_summary(summary: &WindowSummary) -> String {
    let mut out = String::new();
    out.push_str("📊 Weekly Summary\n");
    out.push_str(&"=".repeat(51));
    out.push('\n');

    let last_day = summary.window.end - Duration::days(1);
    out.push_str(&format!(
        "📅 {} - {}\n\n",
        short_date(&summary.window.start),
        short_date(&last_day)
    ));

    for habit in &summary.habits {
        out.push_str(&render_habit_line(habit));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&"=".repeat(52));
    out.push('\n');
    out.push_str(&format!("🎯 Total Time: {:.1} hours", summary.total_time));
    out
}

fn render_habit_line(summary: &HabitSummary) -> String {
    let mut line = format!("{} {} {} ", summary.emoji, summary.habit_name, summary.bar_chart);

    if summary.total_time > 0.0 {
        line.push_str(&format!("{:.1}h", summary.total_time));
    } else if summary.total_count > 0 {
        line.push_str(&format!("{}x", summary.total_count));
    } else {
        line.push('0');
    }

    if summary.goal_progress > 0.0 {
        line.push_str(&format!(" ({:.0}% of goal)", summary.goal_progress));
    }
    if summary.streak > 0 {
        line.push_str(&format!(" 🔥 {} day streak", summary.streak));
    }
    line
}

/// Habits are rendered in the unit of their goal. A duration habit that only
/// has count entries today still reads "0".
fn daily_value(habit: &Habit, today: &HabitSummary) -> String {
    match habit.goal_type {
        GoalType::Count if today.total_count > 0 => format!("{}x", today.total_count),
        GoalType::Duration if today.total_time > 0.0 => format!("{:.1}h", today.total_time),
        _ => "0".to_string(),
    }
}

fn print_welcome() {
    println!("{}", Cyan.bold().paint("🌟 Welcome to Didit!"));
    println!();
    println!("You haven't logged any habits yet. Start by logging your first habit:");
    println!();
    println!("  didit code 2h          # Log 2 hours of coding");
    println!("  didit walk 30m         # Log 30 minutes of walking");
    println!("  didit water 8x         # Log 8 glasses of water");
    println!("  didit read             # Log default duration (30m)");
    println!();
    println!("Then run 'didit summary' to see your progress!");
}
