use std::path::Path;

use ansi_term::Colour::{Cyan, Green, Yellow};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::debug;

use crate::{
    amount::Amount,
    store::{entities::Habit, Store},
    summary::{is_goal_reached, Window},
};

#[derive(Debug, Parser)]
pub struct LogCommand {
    #[arg(help = "Habit name, e.g. code, water or read")]
    habit: String,
    #[arg(help = "Amount to log, e.g. 2h, 1h30m, 8x. Defaults to the habit's usual amount")]
    amount: Option<String>,
    #[arg(short, long, help = "Add notes to the log entry")]
    notes: Option<String>,
}

pub fn process_log_command(command: LogCommand, data_dir: &Path) -> Result<()> {
    let mut store = Store::open(data_dir)?;
    let habit = store.get_or_create_habit(&command.habit);

    let input = command
        .amount
        .as_deref()
        .unwrap_or(&habit.default_duration);
    let amount: Amount = input
        .parse()
        .with_context(|| format!("couldn't log {input:?} against {}", habit.name))?;
    debug!("Logging {amount} against {}", habit.name);

    let (duration, count) = stored_fields(&amount);
    store.append_log(
        habit.id,
        &habit.name,
        &duration,
        count,
        command.notes.as_deref().unwrap_or(""),
    );
    store.save()?;

    show_goal_message(&store, &habit);
    show_success_message(&habit, &amount);
    Ok(())
}

/// A time amount lands in the duration column, a count amount in the count
/// column. The other column stays at its zero value.
fn stored_fields(amount: &Amount) -> (String, u32) {
    match amount {
        Amount::Time(span) => (span.to_string(), 0),
        Amount::Count(n) => (String::new(), *n),
    }
}

fn show_goal_message(store: &Store, habit: &Habit) {
    let window = Window::daily(Local::now());
    let today_logs = store.logs_for_habit(&habit.name, window.start, window.end);
    if is_goal_reached(habit, &today_logs) {
        println!(
            "{}",
            Yellow.bold().paint(format!("🎉 Goal reached for {} today!", habit.name))
        );
    }
}

fn show_success_message(habit: &Habit, amount: &Amount) {
    println!(
        "{}{}{}",
        Green.bold().paint("✅ Logged "),
        Cyan.bold().paint(format!("\"{}\"", habit.name)),
        Green.bold().paint(format!(" for {amount}")),
    );
    println!("{} {}", habit.emoji, habit.name);
}
