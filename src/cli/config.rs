use std::path::Path;

use ansi_term::Colour::{Cyan, Green};
use anyhow::Result;
use clap::Parser;

use crate::store::{
    entities::{GoalType, Habit},
    Store,
};

#[derive(Debug, Parser)]
pub struct ConfigCommand {
    #[arg(long, help = "Habit name to configure")]
    habit: Option<String>,
    #[arg(long, help = "Emoji for the habit")]
    emoji: Option<String>,
    #[arg(long, help = "Daily goal value")]
    goal: Option<u32>,
    #[arg(long = "type", value_name = "TYPE", help = "Goal type (duration or count)")]
    goal_type: Option<GoalType>,
    #[arg(long, help = "Default duration")]
    duration: Option<String>,
}

pub fn process_config_command(command: ConfigCommand, data_dir: &Path) -> Result<()> {
    let mut store = Store::open(data_dir)?;

    let Some(name) = command.habit else {
        list_habit_configs(&store);
        return Ok(());
    };

    let mut habit = store.get_or_create_habit(&name);
    let mut updated = false;

    if let Some(emoji) = command.emoji {
        habit.emoji = emoji;
        updated = true;
    }
    if let Some(goal) = command.goal {
        habit.daily_goal = goal;
        updated = true;
    }
    if let Some(goal_type) = command.goal_type {
        habit.goal_type = goal_type;
        updated = true;
    }
    if let Some(duration) = command.duration {
        habit.default_duration = duration;
        updated = true;
    }

    store.update_habit(habit.clone());
    store.save()?;

    if updated {
        println!(
            "{}",
            Green.bold().paint(format!("✅ Updated configuration for '{}'", habit.name))
        );
    }
    println!("{}", render_habit_config(&habit));
    Ok(())
}

fn list_habit_configs(store: &Store) {
    let habits = store.habits();

    println!("{}", Cyan.bold().paint("🔧 Didit Configuration"));
    println!("{}", Cyan.bold().paint("=".repeat(50)));

    if habits.is_empty() {
        println!("{}", Cyan.bold().paint("No habits found. Create your first habit:"));
        println!();
        println!("  didit code 2h");
        println!("  didit walk 30m");
        println!();
        return;
    }

    println!("{}", Cyan.bold().paint("Current Habits:"));
    println!();
    for (position, habit) in habits.iter().enumerate() {
        println!("{}. {}", position + 1, render_habit_config(habit));
    }
    println!();
    println!("💡 Use 'didit config --habit <name>' to change a habit");
}

fn render_habit_config(habit: &Habit) -> String {
    let mut line = format!("{} {}", habit.emoji, habit.name);
    if habit.daily_goal > 0 {
        line.push_str(&format!(
            " (Goal: {} {})",
            habit.daily_goal,
            habit.goal_type.unit_label()
        ));
    }
    if !habit.default_duration.is_empty() {
        line.push_str(&format!(" [Default: {}]", habit.default_duration));
    }
    line
}
