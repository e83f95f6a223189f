//! Seed values applied when a habit is first created. Well-known names
//! get an emoji and, for inherently countable activities, a count goal;
//! everything else starts as an unmeasured duration habit.

use std::{collections::HashMap, sync::LazyLock};

use super::entities::GoalType;

pub const FALLBACK_EMOJI: &str = "📝";
pub const DEFAULT_DURATION_INPUT: &str = "30m";
pub const DEFAULT_COUNT_INPUT: &str = "1x";

static EMOJI: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("code", "💻"),
        ("read", "📖"),
        ("walk", "🚶"),
        ("run", "🏃"),
        ("exercise", "💪"),
        ("water", "💧"),
        ("sleep", "😴"),
        ("meditate", "🧘"),
        ("write", "✍️"),
        ("study", "📚"),
        ("work", "💼"),
        ("gym", "🏋️"),
        ("yoga", "🧘‍♀️"),
        ("cook", "👨‍🍳"),
        ("clean", "🧹"),
        ("paint", "🎨"),
        ("music", "🎵"),
        ("game", "🎮"),
        ("social", "👥"),
        ("family", "👨‍👩‍👧‍👦"),
    ])
});

static COUNT_GOALS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    HashMap::from([
        ("water", 8),
        ("medicine", 1),
        ("vitamins", 1),
        ("pills", 1),
        ("steps", 10000),
        ("pushups", 20),
        ("squats", 50),
        ("pullups", 10),
    ])
});

pub struct HabitSeed {
    pub emoji: &'static str,
    pub daily_goal: u32,
    pub goal_type: GoalType,
    pub default_duration: &'static str,
}

pub fn seed_for(name: &str) -> HabitSeed {
    let emoji = EMOJI.get(name).copied().unwrap_or(FALLBACK_EMOJI);
    match COUNT_GOALS.get(name) {
        Some(&daily_goal) => HabitSeed {
            emoji,
            daily_goal,
            goal_type: GoalType::Count,
            default_duration: DEFAULT_COUNT_INPUT,
        },
        None => HabitSeed {
            emoji,
            daily_goal: 0,
            goal_type: GoalType::Duration,
            default_duration: DEFAULT_DURATION_INPUT,
        },
    }
}
