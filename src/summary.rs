//! Window aggregation over habit logs: totals, goal progress, streaks,
//! bar strings and the motivational message tiers. Everything here is a
//! pure computation over in-memory values; damaged log data degrades to
//! zero contribution instead of failing a report.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Local, Utc};
use now::DateTimeNow;

use crate::{
    amount::Amount,
    store::entities::{GoalType, Habit, LogEntry},
    utils::time::local_day,
};

pub const BAR_WIDTH: u32 = 20;
const BAR_FILLED: &str = "█";
const BAR_TRACK: &str = "░";

/// Default bar scale for habits without a goal, so they still render a
/// partially filled bar.
const GOALLESS_BAR_MAX: f64 = 10.0;

/// Reporting period. Both bounds are exclusive: a log stamped exactly on
/// `start` or `end` belongs to neither side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub days: u32,
}

impl Window {
    /// Today, local midnight to midnight.
    pub fn daily(now: DateTime<Local>) -> Self {
        let start = now.beginning_of_day();
        Self {
            start,
            end: start + Duration::days(1),
            days: 1,
        }
    }

    /// The current week, starting on the most recent Monday at local
    /// midnight. A Sunday counts as the last day of the running week.
    pub fn weekly(now: DateTime<Local>) -> Self {
        let start = now.beginning_of_week();
        Self {
            start,
            end: start + Duration::days(7),
            days: 7,
        }
    }

    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        let local = moment.with_timezone(&Local);
        self.start < local && local < self.end
    }
}

/// Derived view of one habit over a window. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitSummary {
    pub habit_name: std::sync::Arc<str>,
    pub emoji: String,
    /// Accumulated hours; stays zero for count habits.
    pub total_time: f64,
    /// Accumulated repetitions; stays zero for duration habits.
    pub total_count: u32,
    /// Percentage of `daily_goal × window days`, unclamped above 100.
    pub goal_progress: f64,
    /// Distinct local days with at least one entry inside the window.
    pub streak: u32,
    pub bar_chart: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub window: Window,
    pub habits: Vec<HabitSummary>,
    pub total_time: f64,
}

pub fn summarize_habit(habit: &Habit, logs: &[LogEntry], window: &Window) -> HabitSummary {
    let in_window: Vec<&LogEntry> = logs
        .iter()
        .filter(|log| window.contains(log.logged_at))
        .collect();

    let mut total_time = 0.0;
    let mut total_count = 0u32;
    for log in &in_window {
        match habit.goal_type {
            GoalType::Count => total_count += log.count,
            GoalType::Duration => total_time += logged_hours(&log.duration),
        }
    }

    let value = match habit.goal_type {
        GoalType::Count => total_count as f64,
        GoalType::Duration => total_time,
    };
    let goal_span = habit.daily_goal.saturating_mul(window.days) as f64;
    let goal_progress = if habit.daily_goal == 0 {
        0.0
    } else {
        value / goal_span * 100.0
    };

    HabitSummary {
        habit_name: habit.name.clone(),
        emoji: habit.emoji.clone(),
        total_time,
        total_count,
        goal_progress,
        streak: active_days(&in_window),
        bar_chart: bar_chart(value, goal_span),
    }
}

pub fn summarize_window(
    habits: &[Habit],
    logs_by_habit: &HashMap<String, Vec<LogEntry>>,
    window: &Window,
) -> WindowSummary {
    let mut summaries = Vec::with_capacity(habits.len());
    let mut total_time = 0.0;
    for habit in habits {
        let logs = logs_by_habit
            .get(habit.name.as_ref())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let summary = summarize_habit(habit, logs, window);
        total_time += summary.total_time;
        summaries.push(summary);
    }
    WindowSummary {
        window: *window,
        habits: summaries,
        total_time,
    }
}

/// Progress against the daily goal, in percent, over logs already scoped
/// to today. Zero when the habit has no goal.
pub fn daily_progress(habit: &Habit, today_logs: &[LogEntry]) -> f64 {
    if habit.daily_goal == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for log in today_logs {
        match habit.goal_type {
            GoalType::Count => total += log.count as f64,
            GoalType::Duration => total += logged_hours(&log.duration),
        }
    }
    total / habit.daily_goal as f64 * 100.0
}

pub fn is_goal_reached(habit: &Habit, today_logs: &[LogEntry]) -> bool {
    daily_progress(habit, today_logs) >= 100.0
}

/// Fixed-width progress bar. `max_value` of zero falls back to the
/// goalless scale; fill length truncates and clamps to the bar width.
pub fn bar_chart(value: f64, max_value: f64) -> String {
    let max_value = if max_value == 0.0 {
        GOALLESS_BAR_MAX
    } else {
        max_value
    };
    let filled = ((value / max_value * BAR_WIDTH as f64) as i64).clamp(0, BAR_WIDTH as i64) as usize;
    format!(
        "{}{}",
        BAR_FILLED.repeat(filled),
        BAR_TRACK.repeat(BAR_WIDTH as usize - filled)
    )
}

/// Picks the weekly encouragement line from the mean progress of habits
/// that moved at all.
pub fn motivational_message(summaries: &[HabitSummary]) -> &'static str {
    let mut total_progress = 0.0;
    let mut active = 0u32;
    for summary in summaries {
        if summary.goal_progress > 0.0 {
            total_progress += summary.goal_progress;
            active += 1;
        }
    }
    if active == 0 {
        return "🌟 Every journey starts with a single step! Log your first habit today!";
    }
    match total_progress / active as f64 {
        avg if avg >= 100.0 => "🎉 Amazing! You're crushing your goals this week!",
        avg if avg >= 80.0 => "🚀 Great progress! You're so close to your goals!",
        avg if avg >= 60.0 => "💪 Good work! Keep up the momentum!",
        avg if avg >= 40.0 => "👍 You're making progress! Every bit counts!",
        avg if avg >= 20.0 => "🌱 Getting started is the hardest part. You're doing great!",
        _ => "🌟 Every small step counts! Keep going!",
    }
}

/// Hours represented by a stored duration string. Anything that doesn't
/// parse as a time span contributes nothing; historical data may predate
/// format changes and must never fail a summary.
fn logged_hours(duration: &str) -> f64 {
    if duration.is_empty() {
        return 0.0;
    }
    match duration.parse::<Amount>() {
        Ok(Amount::Time(span)) => span.total_hours(),
        Ok(Amount::Count(_)) | Err(_) => 0.0,
    }
}

fn active_days(logs: &[&LogEntry]) -> u32 {
    logs.iter()
        .map(|log| local_day(log.logged_at))
        .collect::<HashSet<_>>()
        .len() as u32
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn habit(name: &str, goal_type: GoalType, daily_goal: u32) -> Habit {
        Habit {
            id: 1,
            name: name.into(),
            emoji: "📝".to_string(),
            default_duration: "30m".to_string(),
            daily_goal,
            goal_type,
            created_at: Utc::now(),
        }
    }

    fn duration_log(moment: DateTime<Local>, duration: &str) -> LogEntry {
        LogEntry {
            id: 0,
            habit_id: 1,
            habit_name: "test".into(),
            duration: duration.to_string(),
            count: 0,
            logged_at: moment.with_timezone(&Utc),
            notes: String::new(),
        }
    }

    fn count_log(moment: DateTime<Local>, count: u32) -> LogEntry {
        LogEntry {
            id: 0,
            habit_id: 1,
            habit_name: "test".into(),
            duration: String::new(),
            count,
            logged_at: moment.with_timezone(&Utc),
            notes: String::new(),
        }
    }

    fn wednesday_afternoon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 11, 15, 30, 0).unwrap()
    }

    #[test]
    fn weekly_window_starts_most_recent_monday() {
        let window = Window::weekly(wednesday_afternoon());
        assert_eq!(
            window.start,
            Local.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap()
        );
        assert_eq!(window.end, window.start + Duration::days(7));
        assert_eq!(window.days, 7);

        let sunday_night = Local.with_ymd_and_hms(2026, 3, 15, 23, 0, 0).unwrap();
        assert_eq!(
            Window::weekly(sunday_night).start,
            Local.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn daily_window_covers_today() {
        let window = Window::daily(wednesday_afternoon());
        assert_eq!(
            window.start,
            Local.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(window.end, window.start + Duration::days(1));
        assert_eq!(window.days, 1);
    }

    #[test]
    fn logs_on_window_bounds_are_excluded() {
        let habit = habit("water", GoalType::Count, 8);
        let window = Window::daily(wednesday_afternoon());
        let logs = vec![
            count_log(window.start, 1),
            count_log(window.end, 1),
            count_log(window.start + Duration::hours(9), 1),
        ];
        let summary = summarize_habit(&habit, &logs, &window);
        assert_eq!(summary.total_count, 1);
    }

    #[test]
    fn count_progress_at_half_goal() {
        let habit = habit("water", GoalType::Count, 8);
        let now = wednesday_afternoon();
        let logs = vec![
            count_log(now - Duration::hours(2), 2),
            count_log(now - Duration::hours(1), 2),
        ];
        let summary = summarize_habit(&habit, &logs, &Window::daily(now));
        assert_eq!(summary.total_count, 4);
        assert!((summary.goal_progress - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weekly_duration_progress_spans_the_goal_times_days() {
        let habit = habit("code", GoalType::Duration, 1);
        let now = wednesday_afternoon();
        let logs = vec![
            duration_log(now - Duration::days(2), "2h"),
            duration_log(now - Duration::hours(3), "1h30m"),
        ];
        let summary = summarize_habit(&habit, &logs, &Window::weekly(now));
        assert!((summary.total_time - 3.5).abs() < 1e-9);
        assert!((summary.goal_progress - 50.0).abs() < 1e-9);
    }

    #[test]
    fn progress_without_goal_stays_zero() {
        let habit = habit("walk", GoalType::Duration, 0);
        let now = wednesday_afternoon();
        let logs = vec![duration_log(now - Duration::hours(1), "2h")];
        let summary = summarize_habit(&habit, &logs, &Window::daily(now));
        assert_eq!(summary.goal_progress, 0.0);
        // goalless bars scale against 10, so 2 hours fills 4 slots
        assert_eq!(summary.bar_chart.matches(BAR_FILLED).count(), 4);
    }

    #[test]
    fn progress_is_not_clamped() {
        let habit = habit("pills", GoalType::Count, 1);
        let now = wednesday_afternoon();
        let logs = vec![count_log(now - Duration::hours(1), 3)];
        let summary = summarize_habit(&habit, &logs, &Window::daily(now));
        assert!((summary.goal_progress - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_durations_are_skipped() {
        let habit = habit("code", GoalType::Duration, 2);
        let now = wednesday_afternoon();
        let logs = vec![
            duration_log(now - Duration::hours(2), "garbage"),
            duration_log(now - Duration::hours(3), "8x"),
            duration_log(now - Duration::hours(1), "1h"),
        ];
        let summary = summarize_habit(&habit, &logs, &Window::daily(now));
        assert!((summary.total_time - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn streak_counts_distinct_days_once() {
        let habit = habit("code", GoalType::Duration, 0);
        let now = wednesday_afternoon();
        let logs = vec![
            duration_log(now - Duration::days(2), "1h"),
            duration_log(now - Duration::days(2) + Duration::hours(2), "1h"),
            duration_log(now - Duration::days(1), "1h"),
            duration_log(now - Duration::hours(3), "30m"),
            duration_log(now - Duration::hours(1), "30m"),
        ];
        let summary = summarize_habit(&habit, &logs, &Window::weekly(now));
        assert_eq!(summary.streak, 3);
    }

    #[test]
    fn bar_chart_fills_proportionally() {
        let bar = bar_chart(10.0, 20.0);
        assert_eq!(bar.matches(BAR_FILLED).count(), 10);
        assert_eq!(bar.matches(BAR_TRACK).count(), 10);
        assert_eq!(bar.chars().count(), 20);
    }

    #[test]
    fn bar_chart_clamps_overflow() {
        let bar = bar_chart(30.0, 20.0);
        assert_eq!(bar.matches(BAR_FILLED).count(), 20);
        assert_eq!(bar.matches(BAR_TRACK).count(), 0);
    }

    #[test]
    fn bar_chart_empty_at_zero() {
        let bar = bar_chart(0.0, 20.0);
        assert_eq!(bar.matches(BAR_FILLED).count(), 0);
        assert_eq!(bar.chars().count(), 20);
    }

    #[test]
    fn goal_reached_exactly_at_hundred() {
        let habit = habit("water", GoalType::Count, 8);
        let now = wednesday_afternoon();
        assert!(is_goal_reached(
            &habit,
            &[count_log(now - Duration::hours(1), 8)]
        ));
        assert!(!is_goal_reached(
            &habit,
            &[count_log(now - Duration::hours(1), 7)]
        ));

        let coding = self::habit("code", GoalType::Duration, 2);
        let exactly_two_hours = vec![
            duration_log(now - Duration::hours(4), "1h"),
            duration_log(now - Duration::hours(2), "1h"),
        ];
        assert!(is_goal_reached(&coding, &exactly_two_hours));
    }

    #[test]
    fn summarize_window_sums_duration_time_only() {
        let now = wednesday_afternoon();
        let habits = vec![
            habit("code", GoalType::Duration, 2),
            habit("water", GoalType::Count, 8),
        ];
        let mut logs_by_habit = HashMap::new();
        logs_by_habit.insert(
            "code".to_string(),
            vec![duration_log(now - Duration::hours(1), "2h")],
        );
        logs_by_habit.insert(
            "water".to_string(),
            vec![count_log(now - Duration::hours(1), 3)],
        );

        let summary = summarize_window(&habits, &logs_by_habit, &Window::weekly(now));
        assert_eq!(summary.habits.len(), 2);
        assert!((summary.total_time - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn motivational_message_tiers() {
        fn with_progress(values: &[f64]) -> Vec<HabitSummary> {
            values
                .iter()
                .map(|&goal_progress| HabitSummary {
                    habit_name: "test".into(),
                    emoji: "📝".to_string(),
                    total_time: 0.0,
                    total_count: 0,
                    goal_progress,
                    streak: 0,
                    bar_chart: String::new(),
                })
                .collect()
        }

        assert!(motivational_message(&[]).contains("Every journey starts"));
        assert!(motivational_message(&with_progress(&[0.0, 0.0])).contains("Every journey starts"));
        assert!(motivational_message(&with_progress(&[120.0])).contains("crushing"));
        assert!(motivational_message(&with_progress(&[100.0, 60.0])).contains("so close"));
        assert!(motivational_message(&with_progress(&[60.0])).contains("momentum"));
        assert!(motivational_message(&with_progress(&[40.0])).contains("Every bit counts"));
        assert!(motivational_message(&with_progress(&[20.0])).contains("hardest part"));
        assert!(motivational_message(&with_progress(&[5.0])).contains("Every small step"));
    }
}
