//! Long-running reminder service. Once an hour, and immediately at
//! startup, it re-reads the store and fires a late notification when
//! goals are still pending past the late threshold. Each check completes
//! before the next sleep begins, so ticks never overlap.

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Local, Timelike};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    notify::{self, DesktopNotifier, Notifier},
    store::{Store, entities::Habit},
    summary::{self, HabitSummary, Window},
    utils::clock::{Clock, DefaultClock},
};

pub mod shutdown;

const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Local hour after which unfinished goals trigger the late reminder.
pub const LATE_HOUR: u32 = 20;

/// Runs the reminder service until ctrl-c.
pub async fn start_daemon(data_dir: PathBuf) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    let service = ReminderService::new(
        data_dir,
        DesktopNotifier::detect(),
        DEFAULT_CHECK_INTERVAL,
        LATE_HOUR,
        Box::new(DefaultClock),
    );

    let (_, service_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        service.run(shutdown_token.clone()),
    );

    if let Err(service_result) = service_result {
        error!("Reminder service got an error {:?}", service_result);
    }

    Ok(())
}

pub struct ReminderService<N> {
    data_dir: PathBuf,
    notifier: N,
    check_interval: Duration,
    late_hour: u32,
    clock: Box<dyn Clock>,
}

impl<N: Notifier> ReminderService<N> {
    pub fn new(
        data_dir: PathBuf,
        notifier: N,
        check_interval: Duration,
        late_hour: u32,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            data_dir,
            notifier,
            check_interval,
            late_hour,
            clock,
        }
    }

    /// Executes the reminder event loop. Check failures are logged and the
    /// loop keeps going; only cancellation ends it.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        info!(
            "Reminder service started, checking every {:?}",
            self.check_interval
        );
        let mut check_point = self.clock.instant();
        loop {
            check_point += self.check_interval;

            if let Err(e) = self.check_pending_goals() {
                error!("Encountered an error during a reminder check {:?}", e);
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(check_point) => ()
            }
        }
    }

    fn check_pending_goals(&self) -> Result<()> {
        let now = self.clock.time().with_timezone(&Local);
        if !is_late(now, self.late_hour) {
            return Ok(());
        }

        // Fresh read every tick so logs from other invocations count.
        let store = Store::open(&self.data_dir)?;
        if !notify::notifications_enabled(&store) {
            return Ok(());
        }
        let pending = pending_goals(&store, now);
        if pending.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = pending
            .iter()
            .map(|(habit, _)| habit.name.to_string())
            .collect();
        let (title, message) = notify::late_reminder(&names);
        match self.notifier.notify(&title, &message) {
            Ok(()) => info!("Late reminder sent for {}", names.join(", ")),
            Err(e) => warn!("Couldn't deliver late reminder {e:?}"),
        }
        Ok(())
    }
}

pub fn is_late(now: DateTime<Local>, late_hour: u32) -> bool {
    now.hour() >= late_hour
}

/// Habits whose daily goal today's logs haven't satisfied, paired with
/// their daily summaries for progress display.
pub fn pending_goals(store: &Store, now: DateTime<Local>) -> Vec<(Habit, HabitSummary)> {
    let window = Window::daily(now);
    let mut pending = Vec::new();
    for habit in store.habits() {
        if habit.daily_goal == 0 {
            continue;
        }
        let logs = store.logs_for_habit(&habit.name, window.start, window.end);
        if summary::is_goal_reached(&habit, &logs) {
            continue;
        }
        let today = summary::summarize_habit(&habit, &logs, &window);
        pending.push((habit, today));
    }
    pending
}

#[cfg(test)]
mod daemon_tests {
    use std::time::Duration;

    use anyhow::Result;
    use chrono::TimeZone;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    use crate::{
        notify::{LATE_REMINDER_TITLE, MockNotifier},
        utils::logging::TEST_LOGGING,
    };

    use super::*;

    #[test]
    fn late_threshold_is_hour_based() {
        let evening = Local.with_ymd_and_hms(2026, 3, 11, 21, 0, 0).unwrap();
        let afternoon = Local.with_ymd_and_hms(2026, 3, 11, 15, 30, 0).unwrap();
        assert!(is_late(evening, LATE_HOUR));
        assert!(!is_late(afternoon, LATE_HOUR));
        assert!(is_late(afternoon, 0));
    }

    #[test]
    fn pending_skips_reached_and_goalless_habits() -> Result<()> {
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;

        let water = store.get_or_create_habit("water");
        store.append_log(water.id, &water.name, "", 3, "");
        let pills = store.get_or_create_habit("pills");
        store.append_log(pills.id, &pills.name, "", 1, "");
        store.get_or_create_habit("doodling");

        let pending = pending_goals(&store, Local::now());
        let names: Vec<_> = pending
            .iter()
            .map(|(habit, _)| habit.name.to_string())
            .collect();
        assert_eq!(names, vec!["water"]);
        assert_eq!(pending[0].1.total_count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn smoke_test_reminder_service() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let mut store = Store::open(dir.path())?;
        let water = store.get_or_create_habit("water");
        store.append_log(water.id, &water.name, "", 3, "");
        store.save()?;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|title, message| title == LATE_REMINDER_TITLE && message.contains("water"))
            .times(1..)
            .returning(|_, _| Ok(()));

        let service = ReminderService::new(
            dir.path().to_path_buf(),
            notifier,
            Duration::from_millis(50),
            0,
            Box::new(DefaultClock),
        );

        let shutdown_token = CancellationToken::new();
        let (_, service_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(120)).await;
                shutdown_token.cancel()
            },
            service.run(shutdown_token.clone()),
        );
        service_result?;
        Ok(())
    }
}
