//! Weekly "log your profit" reminders.
//!
//! `ReminderService` polls a `ReminderSource` on a fixed interval and hands
//! every reminder that became due to a callback. It only reads goal data.
//! The owning application decides when to `start` and `stop` it.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::ReminderSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub goal_id: String,
    pub goal_name: String,
    pub settings: ReminderSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNotice {
    pub goal_id: String,
    pub message: String,
    pub fired_at: NaiveDateTime,
}

/// Supplies the reminder schedules to check on each poll.
pub trait ReminderSource: Send + Sync + 'static {
    fn schedules(&self) -> impl Future<Output = Vec<ReminderSchedule>> + Send;
}

pub type NoticeCallback = Arc<dyn Fn(ReminderNotice) + Send + Sync>;

/// Source of the local wall-clock time used to decide what is due.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Returns the schedules due at `now`, remembering in `fired` which goals
/// were already reminded on that date.
pub fn collect_due(
    schedules: &[ReminderSchedule],
    now: NaiveDateTime,
    fired: &mut HashMap<String, NaiveDate>,
) -> Vec<ReminderNotice> {
    let today = now.date();
    let mut notices = Vec::new();
    for schedule in schedules {
        let settings = &schedule.settings;
        if !settings.enabled || today.weekday() != settings.weekday {
            continue;
        }
        let Some(at) = NaiveTime::from_hms_opt(settings.hour, settings.minute, 0) else {
            continue;
        };
        if now.time() < at || fired.get(&schedule.goal_id) == Some(&today) {
            continue;
        }
        fired.insert(schedule.goal_id.clone(), today);
        notices.push(ReminderNotice {
            goal_id: schedule.goal_id.clone(),
            message: format!("Time to log this week's profit for {}", schedule.goal_name),
            fired_at: now,
        });
    }
    notices
}

pub struct ReminderService<S> {
    source: Arc<S>,
    on_due: NoticeCallback,
    enabled: bool,
    poll_interval: Duration,
    clock: Clock,
    running: Option<(watch::Sender<bool>, JoinHandle<()>)>,
}

impl<S: ReminderSource> ReminderService<S> {
    pub fn new(
        source: Arc<S>,
        on_due: NoticeCallback,
        enabled: bool,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            on_due,
            enabled,
            poll_interval: poll_interval.max(Duration::from_secs(1)),
            clock: local_now,
            running: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawns the polling task. Does nothing when disabled or already running.
    pub fn start(&mut self) {
        if !self.enabled || self.running.is_some() {
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let source = Arc::clone(&self.source);
        let on_due = Arc::clone(&self.on_due);
        let poll_interval = self.poll_interval;
        let clock = self.clock;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            let mut fired = HashMap::new();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let schedules = source.schedules().await;
                        let now = clock();
                        for notice in collect_due(&schedules, now, &mut fired) {
                            info!(goal_id = %notice.goal_id, "reminder due");
                            on_due(notice);
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("reminder poller stopped");
        });

        info!(interval_secs = poll_interval.as_secs(), "reminder poller started");
        self.running = Some((stop_tx, handle));
    }

    /// Signals the polling task and waits for it to finish.
    pub async fn stop(&mut self) {
        let Some((stop_tx, handle)) = self.running.take() else {
            return;
        };
        let _ = stop_tx.send(true);
        if let Err(err) = handle.await {
            warn!("reminder poller ended abnormally: {err}");
        }
    }
}
