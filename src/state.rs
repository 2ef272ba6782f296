use crate::models::AppData;
use crate::reminders::{ReminderNotice, ReminderSchedule, ReminderSource};
use crate::storage::persist_data;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex as StdMutex},
};
use tokio::sync::Mutex;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub notices: Arc<StdMutex<Vec<ReminderNotice>>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            notices: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// Writes the state file. A failed write is logged and otherwise ignored;
    /// the in-memory state stays authoritative until the next successful save.
    pub async fn save(&self, data: &AppData) {
        if let Err(err) = persist_data(&self.data_path, data).await {
            error!(path = %self.data_path.display(), "failed to persist data: {err}");
        }
    }

    pub fn push_notice(&self, notice: ReminderNotice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice);
    }

    pub fn drain_notices(&self) -> Vec<ReminderNotice> {
        std::mem::take(
            &mut *self
                .notices
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl ReminderSource for AppState {
    async fn schedules(&self) -> Vec<ReminderSchedule> {
        let data = self.data.lock().await;
        data.goals
            .values()
            .map(|goal| ReminderSchedule {
                goal_id: goal.id.clone(),
                goal_name: goal.name.clone(),
                settings: goal.reminder,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::GoalSettings;
    use crate::models::Goal;
    use chrono::NaiveDate;

    fn notice(goal_id: &str) -> ReminderNotice {
        ReminderNotice {
            goal_id: goal_id.into(),
            message: "log it".into(),
            fired_at: NaiveDate::from_ymd_opt(2026, 1, 4)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn notices_drain_once() {
        let state = AppState::new(PathBuf::from("unused.json"), AppData::default());
        state.push_notice(notice("a"));
        state.push_notice(notice("b"));

        let drained = state.drain_notices();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].goal_id, "a");
        assert!(state.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn schedules_follow_goal_reminders() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut goal = Goal::create(GoalSettings::defaults(today)).unwrap();
        goal.reminder.enabled = true;
        let mut data = AppData::default();
        data.goals.insert(goal.id.clone(), goal.clone());

        let state = AppState::new(PathBuf::from("unused.json"), data);
        let schedules = state.schedules().await;
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].goal_id, goal.id);
        assert_eq!(schedules[0].goal_name, goal.name);
        assert!(schedules[0].settings.enabled);
    }
}
