use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

pub async fn load_data(path: &Path) -> AppData {
    let mut data = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    };
    repair(&mut data);
    data
}

/// Brings hand-edited or stale state back in line with the ledger rules.
fn repair(data: &mut AppData) {
    for goal in data.goals.values_mut() {
        let total_weeks = goal.total_weeks.max(1);
        if goal.ledger.len() != total_weeks as usize {
            warn!(goal_id = %goal.id, "ledger length disagrees with total weeks; resizing");
            goal.ledger.resize(total_weeks, goal.start_date);
        }
        goal.total_weeks = total_weeks;
        if let Err(err) = goal.ledger.recalculate() {
            error!(goal_id = %goal.id, "stored ledger cannot be totalled: {err}");
        }
        goal.visible_weeks = goal.visible_weeks.clamp(1, goal.total_weeks);
    }

    let active_missing = data
        .active_goal
        .as_ref()
        .is_some_and(|id| !data.goals.contains_key(id));
    if active_missing || data.active_goal.is_none() {
        data.active_goal = data.goals.keys().next().cloned();
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), std::io::Error> {
    let payload = serde_json::to_vec_pretty(data)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, payload).await?;
    Ok(())
}
