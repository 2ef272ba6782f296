use savings_tracker::{
    AppConfig, AppState, load_data,
    reminders::{NoticeCallback, ReminderNotice, ReminderService},
    router,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    let data = load_data(&config.data_path).await;
    info!(goals = data.goals.len(), path = %config.data_path.display(), "state loaded");
    let state = AppState::new(config.data_path.clone(), data);

    let notices = state.clone();
    let on_due: NoticeCallback = Arc::new(move |notice: ReminderNotice| {
        info!(goal_id = %notice.goal_id, "{}", notice.message);
        notices.push_notice(notice);
    });
    let mut reminders = ReminderService::new(
        Arc::new(state.clone()),
        on_due,
        config.reminders_enabled,
        config.reminder_poll,
    );
    reminders.start();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reminders.stop().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
