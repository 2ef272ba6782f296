pub mod amount;
pub mod app;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod goal;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod reminders;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streaks;
pub mod transfer;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::load_data;
