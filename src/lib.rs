pub mod api;
pub mod config;
pub mod db;
pub mod notifications;
pub mod token;

pub use db::DbPool;

use config::Config;
use notifications::Mailer;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, mailer: Mailer) -> Self {
        Self { config, db, mailer }
    }
}
