//! Infrastructure layer: storage adapters, configuration, and logging.

pub mod config;
pub mod database;
pub mod logging;

pub use config::{ConfigError, ConfigLoader};
pub use database::{DatabaseConnection, SqliteAnchorRepository, SqliteTopicRepository};
pub use logging::init_logging;
