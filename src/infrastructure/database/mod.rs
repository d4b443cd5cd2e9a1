//! `SQLite` persistence adapters for the two repository ports.

pub mod anchor_repo;
pub mod connection;
pub mod topic_repo;
pub mod utils;

pub use anchor_repo::SqliteAnchorRepository;
pub use connection::DatabaseConnection;
pub use topic_repo::SqliteTopicRepository;
