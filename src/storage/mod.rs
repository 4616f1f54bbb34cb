//! Key-value persistence for the client collection and the login flag.
//!
//! The gateway mirrors browser local storage: the whole client collection lives under a
//! single key and every save overwrites it.

#[cfg(test)]
mod memory;
mod sqlite;

use thiserror::Error;

use crate::models::Client;

#[cfg(test)]
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub const CLIENTS_KEY: &str = "clients";
pub const LOGGED_IN_KEY: &str = "isLoggedIn";
pub const USER_EMAIL_KEY: &str = "userEmail";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("stored data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::Unavailable(err.to_string()),
            other => StorageError::Database(other),
        }
    }
}

pub trait StorageGateway {
    /// Seed the empty collection and a logged-out flag when they are missing.
    async fn init(&self) -> Result<(), StorageError>;

    /// All stored clients in insertion order.
    async fn get_clients(&self) -> Result<Vec<Client>, StorageError>;

    /// Replace the stored collection with `clients`.
    async fn save_clients(&self, clients: &[Client]) -> Result<(), StorageError>;

    async fn is_logged_in(&self) -> Result<bool, StorageError>;

    async fn user_email(&self) -> Result<Option<String>, StorageError>;

    /// Logging out (`false`) also forgets the stored email.
    async fn set_login_state(&self, logged_in: bool, email: Option<&str>) -> Result<(), StorageError>;
}

fn decode_clients(raw: Option<String>) -> Result<Vec<Client>, StorageError> {
    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}
