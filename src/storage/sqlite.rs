use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use super::{decode_clients, StorageError, StorageGateway, CLIENTS_KEY, LOGGED_IN_KEY, USER_EMAIL_KEY};
use crate::models::Client;

/// SQLite-backed key-value store
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect using a `sqlite://` URL, creating the file if needed
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Self::with_options(options).await
    }

    async fn with_options(options: SqliteConnectOptions) -> Result<Self, StorageError> {
        // One connection keeps every write strictly ordered
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO kv_store (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

impl StorageGateway for SqliteStorage {
    async fn init(&self) -> Result<(), StorageError> {
        self.set_if_absent(CLIENTS_KEY, "[]").await?;
        self.set_if_absent(LOGGED_IN_KEY, "false").await?;
        Ok(())
    }

    async fn get_clients(&self) -> Result<Vec<Client>, StorageError> {
        decode_clients(self.get(CLIENTS_KEY).await?)
    }

    async fn save_clients(&self, clients: &[Client]) -> Result<(), StorageError> {
        let json = serde_json::to_string(clients)?;
        self.set(CLIENTS_KEY, &json).await?;
        debug!(count = clients.len(), "saved client collection");
        Ok(())
    }

    async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.get(LOGGED_IN_KEY).await?.as_deref() == Some("true"))
    }

    async fn user_email(&self) -> Result<Option<String>, StorageError> {
        self.get(USER_EMAIL_KEY).await
    }

    async fn set_login_state(&self, logged_in: bool, email: Option<&str>) -> Result<(), StorageError> {
        self.set(LOGGED_IN_KEY, if logged_in { "true" } else { "false" }).await?;

        match email {
            Some(email) if logged_in => self.set(USER_EMAIL_KEY, email).await?,
            _ if !logged_in => self.remove(USER_EMAIL_KEY).await?,
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{ClientId, ClientStatus};

    fn url(dir: &tempfile::TempDir, file: &str) -> String {
        format!("sqlite://{}", dir.path().join(file).display())
    }

    fn sample_client(email: &str) -> Client {
        Client {
            id: ClientId::new(),
            name: "Alice".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            status: ClientStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn init_seeds_empty_collection_and_logged_out_flag() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::connect(&url(&dir, "clients.db")).await.unwrap();

        storage.init().await.unwrap();

        assert!(storage.get_clients().await.unwrap().is_empty());
        assert!(!storage.is_logged_in().await.unwrap());
        assert_eq!(storage.get(CLIENTS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn collection_survives_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = url(&dir, "clients.db");
        let clients = vec![sample_client("a@x.com"), sample_client("b@x.com")];

        {
            let storage = SqliteStorage::connect(&path).await.unwrap();
            storage.init().await.unwrap();
            storage.save_clients(&clients).await.unwrap();
        }

        let storage = SqliteStorage::connect(&path).await.unwrap();
        storage.init().await.unwrap();
        assert_eq!(storage.get_clients().await.unwrap(), clients);
    }

    #[tokio::test]
    async fn save_overwrites_previous_collection() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::connect(&url(&dir, "clients.db")).await.unwrap();

        storage.save_clients(&[sample_client("a@x.com"), sample_client("b@x.com")]).await.unwrap();
        let only = vec![sample_client("c@x.com")];
        storage.save_clients(&only).await.unwrap();

        assert_eq!(storage.get_clients().await.unwrap(), only);
    }

    #[tokio::test]
    async fn logout_forgets_the_email() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::connect(&url(&dir, "clients.db")).await.unwrap();

        storage.set_login_state(true, Some("me@x.com")).await.unwrap();
        assert!(storage.is_logged_in().await.unwrap());
        assert_eq!(storage.user_email().await.unwrap().as_deref(), Some("me@x.com"));

        storage.set_login_state(false, None).await.unwrap();
        assert!(!storage.is_logged_in().await.unwrap());
        assert_eq!(storage.user_email().await.unwrap(), None);
    }

    #[tokio::test]
    async fn init_keeps_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::connect(&url(&dir, "clients.db")).await.unwrap();
        let clients = vec![sample_client("a@x.com")];

        storage.save_clients(&clients).await.unwrap();
        storage.set_login_state(true, Some("me@x.com")).await.unwrap();
        storage.init().await.unwrap();

        assert_eq!(storage.get_clients().await.unwrap(), clients);
        assert!(storage.is_logged_in().await.unwrap());
    }
}
