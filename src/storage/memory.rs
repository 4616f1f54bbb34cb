use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::{StorageError, StorageGateway};
use crate::models::{Client, Session};

/// Process-local gateway, used by tests.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    clients: Option<Vec<Client>>,
    session: Session,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StorageError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

impl StorageGateway for MemoryStorage {
    async fn init(&self) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        state.clients.get_or_insert_with(Vec::new);
        Ok(())
    }

    async fn get_clients(&self) -> Result<Vec<Client>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.clients.clone().unwrap_or_default())
    }

    async fn save_clients(&self, clients: &[Client]) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.clients = Some(clients.to_vec());
        Ok(())
    }

    async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.state.lock().await.session.logged_in)
    }

    async fn user_email(&self) -> Result<Option<String>, StorageError> {
        Ok(self.state.lock().await.session.email.clone())
    }

    async fn set_login_state(&self, logged_in: bool, email: Option<&str>) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.session.logged_in = logged_in;
        if logged_in {
            if let Some(email) = email {
                state.session.email = Some(email.to_string());
            }
        } else {
            state.session.email = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_writes_leave_data_untouched() {
        let storage = MemoryStorage::new();
        storage.init().await.unwrap();
        storage.set_fail_writes(true);

        let err = storage.save_clients(&[]).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(storage.get_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_state_round_trips() {
        let storage = MemoryStorage::new();
        storage.set_login_state(true, Some("me@x.com")).await.unwrap();
        assert!(storage.is_logged_in().await.unwrap());
        assert_eq!(storage.user_email().await.unwrap().as_deref(), Some("me@x.com"));

        storage.set_login_state(false, None).await.unwrap();
        assert_eq!(storage.user_email().await.unwrap(), None);
    }
}
