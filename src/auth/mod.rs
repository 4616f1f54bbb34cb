//! Mock authentication: any password is accepted for a well-formed email.

use thiserror::Error;
use tracing::info;

use crate::models::Session;
use crate::storage::{StorageError, StorageGateway};
use crate::validation::is_valid_email;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn validate_login(email: &str, _password: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

pub async fn login<S: StorageGateway>(storage: &S, email: &str, password: &str) -> Result<Session, AuthError> {
    validate_login(email, password)?;

    let email = email.trim();
    storage.set_login_state(true, Some(email)).await?;
    info!(%email, "signed in");

    Ok(Session {
        logged_in: true,
        email: Some(email.to_string()),
    })
}

pub async fn logout<S: StorageGateway>(storage: &S) -> Result<(), AuthError> {
    storage.set_login_state(false, None).await?;
    info!("signed out");
    Ok(())
}

pub async fn current_user<S: StorageGateway>(storage: &S) -> Result<Session, AuthError> {
    Ok(Session {
        logged_in: storage.is_logged_in().await?,
        email: storage.user_email().await?,
    })
}
