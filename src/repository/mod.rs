use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Client, ClientData, ClientDraft, ClientId};
use crate::storage::{StorageError, StorageGateway};
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("client {0} not found")]
    NotFound(ClientId),
    #[error("a client with email {0} already exists")]
    DuplicateEmail(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sole mutator of the stored client collection.
///
/// Every write reloads the collection from the gateway and saves it back whole.
pub struct ClientRepository<S> {
    storage: S,
}

impl<S: StorageGateway> ClientRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        Ok(self.storage.get_clients().await?)
    }

    pub async fn get(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let clients = self.storage.get_clients().await?;
        Ok(clients.into_iter().find(|client| client.id == id))
    }

    /// Run the validator against the current stored collection.
    pub async fn validate(
        &self,
        draft: &ClientDraft,
        existing: Option<&Client>,
    ) -> Result<Result<ClientData, ValidationErrors>, RepositoryError> {
        let clients = self.storage.get_clients().await?;
        Ok(validation::validate(draft, existing, &clients))
    }

    pub async fn create(&self, data: ClientData) -> Result<Client, RepositoryError> {
        let mut clients = self.storage.get_clients().await?;

        if validation::is_duplicate_email(&data.email, None, &clients) {
            warn!(email = %data.email, "refusing to create client with duplicate email");
            return Err(RepositoryError::DuplicateEmail(data.email));
        }

        let client = Client {
            id: ClientId::new(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            status: data.status,
            created_at: Utc::now(),
        };
        clients.push(client.clone());
        self.storage.save_clients(&clients).await?;

        info!(id = %client.id, "created client");
        Ok(client)
    }

    pub async fn update(&self, id: ClientId, data: ClientData) -> Result<Client, RepositoryError> {
        let mut clients = self.storage.get_clients().await?;

        let Some(index) = clients.iter().position(|client| client.id == id) else {
            warn!(%id, "update for missing client");
            return Err(RepositoryError::NotFound(id));
        };

        if validation::is_duplicate_email(&data.email, Some(&clients[index]), &clients) {
            warn!(%id, email = %data.email, "refusing to update client to duplicate email");
            return Err(RepositoryError::DuplicateEmail(data.email));
        }

        clients[index].apply(data);
        let updated = clients[index].clone();
        self.storage.save_clients(&clients).await?;

        info!(%id, "updated client");
        Ok(updated)
    }

    /// Hard delete: the record is gone from the collection afterwards.
    pub async fn delete(&self, id: ClientId) -> Result<Client, RepositoryError> {
        let mut clients = self.storage.get_clients().await?;

        let Some(index) = clients.iter().position(|client| client.id == id) else {
            warn!(%id, "delete for missing client");
            return Err(RepositoryError::NotFound(id));
        };

        let removed = clients.remove(index);
        self.storage.save_clients(&clients).await?;

        info!(%id, "deleted client");
        Ok(removed)
    }
}
