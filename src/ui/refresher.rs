use crate::models::Client;
use crate::repository::{ClientRepository, RepositoryError};
use crate::storage::StorageGateway;

/// Receives the stored collection after every mutation.
pub trait DisplayRefresher {
    /// Replace everything shown with `clients`, in stored order.
    fn refresh(&mut self, clients: Vec<Client>);

    /// Show a one-line notification to the user.
    fn notify(&mut self, message: &str);
}

/// Reload the collection from storage and push it to `refresher`.
pub async fn refresh_display<S, R>(
    repository: &ClientRepository<S>,
    refresher: &mut R,
) -> Result<(), RepositoryError>
where
    S: StorageGateway,
    R: DisplayRefresher,
{
    let clients = repository.list().await?;
    refresher.refresh(clients);
    Ok(())
}
