use super::{Client, ClientStatus};

/// Aggregate counters shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl ClientStats {
    pub fn from_clients(clients: &[Client]) -> Self {
        let total = clients.len();
        let active = clients
            .iter()
            .filter(|client| client.status == ClientStatus::Active)
            .count();

        Self {
            total,
            active,
            inactive: total - active,
        }
    }
}
