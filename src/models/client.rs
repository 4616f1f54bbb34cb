use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a client when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
        }
    }

    /// The other status, used by the form to cycle the selection.
    pub fn toggled(self) -> Self {
        match self {
            ClientStatus::Active => ClientStatus::Inactive,
            ClientStatus::Inactive => ClientStatus::Active,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client status `{0}`")]
pub struct ParseStatusError(pub String);

impl FromStr for ClientStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ClientStatus::Active),
            "Inactive" => Ok(ClientStatus::Inactive),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A stored customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Overwrite every mutable field. `id` and `created_at` are never touched.
    pub fn apply(&mut self, data: ClientData) {
        self.name = data.name;
        self.email = data.email;
        self.phone = data.phone;
        self.status = data.status;
    }
}

/// Raw form input, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: Option<ClientStatus>,
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            status: Some(client.status),
        }
    }
}

/// Client fields that passed validation. Only the validator builds these in production code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: ClientStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClientField {
    Name,
    Email,
    Phone,
    Status,
}

impl ClientField {
    pub const ALL: [ClientField; 4] = [
        ClientField::Name,
        ClientField::Email,
        ClientField::Phone,
        ClientField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClientField::Name => "Name *",
            ClientField::Email => "Email *",
            ClientField::Phone => "Phone",
            ClientField::Status => "Status *",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ClientField::Name => ClientField::Email,
            ClientField::Email => ClientField::Phone,
            ClientField::Phone => ClientField::Status,
            ClientField::Status => ClientField::Name,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ClientField::Name => ClientField::Status,
            ClientField::Email => ClientField::Name,
            ClientField::Phone => ClientField::Email,
            ClientField::Status => ClientField::Phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("Active".parse::<ClientStatus>(), Ok(ClientStatus::Active));
        assert_eq!("Inactive".parse::<ClientStatus>(), Ok(ClientStatus::Inactive));
        assert!("".parse::<ClientStatus>().is_err());
        assert!("active".parse::<ClientStatus>().is_err());
    }

    #[test]
    fn client_serializes_with_camel_case_timestamp() {
        let client = Client {
            id: ClientId::new(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            phone: String::new(),
            status: ClientStatus::Active,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "Active");

        let back: Client = serde_json::from_value(json).unwrap();
        assert_eq!(back, client);
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let mut client = Client {
            id: ClientId::new(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            phone: String::new(),
            status: ClientStatus::Active,
            created_at: Utc::now(),
        };
        let (id, created_at) = (client.id, client.created_at);

        client.apply(ClientData {
            name: "Alicia".to_string(),
            email: "alicia@x.com".to_string(),
            phone: "555".to_string(),
            status: ClientStatus::Inactive,
        });

        assert_eq!(client.id, id);
        assert_eq!(client.created_at, created_at);
        assert_eq!(client.name, "Alicia");
        assert_eq!(client.status, ClientStatus::Inactive);
    }

    #[test]
    fn fields_cycle_in_form_order() {
        let mut field = ClientField::Name;
        for expected in [ClientField::Email, ClientField::Phone, ClientField::Status, ClientField::Name] {
            field = field.next();
            assert_eq!(field, expected);
        }
        assert_eq!(ClientField::Name.previous(), ClientField::Status);
    }
}
