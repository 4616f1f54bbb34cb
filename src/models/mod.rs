mod client;
mod session;
mod stats;

pub use client::{Client, ClientData, ClientDraft, ClientField, ClientId, ClientStatus};
pub use session::Session;
pub use stats::ClientStats;
