pub mod client_form;
pub mod components;
pub mod dashboard;
pub mod login;
pub mod refresher;

/// Shown when storage fails during any operation.
pub const OPERATION_FAILED: &str = "Operation failed, please try again";
/// Shown when an edited or deleted client disappeared from the collection.
pub const CLIENT_MISSING: &str = "Client no longer exists";
