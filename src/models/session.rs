/// Login state as kept by the storage gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub logged_in: bool,
    pub email: Option<String>,
}
