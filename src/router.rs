/// Pages the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Unknown paths fall back to the login page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_start_matches('#') {
            "/dashboard" | "/clients" => Route::Dashboard,
            _ => Route::Login,
        }
    }

    /// Apply the login guard to a requested route.
    pub fn guard(self, logged_in: bool) -> Self {
        match (self, logged_in) {
            (_, false) => Route::Login,
            (Route::Login, true) => Route::Dashboard,
            (route, true) => route,
        }
    }
}
