mod auth;
mod config;
mod logging;
mod models;
mod repository;
mod router;
mod storage;
mod ui;
mod validation;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info, warn};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::auth::AuthError;
use crate::repository::{ClientRepository, RepositoryError};
use crate::router::Route;
use crate::storage::{SqliteStorage, StorageGateway};
use crate::ui::{
    client_form::{
        handle_input as handle_client_form_input, render_client_form, ClientFormAction, ClientFormState, SubmitOutcome,
    },
    dashboard::{handle_input as handle_dashboard_input, render_dashboard, DashboardAction, DashboardState},
    login::{handle_input as handle_login_input, render_login, LoginAction, LoginState},
    refresher::{refresh_display, DisplayRefresher},
    CLIENT_MISSING, OPERATION_FAILED,
};

/// Terminal dashboard for managing client records
#[derive(Parser, Debug)]
#[command(name = "client-dashboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite URL of the client store (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// File receiving log output (overrides LOG_FILE)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. info or client_dashboard=debug (overrides RUST_LOG and LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Page to open first; signed-out users always start at /login
    #[arg(long, default_value = "/dashboard")]
    page: String,
}

// Main application state
struct AppState {
    repository: ClientRepository<SqliteStorage>,
    route: Route,
    login_state: Option<LoginState>,
    dashboard_state: Option<DashboardState>,
    client_form: Option<ClientFormState>,
}

impl AppState {
    fn new(repository: ClientRepository<SqliteStorage>) -> Self {
        Self {
            repository,
            route: Route::Login,
            login_state: None,
            dashboard_state: None,
            client_form: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init(config::Overrides {
        database_url: cli.database_url,
        log_file: cli.log_file,
        log_level: cli.log_level,
    })?;
    let _log_guard = logging::init(&config)?;
    println!("Initializing client dashboard...");

    // Open the local client store
    let storage = SqliteStorage::connect(config.database_url())
        .await
        .with_context(|| format!("failed to open client store at {}", config.database_url()))?;
    storage.init().await.context("failed to initialize client store")?;
    info!(database_url = %config.database_url(), "client store ready");

    let mut app_state = AppState::new(ClientRepository::new(storage));
    navigate(&mut app_state, Route::from_path(&cli.page)).await?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "application stopped");
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| match app_state.route {
            Route::Login => {
                if let Some(state) = &app_state.login_state {
                    render_login(f, state);
                }
            }
            Route::Dashboard => {
                if let Some(state) = &mut app_state.dashboard_state {
                    render_dashboard(f, state);
                }
                if let Some(form) = &app_state.client_form {
                    render_client_form(f, form);
                }
            }
        })?;

        let should_quit = match app_state.route {
            Route::Login => handle_login_screen(app_state).await?,
            Route::Dashboard if app_state.client_form.is_some() => handle_client_form_screen(app_state).await?,
            Route::Dashboard => handle_dashboard_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Switch pages, applying the login guard and building the target page's state
async fn navigate(app_state: &mut AppState, requested: Route) -> Result<()> {
    let session = auth::current_user(app_state.repository.storage()).await?;
    let route = requested.guard(session.logged_in);

    match route {
        Route::Login => {
            app_state.login_state = Some(LoginState::new());
            app_state.dashboard_state = None;
            app_state.client_form = None;
        }
        Route::Dashboard => {
            let clients = app_state.repository.list().await?;
            app_state.dashboard_state = Some(DashboardState::new(clients, session.email));
            app_state.login_state = None;
        }
    }

    info!(path = route.path(), "navigated");
    app_state.route = route;
    Ok(())
}

async fn handle_login_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.login_state else {
        return Ok(false);
    };

    match handle_login_input(state)? {
        Some(LoginAction::Quit) => return Ok(true),
        Some(LoginAction::Submit) => {
            let result = auth::login(app_state.repository.storage(), &state.email, &state.password).await;
            match result {
                Ok(_) => {
                    if let Err(err) = navigate(app_state, Route::Dashboard).await {
                        error!(error = %err, "failed to load dashboard");
                        if let Some(state) = &mut app_state.login_state {
                            state.error = Some(OPERATION_FAILED.to_string());
                        }
                    }
                }
                Err(AuthError::Storage(err)) => {
                    error!(error = %err, "failed to store login state");
                    state.error = Some(OPERATION_FAILED.to_string());
                }
                Err(err) => state.error = Some(err.to_string()),
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_dashboard_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.dashboard_state else {
        return Ok(false);
    };

    match handle_dashboard_input(state)? {
        Some(DashboardAction::Quit) => return Ok(true),
        Some(DashboardAction::Logout) => {
            let result = auth::logout(app_state.repository.storage()).await;
            match result {
                Ok(()) => navigate(app_state, Route::Login).await?,
                Err(err) => {
                    error!(error = %err, "logout failed");
                    state.notify(OPERATION_FAILED);
                }
            }
        }
        Some(DashboardAction::NewClient) => {
            app_state.client_form = Some(ClientFormState::new());
        }
        Some(DashboardAction::EditClient(client_id)) => {
            app_state.client_form = ClientFormState::open_edit(&app_state.repository, state, client_id).await;
        }
        Some(DashboardAction::DeleteClient(client_id)) => {
            match app_state.repository.delete(client_id).await {
                Ok(client) => state.notify(&format!("Deleted {}", client.name)),
                Err(RepositoryError::NotFound(_)) => state.notify(CLIENT_MISSING),
                Err(err) => {
                    error!(error = %err, "failed to delete client");
                    state.notify(OPERATION_FAILED);
                }
            }
            if let Err(err) = refresh_display(&app_state.repository, &mut *state).await {
                error!(error = %err, "failed to refresh client list");
                state.notify(OPERATION_FAILED);
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_client_form_screen(app_state: &mut AppState) -> Result<bool> {
    let (Some(form), Some(dashboard)) = (&mut app_state.client_form, &mut app_state.dashboard_state) else {
        return Ok(false);
    };

    match handle_client_form_input(form)? {
        Some(ClientFormAction::Cancel) => {
            app_state.client_form = None;
        }
        Some(ClientFormAction::Submit) => {
            match form.submit(&app_state.repository, dashboard).await {
                SubmitOutcome::Saved(client) => info!(id = %client.id, name = %client.name, "client form saved"),
                SubmitOutcome::Failed(reason) => warn!(reason, "client form submit failed"),
                SubmitOutcome::Invalid => {}
            }
            if !form.is_open() {
                app_state.client_form = None;
            }
        }
        None => {}
    }

    Ok(false)
}
