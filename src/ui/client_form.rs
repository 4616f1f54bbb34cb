use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tracing::{error, warn};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{Client, ClientDraft, ClientField, ClientId, ClientStatus};
use crate::repository::{ClientRepository, RepositoryError};
use crate::storage::StorageGateway;
use crate::ui::components::popup::centered_rect;
use crate::ui::components::text_field::{edit_text, TextField};
use crate::ui::refresher::{refresh_display, DisplayRefresher};
use crate::ui::{CLIENT_MISSING, OPERATION_FAILED};
use crate::validation::{FieldError, ValidationErrorKind, ValidationErrors, EMAIL_DUPLICATE};

pub enum ClientFormAction {
    Cancel,
    Submit,
}

pub enum FormMode {
    Create,
    Edit(Client),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Collecting,
    Closed,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; errors are shown and the form stays open
    Invalid,
    Saved(Client),
    /// The write did not happen; the message has been shown to the user
    Failed(&'static str),
}

pub struct ClientFormState {
    mode: FormMode,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: Option<ClientStatus>,
    pub current_field: ClientField,
    pub editing: bool,
    errors: ValidationErrors,
    notice: Option<&'static str>,
    phase: FormPhase,
}

impl ClientFormState {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            status: Some(ClientStatus::Active),
            current_field: ClientField::Name,
            editing: false,
            errors: ValidationErrors::default(),
            notice: None,
            phase: FormPhase::Collecting,
        }
    }

    pub fn edit(client: Client) -> Self {
        let draft = ClientDraft::from(&client);
        Self {
            mode: FormMode::Edit(client),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            status: draft.status,
            ..Self::new()
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase == FormPhase::Collecting
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Client",
            FormMode::Edit(_) => "Edit Client",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Client",
            FormMode::Edit(_) => "Update Client",
        }
    }

    /// Collected input with text fields trimmed and status taken as-is
    pub fn draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            status: self.status,
        }
    }

    fn existing(&self) -> Option<&Client> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(client) => Some(client),
        }
    }

    fn close(&mut self) {
        self.phase = FormPhase::Closed;
        self.editing = false;
    }

    fn cycle_status(&mut self) {
        self.status = Some(self.status.map_or(ClientStatus::Active, ClientStatus::toggled));
    }

    /// Validate, then create or update, then refresh the display.
    pub async fn submit<S, R>(&mut self, repository: &ClientRepository<S>, refresher: &mut R) -> SubmitOutcome
    where
        S: StorageGateway,
        R: DisplayRefresher,
    {
        if !self.is_open() {
            return SubmitOutcome::Invalid;
        }

        let draft = self.draft();
        self.notice = None;

        let validated = repository.validate(&draft, self.existing()).await;
        let data = match validated {
            Ok(Ok(data)) => data,
            Ok(Err(errors)) => {
                self.errors = errors;
                return SubmitOutcome::Invalid;
            }
            Err(err) => return self.fail(err, repository, refresher).await,
        };
        self.errors = ValidationErrors::default();

        let saved = match &self.mode {
            FormMode::Create => repository.create(data).await,
            FormMode::Edit(client) => repository.update(client.id, data).await,
        };

        match saved {
            Ok(client) => {
                self.close();
                refresher.notify(&format!("Saved {}", client.name));
                reload(repository, refresher).await;
                SubmitOutcome::Saved(client)
            }
            Err(err) => self.fail(err, repository, refresher).await,
        }
    }

    /// Open the form on the stored copy of `id`, or drop the stale row if it is gone.
    pub async fn open_edit<S, R>(repository: &ClientRepository<S>, refresher: &mut R, id: ClientId) -> Option<Self>
    where
        S: StorageGateway,
        R: DisplayRefresher,
    {
        match repository.get(id).await {
            Ok(Some(client)) => Some(Self::edit(client)),
            Ok(None) => {
                warn!(%id, "selected client disappeared");
                refresher.notify(CLIENT_MISSING);
                reload(repository, refresher).await;
                None
            }
            Err(err) => {
                error!(error = %err, "failed to load client");
                refresher.notify(OPERATION_FAILED);
                None
            }
        }
    }

    async fn fail<S, R>(&mut self, err: RepositoryError, repository: &ClientRepository<S>, refresher: &mut R) -> SubmitOutcome
    where
        S: StorageGateway,
        R: DisplayRefresher,
    {
        match err {
            RepositoryError::NotFound(id) => {
                warn!(%id, "edited client disappeared");
                self.close();
                refresher.notify(CLIENT_MISSING);
                reload(repository, refresher).await;
                SubmitOutcome::Failed(CLIENT_MISSING)
            }
            RepositoryError::DuplicateEmail(_) => {
                self.errors.insert(
                    ClientField::Email,
                    FieldError::new(ValidationErrorKind::DuplicateValue, EMAIL_DUPLICATE),
                );
                SubmitOutcome::Invalid
            }
            RepositoryError::Storage(err) => {
                error!(error = %err, "client save failed");
                self.notice = Some(OPERATION_FAILED);
                SubmitOutcome::Failed(OPERATION_FAILED)
            }
        }
    }
}

async fn reload<S, R>(repository: &ClientRepository<S>, refresher: &mut R)
where
    S: StorageGateway,
    R: DisplayRefresher,
{
    if let Err(err) = refresh_display(repository, refresher).await {
        error!(error = %err, "failed to refresh client list");
        refresher.notify(OPERATION_FAILED);
    }
}

impl Default for ClientFormState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_client_form<B: Backend>(f: &mut Frame<B>, state: &ClientFormState) {
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)].as_ref())
        .split(area);

    let mut lines = Vec::new();
    for field in ClientField::ALL {
        let value = match field {
            ClientField::Name => state.name.as_str(),
            ClientField::Email => state.email.as_str(),
            ClientField::Phone => state.phone.as_str(),
            ClientField::Status => state.status.map_or("", |status| status.as_str()),
        };
        let row = TextField::new(field.label(), value)
            .focused(state.current_field == field)
            .editing(state.editing && field != ClientField::Status)
            .error(state.errors().get(field).map(|error| error.message));
        lines.extend(row.lines());
        lines.push(Spans::from(""));
    }

    if let Some(notice) = state.notice() {
        lines.push(Spans::from(Span::styled(notice, Style::default().fg(Color::Red))));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(state.title()),
    );
    f.render_widget(form, chunks[0]);

    let help_text = if state.editing {
        "Enter - Done | Esc - Stop editing".to_string()
    } else {
        format!(
            "Enter - Edit field | Up/Down - Navigate | S - {} | Esc - Cancel",
            state.submit_label()
        )
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}

pub fn handle_key(state: &mut ClientFormState, key: KeyEvent) -> Option<ClientFormAction> {
    if state.editing {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => state.editing = false,
            code => {
                let value = match state.current_field {
                    ClientField::Name => &mut state.name,
                    ClientField::Email => &mut state.email,
                    ClientField::Phone => &mut state.phone,
                    ClientField::Status => return None,
                };
                edit_text(value, code);
            }
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(ClientFormAction::Cancel),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            if state.current_field == ClientField::Status =>
        {
            state.cycle_status();
        }
        KeyCode::Enter => state.editing = true,
        KeyCode::Up => state.current_field = state.current_field.previous(),
        KeyCode::Down | KeyCode::Tab => state.current_field = state.current_field.next(),
        KeyCode::Char('s') | KeyCode::Char('S') => return Some(ClientFormAction::Submit),
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut ClientFormState) -> Result<Option<ClientFormAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key));
        }
    }
    Ok(None)
}
