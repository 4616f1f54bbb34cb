use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::popup::centered_rect;
use crate::ui::components::text_field::{edit_text, TextField};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

pub enum LoginAction {
    Quit,
    Submit,
}

#[derive(Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub current_field: LoginField,
    pub error: Option<String>,
}

impl LoginState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

pub fn render_login<B: Backend>(f: &mut Frame<B>, state: &LoginState) {
    let area = centered_rect(50, 50, f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let header = Paragraph::new("Welcome Back | Please sign in to your account")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let field = state.current_field;
    let mut lines = TextField::new("Email Address", &state.email)
        .focused(field == LoginField::Email)
        .editing(true)
        .error(state.error.as_deref())
        .lines();
    lines.push(Spans::from(""));
    lines.extend(
        TextField::new("Password", &state.password)
            .focused(field == LoginField::Password)
            .editing(true)
            .masked(true)
            .lines(),
    );

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Sign In"));
    f.render_widget(form, chunks[1]);

    let help = Paragraph::new("Enter - Sign in | Tab - Next field | Esc - Quit | Demo: any email and password")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn handle_key(state: &mut LoginState, key: KeyEvent) -> Option<LoginAction> {
    match key.code {
        KeyCode::Esc => return Some(LoginAction::Quit),
        KeyCode::Enter => {
            state.clear_error();
            return Some(LoginAction::Submit);
        }
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => state.switch_field(),
        code => {
            let value = match state.current_field {
                LoginField::Email => &mut state.email,
                LoginField::Password => &mut state.password,
            };
            edit_text(value, code);
        }
    }
    None
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(state: &mut LoginState, code: KeyCode) -> Option<LoginAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut state = LoginState::new();
        for c in "me@x.com".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        press(&mut state, KeyCode::Tab);
        for c in "pw".chars() {
            press(&mut state, KeyCode::Char(c));
        }

        assert_eq!(state.email, "me@x.com");
        assert_eq!(state.password, "pw");
        assert_eq!(state.current_field, LoginField::Password);
    }

    #[test]
    fn enter_submits_and_clears_previous_error() {
        let mut state = LoginState::new();
        state.error = Some("Email is required".to_string());

        assert!(matches!(press(&mut state, KeyCode::Enter), Some(LoginAction::Submit)));
        assert!(state.error.is_none());
        assert!(matches!(press(&mut state, KeyCode::Esc), Some(LoginAction::Quit)));
    }
}
