use crossterm::event::KeyCode;
use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

/// Apply a typing key to a text value. Returns true if the value changed.
pub fn edit_text(value: &mut String, key: KeyCode) -> bool {
    match key {
        KeyCode::Char(c) => {
            value.push(c);
            true
        }
        KeyCode::Backspace => value.pop().is_some(),
        _ => false,
    }
}

/// One labelled form row, plus the error line below it when there is one.
pub struct TextField<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub focused: bool,
    pub editing: bool,
    pub masked: bool,
    pub error: Option<&'a str>,
}

impl<'a> TextField<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            editing: false,
            masked: false,
            error: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn display_value(&self) -> String {
        let mut shown = if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.to_string()
        };
        if self.focused && self.editing {
            shown.push('|');
        }
        shown
    }

    pub fn lines(&self) -> Vec<Spans<'a>> {
        let label_style = if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let value_style = if self.focused && self.editing {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut lines = vec![Spans::from(vec![
            Span::styled(format!("{}: ", self.label), label_style),
            Span::styled(self.display_value(), value_style),
        ])];

        if let Some(error) = self.error {
            lines.push(Spans::from(Span::styled(
                format!("  {}", error),
                Style::default().fg(Color::Red),
            )));
        }

        lines
    }
}
