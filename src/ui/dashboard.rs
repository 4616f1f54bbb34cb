use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Client, ClientId, ClientStats, ClientStatus};
use crate::ui::components::popup::centered_rect;
use crate::ui::refresher::DisplayRefresher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarItem {
    Dashboard,
    Clients,
}

impl SidebarItem {
    fn toggled(self) -> Self {
        match self {
            SidebarItem::Dashboard => SidebarItem::Clients,
            SidebarItem::Clients => SidebarItem::Dashboard,
        }
    }
}

// Represents the state of the dashboard screen
pub struct DashboardState {
    clients: Vec<Client>,
    stats: ClientStats,
    list_state: ListState,
    user_email: Option<String>,
    sidebar: SidebarItem,
    show_delete_confirmation: bool,
    notice: Option<String>,
}

impl DashboardState {
    pub fn new(clients: Vec<Client>, user_email: Option<String>) -> Self {
        let mut state = Self {
            clients: Vec::new(),
            stats: ClientStats::default(),
            list_state: ListState::default(),
            user_email,
            sidebar: SidebarItem::Dashboard,
            show_delete_confirmation: false,
            notice: None,
        };
        state.refresh(clients);
        state
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn stats(&self) -> ClientStats {
        self.stats
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn sidebar(&self) -> SidebarItem {
        self.sidebar
    }

    pub fn next(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.clients.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.clients.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.list_state.selected().and_then(|i| self.clients().get(i))
    }

    pub fn selected_client_id(&self) -> Option<ClientId> {
        self.selected_client().map(|c| c.id)
    }
}

impl DisplayRefresher for DashboardState {
    fn refresh(&mut self, clients: Vec<Client>) {
        self.stats = ClientStats::from_clients(&clients);
        self.clients = clients;

        // Keep the cursor on a valid row
        let selected = match self.list_state.selected() {
            _ if self.clients.is_empty() => None,
            Some(i) => Some(i.min(self.clients.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    fn notify(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }
}

pub enum DashboardAction {
    Quit,
    Logout,
    NewClient,
    EditClient(ClientId),
    DeleteClient(ClientId),
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    let size = frame.size();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(40)].as_ref())
        .split(size);

    let sidebar = state.sidebar();
    render_sidebar(frame, sidebar, columns[0]);

    let content_constraints = if sidebar == SidebarItem::Dashboard {
        vec![
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Length(0),
            Constraint::Min(5),
            Constraint::Length(3),
        ]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(content_constraints)
        .split(columns[1]);

    render_topbar(frame, state.user_email.as_deref(), rows[0]);
    if sidebar == SidebarItem::Dashboard {
        render_stats(frame, state.stats(), rows[1]);
    }
    render_client_list(frame, state, rows[2]);

    let help_text = if state.selected_client().is_some() {
        "<N> New | <E> Edit | <D> Delete | <Tab> Switch view | <L> Logout | <Q> Quit"
    } else {
        "<N> New | <Tab> Switch view | <L> Logout | <Q> Quit"
    };
    let mut footer = vec![Spans::from(help_text)];
    if let Some(notice) = state.notice() {
        footer.insert(0, Spans::from(Span::styled(notice.to_string(), Style::default().fg(Color::Yellow))));
    }
    let buttons = Paragraph::new(footer)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, rows[3]);

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

fn render_sidebar<B: Backend>(frame: &mut Frame<B>, active: SidebarItem, area: Rect) {
    let items: Vec<ListItem> = [(SidebarItem::Dashboard, "Dashboard"), (SidebarItem::Clients, "Clients")]
        .into_iter()
        .map(|(item, label)| {
            let style = if item == active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(Span::styled(label, style)))
        })
        .collect();

    let sidebar = List::new(items).block(Block::default().title("Dashboard").borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn render_topbar<B: Backend>(frame: &mut Frame<B>, user_email: Option<&str>, area: Rect) {
    let title = match user_email {
        Some(email) => format!("Dashboard Overview | Signed in as {}", email),
        None => "Dashboard Overview".to_string(),
    };
    let topbar = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(topbar, area);
}

fn render_stats<B: Backend>(frame: &mut Frame<B>, stats: ClientStats, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ]
            .as_ref(),
        )
        .split(area);

    let values = [
        ("Total Clients", stats.total),
        ("Active Clients", stats.active),
        ("Inactive Clients", stats.inactive),
    ];

    for ((label, value), card_area) in values.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(vec![
            Spans::from(Span::styled(
                value.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(label),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(card, *card_area);
    }
}

fn render_client_list<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState, area: Rect) {
    let items: Vec<ListItem> = state
        .clients
        .iter()
        .map(|client| ListItem::new(client_row(client)))
        .collect();

    let clients_list = List::new(items)
        .block(Block::default().title("Client Management").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(clients_list, area, &mut state.list_state);
}

fn client_row(client: &Client) -> Spans<'_> {
    let status_style = match client.status {
        ClientStatus::Active => Style::default().fg(Color::Green),
        ClientStatus::Inactive => Style::default().fg(Color::DarkGray),
    };
    let phone = if client.phone.is_empty() { "-" } else { client.phone.as_str() };

    Spans::from(vec![
        Span::raw(format!("{:<24} {:<32} {:<16} ", client.name, client.email, phone)),
        Span::styled(format!("{:<9}", client.status.as_str()), status_style),
        Span::raw(format!(" {}", client.created_at.format("%Y-%m-%d"))),
    ])
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this client?"),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Option<DashboardAction> {
    if state.show_delete_confirmation {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                state.toggle_delete_confirmation();
                return state.selected_client_id().map(DashboardAction::DeleteClient);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.toggle_delete_confirmation(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(DashboardAction::Quit),
        KeyCode::Char('l') => return Some(DashboardAction::Logout),
        KeyCode::Char('n') => {
            state.notice = None;
            return Some(DashboardAction::NewClient);
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_client_id().map(DashboardAction::EditClient);
        }
        KeyCode::Char('d') => {
            if state.selected_client().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Tab => state.sidebar = state.sidebar.toggled(),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    use super::*;

    fn client(name: &str, status: ClientStatus) -> Client {
        Client {
            id: ClientId::new(),
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            phone: String::new(),
            status,
            created_at: Utc::now(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn refresh_recomputes_counters_and_keeps_order() {
        let mut state = DashboardState::new(Vec::new(), None);
        assert_eq!(state.stats(), ClientStats::default());

        let clients = vec![
            client("Zed", ClientStatus::Active),
            client("Amy", ClientStatus::Inactive),
        ];
        state.refresh(clients.clone());

        assert_eq!(state.clients(), clients.as_slice());
        assert_eq!(state.stats().total, state.clients().len());
        assert_eq!(state.stats().active + state.stats().inactive, state.stats().total);
        assert_eq!(state.selected_client_id(), Some(clients[0].id));
    }

    #[test]
    fn selection_clamps_when_rows_disappear() {
        let clients = vec![
            client("A", ClientStatus::Active),
            client("B", ClientStatus::Active),
            client("C", ClientStatus::Active),
        ];
        let mut state = DashboardState::new(clients.clone(), None);
        state.previous();
        assert_eq!(state.selected_client_id(), Some(clients[2].id));

        state.refresh(clients[..1].to_vec());
        assert_eq!(state.selected_client_id(), Some(clients[0].id));

        state.refresh(Vec::new());
        assert_eq!(state.selected_client_id(), None);
    }

    #[test]
    fn navigation_wraps() {
        let clients = vec![client("A", ClientStatus::Active), client("B", ClientStatus::Active)];
        let mut state = DashboardState::new(clients.clone(), None);

        state.next();
        assert_eq!(state.selected_client_id(), Some(clients[1].id));
        state.next();
        assert_eq!(state.selected_client_id(), Some(clients[0].id));
    }

    #[test]
    fn delete_requires_confirmation() {
        let alice = client("Alice", ClientStatus::Active);
        let mut state = DashboardState::new(vec![alice.clone()], None);

        assert!(handle_key(&mut state, key(KeyCode::Char('d'))).is_none());
        assert!(handle_key(&mut state, key(KeyCode::Char('q'))).is_none());
        assert!(matches!(
            handle_key(&mut state, key(KeyCode::Char('y'))),
            Some(DashboardAction::DeleteClient(id)) if id == alice.id
        ));
    }

    #[test]
    fn declined_delete_does_nothing() {
        let mut state = DashboardState::new(vec![client("Alice", ClientStatus::Active)], None);
        handle_key(&mut state, key(KeyCode::Char('d')));
        assert!(handle_key(&mut state, key(KeyCode::Char('n'))).is_none());
        assert!(matches!(handle_key(&mut state, key(KeyCode::Char('n'))), Some(DashboardAction::NewClient)));
    }

    #[test]
    fn edit_needs_a_selection() {
        let mut state = DashboardState::new(Vec::new(), None);
        assert!(handle_key(&mut state, key(KeyCode::Char('e'))).is_none());
    }

    #[test]
    fn tab_switches_sidebar_item() {
        let mut state = DashboardState::new(Vec::new(), None);
        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.sidebar(), SidebarItem::Clients);
        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.sidebar(), SidebarItem::Dashboard);
    }

    #[test]
    fn notify_sets_notice() {
        let mut state = DashboardState::new(Vec::new(), None);
        state.notify("Client no longer exists");
        assert_eq!(state.notice(), Some("Client no longer exists"));
    }
}
