pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    render_header(f, root[0], app);

    if app.loading {
        users::render_loading(f, root[1], app);
    } else if app.users.is_empty() {
        users::render_empty_state(f, root[1], app);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
            .split(root[1]);
        users::render_users_table(f, body[0], app);
        users::render_user_card(f, body[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        let area = f.area();
        render_modal(f, area, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let mut hints: Vec<(KeyAction, &str)> = vec![(KeyAction::NewUser, "add user")];
    if !app.users.is_empty() {
        hints.push((KeyAction::EditSelection, "edit"));
        hints.push((KeyAction::DeleteSelection, "delete"));
        // Export is offered only when there is something to export.
        hints.push((KeyAction::ExportCsv, "export CSV"));
    }
    hints.push((KeyAction::OpenHelp, "help"));
    hints.push((KeyAction::Quit, "quit"));

    let hint_text = hints
        .iter()
        .filter_map(|(action, label)| {
            app.keymap
                .keys_for(*action)
                .first()
                .map(|k| format!("{k}: {label}"))
        })
        .collect::<Vec<_>>()
        .join("  ");

    let lines = vec![
        Line::from(vec![
            Span::styled("Users", Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled("Manage your user database", Style::default().fg(app.theme.muted)),
            Span::raw(format!("  ({})", app.api_url)),
        ]),
        Line::from(hint_text),
    ];
    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .title("users-manager")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    if let Some(state) = app.modal.as_ref() {
        match state {
            ModalState::CreateUser { .. } | ModalState::EditUser { .. } => {
                components::render_user_form(f, area, app, state);
            }
            ModalState::Info { .. } => {
                components::render_info_modal(f, area, app, state);
            }
            ModalState::Help => {
                components::render_help_modal(f, area, app);
            }
        }
    }
}
