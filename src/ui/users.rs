use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::app::AppState;
use crate::app::keymap::KeyAction;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let users = app.users.as_slice();
    let start = (app.selected_user_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(users.len());
    let slice = &users[start.min(end)..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_user_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
        ])
        .style(style)
    });

    let widths = [Constraint::Length(8), Constraint::Percentage(40), Constraint::Percentage(60)];

    let header = Row::new(vec!["ID", "NAME", "EMAIL"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = format!("Users ({})", users.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// Card for the selected user: avatar letter, name, id and email.
pub fn render_user_card(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("User")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let Some(user) = app.selected_user() else {
        f.render_widget(block, area);
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", user.initial()),
            Style::default()
                .fg(app.theme.header_bg)
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            user.name.clone(),
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("ID {}", user.id), Style::default().fg(app.theme.muted))),
        Line::raw(""),
        Line::from(Span::styled(user.email.clone(), Style::default().fg(app.theme.text))),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(p, area);
}

pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let inner_y = area.height.saturating_sub(3) / 2;
    let mut lines: Vec<Line> = (0..inner_y).map(|_| Line::raw("")).collect();
    lines.push(Line::from(Span::styled(
        "Loading users…",
        Style::default().fg(app.theme.muted),
    )));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_empty_state(f: &mut Frame, area: Rect, app: &AppState) {
    let add_key = app
        .keymap
        .keys_for(KeyAction::NewUser)
        .into_iter()
        .next()
        .unwrap_or_else(|| "n".to_string());
    let inner_y = area.height.saturating_sub(7) / 2;
    let mut lines: Vec<Line> = (0..inner_y).map(|_| Line::raw("")).collect();
    lines.push(Line::from(Span::styled(
        "No users yet",
        Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Get started by adding your first user to the database",
        Style::default().fg(app.theme.muted),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Press "),
        Span::styled(add_key, Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" to add your first user"),
    ]));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title("Users")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
