//! Shared UI components (status bar, modal helpers).
//!
//! Contains the small building blocks layered over the list view.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormField, InputMode, ModalState};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "MODAL",
    };
    let state = if app.loading { "  loading" } else { "" };
    let pending = if app.in_flight > 0 {
        format!("  requests in flight:{}", app.in_flight)
    } else {
        String::new()
    };
    let msg = format!(
        "mode: {mode}  users:{}  rows/page:{}{state}{pending}",
        app.users.len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the create or edit form.
pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let (title, submit, name, email, focus) = match state {
        ModalState::CreateUser { draft, focus } => {
            ("Add New User", "Add User", draft.name.as_str(), draft.email.as_str(), *focus)
        }
        ModalState::EditUser { user, focus } => {
            ("Edit User", "Save Changes", user.name.as_str(), user.email.as_str(), *focus)
        }
        _ => return,
    };

    let width = 60u16.min(area.width.saturating_sub(4)).max(36);
    let rect = centered_rect(width, 11, area);

    let input = |label: &'static str, value: &str, placeholder: &'static str, field: FormField| {
        let focused = focus == field;
        let marker = if focused { "▶ " } else { "  " };
        let value_span = if value.is_empty() {
            Span::styled(placeholder, Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC))
        } else {
            Span::styled(value.to_string(), Style::default().fg(app.theme.text))
        };
        let mut spans = vec![
            Span::raw(marker),
            Span::styled(format!("{label:<6}"), Style::default().fg(app.theme.title)),
            value_span,
        ];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(app.theme.accent)));
        }
        Line::from(spans)
    };

    let lines = vec![
        Line::raw(""),
        input("Name", name, "Enter full name", FormField::Name),
        Line::raw(""),
        input("Email", email, "Enter email address", FormField::Email),
        Line::raw(""),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Esc", Style::default().add_modifier(Modifier::ITALIC)),
            Span::raw(": Cancel   "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::ITALIC)),
            Span::raw(": next field   "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::ITALIC)),
            Span::styled(format!(": {submit}"), Style::default().fg(app.theme.accent)),
        ]),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        // Compute a sensible max width and height; wrap long text
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 48u16.min(max_w);
        let inner_w = usize::from(min_w.saturating_sub(4).max(10));
        let approx_lines = (message.chars().count() / inner_w).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = u16::try_from(approx_lines + 4).unwrap_or(u16::MAX).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let general = [
        ("Add user", KeyAction::NewUser),
        ("Edit user", KeyAction::EditSelection),
        ("Delete user", KeyAction::DeleteSelection),
        ("Export CSV", KeyAction::ExportCsv),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ];
    let navigation = [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Previous page", KeyAction::MoveLeftPage),
        ("Next page", KeyAction::MoveRightPage),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
    ];
    let forms = [
        ("Next field", "Tab, Up, Down"),
        ("Submit", "Enter"),
        ("Cancel / Close", "Esc"),
    ];

    let label_w = 16usize;
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {label:>label_w$} │ ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
    };

    let mut lines: Vec<Line> = vec![heading("General:")];
    for (label, action) in general {
        lines.push(row(label, app.keymap.keys_for(action).join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(heading("Navigation:"));
    for (label, action) in navigation {
        lines.push(row(label, app.keymap.keys_for(action).join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(heading("Forms:"));
    for (label, keys) in forms {
        lines.push(row(label, keys.to_string()));
    }

    // Every row plus the two border rows; centered_rect clips to the area.
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let rect = centered_rect(width, height, area);

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Theme, keymap::Keymap};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn app() -> AppState {
        AppState::new(Theme::mocha(), Keymap::default(), "http://x", PathBuf::from("."))
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn help_modal_draws_every_row() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| render_help_modal(f, f.area(), &app))
            .unwrap();
        let text = screen_text(&terminal);
        for label in ["Add user", "Page down", "Next field", "Submit", "Cancel / Close"] {
            assert!(text.contains(label), "{label} row missing:\n{text}");
        }
    }

    #[test]
    fn info_modal_handles_very_long_message() {
        let app = app();
        let message = format!("could not write /{}: denied", "deep/".repeat(20_000));
        let state = ModalState::Info { message };
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| render_info_modal(f, f.area(), &app, &state))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Info"));
        assert!(text.contains("could not write"));
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect { x: 0, y: 0, width: 100, height: 40 };
        let r = centered_rect(60, 11, area);
        assert_eq!((r.x, r.y, r.width, r.height), (20, 14, 60, 11));

        let small = Rect { x: 2, y: 1, width: 20, height: 5 };
        let r = centered_rect(60, 11, small);
        assert_eq!((r.x, r.y, r.width, r.height), (2, 1, 20, 5));
    }
}
