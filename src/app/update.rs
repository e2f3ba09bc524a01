use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::UserApi;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormField, InputMode, ModalState};
use crate::export::{self, ExportError};
use crate::model::{Draft, fields_filled};
use crate::reconcile::{Applied, Outcome};
use crate::ui;
use crate::worker::{Command, Dispatcher};

/// What the event loop should do after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Send this request; the list changes only when its outcome arrives.
    Dispatch(Command),
}

pub fn run_app<A: UserApi>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    dispatcher: &Dispatcher<A>,
    outcomes: &mut UnboundedReceiver<Outcome>,
) -> Result<()> {
    dispatcher.load();
    app.in_flight += 1;

    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            apply_outcome(app, outcome);
        }

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(app, key) {
                        Flow::Quit => break,
                        Flow::Dispatch(command) => {
                            app.in_flight += 1;
                            dispatcher.dispatch(command);
                        }
                        Flow::Continue => {}
                    }
                }
            }
        }
    }

    if app.in_flight > 0 {
        tracing::info!(pending = app.in_flight, "exiting with requests in flight");
    }
    Ok(())
}

/// Apply a confirmed outcome to the list and close the form it completes.
pub fn apply_outcome(app: &mut AppState, outcome: Outcome) {
    let is_load = matches!(outcome, Outcome::Loaded(_));
    app.in_flight = app.in_flight.saturating_sub(1);

    match app.users.apply(outcome) {
        Applied::Loaded => app.selected_user_index = 0,
        Applied::Created => {
            app.selected_user_index = 0;
            if matches!(app.modal, Some(ModalState::CreateUser { .. })) {
                close_modal(app);
            }
        }
        Applied::Updated => {
            if matches!(app.modal, Some(ModalState::EditUser { .. })) {
                close_modal(app);
            }
        }
        Applied::Deleted | Applied::Failed => {}
    }

    if is_load {
        app.loading = false;
    }
    app.clamp_selection();
}

/// Route a key press to the open modal or to the list keymap.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Modal => handle_modal_key(app, key),
        InputMode::Normal => {
            let Some(action) = app.keymap.resolve(&key) else {
                return Flow::Continue;
            };
            if app.loading && !matches!(action, KeyAction::Quit | KeyAction::OpenHelp) {
                return Flow::Continue;
            }
            handle_action(app, action)
        }
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::NewUser => open_modal(
            app,
            ModalState::CreateUser {
                draft: Draft::default(),
                focus: FormField::Name,
            },
        ),
        KeyAction::EditSelection => {
            if let Some(user) = app.selected_user().cloned() {
                open_modal(
                    app,
                    ModalState::EditUser {
                        user,
                        focus: FormField::Name,
                    },
                );
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(user) = app.selected_user() {
                return Flow::Dispatch(Command::Delete(user.id));
            }
        }
        KeyAction::ExportCsv => export_csv(app),
        KeyAction::OpenHelp => open_modal(app, ModalState::Help),
        KeyAction::MoveUp => {
            if app.selected_user_index > 0 {
                app.selected_user_index -= 1;
            }
        }
        KeyAction::MoveDown => {
            if app.selected_user_index + 1 < app.users.len() {
                app.selected_user_index += 1;
            }
        }
        KeyAction::MoveLeftPage | KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            app.selected_user_index = app.selected_user_index.saturating_sub(rpp);
        }
        KeyAction::MoveRightPage | KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_user_index.saturating_add(rpp);
            app.selected_user_index = new_idx.min(app.users.len().saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match &mut app.modal {
        Some(ModalState::CreateUser { draft, focus }) => match key.code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                *focus = focus.toggle()
            }
            KeyCode::Backspace => {
                field_mut(&mut draft.name, &mut draft.email, *focus).pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                field_mut(&mut draft.name, &mut draft.email, *focus).push(c);
            }
            KeyCode::Enter => {
                if let Some(payload) = draft.to_payload() {
                    return Flow::Dispatch(Command::Create(payload));
                }
            }
            _ => {}
        },
        Some(ModalState::EditUser { user, focus }) => match key.code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                *focus = focus.toggle()
            }
            KeyCode::Backspace => {
                field_mut(&mut user.name, &mut user.email, *focus).pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                field_mut(&mut user.name, &mut user.email, *focus).push(c);
            }
            KeyCode::Enter => {
                if fields_filled(&user.name, &user.email) {
                    return Flow::Dispatch(Command::Update(user.clone()));
                }
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) | Some(ModalState::Help) => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => close_modal(app),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
    Flow::Continue
}

fn field_mut<'a>(name: &'a mut String, email: &'a mut String, focus: FormField) -> &'a mut String {
    match focus {
        FormField::Name => name,
        FormField::Email => email,
    }
}

fn export_csv(app: &mut AppState) {
    let message = match export::export_to_dir(&app.users, &app.export_dir) {
        Ok(path) => format!("Exported {} users to {}", app.users.len(), path.display()),
        Err(e @ ExportError::NothingToExport) => e.to_string(),
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            format!("Export failed: {e}")
        }
    };
    open_modal(app, ModalState::Info { message });
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

/// Close whatever modal is open; an open draft is dropped with it.
fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
