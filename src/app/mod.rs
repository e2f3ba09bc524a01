//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::PathBuf;

use crate::model::{Draft, User};
use crate::reconcile::UserList;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub accent: Color,
}

/// Terminal palette names accepted in theme files.
const NAMED_COLORS: [(&str, Color); 17] = [
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
    ("white", Color::White),
];

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            accent: Color::Rgb(0x89, 0xb4, 0xfa),       // blue
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse `key = color` lines on top of `mocha`.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "accent" => theme.accent = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB"), a terminal palette
    /// index ("index:N"), or a named color ("reset", "cyan", "darkgray", ...).
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(idx) = lower.strip_prefix("index:") {
            return idx.trim().parse::<u8>().ok().map(Color::Indexed);
        }
        if let Some(named) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Some(named.1);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
            Color::Indexed(i) => format!("index:{i}"),
            named => NAMED_COLORS
                .iter()
                .find(|(_, color)| *color == named)
                .map(|(name, _)| name.to_string())
                .unwrap_or_else(|| "reset".to_string()),
        }
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# users-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, index:N, or a name such as 'reset' or 'cyan'\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, Self::color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("accent", self.accent);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the current default theme and return it.
    /// If present, load from it; on read errors, return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Which input of a user form has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Email,
}

impl FormField {
    pub fn toggle(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Name,
        }
    }
}

/// Modal dialogs. At most one is open at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// "Add New User" form holding the create draft.
    CreateUser { draft: Draft, focus: FormField },
    /// "Edit User" form holding a copy of the record being edited.
    EditUser { user: User, focus: FormField },
    Info { message: String },
    Help,
}

pub struct AppState {
    pub users: UserList,
    /// True until the initial fetch has answered, successfully or not.
    pub loading: bool,
    /// Requests dispatched whose outcome has not been applied yet.
    pub in_flight: usize,
    pub selected_user_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub modal: Option<ModalState>,
    pub api_url: String,
    pub export_dir: PathBuf,
}

impl AppState {
    /// Fresh state: empty list, waiting for the initial fetch.
    pub fn new(theme: Theme, keymap: keymap::Keymap, api_url: impl Into<String>, export_dir: PathBuf) -> Self {
        Self {
            users: UserList::new(),
            loading: true,
            in_flight: 0,
            selected_user_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            api_url: api_url.into(),
            export_dir,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_user_index)
    }

    /// Keep the selection inside the list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.users.len();
        if len == 0 {
            self.selected_user_index = 0;
        } else if self.selected_user_index >= len {
            self.selected_user_index = len - 1;
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
