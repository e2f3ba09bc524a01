//! Command line and environment settings.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, simple_error};

/// Base URL used when neither `--api-url` nor `USERS_API_URL` is given.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

#[derive(Clone, Debug, Parser)]
#[command(name = "users-manager", version, about = "Manage users of a REST /users resource")]
pub struct Settings {
    /// Base URL of the user resource (the `/users` path is appended).
    #[arg(long, env = "USERS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory CSV exports are written to.
    #[arg(long, env = "USERS_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Theme file; created with defaults when missing.
    #[arg(long, env = "USERS_THEME", default_value = "theme.conf")]
    pub theme: String,

    /// Keybindings file; created with defaults when missing.
    #[arg(long, env = "USERS_KEYBINDS", default_value = "keybinds.conf")]
    pub keybinds: String,

    /// File the log is written to. The terminal belongs to the UI.
    #[arg(long, env = "USERS_LOG_FILE", default_value = "users-manager.log")]
    pub log_file: PathBuf,
}

impl Settings {
    /// Only plain `http://` URLs are reachable with the HTTP connector we use.
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") {
            return Err(simple_error(format!(
                "unsupported API URL {:?}: only http:// is supported",
                self.api_url
            )));
        }
        Ok(())
    }
}
