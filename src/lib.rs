//! Library crate for users-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - Remote `/users` resource access (`api`)
//! - Command line / environment settings (`config`)
//! - Error and result types (`error`)
//! - CSV export (`export`)
//! - User records (`model`)
//! - The confirmed-only user list (`reconcile`)
//! - UI rendering and widgets (`ui`)
//! - Background request dispatch (`worker`)
//!
//! It is used by the `users-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod reconcile;
pub mod ui;
pub mod worker;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
