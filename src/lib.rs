//! Core library surface for the student records TUI.
//!
//! The binary only composes these pieces: it loads configuration, installs
//! logging, wires a notice board into the store and hands everything to the
//! Ratatui loop.
pub mod config;
pub mod listing;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;
pub mod validation;

pub use config::AppConfig;

/// The domain types other layers manipulate.
pub use models::{Student, StudentFormData, StudentId};

/// Record ownership and the notices it emits.
pub use store::{CourseCatalog, NoticeBoard, StudentStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
