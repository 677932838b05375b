//! Ratatui front-end: the list, details and form screens over a
//! [`StudentStore`](crate::store::StudentStore).

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
