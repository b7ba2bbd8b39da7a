// The binary entry point is main.rs; the module tree lives here so integration
// tests can drive sessions through `recite::session::*` and `recite::ui::*`.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod passage;
pub mod session;
pub mod store;
pub mod ui;
