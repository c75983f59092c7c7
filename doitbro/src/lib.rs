//! `doitbro` — terminal to-do list with live backend sync library.

pub mod app;
pub mod config;
pub mod session;
pub mod sync;
pub mod tasks;
pub mod ui;
