// Navigation core library - exposes all modules for the binary and for testing

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod config_io;
pub mod exit_guard;
pub mod history;
pub mod model;
pub mod search;
pub mod services;
pub mod view;

/// Where navigation falls back to when nothing better is known
pub const ROOT_DIRECTORY: &str = "/";
