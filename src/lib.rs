// Library surface for headless/integration tests and reuse.
// Terminal setup and CLI parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod study;
pub mod ui;

pub use error::{LexicardError, Result};
