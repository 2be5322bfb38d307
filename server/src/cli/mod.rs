// server/src/cli/mod.rs

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod payload;

pub use cli::start_cli;
pub use commands::{CliArgs, Commands};
pub use handlers::handle_command;
