//! CLI module - argument parsing and interactive prompts

mod args;
mod prompts;

pub use args::{CleanArgs, Cli, Commands};
pub use prompts::*;
