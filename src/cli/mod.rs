//! Command-line interface module.

mod args;
pub mod countries;
pub mod dotenv;
pub mod resolve;

pub use args::{Cli, Commands, ResolveArgs};
