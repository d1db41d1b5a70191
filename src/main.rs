//! content-url - content URL resolution and project environment tooling.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod countries;
mod dotenv;
mod insert_tag;
mod logger;
mod routing;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = AppConfig::load(&cli)?;
    debug!("config"; "project root: {}", config.get_root().display());

    match &cli.command {
        Commands::DotEnvSet { key, value } => cli::dotenv::run_set(&config, key, value),
        Commands::DotEnvGet { key } => cli::dotenv::run_get(&config, key),
        Commands::DotEnvRemove { key } => cli::dotenv::run_remove(&config, key),
        Commands::Resolve { args } => cli::resolve::run_resolve(args, &config),
        Commands::Countries { code } => cli::countries::run_countries(code.as_deref()),
    }
}
