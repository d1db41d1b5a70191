//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content URL resolution and project environment tooling
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: content-url.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "content-url.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Project directory holding the .env files (default: config directory)
    #[arg(short = 'd', long = "project-dir", global = true, value_hint = clap::ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Writes a parameter to the .env file
    #[command(name = "dot-env:set")]
    DotEnvSet {
        /// The variable name
        key: String,

        /// The new value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Prints a parameter from the .env file
    #[command(name = "dot-env:get")]
    DotEnvGet {
        /// The variable name
        key: String,
    },

    /// Removes a parameter from the .env file
    #[command(name = "dot-env:remove")]
    DotEnvRemove {
        /// The variable name
        key: String,
    },

    /// Resolve a content reference to an absolute URL
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// List countries or look up a country code
    #[command(visible_alias = "c")]
    Countries {
        /// Two-letter country code
        code: Option<String>,
    },
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// String URL to resolve, may contain insert-tags (e.g. "{{link_url::12}}")
    #[arg(value_name = "VALUE", required_unless_present = "page", conflicts_with = "page")]
    pub value: Option<String>,

    /// Resolve the page with this alias instead
    #[arg(long, value_name = "ALIAS")]
    pub page: Option<String>,

    /// Id of the page
    #[arg(long = "page-id", value_name = "ID", default_value_t = 0)]
    pub page_id: u32,

    /// Resolve the article with this alias on --page
    #[arg(long, value_name = "ALIAS", requires = "page", conflicts_with = "value")]
    pub article: Option<String>,

    /// Id of the article
    #[arg(
        long = "article-id",
        value_name = "ID",
        requires = "page",
        conflicts_with = "value"
    )]
    pub article_id: Option<u32>,

    /// Override the request URL from the config.
    ///
    /// Example: content-url resolve /about --base-url https://example.com
    #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,

    /// Override the request base path from the config
    #[arg(long = "base-path", value_name = "PATH")]
    pub base_path: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
