//! Configuration management for `content-url.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! ├── util           # config file lookup
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                        |
//! |------------------|------------------------------------------------|
//! | `[request]`      | Request URLs are made absolute against         |
//! | `[routing]`      | Page URL generation (suffix)                   |
//! | `[insert_tags]`  | Values for `{{…}}` markers                     |
//!
//! The file is optional: without it every section uses its defaults and the
//! project root is the current directory.

pub mod types;
mod util;

use util::find_config_file;

pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    core::{UrlError, UrlHelper},
    insert_tag::InsertTagParser,
    log,
    routing::ResolverRegistry,
};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Default config filename
pub const CONFIG_FILE: &str = "content-url.toml";

// ============================================================================
// sections
// ============================================================================

/// `[request]`: the request generated URLs are relative to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Full URL of the current request (e.g. "https://example.com/news/index.html").
    pub url: Option<String>,

    /// Path the application is mounted under (e.g. "/app"), empty for the root.
    pub base_path: String,
}

impl RequestConfig {
    pub const URL: FieldPath = FieldPath::new("request.url");
    pub const BASE_PATH: FieldPath = FieldPath::new("request.base_path");

    /// Validate request configuration.
    ///
    /// # Checks
    /// - `url` must be a valid http(s) URL with a host
    /// - `base_path` must be empty or start with `/` and not end with `/`
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url_str) = &self.url {
            match url::Url::parse(url_str) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            Self::URL,
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.com",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            Self::URL,
                            "URL must have a valid host",
                            "use format like https://example.com",
                        );
                    }
                }
                Err(e) => {
                    diag.error_with_hint(
                        Self::URL,
                        format!("invalid URL: {}", e),
                        "use format like https://example.com",
                    );
                }
            }
        }

        let base = self.base_path.as_str();
        if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
            diag.error_with_hint(
                Self::BASE_PATH,
                format!("'{base}' must start with '/' and not end with '/'"),
                "use format like \"/app\", or leave empty for the root",
            );
        }
    }
}

/// `[routing]`: page URL generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Appended to page URLs (e.g. ".html"), empty by default.
    pub url_suffix: String,
}

impl RoutingConfig {
    pub const URL_SUFFIX: FieldPath = FieldPath::new("routing.url_suffix");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url_suffix.contains(['/', '?', '#']) {
            diag.error_with_hint(
                Self::URL_SUFFIX,
                format!("'{}' must not contain '/', '?' or '#'", self.url_suffix),
                "use format like \".html\"",
            );
        }
    }
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing content-url.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root: `--project-dir`, else the config file's directory, else cwd
    #[serde(skip)]
    pub root: PathBuf,

    pub request: RequestConfig,

    pub routing: RoutingConfig,

    /// Insert-tag values, keyed by tag (`link_url::12`) or tag name (`env`).
    pub insert_tags: FxHashMap<String, String>,
}

impl AppConfig {
    pub const INSERT_TAGS: FieldPath = FieldPath::new("insert_tags");

    /// Load configuration for the given CLI invocation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    /// Load configuration, searching for the config file upward from `cwd`.
    ///
    /// A missing default config is fine; a missing explicitly named one is not.
    pub fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut config = match find_config_file(cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(path);
                config
            }
            None if cli.config.as_path() != Path::new(CONFIG_FILE) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => Self {
                root: cwd.to_path_buf(),
                ..Self::default()
            },
        };

        config.apply_command_options(cli, cwd);

        // Only `resolve` reads [request], [routing] and [insert_tags].
        if matches!(cli.command, Commands::Resolve { .. }) {
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply global and command-specific CLI options.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        crate::logger::set_verbose(cli.verbose);

        if let Some(dir) = &cli.project_dir {
            self.root = cwd.join(dir);
        }

        if let Commands::Resolve { args } = &cli.command {
            if let Some(url) = &args.base_url {
                self.request.url = Some(url.clone());
            }
            if let Some(base_path) = &args.base_path {
                self.request.base_path = base_path.clone();
            }
        }
    }

    /// Validate all sections, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.request.validate(&mut diag);
        self.routing.validate(&mut diag);

        for tag in self.insert_tags.keys() {
            if tag.is_empty() || tag.contains(['{', '}']) {
                diag.error_with_hint(
                    Self::INSERT_TAGS,
                    format!("invalid tag '{tag}'"),
                    "write tags without braces, e.g. link_url::12",
                );
            }
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // collaborators
    // ========================================================================

    /// URL helper bound to `[request]`, or a pass-through helper without one.
    pub fn url_helper(&self) -> Result<UrlHelper, UrlError> {
        match &self.request.url {
            Some(url) => UrlHelper::for_request(url, &self.request.base_path),
            None => Ok(UrlHelper::default()),
        }
    }

    pub fn insert_tag_parser(&self) -> InsertTagParser {
        InsertTagParser::new(self.insert_tags.clone())
    }

    /// Default resolver registry wired to this configuration.
    pub fn registry(&self) -> Result<ResolverRegistry, UrlError> {
        Ok(ResolverRegistry::with_defaults(
            Arc::new(self.insert_tag_parser()),
            Arc::new(self.url_helper()?),
            &self.routing.url_suffix,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["content-url"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_from_str() {
        let config = AppConfig::from_str(
            r#"
            [request]
            url = "https://example.com/news/index.html"
            base_path = "/app"

            [routing]
            url_suffix = ".html"

            [insert_tags]
            "link_url::12" = "/contact"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.request.url.as_deref(),
            Some("https://example.com/news/index.html")
        );
        assert_eq!(config.request.base_path, "/app");
        assert_eq!(config.routing.url_suffix, ".html");
        assert_eq!(config.insert_tags["link_url::12"], "/contact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_str("").unwrap();
        assert!(config.request.url.is_none());
        assert!(config.routing.url_suffix.is_empty());
        assert!(config.insert_tags.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_with_ignored() {
        let (config, ignored) =
            AppConfig::parse_with_ignored("[routing]\nurl_suffix = \".html\"\nunknown = 1\n")
                .unwrap();
        assert_eq!(config.routing.url_suffix, ".html");
        assert_eq!(ignored, vec!["routing.unknown".to_string()]);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = AppConfig::from_str(
            r#"
            [request]
            url = "ftp://example.com"
            base_path = "app/"

            [routing]
            url_suffix = "/x"

            [insert_tags]
            "{{bad}}" = "x"
            "#,
        )
        .unwrap();

        match config.validate() {
            Err(ConfigError::Diagnostics(diag)) => {
                let fields: Vec<_> = diag.errors().iter().map(|e| e.field).collect();
                assert_eq!(
                    fields,
                    vec![
                        RequestConfig::URL,
                        RequestConfig::BASE_PATH,
                        RoutingConfig::URL_SUFFIX,
                        AppConfig::INSERT_TAGS,
                    ]
                );
            }
            other => panic!("expected diagnostics, got {other:?}"),
        }
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&cli(&["countries"]), dir.path()).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.get_root(), dir.path());
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load_from(&cli(&["-C", "custom.toml", "countries"]), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_parent_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[request]\nurl = \"https://example.com/\"\n",
        )
        .unwrap();
        let nested = dir.path().join("web");
        fs::create_dir_all(&nested).unwrap();

        let config = AppConfig::load_from(&cli(&["countries"]), &nested).unwrap();
        assert_eq!(config.get_root(), dir.path());
        assert_eq!(config.request.url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(
            &cli(&[
                "-d",
                "project",
                "resolve",
                "/about",
                "--base-url",
                "https://override.test/",
                "--base-path",
                "/app",
            ]),
            dir.path(),
        )
        .unwrap();
        assert_eq!(config.get_root(), dir.path().join("project"));
        assert_eq!(config.request.url.as_deref(), Some("https://override.test/"));
        assert_eq!(config.request.base_path, "/app");
    }

    #[test]
    fn test_invalid_cli_base_url_fails_validation() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load_from(
            &cli(&["resolve", "/about", "--base-url", "not a url"]),
            dir.path(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_request_section_ignored_by_dotenv_commands() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[request]\nurl = \"not a url\"\n\n[routing]\nurl_suffix = \"/x\"\n",
        )
        .unwrap();

        let config =
            AppConfig::load_from(&cli(&["dot-env:set", "APP_ENV", "prod"]), dir.path()).unwrap();
        crate::cli::dotenv::set_parameter(config.get_root(), "APP_ENV", "prod").unwrap();
        assert!(
            fs::read_to_string(dir.path().join(".env.local"))
                .unwrap()
                .contains("APP_ENV=prod")
        );

        let result = AppConfig::load_from(&cli(&["resolve", "/about"]), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_from_config() {
        let mut config = AppConfig::default();
        config.request.url = Some("https://example.com/".into());
        config
            .insert_tags
            .insert("link_url::12".into(), "/contact".into());

        let registry = config.registry().unwrap();
        let content = crate::routing::StringUrl::new("{{link_url::12}}").into();
        assert_eq!(
            registry.resolve(&content).unwrap().unwrap().url,
            "https://example.com/contact"
        );
    }
}
