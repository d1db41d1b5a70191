//! `dot-env:*` commands.
//!
//! Values are written to `.env.local` in the project directory; `.env` is
//! created empty if missing so the pair is always loadable.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::dotenv::{self, DotenvDumper};
use crate::{debug, log};

/// Base dotenv filename
const DOTENV_FILE: &str = ".env";

/// Local override filename
const DOTENV_LOCAL_FILE: &str = ".env.local";

fn local_path(root: &Path) -> PathBuf {
    root.join(DOTENV_LOCAL_FILE)
}

/// Write `key=value` into `.env.local` and make sure `.env` exists.
pub fn set_parameter(root: &Path, key: &str, value: &str) -> Result<()> {
    let mut dumper = DotenvDumper::open(local_path(root))?;
    dumper.set_parameter(key, value)?;
    dumper
        .dump()
        .with_context(|| format!("Failed to write '{}'", dumper.path().display()))?;
    debug!("dotenv"; "set {} in {}", key, dumper.path().display());

    let base = root.join(DOTENV_FILE);
    if dotenv::touch(&base)? {
        debug!("dotenv"; "created {}", base.display());
    }

    Ok(())
}

/// Read a parameter from `.env.local`.
pub fn get_parameter(root: &Path, key: &str) -> Result<Option<String>> {
    let dumper = DotenvDumper::open(local_path(root))?;
    Ok(dumper.get_parameter(key).map(str::to_string))
}

/// Remove a parameter from `.env.local`. Returns false if it was not set.
pub fn remove_parameter(root: &Path, key: &str) -> Result<bool> {
    let mut dumper = DotenvDumper::open(local_path(root))?;
    if dumper.unset_parameter(key).is_none() {
        return Ok(false);
    }
    dumper.dump()?;
    if dumper.is_empty() {
        debug!("dotenv"; "removed empty {}", dumper.path().display());
    }
    Ok(true)
}

// ============================================================================
// Commands
// ============================================================================

pub fn run_set(config: &AppConfig, key: &str, value: &str) -> Result<()> {
    set_parameter(config.get_root(), key, value)
}

pub fn run_get(config: &AppConfig, key: &str) -> Result<()> {
    match get_parameter(config.get_root(), key)? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!("'{}' is not set in {}", key, DOTENV_LOCAL_FILE),
    }
}

pub fn run_remove(config: &AppConfig, key: &str) -> Result<()> {
    if !remove_parameter(config.get_root(), key)? {
        log!("warning"; "'{}' is not set in {}", key, DOTENV_LOCAL_FILE);
    }
    Ok(())
}
