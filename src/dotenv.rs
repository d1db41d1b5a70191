//! Reading and writing `.env` style files.
//!
//! The dumper keeps parameters in file order, drops comments on rewrite and
//! removes the file entirely once the last parameter is gone.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Dotenv related errors
#[derive(Debug, Error)]
pub enum DotenvError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid variable name `{0}`")]
    InvalidKey(String),

    #[error("`{path}` line {line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

static KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Values that can be written without quotes.
static PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.,:/@%+=~-]+$").unwrap());

/// Check if `key` is a valid variable name.
#[inline]
pub fn is_valid_key(key: &str) -> bool {
    KEY.is_match(key)
}

// ============================================================================
// Dumper
// ============================================================================

/// In-memory view of a dotenv file.
#[derive(Debug, Clone)]
pub struct DotenvDumper {
    path: PathBuf,
    parameters: Vec<(String, String)>,
}

impl DotenvDumper {
    /// Load `path` if it exists, start empty otherwise.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DotenvError> {
        let path = path.into();
        let parameters = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|err| DotenvError::Io(path.clone(), err))?;
            parse(&content).map_err(|(line, message)| DotenvError::Syntax {
                path: path.clone(),
                line,
                message,
            })?
        } else {
            Vec::new()
        };

        Ok(Self { path, parameters })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a parameter, replacing the value in place if it already exists.
    pub fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), DotenvError> {
        if !is_valid_key(key) {
            return Err(DotenvError::InvalidKey(key.to_string()));
        }
        match self.parameters.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.parameters.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Remove a parameter. Returns the old value.
    pub fn unset_parameter(&mut self, key: &str) -> Option<String> {
        let pos = self.parameters.iter().position(|(k, _)| k == key)?;
        Some(self.parameters.remove(pos).1)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Render the file content.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.parameters {
            out.push_str(key);
            out.push('=');
            out.push_str(&escape(value));
            out.push('\n');
        }
        out
    }

    /// Write the file, or remove it when there are no parameters left.
    pub fn dump(&self) -> Result<(), DotenvError> {
        if self.parameters.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|err| DotenvError::Io(self.path.clone(), err))?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| DotenvError::Io(parent.to_path_buf(), err))?;
        }

        fs::write(&self.path, self.render()).map_err(|err| DotenvError::Io(self.path.clone(), err))
    }
}

/// Create an empty file unless it already exists.
pub fn touch(path: &Path) -> Result<bool, DotenvError> {
    if path.exists() {
        return Ok(false);
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| true)
        .map_err(|err| DotenvError::Io(path.to_path_buf(), err))
}

// ============================================================================
// Escaping
// ============================================================================

/// Quote a value so that reading it back yields the same string.
///
/// - plain tokens are written as-is
/// - anything else is single-quoted (literal, no interpolation)
/// - values with `'` or line breaks are double-quoted with escapes
pub fn escape(value: &str) -> String {
    if PLAIN.is_match(value) {
        return value.to_string();
    }
    if !value.contains(['\'', '\n', '\r']) {
        return format!("'{value}'");
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse dotenv content into ordered `(key, value)` pairs.
///
/// Errors carry the 1-based line number and a message.
fn parse(content: &str) -> Result<Vec<(String, String)>, (usize, String)> {
    let mut parameters: Vec<(String, String)> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let Some((key, value)) = line.split_once('=') else {
            return Err((line_no, format!("missing `=` in `{line}`")));
        };

        let key = key.trim_end();
        if !is_valid_key(key) {
            return Err((line_no, format!("invalid variable name `{key}`")));
        }

        let value = parse_value(value.trim_start()).map_err(|message| (line_no, message))?;

        match parameters.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => parameters.push((key.to_string(), value)),
        }
    }

    Ok(parameters)
}

fn parse_value(value: &str) -> Result<String, String> {
    if let Some(rest) = value.strip_prefix('\'') {
        let end = rest
            .find('\'')
            .ok_or_else(|| "missing closing `'`".to_string())?;
        return Ok(rest[..end].to_string());
    }

    if let Some(rest) = value.strip_prefix('"') {
        let mut out = String::new();
        let mut chars = rest.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => return Ok(out),
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => break,
                },
                c => out.push(c),
            }
        }
        return Err("missing closing `\"`".to_string());
    }

    // unquoted: a ` #` starts a comment
    let value = match value.find(" #") {
        Some(pos) => &value[..pos],
        None => value,
    };
    Ok(value.trim_end().to_string())
}
