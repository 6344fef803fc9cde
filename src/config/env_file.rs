//! `~/.env` parsing.
//!
//! The user's home may carry a `.env` file with Stencil settings such as
//! `CLI_HOME` or `STENCIL_REGISTRY`. Values from it never override variables
//! already present in the process environment.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Parses `.env` files into a map of variables.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Exported: `export KEY=value`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment`
/// - Values with equals signs: `URL=https://example.com?foo=bar`
///
/// # Example
///
/// ```
/// use stencil::config::EnvFileParser;
///
/// let content = r#"
/// # Scaffold settings
/// CLI_HOME=.stencil-dev
/// export STENCIL_REGISTRY="https://registry.npmjs.org"
/// "#;
///
/// let vars = EnvFileParser::parse(content);
/// assert_eq!(vars.get("CLI_HOME").map(String::as_str), Some(".stencil-dev"));
/// assert_eq!(
///     vars.get("STENCIL_REGISTRY").map(String::as_str),
///     Some("https://registry.npmjs.org")
/// );
/// ```
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse file content into a map of variables.
    pub fn parse(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), Self::unquote(value.trim()).to_string()))
    }

    fn unquote(value: &str) -> &str {
        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return &value[1..value.len() - 1];
            }
        }
        value
    }

    /// Load a file, returning an empty map if it doesn't exist.
    pub fn load_optional(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Overlay `process` on top of `file`; process variables win.
    pub fn merge(
        file: HashMap<String, String>,
        process: &HashMap<String, String>,
    ) -> HashMap<String, String> {
        let mut merged = file;
        merged.extend(process.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}
