//! Environment variables and `.env` files

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::defaults::ENV_FILE_NAME;

/// Snapshot of the variables Rosetta reads.
///
/// Built from the process environment with an optional `.env` file laid on
/// top. Values from the file replace process values. The snapshot is never
/// written back to the process, so several contexts can coexist.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    env_file: Option<PathBuf>,
}

impl Environment {
    /// Capture the process environment plus the `.env` file nearest to `cwd`
    pub fn capture(cwd: &Path) -> Self {
        let mut env = Self::from_vars(std::env::vars());

        match find_env_file(cwd) {
            Some(path) => {
                if let Err(e) = env.overlay_env_file(&path) {
                    warn!(path = %path.display(), error = %e, "failed to read .env file");
                }
            }
            None => debug!(cwd = %cwd.display(), "no .env file found"),
        }

        env
    }

    /// Build an environment from explicit pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            env_file: None,
        }
    }

    /// Read and apply a `.env` file, returning the number of variables set
    pub fn overlay_env_file(&mut self, path: &Path) -> std::io::Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let pairs = parse_env_file(&content);
        let count = pairs.len();

        for (key, value) in pairs {
            debug!(key = %key, replaced = self.vars.contains_key(&key), "set from .env");
            self.vars.insert(key, value);
        }

        info!(path = %path.display(), count, "loaded .env file");
        self.env_file = Some(path.to_path_buf());
        Ok(count)
    }

    /// Get a variable; empty values count as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns true when the variable is present and non-empty
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a variable
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// The `.env` file that was applied, if any
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }
}

/// Locate `.env` in `cwd`, then in its parent
pub fn find_env_file(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join(ENV_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    let parent = cwd.parent()?.join(ENV_FILE_NAME);
    parent.is_file().then_some(parent)
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, lines without `=` are ignored,
/// everything after the first `=` is the value (trimmed). A single pair of
/// matching surrounding quotes is removed.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_env_file() {
        let pairs = parse_env_file(
            "# credentials\nISSUER_ID=abc\n\nKEY_ID = K1 \nURL=https://x/?a=b\nbroken line\n=novalue\nQUOTED=\"hello world\"\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("ISSUER_ID".to_string(), "abc".to_string()),
                ("KEY_ID".to_string(), "K1".to_string()),
                ("URL".to_string(), "https://x/?a=b".to_string()),
                ("QUOTED".to_string(), "hello world".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_env_file_prefers_cwd() {
        let temp = TempDir::new().unwrap();
        let child = temp.path().join("child");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(temp.path().join(".env"), "A=parent").unwrap();

        assert_eq!(find_env_file(&child), Some(temp.path().join(".env")));

        std::fs::write(child.join(".env"), "A=child").unwrap();
        assert_eq!(find_env_file(&child), Some(child.join(".env")));
    }

    #[test]
    fn test_env_file_overrides_process_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        std::fs::write(&path, "KEY_ID=from-file\n").unwrap();

        let mut env = Environment::from_vars([("KEY_ID", "from-process"), ("OTHER", "x")]);
        assert_eq!(env.overlay_env_file(&path).unwrap(), 1);
        assert_eq!(env.get("KEY_ID"), Some("from-file"));
        assert_eq!(env.get("OTHER"), Some("x"));
        assert_eq!(env.env_file(), Some(path.as_path()));
    }

    #[test]
    fn test_empty_value_is_unset() {
        let env = Environment::from_vars([("ISSUER_ID", "  ")]);
        assert!(!env.is_set("ISSUER_ID"));
    }
}
