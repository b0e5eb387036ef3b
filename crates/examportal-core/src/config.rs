//! Portal configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which part-of-speech tagger scores grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerKind {
    /// Built-in lexicon and suffix heuristics.
    #[default]
    Lexicon,
}

/// Top-level examportal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Root directory holding one sub-directory per subject.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Tagger used for grammar-error counting.
    #[serde(default)]
    pub tagger: TaggerKind,
    /// Log filter directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tagger: TaggerKind::default(),
            log_filter: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `examportal.toml` in the current directory
/// 2. `~/.config/examportal/config.toml`
///
/// `EXAMPORTAL_DATA_DIR` overrides `data_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<PortalConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examportal.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<PortalConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => PortalConfig::default(),
    };

    if let Ok(dir) = std::env::var("EXAMPORTAL_DATA_DIR") {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examportal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMPORTAL_TEST_VAR", "exams");
        assert_eq!(resolve_env_vars("${_EXAMPORTAL_TEST_VAR}"), "exams");
        assert_eq!(
            resolve_env_vars("/srv/${_EXAMPORTAL_TEST_VAR}/data"),
            "/srv/exams/data"
        );
        std::env::remove_var("_EXAMPORTAL_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_EXAMPORTAL_TEST_SELF", "${_EXAMPORTAL_TEST_SELF}");
        assert_eq!(
            resolve_env_vars("a/${_EXAMPORTAL_TEST_SELF}/b"),
            "a/${_EXAMPORTAL_TEST_SELF}/b"
        );
        std::env::remove_var("_EXAMPORTAL_TEST_SELF");
    }

    #[test]
    fn resolve_env_vars_missing_is_empty() {
        assert_eq!(resolve_env_vars("x${_EXAMPORTAL_TEST_UNSET}y"), "xy");
    }

    #[test]
    fn resolve_env_vars_unterminated() {
        assert_eq!(resolve_env_vars("data/${OOPS"), "data/${OOPS");
    }

    #[test]
    fn default_config() {
        let config = PortalConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.tagger, TaggerKind::Lexicon);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn parse_config() {
        let toml_str = r#"
data_dir = "/var/lib/examportal"
tagger = "lexicon"
log_filter = "examportal=debug"
"#;
        let config: PortalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/examportal"));
        assert_eq!(config.log_filter.as_deref(), Some("examportal=debug"));
    }

    #[test]
    fn load_explicit_missing_path() {
        let err = load_config_from(Some(Path::new("/nonexistent/examportal.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examportal.toml");
        std::fs::write(&path, "data_dir = \"exam-data\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        if std::env::var("EXAMPORTAL_DATA_DIR").is_err() {
            assert_eq!(config.data_dir, PathBuf::from("exam-data"));
        }
    }
}
