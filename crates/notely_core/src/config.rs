//! Runtime configuration loaded from environment variables.

use crate::logging::default_log_level;
use crate::service::autosave::DEFAULT_AUTOSAVE_DELAY;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "NOTELY_DB_PATH";
pub const EXPORT_DIR_ENV: &str = "NOTELY_EXPORT_DIR";
pub const LOG_LEVEL_ENV: &str = "NOTELY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "NOTELY_LOG_DIR";
pub const AUTOSAVE_MS_ENV: &str = "NOTELY_AUTOSAVE_MS";

const DEFAULT_DB_FILE: &str = "notely.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub autosave_delay: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let base = env::temp_dir();
        Self {
            db_path: base.join(DEFAULT_DB_FILE),
            export_dir: base.join("notely-exports"),
            log_level: default_log_level().to_string(),
            log_dir: base.join("notely-logs"),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from `NOTELY_*` variables, falling back to
    /// defaults for missing, blank or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`CoreConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(expand_tilde)
                .unwrap_or(defaults.db_path),
            export_dir: non_blank(EXPORT_DIR_ENV)
                .map(expand_tilde)
                .unwrap_or(defaults.export_dir),
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: non_blank(LOG_DIR_ENV)
                .map(expand_tilde)
                .unwrap_or(defaults.log_dir),
            autosave_delay: non_blank(AUTOSAVE_MS_ENV)
                .and_then(|ms| ms.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.autosave_delay),
        }
    }
}

fn expand_tilde(path: String) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn resolve_home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, AUTOSAVE_MS_ENV, DB_PATH_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_with(vars: &[(&str, &str)]) -> CoreConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CoreConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_variables_use_defaults() {
        let config = config_with(&[]);
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with("notely.db"));
        assert_eq!(config.autosave_delay, Duration::from_millis(1_000));
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_with(&[
            (DB_PATH_ENV, "/data/notes.db"),
            (LOG_LEVEL_ENV, "warn"),
            (AUTOSAVE_MS_ENV, "250"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.autosave_delay, Duration::from_millis(250));
    }

    #[test]
    fn blank_or_bad_values_fall_back() {
        let config = config_with(&[(DB_PATH_ENV, "   "), (AUTOSAVE_MS_ENV, "soon")]);
        assert_eq!(config.db_path, CoreConfig::default().db_path);
        assert_eq!(config.autosave_delay, Duration::from_millis(1_000));
    }
}
