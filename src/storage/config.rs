use super::Result;
use crate::core::filter::DEFAULT_DEBOUNCE;
use crate::core::pagination::{PageSizeChange, PagerConfig};
use crate::core::report_view::ViewConfig;
use crate::error::{AppError, ConfigError, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Keys accepted by `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "pagination.table_page_size",
    "pagination.table_threshold",
    "pagination.table_page_size_options",
    "pagination.card_page_size",
    "pagination.card_threshold",
    "pagination.card_page_size_options",
    "pagination.window",
    "pagination.table_page_size_change",
    "pagination.card_page_size_change",
    "display.no_color",
    "display.filter_debounce_ms",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PaginationSettings {
    pub table_page_size: usize,
    pub table_threshold: usize,
    pub table_page_size_options: Vec<usize>,
    pub card_page_size: usize,
    pub card_threshold: usize,
    pub card_page_size_options: Vec<usize>,
    pub window: usize,
    pub table_page_size_change: PageSizeChange,
    pub card_page_size_change: PageSizeChange,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        let tables = PagerConfig::table_rows();
        let cards = PagerConfig::node_cards();
        Self {
            table_page_size: tables.default_page_size,
            table_threshold: tables.threshold,
            table_page_size_options: tables.page_size_options,
            card_page_size: cards.default_page_size,
            card_threshold: cards.threshold,
            card_page_size_options: cards.page_size_options,
            window: tables.window,
            table_page_size_change: tables.page_size_change,
            card_page_size_change: cards.page_size_change,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub no_color: bool,
    pub filter_debounce_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            no_color: false,
            filter_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub pagination: PaginationSettings,
    pub display: DisplaySettings,
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive(key: &str, value: &str) -> std::result::Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(invalid(key, value, "must be greater than zero")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(key, value, "expected a positive integer")),
    }
}

fn parse_options(key: &str, value: &str) -> std::result::Result<Vec<usize>, ConfigError> {
    let options = value
        .split(',')
        .map(|part| parse_positive(key, part))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if options.is_empty() {
        return Err(invalid(key, value, "at least one page size is required"));
    }
    Ok(options)
}

fn parse_policy(key: &str, value: &str) -> std::result::Result<PageSizeChange, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reset" => Ok(PageSizeChange::Reset),
        "clamp" => Ok(PageSizeChange::Clamp),
        _ => Err(invalid(key, value, "expected 'reset' or 'clamp'")),
    }
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn format_options(options: &[usize]) -> String {
    options
        .iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn format_policy(policy: PageSizeChange) -> String {
    match policy {
        PageSizeChange::Reset => "reset".to_string(),
        PageSizeChange::Clamp => "clamp".to_string(),
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("{}: {}", config_path.display(), e),
            })?;

        log::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigSaveFailed {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        log::info!("Saved config to {}", config_path.display());
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(config_dir.join("kubebuddy-report").join("config.toml"))
    }

    /// Config file inside an explicit `--config-dir`, which must already exist.
    pub fn file_in_dir(dir: &Path) -> std::result::Result<PathBuf, AppError> {
        if !dir.is_dir() {
            return Err(ConfigError::FileNotFound {
                path: dir.display().to_string(),
                hint: format!("Create {} or omit --config-dir", dir.display()),
            }
            .into());
        }
        Ok(dir.join("config.toml"))
    }

    /// Pager settings for tables and node cards
    pub fn view_config(&self) -> ViewConfig {
        let p = &self.pagination;
        ViewConfig {
            tables: PagerConfig {
                threshold: p.table_threshold,
                default_page_size: p.table_page_size,
                page_size_options: p.table_page_size_options.clone(),
                window: p.window,
                page_size_change: p.table_page_size_change,
            },
            cards: PagerConfig {
                threshold: p.card_threshold,
                default_page_size: p.card_page_size,
                page_size_options: p.card_page_size_options.clone(),
                window: p.window,
                page_size_change: p.card_page_size_change,
            },
        }
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.display.filter_debounce_ms)
    }

    pub fn get(&self, key: &str) -> std::result::Result<String, ConfigError> {
        let p = &self.pagination;
        let value = match key {
            "pagination.table_page_size" => p.table_page_size.to_string(),
            "pagination.table_threshold" => p.table_threshold.to_string(),
            "pagination.table_page_size_options" => format_options(&p.table_page_size_options),
            "pagination.card_page_size" => p.card_page_size.to_string(),
            "pagination.card_threshold" => p.card_threshold.to_string(),
            "pagination.card_page_size_options" => format_options(&p.card_page_size_options),
            "pagination.window" => p.window.to_string(),
            "pagination.table_page_size_change" => format_policy(p.table_page_size_change),
            "pagination.card_page_size_change" => format_policy(p.card_page_size_change),
            "display.no_color" => self.display.no_color.to_string(),
            "display.filter_debounce_ms" => self.display.filter_debounce_ms.to_string(),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        };
        Ok(value)
    }

    /// Set one key from its textual value. The default page size must stay
    /// one of the offered options.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), AppError> {
        let mut updated = self.clone();
        let p = &mut updated.pagination;
        match key {
            "pagination.table_page_size" => p.table_page_size = parse_positive(key, value)?,
            "pagination.table_threshold" => p.table_threshold = parse_positive(key, value)?,
            "pagination.table_page_size_options" => {
                p.table_page_size_options = parse_options(key, value)?
            }
            "pagination.card_page_size" => p.card_page_size = parse_positive(key, value)?,
            "pagination.card_threshold" => p.card_threshold = parse_positive(key, value)?,
            "pagination.card_page_size_options" => {
                p.card_page_size_options = parse_options(key, value)?
            }
            "pagination.window" => p.window = parse_positive(key, value)?,
            "pagination.table_page_size_change" => {
                p.table_page_size_change = parse_policy(key, value)?
            }
            "pagination.card_page_size_change" => {
                p.card_page_size_change = parse_policy(key, value)?
            }
            "display.no_color" => updated.display.no_color = parse_bool(key, value)?,
            "display.filter_debounce_ms" => {
                updated.display.filter_debounce_ms = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| invalid(key, value, "expected milliseconds"))?
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into());
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let p = &self.pagination;
        if !p.table_page_size_options.contains(&p.table_page_size) {
            return Err(invalid(
                "pagination.table_page_size",
                &p.table_page_size.to_string(),
                "must be one of pagination.table_page_size_options",
            ));
        }
        if !p.card_page_size_options.contains(&p.card_page_size) {
            return Err(invalid(
                "pagination.card_page_size",
                &p.card_page_size.to_string(),
                "must be one of pagination.card_page_size_options",
            ));
        }
        Ok(())
    }

    /// All keys with their current values, in `CONFIG_KEYS` order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.pagination.table_page_size, 10);
        assert_eq!(config.pagination.card_page_size_options, vec![5, 10, 25, 50]);
        assert_eq!(config.display.filter_debounce_ms, 300);
        assert_eq!(config.view_config(), ViewConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_in_dir_requires_existing_directory() {
        let temp_dir = tempdir().expect("temp dir");
        assert_eq!(
            Config::file_in_dir(temp_dir.path()).expect("dir exists"),
            temp_dir.path().join("config.toml")
        );

        let missing = temp_dir.path().join("missing");
        let err = Config::file_in_dir(&missing).expect_err("missing dir");
        assert!(matches!(
            err,
            AppError::Config(ConfigError::FileNotFound { ref path, .. })
                if path == &missing.display().to_string()
        ));
        assert!(
            err.troubleshooting_hint()
                .is_some_and(|hint| hint.contains("omit --config-dir"))
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("pagination.window", "7").expect("valid window");
        assert_eq!(config.get("pagination.window").expect("known key"), "7");

        config
            .set("pagination.table_page_size_options", "10, 20, 40")
            .expect("valid options");
        config
            .set("pagination.table_page_size", "20")
            .expect("offered size");
        // 20 would no longer be offered
        assert!(config.set("pagination.table_page_size_options", "25").is_err());
        assert_eq!(config.view_config().tables.page_size_options, vec![10, 20, 40]);

        config
            .set("pagination.card_page_size_change", "Reset")
            .expect("valid policy");
        assert_eq!(
            config.view_config().cards.page_size_change,
            PageSizeChange::Reset
        );

        config.set("display.no_color", "yes").expect("valid bool");
        assert!(config.display.no_color);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        let before = config.clone();
        assert!(matches!(
            config.set("display.theme", "dark"),
            Err(AppError::Config(ConfigError::UnknownKey { .. }))
        ));
        assert!(matches!(
            config.set("pagination.window", "0"),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(config.set("pagination.table_page_size", "15").is_err());
        assert!(config.set("pagination.table_page_size_change", "sometimes").is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn test_entries_cover_all_keys() {
        let config = Config::default();
        let entries = config.entries();
        assert_eq!(entries.len(), CONFIG_KEYS.len());
        assert_eq!(entries[0], ("pagination.table_page_size", "10".to_string()));
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config
            .set("pagination.card_page_size", "10")
            .expect("valid size");
        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[display]\nno_color = true\n").expect("write config");

        let config = Config::load(Some(config_path)).expect("Failed to load config");
        assert!(config.display.no_color);
        assert_eq!(config.pagination, PaginationSettings::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[pagination\nwindow = ").expect("write config");
        assert!(matches!(
            Config::load(Some(config_path)),
            Err(StorageError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load(Some(temp_dir.path().join("missing.toml")))
            .expect("missing file falls back to defaults");
        assert_eq!(config, Config::default());
    }
}
