use std::fs;
use std::path::{Path, PathBuf};
use chrono_tz::Tz;
use log::{debug, info};
use serde::Deserialize;
use crate::common::{Error, Result};
use crate::resolver::{parse_timezone, PresetRangeResolver, DEFAULT_TIMEZONE};

const CONFIG_DIR: &str = "periodfilter";
const CONFIG_FILE: &str = "config.toml";

/// Settings read from `config.toml`. Every key is optional.
///
/// ```toml
/// timezone = "Asia/Bishkek"
/// url_param_prefix = "payment_date"
/// display_format = "%d.%m.%Y"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IANA zone "today" is computed in
    pub timezone: String,
    /// Query keys are `{prefix}_preset`, `{prefix}_from` and `{prefix}_to`
    pub url_param_prefix: String,
    /// chrono format for human readable ranges
    pub display_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: DEFAULT_TIMEZONE.to_string(),
            url_param_prefix: "date".to_string(),
            display_format: "%d.%m.%Y".to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/periodfilter/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Read config from a TOML file. A missing file gives the defaults, an unreadable or
    /// malformed one is an error.
    pub fn load_from_file(file_path: &Path) -> Result<Config> {
        if !file_path.is_file() {
            debug!("No config file at {}, using defaults", file_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(file_path)
            .map_err(|e| Error::Config(format!("unable to read {}: {e}", file_path.display())))?;
        let config = Config::parse(&content)?;
        info!("Loaded config from {}", file_path.display());
        Ok(config)
    }

    /// Like `load_from_file`, for a path the user asked for explicitly: anything but an existing
    /// file is an error.
    pub fn load_required_file(file_path: &Path) -> Result<Config> {
        if !file_path.is_file() {
            return Err(Error::Config(format!("{} is not a file", file_path.display())));
        }
        Config::load_from_file(file_path)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.url_param_prefix.is_empty() {
            return Err(Error::Config("url_param_prefix must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn resolver(&self) -> Result<PresetRangeResolver> {
        Ok(PresetRangeResolver::new(self.timezone()?))
    }
}
