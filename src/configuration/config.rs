#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    RequestTimeout,
    #[strum(serialize = "service-url")]
    ServiceURL,
}

pub struct Config {}

fn default_config_file() -> String {
    #[cfg(not(target_os = "macos"))]
    let base = dirs::config_dir();
    #[cfg(target_os = "macos")]
    let base = dirs::home_dir().map(|home| return home.join(".config"));

    return base
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("triage")
        .join("config.toml")
        .to_string_lossy()
        .to_string();
}

fn validate(values: &HashMap<ConfigKey, String>) -> Result<()> {
    let timeout = values
        .get(&ConfigKey::RequestTimeout)
        .cloned()
        .unwrap_or_default();
    match timeout.parse::<u64>() {
        Ok(0) | Err(_) => {
            bail!(format!(
                "Invalid value for '{}': {timeout}\nExpected a positive number of milliseconds.",
                ConfigKey::RequestTimeout
            ));
        }
        Ok(_) => (),
    }

    let url = values
        .get(&ConfigKey::ServiceURL)
        .cloned()
        .unwrap_or_default();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!(format!(
            "Invalid value for '{}': {url}\nExpected an http:// or https:// URL.",
            ConfigKey::ServiceURL
        ));
    }

    return Ok(());
}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ConfigFile => return default_config_file(),
            ConfigKey::RequestTimeout => return "10000".to_string(),
            ConfigKey::ServiceURL => return "http://localhost:5000".to_string(),
        }
    }

    /// Layers defaults, the TOML config file and CLI flags (or their env
    /// fallbacks), later layers winning. Nothing is stored.
    pub async fn resolve(
        clap_arg_matches: Vec<&ArgMatches>,
    ) -> Result<HashMap<ConfigKey, String>> {
        let mut values = ConfigKey::iter()
            .map(|key| return (key, Config::default(key)))
            .collect::<HashMap<ConfigKey, String>>();

        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                values.insert(ConfigKey::ConfigFile, arg_config_file.to_string());
            }
        }

        let config_path = path::PathBuf::from(&values[&ConfigKey::ConfigFile]);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        values.insert(key, val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        values.insert(key, val_str.to_string());
                    } else {
                        bail!(format!(
                            "{} has an invalid value for key '{key}': {}",
                            config_path.display(),
                            val.to_string().trim()
                        ));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    values.insert(key, val.to_string());
                }
            }
        }

        validate(&values)?;

        return Ok(values);
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let values = Config::resolve(clap_arg_matches).await?;
        for (key, val) in values.iter() {
            Config::set(*key, val);
        }

        tracing::debug!(
            config_file = Config::get(ConfigKey::ConfigFile),
            service_url = Config::get(ConfigKey::ServiceURL),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let description = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    .and_then(|arg| return arg.get_help())
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                let description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
