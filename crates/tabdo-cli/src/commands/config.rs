//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tabdo_core::{Config, ListConfig, ListRegistry};

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "store_url": config.store_url,
                    "default_list": config.default_list,
                    "request_timeout_secs": config.request_timeout_secs,
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "lists": config.lists
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.store_url);
        }
        OutputFormat::Human => {
            let effective_path = config_file(config_path);
            println!("Configuration:");
            println!("  store_url:            {}", config.store_url);
            println!(
                "  default_list:         {}",
                config.default_list.as_deref().unwrap_or("(first list)")
            );
            println!("  request_timeout_secs: {}", config.request_timeout_secs);
            println!("  data_dir:             {}", config.data_dir.display());
            println!(
                "  log_file:             {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Lists:");
            for list in &config.lists {
                println!("  {:<20} {}", list.name, list.store_id);
            }
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let path = config_file(config_path);
    let mut config = Config::load_file(&path).context("Failed to load configuration")?;

    match key.as_str() {
        "store_url" => {
            if value.trim().is_empty() {
                bail!("store_url cannot be empty");
            }
            config.store_url = value.clone();
        }
        "default_list" => {
            config.default_list = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone())
            };
        }
        "request_timeout_secs" => {
            config.request_timeout_secs = value
                .parse()
                .context("Invalid value for request_timeout_secs. Use a number of seconds.")?;
        }
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: store_url, default_list, request_timeout_secs, data_dir, log_file",
                key
            );
        }
    }

    save(&config, &path)?;
    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Register a new list
pub fn add_list(
    name: String,
    store_id: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let path = config_file(config_path);
    let mut config = Config::load_file(&path).context("Failed to load configuration")?;

    config.lists.push(ListConfig::new(name.trim(), store_id.trim()));
    save(&config, &path)?;

    output.success(&format!("Added list {}", name.trim()));
    Ok(())
}

/// Remove a list from the registry
///
/// The remote document is left untouched.
pub fn remove_list(name: String, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let path = config_file(config_path);
    let mut config = Config::load_file(&path).context("Failed to load configuration")?;

    let before = config.lists.len();
    config.lists.retain(|list| list.name != name);
    if config.lists.len() == before {
        bail!("No list named '{}'", name);
    }
    if config.default_list.as_deref() == Some(name.as_str()) {
        config.default_list = None;
    }

    save(&config, &path)?;
    output.success(&format!("Removed list {}", name));
    Ok(())
}

/// The CLI-specified config file or the default one
fn config_file(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}

/// Validate the lists and write the config back
fn save(config: &Config, path: &PathBuf) -> Result<()> {
    ListRegistry::from_config(config).context("Invalid list configuration")?;
    config
        .save_to_path(path)
        .context("Failed to save configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Locks env access, sets a variable and restores it on drop
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        name: &'static str,
        saved: Option<String>,
    }

    impl<'a> EnvGuard<'a> {
        fn set(name: &'static str, value: &str) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = env::var(name).ok();
            env::set_var(name, value);
            Self {
                _lock: lock,
                name,
                saved,
            }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            match &self.saved {
                Some(v) => env::set_var(self.name, v),
                None => env::remove_var(self.name),
            }
        }
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn read(path: &PathBuf) -> Config {
        Config::load_file(path).unwrap()
    }

    #[test]
    fn test_set_writes_to_cli_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        set(
            "request_timeout_secs".to_string(),
            "3".to_string(),
            Some(&path),
            &quiet(),
        )
        .unwrap();

        assert_eq!(read(&path).request_timeout_secs, 3);
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let err = set("colour".to_string(), "red".to_string(), Some(&path), &quiet()).unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));

        let err = set(
            "request_timeout_secs".to_string(),
            "soon".to_string(),
            Some(&path),
            &quiet(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
        assert!(!path.exists());
    }

    #[test]
    fn test_set_unknown_default_list_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let err = set(
            "default_list".to_string(),
            "garden".to_string(),
            Some(&path),
            &quiet(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid list configuration"));
    }

    #[test]
    fn test_add_and_remove_list() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        add_list("work".to_string(), "222".to_string(), Some(&path), &quiet()).unwrap();
        set("default_list".to_string(), "work".to_string(), Some(&path), &quiet()).unwrap();

        let config = read(&path);
        assert_eq!(config.lists.len(), 2);
        assert_eq!(config.lists[1], ListConfig::new("work", "222"));

        remove_list("work".to_string(), Some(&path), &quiet()).unwrap();
        let config = read(&path);
        assert_eq!(config.lists.len(), 1);
        assert_eq!(config.default_list, None);
    }

    #[test]
    fn test_add_duplicate_list_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let err = add_list("todo".to_string(), "9".to_string(), Some(&path), &quiet()).unwrap_err();
        assert!(err.to_string().contains("Invalid list configuration"));
    }

    #[test]
    fn test_remove_last_list_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let err = remove_list("todo".to_string(), Some(&path), &quiet()).unwrap_err();
        assert!(err.to_string().contains("Invalid list configuration"));

        let err = remove_list("garden".to_string(), Some(&path), &quiet()).unwrap_err();
        assert!(err.to_string().contains("No list named"));
    }

    #[test]
    fn test_set_does_not_persist_env_overrides() {
        let _guard = EnvGuard::set("TABDO_STORE_URL", "http://env-only.example");
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        set(
            "request_timeout_secs".to_string(),
            "7".to_string(),
            Some(&path),
            &quiet(),
        )
        .unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("env-only.example"));
        assert_eq!(read(&path).store_url, tabdo_core::config::DEFAULT_STORE_URL);
    }

    #[test]
    fn test_list_edits_ignore_env_default_list() {
        let _guard = EnvGuard::set("TABDO_DEFAULT_LIST", "garden");
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        add_list("work".to_string(), "222".to_string(), Some(&path), &quiet()).unwrap();
        assert_eq!(read(&path).default_list, None);
    }
}
