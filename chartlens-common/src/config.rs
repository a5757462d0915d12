//! Configuration loading and database path resolution

use std::path::PathBuf;

/// Database path resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `CHARTLENS_DB` environment variable
/// 3. TOML config file (`database` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_database_path(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("CHARTLENS_DB") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(database) = config.get("database").and_then(|v| v.as_str()) {
                    return PathBuf::from(database);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_database_path()
}

/// Configuration file location: ~/.config/chartlens/config.toml (or the
/// platform equivalent), /etc/chartlens/config.toml as a Linux fallback
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("chartlens").join("config.toml"));
    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/chartlens/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Default database location: <OS data dir>/chartlens/chartlens.db
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("chartlens"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chartlens.db")
}
