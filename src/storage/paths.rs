// Filesystem layout for nimbus.
// Resolves config, data, and log locations and maps storage keys to file names.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "nimbus")
}

/// Directory holding `config.toml` (~/.config/nimbus on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the configuration file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Base data directory (~/.local/share/nimbus on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory backing the persistent key-value store.
pub fn store_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("store"))
}

/// Path to the log file.
pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("nimbus.log"))
}

/// Sanitize a storage key for use as a file name.
/// Replaces problematic characters with underscores.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("favorites"), "favorites");
        assert_eq!(sanitize_key("weather:tashkent"), "weather_tashkent");
        assert_eq!(sanitize_key("weather:new york"), "weather_new_york");
        assert_eq!(sanitize_key("weather:41.300,69.240"), "weather_41.300,69.240");
    }

    #[test]
    fn test_paths() {
        // Path construction only, nothing touches the filesystem
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.toml"));
        }
        if let Some(path) = log_path() {
            assert!(path.ends_with("nimbus.log"));
        }
        if let Some(path) = store_dir() {
            assert!(path.ends_with("store"));
        }
    }
}
