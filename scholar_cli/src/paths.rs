//! Centralized path management for the scholar CLI
//!
//! Consistent locations for the cache database and the configuration
//! file across platforms.

use std::path::PathBuf;

/// The name of the application data directory used across all platforms
const APP_DATA_DIR: &str = "scholar";

/// The name of the cache database file
const DATABASE_FILE: &str = "scholar.db";

/// Returns the base data directory for the application.
///
/// Uses the platform data directory (`~/.local/share/scholar` on Linux),
/// falling back to `.scholar` in the current directory when the standard
/// location cannot be determined.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".scholar"))
}

/// Returns the path to the result cache database
pub fn get_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}

/// Returns the path to the configuration directory
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".scholar"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_is_in_data_dir() {
        let db_path = get_database_path();
        let data_dir = get_data_dir();

        assert!(
            db_path.starts_with(&data_dir),
            "Database path {} should be under data dir {}",
            db_path.display(),
            data_dir.display()
        );
        assert_eq!(
            db_path.file_name().and_then(|n| n.to_str()),
            Some(DATABASE_FILE)
        );
    }

    #[test]
    fn test_all_paths_use_app_dir() {
        for path in [get_data_dir(), get_config_dir(), get_config_path()] {
            assert!(
                path.to_string_lossy().contains("scholar"),
                "path should contain 'scholar': {}",
                path.display()
            );
        }
    }
}
