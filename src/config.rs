use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::Context};
use serde::{Deserialize, Serialize};

const DEFAULT_DATABASE: &str = "~/.local/share/showbook/showbook.db";
const DEFAULT_STATIC_DIR: &str = "~/.local/share/showbook/static";

const DEFAULT_CONFIG: &str = r#"# showbook configuration

# SQLite database file
database = "~/.local/share/showbook/showbook.db"

# Stylesheets and images served under /static
static_dir = "~/.local/share/showbook/static"

# Address and port the HTTP server binds to
bind_address = "127.0.0.1"
port = 5000

# Optional log file (errors and requests are written here as well as to the console)
# log_file = "~/.local/share/showbook/error.log"
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    database: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default)]
    static_dir: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            bind_address: default_bind_address(),
            port: default_port(),
            log_file: None,
            static_dir: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("showbook").join("config.toml"))
    }

    /// Load the default config file, falling back to built-in defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config file, if it doesn't exist. Returns its path.
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| color_eyre::eyre::eyre!("No config directory on this platform"))?;
        Self::write_default(&path)?;
        Ok(path)
    }

    fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            log::info!("Config file already exists at: {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }
        std::fs::write(path, DEFAULT_CONFIG)
            .context(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    pub fn database_path(&self) -> PathBuf {
        self.expand_path(&self.database)
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|p| self.expand_path(p))
    }

    pub fn static_dir_path(&self) -> PathBuf {
        self.expand_path(self.static_dir.as_deref().unwrap_or(DEFAULT_STATIC_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::write_default(&path).unwrap();
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert!(config.log_file_path().is_none());
        assert!(config.database_path().ends_with("showbook/showbook.db"));
        assert!(config.static_dir_path().ends_with("showbook/static"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = \"/tmp/venues.db\"\nlog_file = \"/tmp/error.log\"\n")
            .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/venues.db"));
        assert_eq!(config.log_file_path(), Some(PathBuf::from("/tmp/error.log")));
        assert_eq!(config.port, 5000);
        assert!(config.static_dir_path().ends_with("showbook/static"));
    }

    #[test]
    fn test_static_dir_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"/tmp/venues.db\"\nstatic_dir = \"/srv/showbook/static\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.static_dir_path(), PathBuf::from("/srv/showbook/static"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(Config::from_file(&path).is_err());
    }
}
