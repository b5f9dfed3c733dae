use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a SQLite database at the given path and bring its schema up to date
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let mut opt = ConnectOptions::new(sqlite_url(path));
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let database = Self::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        log::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// Connect with explicit options and run pending migrations.
    ///
    /// sqlx enables `PRAGMA foreign_keys` on every SQLite connection it opens,
    /// so show and genre-link foreign keys are enforced on all pooled connections.
    pub async fn connect(options: ConnectOptions) -> Result<Self> {
        let conn = SeaDatabase::connect(options)
            .await
            .context("Failed to connect to database")?;

        log::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        Ok(Database { conn })
    }
}

/// `sqlite://` URL for a file path. Each component is percent-encoded so `?`, `#`
/// and `%` in file names don't end up in the query string.
fn sqlite_url(path: &Path) -> String {
    let encoded: Vec<String> = path
        .to_string_lossy()
        .split('/')
        .map(|component| urlencoding::encode(component).into_owned())
        .collect();
    format!("sqlite://{}?mode=rwc", encoded.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_encodes_file_name() {
        assert_eq!(
            sqlite_url(Path::new("/var/lib/showbook/showbook.db")),
            "sqlite:///var/lib/showbook/showbook.db?mode=rwc"
        );
        assert_eq!(
            sqlite_url(Path::new("/tmp/shows?#100%.db")),
            "sqlite:///tmp/shows%3F%23100%25.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn test_open_creates_file_with_unusual_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shows?#100%.db");

        let database = Database::open(&path).await.unwrap();
        drop(database);

        assert!(path.is_file());
    }
}
