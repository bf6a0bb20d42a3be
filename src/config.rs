use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Directory holding the local cache blob file.
    pub data_dir: PathBuf,
    /// Base URL of the remote store API, e.g. "http://localhost:8000/api".
    /// Absent means local-only operation.
    pub remote_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://intentional-week.db?mode=rwc".to_string());

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            remote_url: env::var("REMOTE_URL").ok(),
        }
    }
}
