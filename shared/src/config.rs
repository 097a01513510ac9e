use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use strum::EnumString;

pub const DEFAULT_SPACE_CODES: &[&str] = &["A1", "A2", "A3", "A4", "A5", "B1", "B2", "B3", "B4", "B5"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub database: Option<DatabaseConfig>,
    pub upload: UploadConfig,
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Separated from `new` so tests can feed variables without touching the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match lookup("STORAGE_BACKEND") {
            Some(v) => v
                .parse::<StorageBackend>()
                .with_context(|| format!("unknown STORAGE_BACKEND `{v}`"))?,
            None => StorageBackend::default(),
        };
        let storage = StorageConfig {
            backend,
            snapshot_path: lookup("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./db.json")),
        };

        let database = match backend {
            StorageBackend::Postgres => Some(DatabaseConfig {
                host: required(&lookup, "DATABASE_HOST")?,
                port: required(&lookup, "DATABASE_PORT")?
                    .parse()
                    .context("DATABASE_PORT must be a port number")?,
                username: required(&lookup, "DATABASE_USERNAME")?,
                password: required(&lookup, "DATABASE_PASSWORD")?,
                database: required(&lookup, "DATABASE_NAME")?,
            }),
            StorageBackend::Memory | StorageBackend::File => None,
        };

        let upload = UploadConfig {
            dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
        };

        let space_codes: Vec<String> = match lookup("SPACE_CODES") {
            Some(v) => v
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_SPACE_CODES.iter().map(|c| c.to_string()).collect(),
        };
        if space_codes.is_empty() {
            bail!("SPACE_CODES must name at least one space");
        }

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match lookup("PORT") {
                Some(v) => v.parse().context("PORT must be a port number")?,
                None => 3000,
            },
        };

        Ok(Self {
            storage,
            database,
            upload,
            catalog: CatalogConfig { space_codes },
            server,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key).with_context(|| format!("{key} is required for the postgres backend"))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub space_codes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}
