use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::listings::CorruptPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    Local,
}

impl std::str::FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageProvider::S3),
            "local" => Ok(StorageProvider::Local),
            other => Err(anyhow!("unknown storage provider '{}' (expected 's3' or 'local')", other)),
        }
    }
}

impl std::fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageProvider::S3 => write!(f, "s3"),
            StorageProvider::Local => write!(f, "local"),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: String,
    pub s3_secret_access_key: String,
    pub s3_endpoint: Option<String>,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
}

// Credentials stay out of logs.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_access_key_id", &mask(&self.s3_access_key_id))
            .field("s3_secret_access_key", &mask(&self.s3_secret_access_key))
            .field("s3_endpoint", &self.s3_endpoint)
            .field("upload_dir", &self.upload_dir)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub corrupt_policy: CorruptPolicy,
}

impl DataConfig {
    pub const FILE_NAME: &'static str = "pets.json";

    pub fn document_path(&self) -> PathBuf {
        self.dir.join(Self::FILE_NAME)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load from the process environment (and `.env`), letting `overrides` win
    /// for any key it answers.
    pub fn from_env_with<F>(overrides: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| overrides(key).or_else(|| env::var(key).ok()))
    }

    /// Build a config from an arbitrary key lookup. Every key has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port: u16 = var("PORT", "3000")
            .parse()
            .with_context(|| "PORT must be a valid port number")?;

        Ok(Self {
            server: ServerConfig {
                port,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: var("MAX_UPLOAD_BYTES", "10485760")
                    .parse()
                    .with_context(|| "MAX_UPLOAD_BYTES must be a byte count")?,
            },
            storage: StorageConfig {
                provider: var("STORAGE_PROVIDER", "s3").parse()?,
                s3_bucket: var("S3_BUCKET_NAME", "petpost-images"),
                s3_region: var("AWS_REGION", "us-east-1"),
                s3_access_key_id: var("AWS_ACCESS_KEY_ID", ""),
                s3_secret_access_key: var("AWS_SECRET_ACCESS_KEY", ""),
                s3_endpoint: lookup("S3_ENDPOINT").filter(|s| !s.trim().is_empty()),
                upload_dir: PathBuf::from(var("UPLOAD_DIR", "data/uploads")),
                public_base_url: lookup("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| format!("http://localhost:{}", port)),
            },
            data: DataConfig {
                dir: PathBuf::from(var("DATA_DIR", "data")),
                corrupt_policy: var("CORRUPT_DOCUMENT_POLICY", "empty").parse()?,
            },
            logging: LoggingConfig {
                log_dir: lookup("LOG_DIR").map(PathBuf::from),
            },
        })
    }
}
