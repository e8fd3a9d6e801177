use crate::service::{DEFAULT_COVER_IMAGE, DEFAULT_FEATURED_LIMIT};
use crate::uploads::{DEFAULT_CONTENT_TYPES, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_FILES};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9100";
pub const DEFAULT_DATA_FILE: &str = "gallery-data.json";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(Self::Json),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

// Gallery configuration sourced from environment variables, optionally
// overridden by a YAML file named in GALLERY_CONFIG.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub admin: bool,
    pub max_files: usize,
    pub max_file_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub default_cover: String,
    pub featured_limit: usize,
}

#[derive(Debug, Deserialize)]
struct GalleryConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    data_file: Option<PathBuf>,
    upload_dir: Option<PathBuf>,
    admin: Option<bool>,
    max_files: Option<usize>,
    max_file_bytes: Option<u64>,
    allowed_content_types: Option<Vec<String>>,
    default_cover: Option<String>,
    featured_limit: Option<usize>,
}

impl GalleryConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = match std::env::var("GALLERY_BIND") {
            Ok(value) => value.parse().with_context(|| "parse GALLERY_BIND")?,
            Err(_) => match std::env::var("PORT") {
                Ok(port) => {
                    let port: u16 = port.parse().with_context(|| "parse PORT")?;
                    SocketAddr::from(([0, 0, 0, 0], port))
                }
                Err(_) => DEFAULT_BIND.parse().with_context(|| "parse default bind")?,
            },
        };
        let metrics_bind = std::env::var("GALLERY_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse GALLERY_METRICS_BIND")?;
        let storage = match std::env::var("GALLERY_STORAGE") {
            Ok(value) => StorageBackend::parse(&value).with_context(|| "parse GALLERY_STORAGE")?,
            Err(_) => StorageBackend::Json,
        };
        let data_file = std::env::var("GALLERY_DATA_FILE")
            .unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string())
            .into();
        let upload_dir = std::env::var("GALLERY_UPLOAD_DIR")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string())
            .into();
        let admin = match std::env::var("GALLERY_ADMIN") {
            Ok(value) => parse_flag(&value).with_context(|| "parse GALLERY_ADMIN")?,
            Err(_) => true,
        };
        let max_files = match std::env::var("GALLERY_MAX_FILES") {
            Ok(value) => value.parse().with_context(|| "parse GALLERY_MAX_FILES")?,
            Err(_) => DEFAULT_MAX_FILES,
        };
        let max_file_bytes = match std::env::var("GALLERY_MAX_FILE_BYTES") {
            Ok(value) => value.parse().with_context(|| "parse GALLERY_MAX_FILE_BYTES")?,
            Err(_) => DEFAULT_MAX_FILE_BYTES,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            data_file,
            upload_dir,
            admin,
            max_files,
            max_file_bytes,
            allowed_content_types: DEFAULT_CONTENT_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
            default_cover: DEFAULT_COVER_IMAGE.to_string(),
            featured_limit: DEFAULT_FEATURED_LIMIT,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("GALLERY_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read GALLERY_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: GalleryConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse gallery config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.data_file {
            self.data_file = value;
        }
        if let Some(value) = override_cfg.upload_dir {
            self.upload_dir = value;
        }
        if let Some(value) = override_cfg.admin {
            self.admin = value;
        }
        if let Some(value) = override_cfg.max_files {
            self.max_files = value;
        }
        if let Some(value) = override_cfg.max_file_bytes {
            self.max_file_bytes = value;
        }
        if let Some(value) = override_cfg.allowed_content_types {
            self.allowed_content_types = value;
        }
        if let Some(value) = override_cfg.default_cover {
            self.default_cover = value;
        }
        if let Some(value) = override_cfg.featured_limit {
            self.featured_limit = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            bail!("max_files must be at least 1");
        }
        if self.max_file_bytes == 0 {
            bail!("max_file_bytes must be at least 1");
        }
        if self.allowed_content_types.is_empty() {
            bail!("allowed_content_types must not be empty");
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other}"),
    }
}
