use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory images are saved into when nothing overrides it.
pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";

/// Receive buffer handed to libcurl; bounds the size of each body chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Suffixes treated as image files, compared case-insensitively.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// Configuration loaded from `~/.config/imgfetch/config.toml`.
///
/// Every key is optional; a missing key keeps its built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Directory the fetched image is written into (relative to the working directory).
    pub output_dir: PathBuf,
    /// Body chunk size in bytes.
    pub chunk_size: usize,
    /// Recognized image extensions, including the leading dot.
    pub image_extensions: Vec<String>,
    /// Follow `Location` redirects before judging the final status.
    pub follow_redirects: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chunk_size: DEFAULT_CHUNK_SIZE,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            follow_redirects: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.get_config_home().join("imgfetch").join("config.toml"))
}

/// Load configuration from disk, falling back to defaults when no file exists.
///
/// Never writes to disk.
pub fn load_or_default() -> Result<FetcherConfig> {
    let path = config_path()?;
    load_from_path(&path)
}

/// Load configuration from an explicit path; a missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<FetcherConfig> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(FetcherConfig::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FetcherConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}
