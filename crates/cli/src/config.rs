use anyhow::{Context as AnyhowContext, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use specforge_vector_store::{RebuildPolicy, DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_HOST};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 30;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedMode {
    /// Ollama `/api/embeddings`
    #[default]
    Ollama,
    /// Deterministic offline vectors
    Stub,
}

/// Optional `specforge.toml`; every key is a default that flags and env override
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub ollama_host: Option<String>,
    pub embed_model: Option<String>,
    pub embed_mode: Option<EmbedMode>,
    pub embed_timeout_secs: Option<u64>,
    pub rebuild_policy: Option<RebuildPolicy>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }
}

/// Values from the command line (clap already folded the env fallbacks in)
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub ollama_host: Option<String>,
    pub embed_model: Option<String>,
    pub embed_mode: Option<EmbedMode>,
    pub embed_timeout_secs: Option<u64>,
    pub rebuild_policy: Option<RebuildPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Where `<name>_vectors.json` files live; the data directory unless set
    pub cache_dir: PathBuf,
    pub ollama_host: String,
    pub embed_model: String,
    pub embed_mode: EmbedMode,
    pub embed_timeout: Duration,
    pub rebuild_policy: RebuildPolicy,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let data_dir = overrides
            .data_dir
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let cache_dir = overrides
            .cache_dir
            .or(file.cache_dir)
            .unwrap_or_else(|| data_dir.clone());

        Self {
            cache_dir,
            data_dir,
            ollama_host: overrides
                .ollama_host
                .or(file.ollama_host)
                .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            embed_model: overrides
                .embed_model
                .or(file.embed_model)
                .unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            embed_mode: overrides.embed_mode.or(file.embed_mode).unwrap_or_default(),
            embed_timeout: Duration::from_secs(
                overrides
                    .embed_timeout_secs
                    .or(file.embed_timeout_secs)
                    .unwrap_or(DEFAULT_EMBED_TIMEOUT_SECS),
            ),
            rebuild_policy: overrides
                .rebuild_policy
                .or(file.rebuild_policy)
                .unwrap_or_default(),
        }
    }
}
