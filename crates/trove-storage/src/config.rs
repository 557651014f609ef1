use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trove_config::{ConfigBackend, ConfigError, TomlConfigBackend};

fn default_journal_mode() -> Option<String> {
  Some("WAL".to_string())
}

fn default_busy_timeout_ms() -> u64 {
  5_000
}

fn default_pool_size() -> u32 {
  4
}

/// Sección `[storage]` de `trove.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  #[serde(default = "default_journal_mode")]
  pub journal_mode: Option<String>,
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
  #[serde(default = "default_pool_size")]
  pub pool_size: u32,
}

impl StorageConfig {
  pub const SECTION: &'static str = "storage";

  pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
    Self {
      db_path: db_path.into(),
      journal_mode: default_journal_mode(),
      busy_timeout_ms: default_busy_timeout_ms(),
      pool_size: default_pool_size(),
    }
  }

  /// Carga desde la sección `[storage]` usando el backend global.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(trove_config::config_backend()?)
  }

  /// Si la sección no existe se escribe con los valores por defecto
  /// (base de datos en el directorio de datos).
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    if let Some(cfg) = backend.load_section_opt(Self::SECTION)? {
      return Ok(cfg);
    }

    let cfg = Self::with_db_path(backend.paths().data_dir.join("trove.db"));
    cfg.save_to(backend)?;
    Ok(cfg)
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(Self::SECTION, self)
  }
}
