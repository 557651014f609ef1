use serde::{Deserialize, Serialize};

use crate::backend::ConfigBackend;
use crate::paths::ConfigError;

/// Sección `[logging]`.
///
/// `filter` usa la sintaxis de `EnvFilter` (p. ej. `"info,trove_core=debug"`).
/// `RUST_LOG`, si está definida, tiene prioridad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  pub filter: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self { filter: "info".to_string() }
  }
}

impl LoggingConfig {
  pub const SECTION: &'static str = "logging";

  /// Carga desde `trove.toml` usando el backend global.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(crate::config_backend()?)
  }

  /// Variante para tests: inyectar un backend distinto.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section_or_default(Self::SECTION)
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(Self::SECTION, self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{TomlConfigBackend, TrovePaths};
  use tempfile::tempdir;

  #[test]
  fn partial_section_falls_back_to_defaults() {
    let tmp = tempdir().unwrap();
    let paths = TrovePaths::from_base(tmp.path());
    paths.ensure_dirs().unwrap();
    std::fs::write(paths.config_file(), "[logging]\n").unwrap();

    let backend = TomlConfigBackend::new(paths);
    assert_eq!(LoggingConfig::load_from(&backend).unwrap(), LoggingConfig::default());

    let custom = LoggingConfig { filter: "debug,diesel=warn".into() };
    custom.save_to(&backend).unwrap();
    assert_eq!(LoggingConfig::load_from(&backend).unwrap(), custom);
  }
}
