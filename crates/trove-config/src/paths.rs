use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Variable de entorno que fuerza un directorio base (modo portable / tests).
pub const BASE_DIR_ENV: &str = "TROVE_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("toml encode error: {0}")]
  TomlEncode(#[from] toml::ser::Error),
  #[error("toml document error: {0}")]
  TomlEdit(#[from] toml_edit::TomlError),
  #[error("decode section [{section}]: {source}")]
  Decode {
    section: String,
    #[source]
    source: toml::de::Error,
  },
  #[error("missing section [{section}] in {path:?}")]
  MissingSection { section: String, path: PathBuf },
  #[error("directories error: could not determine home directory")]
  Directories,
}

#[derive(Debug, Clone)]
pub struct TrovePaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl TrovePaths {
  /// Detecta los directorios de la plataforma (o los de `TROVE_BASE_DIR`) y
  /// los crea si no existen.
  pub fn new() -> Result<Self, ConfigError> {
    let paths = match std::env::var(BASE_DIR_ENV) {
      Ok(base) => Self::from_base(base),
      Err(_) => {
        let proj_dirs = ProjectDirs::from("com", "trove", "trove").ok_or(ConfigError::Directories)?;
        Self {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
          data_dir: proj_dirs.data_dir().to_path_buf(),
          cache_dir: proj_dirs.cache_dir().to_path_buf(),
        }
      }
    };

    paths.ensure_dirs()?;
    Ok(paths)
  }

  /// Layout portable bajo `base`. No toca el disco.
  pub fn from_base(base: impl Into<PathBuf>) -> Self {
    let base_dir = base.into();
    Self {
      config_dir: base_dir.join("config"),
      data_dir: base_dir.join("data"),
      cache_dir: base_dir.join("cache"),
      base_dir,
    }
  }

  pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
    std::fs::create_dir_all(&self.config_dir)?;
    std::fs::create_dir_all(&self.data_dir)?;
    std::fs::create_dir_all(&self.cache_dir)?;
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("trove.toml")
  }
}
