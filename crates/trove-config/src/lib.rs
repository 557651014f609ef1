mod backend;
mod io;
mod model;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use model::LoggingConfig;
pub use paths::{BASE_DIR_ENV, ConfigError, TrovePaths};

use once_cell::sync::OnceCell;

static PATHS: OnceCell<TrovePaths> = OnceCell::new();
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Directorios del proceso (portable / sistema), detectados una sola vez.
pub fn paths() -> Result<&'static TrovePaths, ConfigError> {
  PATHS.get_or_try_init(TrovePaths::new)
}

/// Backend global sobre `trove.toml`.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| Ok(TomlConfigBackend::new(paths()?.clone())))
}
