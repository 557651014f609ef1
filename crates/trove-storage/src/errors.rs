use thiserror::Error;
use trove_core::RepoError;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),

  #[error("migration error: {0}")]
  Migration(String),

  #[error("query error: {0}")]
  Query(#[from] diesel::result::Error),

  #[error("invalid journal mode {0:?}")]
  JournalMode(String),

  #[error(transparent)]
  Repo(#[from] RepoError),
}

impl From<StorageError> for RepoError {
  fn from(err: StorageError) -> Self {
    match err {
      StorageError::Repo(inner) => inner,
      other => RepoError::Storage(other.to_string()),
    }
  }
}
