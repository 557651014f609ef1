// crates/trove-core/src/errors.rs
use thiserror::Error;

use crate::domain::{EntityKind, ValidationError};
use crate::ports::RepoError;

/// Error genérico del núcleo de Trove.
///
/// Las capas superiores (CLI, binarios de prueba, etc.) deberían mapear este
/// error a mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  /// `k <= 0` en una consulta de ranking. Es un error de programación del
  /// llamador, no una señal de "resultado vacío".
  #[error("k should be positive (got {0})")]
  InvalidBound(i64),

  /// El store devolvió una colección ausente (no vacía) para un tipo que la
  /// consulta necesita.
  #[error("backing collection is null: {0}")]
  MissingCollaboratorData(EntityKind),

  #[error("repository error: {0}")]
  Repository(#[from] RepoError),

  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("not found")]
  NotFound,
}
