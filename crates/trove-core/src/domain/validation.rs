use chrono::{Datelike, Utc};
use thiserror::Error;

use crate::domain::ids::ArtistId;

/// Año más antiguo aceptado para un lanzamiento.
pub const MIN_RELEASE_YEAR: i32 = 1500;

/// Error de validación de campos de una entidad.
///
/// Se produce al construir o modificar una entidad; nunca durante un ranking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  #[error("{field} must not be blank")]
  Blank { field: &'static str },

  #[error("{field} must be at most {max} characters")]
  TooLong { field: &'static str, max: usize },

  #[error("invalid artist name: {0:?}")]
  ArtistName(String),

  #[error("release year {year} is outside {min}..={max}")]
  ReleaseYear { year: i32, min: i32, max: i32 },

  #[error("invalid catalog number: {0:?}")]
  CatalogNumber(String),

  #[error("duplicate featured artist {0}")]
  DuplicateArtist(ArtistId),

  #[error("a credit must name at least one instrument")]
  EmptyInstrumentSet,

  #[error("rating {0} is outside 0..=100")]
  Rating(f64),

  #[error("track length {0} minutes is outside 1..=100")]
  TrackLength(f64),
}

/// Recorta `value` y comprueba que no esté vacío ni supere `max` caracteres.
pub(crate) fn required_text(
  field: &'static str,
  value: &str,
  max: usize,
) -> Result<String, ValidationError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::Blank { field });
  }
  optional_text(field, trimmed, max)
}

/// Como [`required_text`] pero admite cadena vacía.
pub(crate) fn optional_text(
  field: &'static str,
  value: &str,
  max: usize,
) -> Result<String, ValidationError> {
  let trimmed = value.trim();
  if trimmed.chars().count() > max {
    return Err(ValidationError::TooLong { field, max });
  }
  Ok(trimmed.to_string())
}

/// Nombre de artista: 3..=40 caracteres, palabras formadas por letras
/// (cualquier alfabeto) y los separadores habituales en créditos.
pub(crate) fn artist_name(value: &str) -> Result<String, ValidationError> {
  let trimmed = value.trim();
  let len = trimmed.chars().count();
  let letters_only = trimmed
    .split_whitespace()
    .all(|word| word.chars().all(|c| c.is_alphabetic() || matches!(c, ',' | '/' | '&' | '\'' | '.' | '-')));

  if !(3..=40).contains(&len) || !letters_only {
    return Err(ValidationError::ArtistName(value.to_string()));
  }
  Ok(trimmed.to_string())
}

pub(crate) fn release_year(year: i32) -> Result<i32, ValidationError> {
  let max = Utc::now().year();
  if !(MIN_RELEASE_YEAR..=max).contains(&year) {
    return Err(ValidationError::ReleaseYear { year, min: MIN_RELEASE_YEAR, max });
  }
  Ok(year)
}

/// Número de catálogo: prefijo del sello seguido de un número
/// (p. ej. `"ECM 1064/65"`), es decir, al menos dos partes.
pub(crate) fn catalog_number(value: &str) -> Result<String, ValidationError> {
  let trimmed = required_text("catalog number", value, 30)?;
  if trimmed.split_whitespace().count() < 2 {
    return Err(ValidationError::CatalogNumber(value.to_string()));
  }
  Ok(trimmed)
}
