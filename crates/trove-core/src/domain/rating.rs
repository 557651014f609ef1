use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::validation::ValidationError;

/// Valoración de una reseña crítica en la escala de 0.0 a 100.0.
///
/// Internamente se guarda como un entero (`u32`) en formato *fixed-point*
/// con 2 decimales de precisión:
///
/// - `0.0`   → `0`
/// - `87.5`  → `8750`
/// - `100.0` → `10000`
///
/// Así la media de varias reseñas no arrastra errores de redondeo de `f64`
/// al sumar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(u32);

impl Rating {
  /// Factor de escala usado para representar decimales (2 cifras).
  const SCALE_FACTOR: u32 = 100;
  const MAX_VALUE: u32 = 100 * Self::SCALE_FACTOR;

  /// Crea una `Rating` a partir de un valor en `[0.0, 100.0]` (inclusive).
  pub fn new(value: f64) -> Result<Self, ValidationError> {
    if !(0.0..=100.0).contains(&value) {
      return Err(ValidationError::Rating(value));
    }

    let scaled_value = (value * Self::SCALE_FACTOR as f64).round() as u32;
    if scaled_value > Self::MAX_VALUE {
      return Err(ValidationError::Rating(value));
    }

    Ok(Self(scaled_value))
  }

  pub fn as_f64(&self) -> f64 {
    self.0 as f64 / Self::SCALE_FACTOR as f64
  }

  /// Media aritmética de un conjunto de valoraciones; `None` si está vacío.
  ///
  /// La suma se hace en la representación entera.
  pub fn mean(ratings: impl IntoIterator<Item = Rating>) -> Option<f64> {
    let (sum, count) = ratings.into_iter().fold((0u64, 0u64), |(sum, count), r| (sum + r.0 as u64, count + 1));
    (count > 0).then(|| sum as f64 / count as f64 / Self::SCALE_FACTOR as f64)
  }
}

impl TryFrom<f64> for Rating {
  type Error = ValidationError;

  fn try_from(value: f64) -> Result<Self, Self::Error> {
    Rating::new(value)
  }
}

impl From<Rating> for f64 {
  fn from(rating: Rating) -> Self {
    rating.as_f64()
  }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.2}/100", self.as_f64())
  }
}
