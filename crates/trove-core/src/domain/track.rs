use serde::{Deserialize, Serialize};

use crate::domain::entity::Entity;
use crate::domain::ids::ReleaseTrackId;
use crate::domain::natural_key::EntityKind;
use crate::domain::validation::{self, ValidationError};

/// Representa una pista concreta dentro de un lanzamiento.
///
/// El lanzamiento la referencia desde `track_ids`. Un mismo tema puede
/// aparecer como pistas distintas en varios lanzamientos (álbum original,
/// compilación, edición japonesa...), así que no se deduplica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseTrack {
  pub id: ReleaseTrackId,

  /// Título de la pista tal como aparece en este lanzamiento.
  pub name: String,

  /// Duración en minutos, dentro de `[1, 100]`.
  pub length_minutes: f64,
}

impl ReleaseTrack {
  pub fn new(name: &str, length_minutes: f64) -> Result<Self, ValidationError> {
    let mut track = Self { id: ReleaseTrackId::new(), name: String::new(), length_minutes: 0.0 };
    track.set_name(name)?;
    track.set_length(length_minutes)?;
    Ok(track)
  }

  pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
    self.name = validation::required_text("track name", name, 40)?;
    Ok(())
  }

  pub fn set_length(&mut self, length_minutes: f64) -> Result<(), ValidationError> {
    if !(1.0..=100.0).contains(&length_minutes) {
      return Err(ValidationError::TrackLength(length_minutes));
    }
    self.length_minutes = length_minutes;
    Ok(())
  }
}

impl Entity for ReleaseTrack {
  type Id = ReleaseTrackId;

  const KIND: EntityKind = EntityKind::Track;

  fn id(&self) -> ReleaseTrackId {
    self.id
  }

  fn set_id(&mut self, id: ReleaseTrackId) {
    self.id = id;
  }
}
