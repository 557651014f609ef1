use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entity::Entity;
use crate::domain::ids::{ArtistId, ReleaseId};
use crate::domain::natural_key::{EntityKind, NaturalKey};
use crate::domain::validation::{self, ValidationError};

/// Representa a un artista dentro del catálogo.
///
/// Su identidad real es el nombre: dos `Artist` construidos por separado con
/// el mismo nombre se consolidan en un único registro al guardarse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
  /// Identificador sustituto, asignado al crear el objeto.
  pub id: ArtistId,

  /// Nombre canónico (clave natural).
  pub name: String,

  /// Lanzamientos en los que figura. Relación inversa: no la posee el artista.
  #[serde(default)]
  pub release_ids: BTreeSet<ReleaseId>,

  pub biography: Option<String>,

  /// Enlaces relevantes: páginas oficiales, redes, Wikipedia, etc.
  #[serde(default)]
  pub sites: Vec<String>,
}

impl Artist {
  pub fn new(name: &str) -> Result<Self, ValidationError> {
    Ok(Self {
      id: ArtistId::new(),
      name: validation::artist_name(name)?,
      release_ids: BTreeSet::new(),
      biography: None,
      sites: Vec::new(),
    })
  }

  pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
    self.name = validation::artist_name(name)?;
    Ok(())
  }

  pub fn with_releases(mut self, releases: impl IntoIterator<Item = ReleaseId>) -> Self {
    self.release_ids = releases.into_iter().collect();
    self
  }

  pub fn set_biography(&mut self, biography: &str) {
    self.biography = Some(biography.trim().to_string()).filter(|b| !b.is_empty());
  }
}

impl Entity for Artist {
  type Id = ArtistId;

  const KIND: EntityKind = EntityKind::Artist;

  fn id(&self) -> ArtistId {
    self.id
  }

  fn set_id(&mut self, id: ArtistId) {
    self.id = id;
  }

  fn natural_key(&self) -> Option<NaturalKey> {
    Some(NaturalKey::Artist { name: self.name.clone() })
  }
}
