use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entity::Entity;
use crate::domain::ids::{ArtistId, CreditId, InstrumentId};
use crate::domain::natural_key::{EntityKind, NaturalKey};
use crate::domain::validation::{self, ValidationError};

/// Instrumento musical. Su nombre es la clave natural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
  pub id: InstrumentId,
  pub name: String,
}

impl Instrument {
  pub fn new(name: &str) -> Result<Self, ValidationError> {
    Ok(Self { id: InstrumentId::new(), name: validation::required_text("instrument name", name, 40)? })
  }
}

impl Entity for Instrument {
  type Id = InstrumentId;

  const KIND: EntityKind = EntityKind::Instrument;

  fn id(&self) -> InstrumentId {
    self.id
  }

  fn set_id(&mut self, id: InstrumentId) {
    self.id = id;
  }

  fn natural_key(&self) -> Option<NaturalKey> {
    Some(NaturalKey::Instrument { name: self.name.clone() })
  }
}

/// Crédito de un artista con el conjunto de instrumentos que toca, ya sea en
/// un lanzamiento concreto o en general.
///
/// Dos créditos son el mismo si coinciden el artista y el conjunto completo
/// de instrumentos (igualdad de conjuntos, el orden no importa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistInstrumentCredit {
  pub id: CreditId,
  pub artist_id: ArtistId,
  pub instrument_ids: BTreeSet<InstrumentId>,
}

impl ArtistInstrumentCredit {
  pub fn new(
    artist_id: ArtistId,
    instruments: impl IntoIterator<Item = InstrumentId>,
  ) -> Result<Self, ValidationError> {
    let instrument_ids: BTreeSet<InstrumentId> = instruments.into_iter().collect();
    if instrument_ids.is_empty() {
      return Err(ValidationError::EmptyInstrumentSet);
    }
    Ok(Self { id: CreditId::new(), artist_id, instrument_ids })
  }
}

impl Entity for ArtistInstrumentCredit {
  type Id = CreditId;

  const KIND: EntityKind = EntityKind::Credit;

  fn id(&self) -> CreditId {
    self.id
  }

  fn set_id(&mut self, id: CreditId) {
    self.id = id;
  }

  fn natural_key(&self) -> Option<NaturalKey> {
    Some(NaturalKey::Credit { artist: self.artist_id, instruments: self.instrument_ids.clone() })
  }
}
