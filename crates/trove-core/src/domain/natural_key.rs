use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ids::{ArtistId, InstrumentId};

/// Tipos de entidad que conoce el catálogo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  Artist,
  Release,
  Instrument,
  Credit,
  Performance,
  Review,
  Track,
}

impl EntityKind {
  pub const ALL: [EntityKind; 7] = [
    EntityKind::Artist,
    EntityKind::Release,
    EntityKind::Instrument,
    EntityKind::Credit,
    EntityKind::Performance,
    EntityKind::Review,
    EntityKind::Track,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      EntityKind::Artist => "artist",
      EntityKind::Release => "release",
      EntityKind::Instrument => "instrument",
      EntityKind::Credit => "credit",
      EntityKind::Performance => "performance",
      EntityKind::Review => "review",
      EntityKind::Track => "track",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind: {input}")]
pub struct EntityKindParseError {
  pub input: String,
}

impl FromStr for EntityKind {
  type Err = EntityKindParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    EntityKind::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| EntityKindParseError { input: s.to_string() })
  }
}

/// Clave natural de una entidad: los atributos propios que determinan si dos
/// registros denotan la misma cosa del mundo real.
///
/// Sólo usa campos escalares de la entidad o identificadores de las
/// entidades referenciadas; nunca recorre el estado completo de éstas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NaturalKey {
  Artist { name: String },
  Instrument { name: String },
  Release { year: i32, catalog_number: String, title: String },
  Credit { artist: ArtistId, instruments: BTreeSet<InstrumentId> },
}

impl NaturalKey {
  pub fn kind(&self) -> EntityKind {
    match self {
      NaturalKey::Artist { .. } => EntityKind::Artist,
      NaturalKey::Instrument { .. } => EntityKind::Instrument,
      NaturalKey::Release { .. } => EntityKind::Release,
      NaturalKey::Credit { .. } => EntityKind::Credit,
    }
  }

  /// Forma canónica en texto, usada como columna indexable por los stores.
  ///
  /// Es determinista: los conjuntos son `BTreeSet`, así que el orden de
  /// inserción de los instrumentos no cambia la codificación.
  pub fn encode(&self) -> String {
    match self {
      NaturalKey::Artist { name } => format!("artist:{}", escape(name)),
      NaturalKey::Instrument { name } => format!("instrument:{}", escape(name)),
      NaturalKey::Release { year, catalog_number, title } => {
        format!("release:{year}|{}|{}", escape(catalog_number), escape(title))
      }
      NaturalKey::Credit { artist, instruments } => {
        let ids: Vec<String> = instruments.iter().map(ToString::to_string).collect();
        format!("credit:{artist}|{}", ids.join(","))
      }
    }
  }
}

// `|` separa componentes; se escapa junto con la barra invertida.
fn escape(part: &str) -> String {
  part.replace('\\', "\\\\").replace('|', "\\|")
}
