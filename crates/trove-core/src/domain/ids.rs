use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// Capacidad común de todos los identificadores del catálogo.
///
/// Cada entidad tiene su propio newtype sobre `Uuid`, de modo que un
/// `ArtistId` nunca puede confundirse con un `ReleaseId` en una relación.
pub trait CatalogId:
  Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
  fn from_uuid(u: Uuid) -> Self;
  fn as_uuid(&self) -> Uuid;
}

macro_rules! catalog_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(Uuid);

    impl $name {
      /// Genera un nuevo identificador único (UUID v4).
      pub fn new() -> Self {
        $name(Uuid::new_v4())
      }

      pub fn from_uuid(u: Uuid) -> Self {
        $name(u)
      }

      pub fn as_uuid(&self) -> Uuid {
        self.0
      }
    }

    impl Default for $name {
      fn default() -> Self {
        Self::new()
      }
    }

    impl CatalogId for $name {
      fn from_uuid(u: Uuid) -> Self {
        $name(u)
      }

      fn as_uuid(&self) -> Uuid {
        self.0
      }
    }

    impl From<Uuid> for $name {
      fn from(u: Uuid) -> Self {
        $name(u)
      }
    }

    impl From<$name> for Uuid {
      fn from(id: $name) -> Self {
        id.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
      }
    }
  };
}

catalog_id!(
  /// Identificador de un artista.
  ArtistId
);

catalog_id!(
  /// Identificador de un lanzamiento (`Release`).
  ///
  /// Es completamente abstracto: la identidad "real" del lanzamiento la da su
  /// clave natural (año, número de catálogo, título), no este UUID.
  ReleaseId
);

catalog_id!(
  /// Identificador de un instrumento musical.
  InstrumentId
);

catalog_id!(
  /// Identificador de un crédito artista ↔ instrumentos.
  CreditId
);

catalog_id!(
  /// Identificador de una actuación en vivo (concierto).
  PerformanceId
);

catalog_id!(
  /// Identificador de una reseña crítica.
  ReviewId
);

catalog_id!(ReleaseTrackId);
