use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::ids::CatalogId;
use crate::domain::natural_key::{EntityKind, NaturalKey};

/// Capacidad que implementa cada tipo persistible del catálogo.
///
/// El resolvedor de identidad sólo habla con este trait: pide la clave
/// natural a la entidad en lugar de decidir según su tipo concreto.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
  type Id: CatalogId;

  const KIND: EntityKind;

  fn id(&self) -> Self::Id;

  fn set_id(&mut self, id: Self::Id);

  /// Clave natural, o `None` si el tipo no tiene política de deduplicación.
  fn natural_key(&self) -> Option<NaturalKey> {
    None
  }
}
