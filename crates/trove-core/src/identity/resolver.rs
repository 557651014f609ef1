use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{CatalogId, Entity, NaturalKey};
use crate::ports::{CatalogSession, RepoError, TypedSession};

/// Resuelve la identidad de una entidad candidata por su clave natural.
///
/// Mantiene una caché `NaturalKey -> Uuid` que nunca es fuente de verdad:
/// cada acierto se verifica contra la sesión antes de usarlo.
#[derive(Debug, Default)]
pub struct IdentityResolver {
  cache: RwLock<HashMap<NaturalKey, Uuid>>,
}

impl IdentityResolver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Devuelve el identificador del registro existente con la misma clave
  /// natural que `candidate`, si lo hay.
  ///
  /// Pensado para ejecutarse dentro de la transacción de escritura que
  /// después guarda la entidad.
  pub fn reconcile<E: Entity>(
    &self,
    session: &mut dyn CatalogSession,
    candidate: &E,
  ) -> Result<Option<E::Id>, RepoError> {
    let Some(key) = candidate.natural_key() else {
      return Ok(None);
    };

    if let Some(id) = self.cached(&key) {
      let id = E::Id::from_uuid(id);
      match session.load::<E>(id)? {
        Some(existing) if existing.natural_key().as_ref() == Some(&key) => {
          debug!(kind = %E::KIND, %id, "natural key resolved from cache");
          return Ok(Some(id));
        }
        _ => {
          warn!(kind = %E::KIND, %id, "stale identity cache entry; evicting");
          self.evict(&key);
        }
      }
    }

    let mut matches = session.find_by_natural_key::<E>(&key)?;
    if matches.len() > 1 {
      warn!(
        kind = %E::KIND,
        key = %key.encode(),
        count = matches.len(),
        "ambiguous natural key match; using the first stored record"
      );
    }
    if matches.is_empty() {
      return Ok(None);
    }

    let existing = matches.swap_remove(0);
    Ok(Some(existing.id()))
  }

  /// Registra la clave natural de una entidad ya confirmada en el store.
  pub fn remember<E: Entity>(&self, entity: &E) {
    if let Some(key) = entity.natural_key() {
      self
        .cache
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, entity.id().as_uuid());
    }
  }

  /// Olvida la clave natural de una entidad borrada.
  pub fn forget<E: Entity>(&self, entity: &E) {
    if let Some(key) = entity.natural_key() {
      self.evict(&key);
    }
  }

  pub fn clear(&self) {
    self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
  }

  fn cached(&self, key: &NaturalKey) -> Option<Uuid> {
    self.cache.read().unwrap_or_else(PoisonError::into_inner).get(key).copied()
  }

  fn evict(&self, key: &NaturalKey) {
    self.cache.write().unwrap_or_else(PoisonError::into_inner).remove(key);
  }
}
