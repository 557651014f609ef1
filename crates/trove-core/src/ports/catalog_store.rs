use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CatalogId, Entity, EntityKind, NaturalKey};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,

  #[error("storage error: {0}")]
  Storage(String),

  #[error("serialization error: {0}")]
  Serialization(String),

  #[error("session is read-only")]
  ReadOnly,
}

/// Registro tal como lo guarda un store: tipo, identificador, clave natural
/// codificada y el cuerpo de la entidad en JSON.
///
/// Los stores sólo conocen este formato; la conversión desde/hacia tipos de
/// dominio vive en [`TypedSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
  pub kind: EntityKind,
  pub id: Uuid,
  pub natural_key: Option<String>,
  pub body: serde_json::Value,
}

impl StoredRecord {
  pub fn encode<E: Entity>(entity: &E) -> Result<Self, RepoError> {
    let body = serde_json::to_value(entity)
      .map_err(|e| RepoError::Serialization(format!("encode {}: {e}", E::KIND)))?;

    Ok(Self {
      kind: E::KIND,
      id: entity.id().as_uuid(),
      natural_key: entity.natural_key().map(|key| key.encode()),
      body,
    })
  }

  pub fn decode<E: Entity>(self) -> Result<E, RepoError> {
    if self.kind != E::KIND {
      return Err(RepoError::Serialization(format!(
        "record {} is a {}, expected {}",
        self.id,
        self.kind,
        E::KIND
      )));
    }
    serde_json::from_value(self.body)
      .map_err(|e| RepoError::Serialization(format!("decode {} {}: {e}", E::KIND, self.id)))
  }
}

/// Vista acotada del store: una instantánea de lectura o una transacción de
/// escritura, según cómo se haya abierto (ver [`CatalogStore`]).
///
/// Trabaja a nivel de registro para poder usarse como `dyn CatalogSession`.
pub trait CatalogSession {
  fn fetch(&mut self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, RepoError>;

  /// Todos los registros de un tipo, en orden de iteración del store.
  ///
  /// `Ok(None)` significa que el store no tiene colección para ese tipo; es
  /// una violación de contrato, distinta de una colección vacía.
  fn fetch_all(&mut self, kind: EntityKind) -> Result<Option<Vec<StoredRecord>>, RepoError>;

  fn fetch_by_natural_key(
    &mut self,
    kind: EntityKind,
    key: &str,
  ) -> Result<Vec<StoredRecord>, RepoError>;

  /// Inserta o sobrescribe por `(kind, id)`.
  fn put(&mut self, record: StoredRecord) -> Result<(), RepoError>;

  fn remove(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, RepoError>;
}

/// Operaciones tipadas sobre cualquier sesión.
pub trait TypedSession: CatalogSession {
  fn load<E: Entity>(&mut self, id: E::Id) -> Result<Option<E>, RepoError> {
    self.fetch(E::KIND, id.as_uuid())?.map(StoredRecord::decode).transpose()
  }

  fn load_all<E: Entity>(&mut self) -> Result<Option<Vec<E>>, RepoError> {
    let Some(records) = self.fetch_all(E::KIND)? else {
      return Ok(None);
    };
    records.into_iter().map(StoredRecord::decode).collect::<Result<Vec<E>, _>>().map(Some)
  }

  fn find_by_natural_key<E: Entity>(&mut self, key: &NaturalKey) -> Result<Vec<E>, RepoError> {
    self
      .fetch_by_natural_key(E::KIND, &key.encode())?
      .into_iter()
      .map(StoredRecord::decode)
      .collect()
  }

  fn save<E: Entity>(&mut self, entity: &E) -> Result<(), RepoError> {
    self.put(StoredRecord::encode(entity)?)
  }

  fn delete<E: Entity>(&mut self, id: E::Id) -> Result<bool, RepoError> {
    self.remove(E::KIND, id.as_uuid())
  }
}

impl<S: CatalogSession + ?Sized> TypedSession for S {}

/// Port del almacén del catálogo.
///
/// - `read` ejecuta `f` sobre una sesión de sólo lectura con una instantánea
///   consistente de todas las colecciones.
/// - `write` ejecuta `f` dentro de una transacción: se confirma si `f`
///   devuelve `Ok` y se descarta entera si devuelve `Err`. Las escrituras
///   concurrentes quedan serializadas.
pub trait CatalogStore: Send + Sync {
  fn read<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>;

  fn write<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>;

  fn load<E: Entity>(&self, id: E::Id) -> Result<Option<E>, RepoError> {
    self.read(|session| session.load::<E>(id))
  }

  fn load_all<E: Entity>(&self) -> Result<Option<Vec<E>>, RepoError> {
    self.read(|session| session.load_all::<E>())
  }

  fn find_by_natural_key<E: Entity>(&self, key: &NaturalKey) -> Result<Vec<E>, RepoError> {
    self.read(|session| session.find_by_natural_key::<E>(key))
  }

  fn delete<E: Entity>(&self, id: E::Id) -> Result<bool, RepoError> {
    self.write(|session| session.delete::<E>(id))
  }
}

impl<S: CatalogStore> CatalogStore for Arc<S> {
  fn read<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    (**self).read(f)
  }

  fn write<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    (**self).write(f)
  }
}

impl<S: CatalogStore> CatalogStore for &S {
  fn read<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    (**self).read(f)
  }

  fn write<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    (**self).write(f)
  }
}
