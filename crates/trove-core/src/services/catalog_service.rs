use tracing::debug;

use crate::domain::{Artist, Entity, Instrument, NaturalKey, Performance, Release, ReleaseTrack};
use crate::errors::CoreError;
use crate::identity::IdentityResolver;
use crate::ports::{CatalogStore, TypedSession};

/// Punto de entrada de escritura y consulta del catálogo.
///
/// Todas las escrituras pasan por `create_or_update`, que deduplica por clave
/// natural dentro de una única transacción del store.
pub struct CatalogService<S>
where
  S: CatalogStore,
{
  store: S,
  resolver: IdentityResolver,
}

impl<S> CatalogService<S>
where
  S: CatalogStore,
{
  pub fn new(store: S) -> Self {
    Self { store, resolver: IdentityResolver::new() }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  // -------- COMMAND (write) --------

  /// Inserta la entidad o sobrescribe la existente con la misma clave
  /// natural. Devuelve la entidad tal como quedó guardada (con el
  /// identificador del registro existente si hubo coincidencia).
  ///
  /// Los campos escalares se sobrescriben y las colecciones de relaciones se
  /// reemplazan enteras por las de `entity`.
  pub fn create_or_update<E: Entity>(&self, mut entity: E) -> Result<E, CoreError> {
    let saved = self.store.write(|session| {
      if let Some(existing) = self.resolver.reconcile(session, &entity)? {
        debug!(kind = %E::KIND, id = %existing, "natural key matched existing record");
        entity.set_id(existing);
      }
      session.save(&entity)?;
      Ok(entity)
    })?;

    self.resolver.remember(&saved);
    Ok(saved)
  }

  /// Borra el registro de `entity`. Devuelve `false` si no existía.
  pub fn delete<E: Entity>(&self, entity: &E) -> Result<bool, CoreError> {
    let removed = self.store.delete::<E>(entity.id())?;
    self.resolver.forget(entity);
    Ok(removed)
  }

  // -------- QUERY (read) --------

  /// Identificador del registro que `candidate` sobrescribiría, sin escribir.
  pub fn resolve<E: Entity>(&self, candidate: &E) -> Result<Option<E::Id>, CoreError> {
    Ok(self.store.read(|session| self.resolver.reconcile(session, candidate))?)
  }

  pub fn load<E: Entity>(&self, id: E::Id) -> Result<Option<E>, CoreError> {
    Ok(self.store.load::<E>(id)?)
  }

  pub fn get<E: Entity>(&self, id: E::Id) -> Result<E, CoreError> {
    self.load::<E>(id)?.ok_or(CoreError::NotFound)
  }

  pub fn load_all<E: Entity>(&self) -> Result<Vec<E>, CoreError> {
    self.store.load_all::<E>()?.ok_or(CoreError::MissingCollaboratorData(E::KIND))
  }

  pub fn find_artist_by_name(&self, name: &str) -> Result<Option<Artist>, CoreError> {
    self.find_first(&NaturalKey::Artist { name: name.to_string() })
  }

  pub fn find_instrument_by_name(&self, name: &str) -> Result<Option<Instrument>, CoreError> {
    self.find_first(&NaturalKey::Instrument { name: name.to_string() })
  }

  pub fn find_release_by_catalog_number(
    &self,
    catalog_number: &str,
  ) -> Result<Option<Release>, CoreError> {
    Ok(self.filter::<Release>(|r| r.catalog_number == catalog_number)?.into_iter().next())
  }

  pub fn find_releases_by_title(&self, title: &str) -> Result<Vec<Release>, CoreError> {
    self.filter(|r: &Release| r.title == title)
  }

  pub fn find_releases_by_year(&self, year: i32) -> Result<Vec<Release>, CoreError> {
    self.filter(|r: &Release| r.year == year)
  }

  pub fn find_releases_by_genre(&self, genre: &str) -> Result<Vec<Release>, CoreError> {
    self.filter(|r: &Release| r.genre == genre)
  }

  pub fn find_track_by_name(&self, name: &str) -> Result<Option<ReleaseTrack>, CoreError> {
    Ok(self.filter::<ReleaseTrack>(|t| t.name == name)?.into_iter().next())
  }

  pub fn find_performances_by_name(&self, name: &str) -> Result<Vec<Performance>, CoreError> {
    self.filter(|p: &Performance| p.name == name)
  }

  pub fn find_performances_by_city(&self, city: &str) -> Result<Vec<Performance>, CoreError> {
    self.filter(|p: &Performance| p.city.as_deref() == Some(city))
  }

  pub fn find_performances_by_country(
    &self,
    country: &str,
  ) -> Result<Vec<Performance>, CoreError> {
    self.filter(|p: &Performance| p.country == country)
  }

  fn find_first<E: Entity>(&self, key: &NaturalKey) -> Result<Option<E>, CoreError> {
    Ok(self.store.find_by_natural_key::<E>(key)?.into_iter().next())
  }

  fn filter<E: Entity>(&self, predicate: impl Fn(&E) -> bool) -> Result<Vec<E>, CoreError> {
    Ok(self.load_all::<E>()?.into_iter().filter(|e| predicate(e)).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Review;
  use crate::store::InMemoryCatalogStore;

  fn service() -> CatalogService<InMemoryCatalogStore> {
    CatalogService::new(InMemoryCatalogStore::new())
  }

  #[test]
  fn upsert_overwrites_scalars_of_matching_release() {
    let service = service();
    let first = Release::new(1975, "ECM 1064/65", "The Koln Concert").unwrap().with_sales(10);
    let first = service.create_or_update(first).unwrap();

    let again = Release::new(1975, "ECM 1064/65", "The Koln Concert").unwrap().with_sales(3_500_000);
    let again = service.create_or_update(again).unwrap();

    assert_eq!(again.id, first.id);
    let all = service.load_all::<Release>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].sales_count, 3_500_000);
  }

  #[test]
  fn entities_without_natural_key_are_always_inserted() {
    let service = service();
    service.create_or_update(Review::new("https://example.org/a", 90.0).unwrap()).unwrap();
    service.create_or_update(Review::new("https://example.org/a", 90.0).unwrap()).unwrap();

    assert_eq!(service.load_all::<Review>().unwrap().len(), 2);
  }

  #[test]
  fn get_reports_missing_records() {
    let service = service();
    let artist = Artist::new("Keith Jarrett").unwrap();
    assert!(matches!(service.get::<Artist>(artist.id), Err(CoreError::NotFound)));
  }

  #[test]
  fn resolve_does_not_write() {
    let service = service();
    let stored = service.create_or_update(Artist::new("Gary Peacock").unwrap()).unwrap();

    let candidate = Artist::new("Gary Peacock").unwrap();
    assert_eq!(service.resolve(&candidate).unwrap(), Some(stored.id));

    let newcomer = Artist::new("Jack DeJohnette").unwrap();
    assert_eq!(service.resolve(&newcomer).unwrap(), None);
    assert_eq!(service.load_all::<Artist>().unwrap().len(), 1);
  }
}
