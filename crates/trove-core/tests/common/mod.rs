//! Fixtures compartidas por los tests de integración del núcleo.

#![allow(dead_code)]

use std::sync::Arc;

use trove_core::domain::{
  Artist, ArtistId, ArtistInstrumentCredit, EntityKind, Instrument, InstrumentId, Release, Review,
};
use trove_core::{
  CatalogService, CatalogSession, CatalogStore, InMemoryCatalogStore, RankingEngine, RepoError,
  StoredRecord,
};
use uuid::Uuid;

pub type MemoryService = CatalogService<Arc<InMemoryCatalogStore>>;
pub type MemoryRanking = RankingEngine<Arc<InMemoryCatalogStore>>;

/// Servicio y motor de rankings sobre el mismo store en memoria.
pub fn catalog() -> (MemoryService, MemoryRanking) {
  let store = Arc::new(InMemoryCatalogStore::new());
  (CatalogService::new(Arc::clone(&store)), RankingEngine::new(store))
}

pub fn artist(service: &MemoryService, name: &str) -> Artist {
  service.create_or_update(Artist::new(name).unwrap()).unwrap()
}

pub fn instrument(service: &MemoryService, name: &str) -> Instrument {
  service.create_or_update(Instrument::new(name).unwrap()).unwrap()
}

pub fn credit(
  service: &MemoryService,
  artist: ArtistId,
  instruments: &[InstrumentId],
) -> ArtistInstrumentCredit {
  let credit = ArtistInstrumentCredit::new(artist, instruments.iter().copied()).unwrap();
  service.create_or_update(credit).unwrap()
}

/// Lanzamiento sin relaciones; `n` sólo sirve para que la clave natural sea
/// única.
pub fn release(year: i32, n: usize) -> Release {
  Release::new(year, &format!("ECM {n}"), &format!("Session {n}")).unwrap()
}

pub fn save_release(service: &MemoryService, release: Release) -> Release {
  service.create_or_update(release).unwrap()
}

pub fn review(service: &MemoryService, rating: f64) -> Review {
  let review = Review::new("https://reviews.example.org/item", rating).unwrap();
  service.create_or_update(review).unwrap()
}

/// Asocia lanzamientos a un artista ya guardado.
pub fn link(service: &MemoryService, artist: &Artist, releases: &[&Release]) -> Artist {
  let updated = artist.clone().with_releases(releases.iter().map(|r| r.id));
  service.create_or_update(updated).unwrap()
}

/// Store que envuelve a otro y simula que no tiene colección para `hidden`.
pub struct MissingCollectionStore {
  pub inner: InMemoryCatalogStore,
  pub hidden: EntityKind,
}

impl MissingCollectionStore {
  pub fn new(hidden: EntityKind) -> Self {
    Self { inner: InMemoryCatalogStore::new(), hidden }
  }
}

struct HidingSession<'a> {
  inner: &'a mut dyn CatalogSession,
  hidden: EntityKind,
}

impl CatalogSession for HidingSession<'_> {
  fn fetch(&mut self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, RepoError> {
    self.inner.fetch(kind, id)
  }

  fn fetch_all(&mut self, kind: EntityKind) -> Result<Option<Vec<StoredRecord>>, RepoError> {
    if kind == self.hidden {
      return Ok(None);
    }
    self.inner.fetch_all(kind)
  }

  fn fetch_by_natural_key(
    &mut self,
    kind: EntityKind,
    key: &str,
  ) -> Result<Vec<StoredRecord>, RepoError> {
    self.inner.fetch_by_natural_key(kind, key)
  }

  fn put(&mut self, record: StoredRecord) -> Result<(), RepoError> {
    self.inner.put(record)
  }

  fn remove(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, RepoError> {
    self.inner.remove(kind, id)
  }
}

impl CatalogStore for MissingCollectionStore {
  fn read<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    let hidden = self.hidden;
    self.inner.read(|inner| f(&mut HidingSession { inner, hidden }))
  }

  fn write<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    let hidden = self.hidden;
    self.inner.write(|inner| f(&mut HidingSession { inner, hidden }))
  }
}
