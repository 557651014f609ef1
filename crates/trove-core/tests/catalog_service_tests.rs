mod common;

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use trove_core::domain::{Artist, Performance, Release, ReleaseTrack};
use trove_core::{
  CatalogService, CatalogStore, CoreError, InMemoryCatalogStore, RepoError, TypedSession,
};

use common::*;

#[test]
fn concurrent_upserts_of_one_key_store_one_record() {
  let service = Arc::new(CatalogService::new(InMemoryCatalogStore::new()));

  thread::scope(|scope| {
    for _ in 0..8 {
      let service = Arc::clone(&service);
      scope.spawn(move || {
        for _ in 0..25 {
          service.create_or_update(Artist::new("Keith Jarrett").unwrap()).unwrap();
        }
      });
    }
  });

  assert_eq!(service.load_all::<Artist>().unwrap().len(), 1);
}

#[test]
fn failed_transaction_leaves_the_store_unchanged() {
  let (service, _) = catalog();
  let keith = artist(&service, "Keith Jarrett");

  let result: Result<(), RepoError> = service.store().write(|s| {
    s.delete::<Artist>(keith.id)?;
    s.save(&Artist::new("Gary Peacock").unwrap())?;
    Err(RepoError::Storage("simulated failure".into()))
  });
  assert!(result.is_err());

  let artists = service.load_all::<Artist>().unwrap();
  assert_eq!(artists.len(), 1);
  assert_eq!(artists[0].id, keith.id);
}

#[test]
fn upsert_after_delete_inserts_a_fresh_record() {
  let (service, _) = catalog();
  let keith = artist(&service, "Keith Jarrett");

  assert!(service.delete(&keith).unwrap());
  assert!(!service.delete(&keith).unwrap());
  assert!(service.load_all::<Artist>().unwrap().is_empty());

  let again = artist(&service, "Keith Jarrett");
  assert_ne!(again.id, keith.id);
  assert_eq!(service.load_all::<Artist>().unwrap().len(), 1);
}

#[test]
fn upsert_recovers_when_the_record_was_removed_behind_the_cache() {
  let (service, _) = catalog();
  let keith = artist(&service, "Keith Jarrett");

  // Borrado directo en el store: la caché del resolver sigue apuntando a él.
  assert!(service.store().delete::<Artist>(keith.id).unwrap());

  let again = artist(&service, "Keith Jarrett");
  assert_ne!(again.id, keith.id);
  assert_eq!(service.load_all::<Artist>().unwrap().len(), 1);
}

#[test]
fn validation_errors_surface_through_core_error() {
  let err: CoreError = Artist::new("R2D2").unwrap_err().into();
  assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn finders_match_exact_values() {
  let (service, _) = catalog();
  artist(&service, "Keith Jarrett");
  instrument(&service, "Piano");

  let koln = Release::new(1975, "ECM 1064/65", "The Koln Concert").unwrap();
  let standards = Release::new(1983, "ECM 1255", "Standards, Vol. 1").unwrap();
  let classical = Release::new(1988, "ECM 1362", "Das Wohltemperierte Klavier")
    .unwrap()
    .with_genre("Classical")
    .unwrap();
  for release in [koln, standards, classical] {
    service.create_or_update(release).unwrap();
  }

  assert!(service.find_artist_by_name("Keith Jarrett").unwrap().is_some());
  assert!(service.find_artist_by_name("Keith").unwrap().is_none());
  assert!(service.find_instrument_by_name("Piano").unwrap().is_some());

  let found = service.find_release_by_catalog_number("ECM 1255").unwrap().unwrap();
  assert_eq!(found.title, "Standards, Vol. 1");
  assert_eq!(service.find_releases_by_title("The Koln Concert").unwrap().len(), 1);
  assert_eq!(service.find_releases_by_year(1988).unwrap().len(), 1);
  assert_eq!(service.find_releases_by_genre(Release::DEFAULT_GENRE).unwrap().len(), 2);
  assert!(service.find_releases_by_genre("jazz").unwrap().is_empty());

  service.create_or_update(ReleaseTrack::new("Part I", 26.2).unwrap()).unwrap();
  assert!(service.find_track_by_name("Part I").unwrap().is_some());
  assert!(service.find_track_by_name("Part III").unwrap().is_none());
}

#[test]
fn performance_finders_filter_by_name_city_and_country() {
  let (service, _) = catalog();
  let mut koln = Performance::new("Koln Opera House", "Germany")
    .unwrap()
    .with_date(NaiveDate::from_ymd_opt(1975, 1, 24).unwrap());
  koln.set_city("Cologne").unwrap();
  let mut bregenz = Performance::new("Bregenz Festspielhaus", "Austria").unwrap();
  bregenz.set_city("Bregenz").unwrap();

  service.create_or_update(koln).unwrap();
  service.create_or_update(bregenz).unwrap();

  assert_eq!(service.find_performances_by_name("Koln Opera House").unwrap().len(), 1);
  assert_eq!(service.find_performances_by_city("Bregenz").unwrap().len(), 1);
  assert_eq!(service.find_performances_by_country("Germany").unwrap()[0].city.as_deref(), Some("Cologne"));
  assert!(service.find_performances_by_country("Japan").unwrap().is_empty());
}
