use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trove_config::LoggingConfig;
use trove_core::domain::{Artist, ArtistInstrumentCredit, Instrument, Performance, Release, Review};
use trove_core::{CatalogService, CatalogStore, RankingEngine};
use trove_storage::{SqliteCatalogStore, StorageConfig};

fn main() -> Result<()> {
  dotenvy::dotenv().ok();

  let logging = LoggingConfig::load().context("load [logging] config")?;
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

  let mut config = StorageConfig::load().context("load [storage] config")?;
  if let Ok(url) = std::env::var("DATABASE_URL") {
    config.db_path = url.into();
  }
  info!(db = %config.db_path.display(), "opening catalog");

  let store = Arc::new(SqliteCatalogStore::open(&config).context("open catalog store")?);
  let catalog = CatalogService::new(Arc::clone(&store));
  let ranking = RankingEngine::new(store);

  let standards = seed_once(&catalog)?;

  let names = |artists: Vec<Artist>| artists.into_iter().map(|a| a.name).collect::<Vec<_>>();
  let titles = |releases: Vec<Release>| releases.into_iter().map(|r| r.title).collect::<Vec<_>>();

  println!("most prolific (1970-1990): {:?}", names(ranking.most_prolific_artists(3, 1970, 1990)?));
  println!("most talented:             {:?}", names(ranking.most_talented_artists(3)?));
  println!("most social:               {:?}", names(ranking.most_social_artists(3)?));
  println!("busiest years:             {:?}", ranking.busiest_years(3)?);
  println!("similar to Standards:      {:?}", titles(ranking.most_similar_releases(3, &standards)?));
  println!("highest rated:             {:?}", titles(ranking.highest_rated_releases(3)?));
  println!("best selling:              {:?}", titles(ranking.best_selling_releases(3)?));
  println!("most popular performers:   {:?}", names(ranking.most_popular_performers(3)?));

  Ok(())
}

/// Devuelve "Standards, Vol. 1", sembrando el catálogo si aún no lo está.
fn seed_once<S: CatalogStore>(catalog: &CatalogService<S>) -> Result<Release> {
  match catalog.find_release_by_catalog_number("ECM 1255")? {
    Some(existing) => {
      info!("catalog already seeded, reusing it");
      Ok(existing)
    }
    None => seed(catalog),
  }
}

// Reseñas y actuaciones no tienen clave natural: sembrar dos veces las duplica.
fn seed<S: CatalogStore>(catalog: &CatalogService<S>) -> Result<Release> {
  // El trío de Standards más el concierto de Colonia.
  let keith = catalog.create_or_update(Artist::new("Keith Jarrett")?)?;
  let gary = catalog.create_or_update(Artist::new("Gary Peacock")?)?;
  let jack = catalog.create_or_update(Artist::new("Jack DeJohnette")?)?;

  let piano = catalog.create_or_update(Instrument::new("Piano")?)?;
  let bass = catalog.create_or_update(Instrument::new("Double Bass")?)?;
  let drums = catalog.create_or_update(Instrument::new("Drums")?)?;

  let keith_piano = catalog.create_or_update(ArtistInstrumentCredit::new(keith.id, [piano.id])?)?;
  let gary_bass = catalog.create_or_update(ArtistInstrumentCredit::new(gary.id, [bass.id])?)?;
  let jack_drums = catalog.create_or_update(ArtistInstrumentCredit::new(jack.id, [drums.id])?)?;
  let jack_piano = catalog.create_or_update(ArtistInstrumentCredit::new(jack.id, [piano.id])?)?;

  let rave = catalog.create_or_update(Review::new("https://reviews.example.org/koln", 96.0)?)?;
  let solid = catalog.create_or_update(Review::new("https://reviews.example.org/standards", 82.5)?)?;

  let koln = catalog.create_or_update(
    Release::new(1975, "ECM 1064/65", "The Koln Concert")?
      .with_sales(3_500_000)
      .with_featured_artists(vec![keith.id])?
      .with_credits([keith_piano.id])
      .with_reviews([rave.id]),
  )?;
  let standards = catalog.create_or_update(
    Release::new(1983, "ECM 1255", "Standards, Vol. 1")?
      .with_sales(250_000)
      .with_featured_artists(vec![keith.id, gary.id, jack.id])?
      .with_credits([keith_piano.id, gary_bass.id, jack_drums.id])
      .with_reviews([solid.id]),
  )?;
  let changes = catalog.create_or_update(
    Release::new(1983, "ECM 1276", "Changes")?
      .with_sales(90_000)
      .with_featured_artists(vec![keith.id, gary.id, jack.id])?
      .with_credits([keith_piano.id, gary_bass.id, jack_drums.id, jack_piano.id]),
  )?;

  catalog.create_or_update(keith.clone().with_releases([koln.id, standards.id, changes.id]))?;
  catalog.create_or_update(gary.clone().with_releases([standards.id, changes.id]))?;
  catalog.create_or_update(jack.clone().with_releases([standards.id, changes.id]))?;

  catalog.create_or_update(
    Performance::new("Koln Opera House", "Germany")?.with_artists([keith.id]),
  )?;
  catalog.create_or_update(
    Performance::new("Tokyo Concert", "Japan")?.with_artists([keith.id, gary.id, jack.id]),
  )?;

  Ok(standards)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use tempfile::tempdir;

  #[test]
  fn reruns_do_not_duplicate_keyless_records() {
    let tmp = tempdir().unwrap();
    let config = StorageConfig::with_db_path(tmp.path().join("trove.db"));

    for _ in 0..2 {
      let catalog = CatalogService::new(Arc::new(SqliteCatalogStore::open(&config).unwrap()));
      let standards = seed_once(&catalog).unwrap();
      assert_eq!(standards.title, "Standards, Vol. 1");
    }

    let catalog = CatalogService::new(Arc::new(SqliteCatalogStore::open(&config).unwrap()));
    assert_eq!(catalog.load_all::<Review>().unwrap().len(), 2);
    assert_eq!(catalog.load_all::<Performance>().unwrap().len(), 2);
    assert_eq!(catalog.load_all::<Release>().unwrap().len(), 3);

    let ranking = RankingEngine::new(Arc::clone(catalog.store()));
    let popular = ranking.most_popular_performers(1).unwrap();
    assert_eq!(popular[0].name, "Keith Jarrett");
  }
}
