use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::domain::{
  Artist, ArtistId, ArtistInstrumentCredit, Entity, Instrument, InstrumentId, Performance,
  Rating, Release, Review,
};
use crate::errors::CoreError;
use crate::ports::{CatalogStore, TypedSession};

/// Consultas analíticas de sólo lectura sobre el catálogo.
///
/// Reglas comunes a todas las operaciones:
/// - `k <= 0` es un error (`InvalidBound`) y se comprueba antes de tocar el
///   store.
/// - Cada operación lee todas sus colecciones dentro de una misma sesión de
///   lectura, es decir, sobre una única instantánea.
/// - El resultado tiene como mucho `k` elementos. Los empates conservan el
///   orden del store (ordenación estable).
pub struct RankingEngine<S>
where
  S: CatalogStore,
{
  store: S,
}

impl<S> RankingEngine<S>
where
  S: CatalogStore,
{
  pub fn new(store: S) -> Self {
    Self { store }
  }

  /// Artistas con más lanzamientos publicados en `[start_year, end_year]`.
  ///
  /// Un extremo no positivo deja ese lado del rango abierto. Los artistas sin
  /// lanzamientos dentro del rango no aparecen.
  pub fn most_prolific_artists(
    &self,
    k: i32,
    start_year: i32,
    end_year: i32,
  ) -> Result<Vec<Artist>, CoreError> {
    let k = bound(k)?;
    let (artists, releases) =
      self.store.read(|s| Ok((s.load_all::<Artist>()?, s.load_all::<Release>()?)))?;
    let (artists, releases) = (required(artists)?, required(releases)?);

    let in_range =
      |year: i32| (start_year <= 0 || year >= start_year) && (end_year <= 0 || year <= end_year);
    let years: HashMap<_, _> = releases.iter().map(|r| (r.id, r.year)).collect();

    let scored = artists
      .into_iter()
      .map(|artist| {
        let count = artist
          .release_ids
          .iter()
          .filter_map(|id| years.get(id))
          .filter(|year| in_range(**year))
          .count();
        (artist, count)
      })
      .filter(|(_, count)| *count > 0)
      .collect();

    let ranked = top_k(scored, k);
    debug!(k, start_year, end_year, results = ranked.len(), "ranked most prolific artists");
    Ok(ranked)
  }

  /// Artistas que tocan más instrumentos distintos, sumando todos sus
  /// créditos (unión, no suma).
  pub fn most_talented_artists(&self, k: i32) -> Result<Vec<Artist>, CoreError> {
    let k = bound(k)?;
    let (artists, credits) = self
      .store
      .read(|s| Ok((s.load_all::<Artist>()?, s.load_all::<ArtistInstrumentCredit>()?)))?;
    let (artists, credits) = (required(artists)?, required(credits)?);

    let mut instruments: HashMap<ArtistId, HashSet<InstrumentId>> = HashMap::new();
    for credit in &credits {
      instruments.entry(credit.artist_id).or_default().extend(credit.instrument_ids.iter().copied());
    }

    let scored = artists
      .into_iter()
      .filter_map(|artist| {
        let count = instruments.get(&artist.id).map_or(0, HashSet::len);
        (count > 0).then_some((artist, count))
      })
      .collect();

    let ranked = top_k(scored, k);
    debug!(k, results = ranked.len(), "ranked most talented artists");
    Ok(ranked)
  }

  /// Artistas con más colaboradores distintos, contando a quien comparte
  /// crédito en al menos un lanzamiento. Se incluyen los que no tienen ninguno.
  pub fn most_social_artists(&self, k: i32) -> Result<Vec<Artist>, CoreError> {
    let k = bound(k)?;
    let (artists, releases) =
      self.store.read(|s| Ok((s.load_all::<Artist>()?, s.load_all::<Release>()?)))?;
    let (artists, releases) = (required(artists)?, required(releases)?);

    let mut peers: HashMap<ArtistId, HashSet<ArtistId>> = HashMap::new();
    for release in &releases {
      for artist in &release.featured_artist_ids {
        let others = release.featured_artist_ids.iter().filter(|other| *other != artist);
        peers.entry(*artist).or_default().extend(others.copied());
      }
    }

    let scored = artists
      .into_iter()
      .map(|artist| {
        let count = peers.get(&artist.id).map_or(0, HashSet::len);
        (artist, count)
      })
      .collect();

    let ranked = top_k(scored, k);
    debug!(k, results = ranked.len(), "ranked most social artists");
    Ok(ranked)
  }

  /// Años con más lanzamientos. A igual número, gana el año más reciente.
  pub fn busiest_years(&self, k: i32) -> Result<Vec<i32>, CoreError> {
    let k = bound(k)?;
    let releases = required(self.store.read(|s| s.load_all::<Release>())?)?;

    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for release in &releases {
      *per_year.entry(release.year).or_default() += 1;
    }

    let mut years: Vec<(i32, usize)> = per_year.into_iter().collect();
    years.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let ranked: Vec<i32> = years.into_iter().take(k).map(|(year, _)| year).collect();
    debug!(k, results = ranked.len(), "ranked busiest years");
    Ok(ranked)
  }

  /// Lanzamientos del mismo género que `reference` cuyo conjunto de nombres
  /// de instrumento (aplanando todos sus créditos) es igual al suyo.
  ///
  /// Es un filtro, no una puntuación: el resultado sale en orden del store.
  /// Si `reference` está guardado, también aparece.
  pub fn most_similar_releases(
    &self,
    k: i32,
    reference: &Release,
  ) -> Result<Vec<Release>, CoreError> {
    let k = bound(k)?;
    let (releases, credits, instruments) = self.store.read(|s| {
      Ok((
        s.load_all::<Release>()?,
        s.load_all::<ArtistInstrumentCredit>()?,
        s.load_all::<Instrument>()?,
      ))
    })?;
    let (releases, credits, instruments) =
      (required(releases)?, required(credits)?, required(instruments)?);

    let credits: HashMap<_, _> = credits.iter().map(|c| (c.id, c)).collect();
    let names: HashMap<_, _> = instruments.iter().map(|i| (i.id, i.name.as_str())).collect();
    let lineup = |release: &Release| {
      release
        .instrument_credit_ids
        .iter()
        .filter_map(|id| credits.get(id))
        .flat_map(|credit| credit.instrument_ids.iter())
        .filter_map(|id| names.get(id).copied())
        .collect::<BTreeSet<&str>>()
    };

    let wanted = lineup(reference);
    let ranked: Vec<Release> = releases
      .iter()
      .filter(|release| release.genre == reference.genre && lineup(*release) == wanted)
      .take(k)
      .cloned()
      .collect();

    debug!(k, reference = %reference.id, results = ranked.len(), "ranked most similar releases");
    Ok(ranked)
  }

  /// Lanzamientos con mejor valoración media. Los que no tienen reseñas no
  /// aparecen.
  pub fn highest_rated_releases(&self, k: i32) -> Result<Vec<Release>, CoreError> {
    let k = bound(k)?;
    let (releases, reviews) =
      self.store.read(|s| Ok((s.load_all::<Release>()?, s.load_all::<Review>()?)))?;
    let (releases, reviews) = (required(releases)?, required(reviews)?);

    let ratings: HashMap<_, Rating> = reviews.iter().map(|r| (r.id, r.rating)).collect();
    let mut scored: Vec<(Release, f64)> = releases
      .into_iter()
      .filter_map(|release| {
        let mean = Rating::mean(release.review_ids.iter().filter_map(|id| ratings.get(id).copied()));
        mean.map(|mean| (release, mean))
      })
      .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let ranked: Vec<Release> = scored.into_iter().take(k).map(|(release, _)| release).collect();
    debug!(k, results = ranked.len(), "ranked highest rated releases");
    Ok(ranked)
  }

  pub fn best_selling_releases(&self, k: i32) -> Result<Vec<Release>, CoreError> {
    let k = bound(k)?;
    let releases = required(self.store.read(|s| s.load_all::<Release>())?)?;

    let mut ranked = releases;
    ranked.sort_by(|a, b| b.sales_count.cmp(&a.sales_count));
    ranked.truncate(k);

    debug!(k, results = ranked.len(), "ranked best selling releases");
    Ok(ranked)
  }

  /// Artistas que aparecen en más actuaciones. Los que no tienen ninguna
  /// quedan al final.
  pub fn most_popular_performers(&self, k: i32) -> Result<Vec<Artist>, CoreError> {
    let k = bound(k)?;
    let (artists, performances) =
      self.store.read(|s| Ok((s.load_all::<Artist>()?, s.load_all::<Performance>()?)))?;
    let (artists, performances) = (required(artists)?, required(performances)?);

    let mut appearances: HashMap<ArtistId, usize> = HashMap::new();
    for performance in &performances {
      for artist in &performance.artist_ids {
        *appearances.entry(*artist).or_default() += 1;
      }
    }

    let scored = artists
      .into_iter()
      .map(|artist| {
        let count = appearances.get(&artist.id).copied().unwrap_or(0);
        (artist, count)
      })
      .collect();

    let ranked = top_k(scored, k);
    debug!(k, results = ranked.len(), "ranked most popular performers");
    Ok(ranked)
  }
}

fn bound(k: i32) -> Result<usize, CoreError> {
  usize::try_from(k).ok().filter(|k| *k > 0).ok_or(CoreError::InvalidBound(i64::from(k)))
}

fn required<E: Entity>(collection: Option<Vec<E>>) -> Result<Vec<E>, CoreError> {
  collection.ok_or(CoreError::MissingCollaboratorData(E::KIND))
}

// `sort_by` es estable: a igual puntuación se mantiene el orden del store.
fn top_k<T>(mut scored: Vec<(T, usize)>, k: usize) -> Vec<T> {
  scored.sort_by(|a, b| b.1.cmp(&a.1));
  scored.into_iter().take(k).map(|(item, _)| item).collect()
}
