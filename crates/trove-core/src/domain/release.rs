use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::entity::Entity;
use crate::domain::ids::{ArtistId, CreditId, PerformanceId, ReleaseId, ReleaseTrackId, ReviewId};
use crate::domain::natural_key::{EntityKind, NaturalKey};
use crate::domain::release_format::ReleaseFormat;
use crate::domain::validation::{self, ValidationError};

/// Representa un lanzamiento musical.
///
/// Semánticamente corresponde al "objeto publicado" (álbum, EP, edición),
/// no a la canción individual. Su identidad real es la terna
/// (año, número de catálogo, título): cambiar cualquiera de los tres produce
/// un lanzamiento lógicamente distinto.
///
/// Todas las relaciones se guardan como identificadores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
  pub id: ReleaseId,

  pub year: i32,

  /// Número de catálogo del sello, p. ej. `"ECM 1064/65"`.
  pub catalog_number: String,

  pub title: String,

  /// Género tal como lo publica el sello. Se compara de forma exacta.
  pub genre: String,

  pub style: Option<String>,

  #[serde(default)]
  pub format: ReleaseFormat,

  #[serde(default)]
  pub sales_count: u64,

  /// Artistas acreditados, en el orden en que aparecen (el primero es el
  /// crédito principal). Sin duplicados.
  #[serde(default)]
  pub featured_artist_ids: Vec<ArtistId>,

  #[serde(default)]
  pub instrument_credit_ids: BTreeSet<CreditId>,

  #[serde(default)]
  pub review_ids: BTreeSet<ReviewId>,

  #[serde(default)]
  pub track_ids: BTreeSet<ReleaseTrackId>,

  #[serde(default)]
  pub performance_ids: BTreeSet<PerformanceId>,

  pub url: Option<String>,
}

impl Release {
  pub const DEFAULT_GENRE: &'static str = "Jazz";

  pub fn new(year: i32, catalog_number: &str, title: &str) -> Result<Self, ValidationError> {
    Ok(Self {
      id: ReleaseId::new(),
      year: validation::release_year(year)?,
      catalog_number: validation::catalog_number(catalog_number)?,
      title: validation::required_text("title", title, 40)?,
      genre: Self::DEFAULT_GENRE.to_string(),
      style: None,
      format: ReleaseFormat::default(),
      sales_count: 0,
      featured_artist_ids: Vec::new(),
      instrument_credit_ids: BTreeSet::new(),
      review_ids: BTreeSet::new(),
      track_ids: BTreeSet::new(),
      performance_ids: BTreeSet::new(),
      url: None,
    })
  }

  pub fn set_year(&mut self, year: i32) -> Result<(), ValidationError> {
    self.year = validation::release_year(year)?;
    Ok(())
  }

  pub fn set_catalog_number(&mut self, catalog_number: &str) -> Result<(), ValidationError> {
    self.catalog_number = validation::catalog_number(catalog_number)?;
    Ok(())
  }

  pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
    self.title = validation::required_text("title", title, 40)?;
    Ok(())
  }

  pub fn set_genre(&mut self, genre: &str) -> Result<(), ValidationError> {
    self.genre = validation::required_text("genre", genre, 30)?;
    Ok(())
  }

  pub fn set_style(&mut self, style: &str) -> Result<(), ValidationError> {
    let style = validation::optional_text("style", style, 30)?;
    self.style = Some(style).filter(|s| !s.is_empty());
    Ok(())
  }

  /// Reemplaza la lista de artistas acreditados, conservando su orden.
  pub fn set_featured_artists(&mut self, artists: Vec<ArtistId>) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(artists.len());
    if let Some(dup) = artists.iter().find(|id| !seen.insert(**id)) {
      return Err(ValidationError::DuplicateArtist(*dup));
    }
    self.featured_artist_ids = artists;
    Ok(())
  }

  pub fn with_genre(mut self, genre: &str) -> Result<Self, ValidationError> {
    self.set_genre(genre)?;
    Ok(self)
  }

  pub fn with_sales(mut self, sales_count: u64) -> Self {
    self.sales_count = sales_count;
    self
  }

  pub fn with_featured_artists(mut self, artists: Vec<ArtistId>) -> Result<Self, ValidationError> {
    self.set_featured_artists(artists)?;
    Ok(self)
  }

  pub fn with_credits(mut self, credits: impl IntoIterator<Item = CreditId>) -> Self {
    self.instrument_credit_ids = credits.into_iter().collect();
    self
  }

  pub fn with_reviews(mut self, reviews: impl IntoIterator<Item = ReviewId>) -> Self {
    self.review_ids = reviews.into_iter().collect();
    self
  }
}

impl Entity for Release {
  type Id = ReleaseId;

  const KIND: EntityKind = EntityKind::Release;

  fn id(&self) -> ReleaseId {
    self.id
  }

  fn set_id(&mut self, id: ReleaseId) {
    self.id = id;
  }

  fn natural_key(&self) -> Option<NaturalKey> {
    Some(NaturalKey::Release {
      year: self.year,
      catalog_number: self.catalog_number.clone(),
      title: self.title.clone(),
    })
  }
}
