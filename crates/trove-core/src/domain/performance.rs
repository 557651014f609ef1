use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::entity::Entity;
use crate::domain::ids::{ArtistId, PerformanceId};
use crate::domain::natural_key::EntityKind;
use crate::domain::validation::{self, ValidationError};

/// Actuación en vivo (concierto) y los artistas que participaron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
  pub id: PerformanceId,
  pub name: String,
  pub country: String,
  pub city: Option<String>,
  pub date: Option<NaiveDate>,
  #[serde(default)]
  pub artist_ids: BTreeSet<ArtistId>,
}

impl Performance {
  pub fn new(name: &str, country: &str) -> Result<Self, ValidationError> {
    Ok(Self {
      id: PerformanceId::new(),
      name: validation::required_text("performance name", name, 80)?,
      country: validation::required_text("country", country, 60)?,
      city: None,
      date: None,
      artist_ids: BTreeSet::new(),
    })
  }

  pub fn set_city(&mut self, city: &str) -> Result<(), ValidationError> {
    self.city = Some(validation::required_text("city", city, 60)?);
    Ok(())
  }

  pub fn with_date(mut self, date: NaiveDate) -> Self {
    self.date = Some(date);
    self
  }

  pub fn with_artists(mut self, artists: impl IntoIterator<Item = ArtistId>) -> Self {
    self.artist_ids = artists.into_iter().collect();
    self
  }
}

impl Entity for Performance {
  type Id = PerformanceId;

  const KIND: EntityKind = EntityKind::Performance;

  fn id(&self) -> PerformanceId {
    self.id
  }

  fn set_id(&mut self, id: PerformanceId) {
    self.id = id;
  }
}
