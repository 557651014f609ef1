use serde::{Deserialize, Serialize};

use crate::domain::entity::Entity;
use crate::domain::ids::ReviewId;
use crate::domain::natural_key::EntityKind;
use crate::domain::rating::Rating;
use crate::domain::validation::{self, ValidationError};

/// Reseña crítica publicada sobre un lanzamiento.
///
/// Pertenece a exactamente un [`Release`](crate::domain::release::Release),
/// que la referencia desde `review_ids`. No tiene clave natural: cada reseña
/// es un registro nuevo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id: ReviewId,
  pub source_url: String,
  pub rating: Rating,
  pub text: Option<String>,
}

impl Review {
  pub fn new(source_url: &str, rating: f64) -> Result<Self, ValidationError> {
    Ok(Self {
      id: ReviewId::new(),
      source_url: validation::required_text("review url", source_url, 2048)?,
      rating: Rating::new(rating)?,
      text: None,
    })
  }

  pub fn set_rating(&mut self, rating: f64) -> Result<(), ValidationError> {
    self.rating = Rating::new(rating)?;
    Ok(())
  }

  pub fn with_text(mut self, text: &str) -> Self {
    self.text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
    self
  }
}

impl Entity for Review {
  type Id = ReviewId;

  const KIND: EntityKind = EntityKind::Review;

  fn id(&self) -> ReviewId {
    self.id
  }

  fn set_id(&mut self, id: ReviewId) {
    self.id = id;
  }
}
