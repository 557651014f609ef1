use crate::schema::catalog_entities;

use diesel::prelude::*;
use trove_core::domain::EntityKind;
use trove_core::{RepoError, StoredRecord};
use uuid::Uuid;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = catalog_entities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntityRow {
  pub seq: i32,
  pub id: String,
  pub kind: String,
  pub natural_key: Option<String>,
  pub body: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = catalog_entities)]
pub struct NewEntityRow {
  pub id: String,
  pub kind: String,
  pub natural_key: Option<String>,
  pub body: String,
}

impl EntityRow {
  pub fn into_record(self) -> Result<StoredRecord, RepoError> {
    let kind: EntityKind = self
      .kind
      .parse()
      .map_err(|e| RepoError::Serialization(format!("row {}: {e}", self.seq)))?;
    let id = Uuid::parse_str(&self.id)
      .map_err(|e| RepoError::Serialization(format!("row {}: invalid uuid: {e}", self.seq)))?;
    let body = serde_json::from_str(&self.body)
      .map_err(|e| RepoError::Serialization(format!("row {}: invalid body: {e}", self.seq)))?;

    Ok(StoredRecord { kind, id, natural_key: self.natural_key, body })
  }
}

impl NewEntityRow {
  pub fn from_record(record: &StoredRecord) -> Result<Self, RepoError> {
    let body = serde_json::to_string(&record.body)
      .map_err(|e| RepoError::Serialization(format!("{} {}: {e}", record.kind, record.id)))?;

    Ok(Self {
      id: record.id.to_string(),
      kind: record.kind.as_str().to_string(),
      natural_key: record.natural_key.clone(),
      body,
    })
  }
}
