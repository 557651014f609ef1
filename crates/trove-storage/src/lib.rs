pub mod config;
pub mod errors;
pub mod models;
pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};
use uuid::Uuid;

use trove_core::domain::EntityKind;
use trove_core::{CatalogSession, CatalogStore, RepoError, StoredRecord};

pub use crate::config::StorageConfig;
pub use crate::errors::StorageError;
use crate::models::{EntityRow, NewEntityRow};
use crate::schema::catalog_entities::dsl;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Pragmas aplicados a cada conexión nueva del pool.
#[derive(Debug, Clone)]
struct ConnectionOptions {
  busy_timeout_ms: u64,
  journal_mode: Option<String>,
}

impl ConnectionOptions {
  fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(mode) = &config.journal_mode
      && !mode.chars().all(|c| c.is_ascii_alphabetic())
    {
      return Err(StorageError::JournalMode(mode.clone()));
    }
    Ok(Self { busy_timeout_ms: config.busy_timeout_ms, journal_mode: config.journal_mode.clone() })
  }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Catalog store sobre SQLite.
///
/// Todas las entidades viven en `catalog_entities` como JSON; `seq` conserva
/// el orden de inserción aunque el registro se sobrescriba.
pub struct SqliteCatalogStore {
  pool: SqlitePool,
}

impl SqliteCatalogStore {
  /// Abre (o crea) la base de datos de `config.db_path` y aplica las
  /// migraciones pendientes.
  pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    Self::connect(&config.db_path.to_string_lossy(), config)
  }

  pub fn connect(database_url: &str, config: &StorageConfig) -> Result<Self, StorageError> {
    let options = ConnectionOptions::from_config(config)?;
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
      .max_size(config.pool_size.max(1))
      .connection_customizer(Box::new(options))
      .build(manager)?;

    let mut pooled = pool.get()?;
    let conn: &mut SqliteConnection = &mut pooled;
    let applied = conn
      .run_pending_migrations(MIGRATIONS)
      .map_err(|e| StorageError::Migration(e.to_string()))?;

    info!(database_url, migrations = applied.len(), "catalog store ready");
    Ok(Self { pool })
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, StorageError> {
    Ok(self.pool.get()?)
  }
}

impl CatalogStore for SqliteCatalogStore {
  fn read<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    let mut pooled = self.conn()?;
    let conn: &mut SqliteConnection = &mut pooled;
    let out = conn.transaction::<T, StorageError, _>(|conn| {
      let mut session = SqliteSession { conn, writable: false };
      Ok(f(&mut session)?)
    })?;
    Ok(out)
  }

  fn write<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    // BEGIN IMMEDIATE: el lock de escritura se toma al empezar, así dos
    // upserts de la misma clave natural no pueden leer ambos "no existe".
    let mut pooled = self.conn()?;
    let conn: &mut SqliteConnection = &mut pooled;
    let out = conn.immediate_transaction::<T, StorageError, _>(|conn| {
      let mut session = SqliteSession { conn, writable: true };
      Ok(f(&mut session)?)
    })?;
    Ok(out)
  }
}

struct SqliteSession<'c> {
  conn: &'c mut SqliteConnection,
  writable: bool,
}

impl SqliteSession<'_> {
  fn ensure_writable(&self) -> Result<(), RepoError> {
    if self.writable { Ok(()) } else { Err(RepoError::ReadOnly) }
  }
}

fn query_err(err: diesel::result::Error) -> RepoError {
  RepoError::Storage(format!("query failed: {err}"))
}

fn into_records(rows: Vec<EntityRow>) -> Result<Vec<StoredRecord>, RepoError> {
  rows.into_iter().map(EntityRow::into_record).collect()
}

impl CatalogSession for SqliteSession<'_> {
  fn fetch(&mut self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, RepoError> {
    let row = dsl::catalog_entities
      .filter(dsl::kind.eq(kind.as_str()))
      .filter(dsl::id.eq(id.to_string()))
      .select(EntityRow::as_select())
      .first(&mut *self.conn)
      .optional()
      .map_err(query_err)?;

    row.map(EntityRow::into_record).transpose()
  }

  fn fetch_all(&mut self, kind: EntityKind) -> Result<Option<Vec<StoredRecord>>, RepoError> {
    let rows = dsl::catalog_entities
      .filter(dsl::kind.eq(kind.as_str()))
      .order(dsl::seq.asc())
      .select(EntityRow::as_select())
      .load(&mut *self.conn)
      .map_err(query_err)?;

    into_records(rows).map(Some)
  }

  fn fetch_by_natural_key(
    &mut self,
    kind: EntityKind,
    key: &str,
  ) -> Result<Vec<StoredRecord>, RepoError> {
    let rows = dsl::catalog_entities
      .filter(dsl::kind.eq(kind.as_str()))
      .filter(dsl::natural_key.eq(key))
      .order(dsl::seq.asc())
      .select(EntityRow::as_select())
      .load(&mut *self.conn)
      .map_err(query_err)?;

    into_records(rows)
  }

  fn put(&mut self, record: StoredRecord) -> Result<(), RepoError> {
    self.ensure_writable()?;
    let row = NewEntityRow::from_record(&record)?;

    diesel::insert_into(dsl::catalog_entities)
      .values(&row)
      .on_conflict(dsl::id)
      .do_update()
      .set((
        dsl::natural_key.eq(row.natural_key.as_deref()),
        dsl::body.eq(&row.body),
        dsl::updated_at.eq(diesel::dsl::sql::<Text>("CURRENT_TIMESTAMP")),
      ))
      .execute(&mut *self.conn)
      .map_err(query_err)?;

    debug!(kind = %record.kind, id = %record.id, "record stored");
    Ok(())
  }

  fn remove(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, RepoError> {
    self.ensure_writable()?;
    let deleted = diesel::delete(
      dsl::catalog_entities.filter(dsl::kind.eq(kind.as_str())).filter(dsl::id.eq(id.to_string())),
    )
    .execute(&mut *self.conn)
    .map_err(query_err)?;

    Ok(deleted > 0)
  }
}
