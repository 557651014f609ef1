use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::EntityKind;
use crate::ports::{CatalogSession, CatalogStore, RepoError, StoredRecord};

fn lock_err(context: &'static str) -> RepoError {
  RepoError::Storage(format!("poisoned lock: {context}"))
}

/// Colección de un tipo. `seq` da el orden de inserción; sobrescribir un
/// registro existente conserva su posición.
#[derive(Debug, Default)]
struct Table {
  rows: BTreeMap<u64, StoredRecord>,
  positions: HashMap<Uuid, u64>,
  by_key: HashMap<String, BTreeSet<u64>>,
  next_seq: u64,
}

impl Table {
  fn get(&self, id: Uuid) -> Option<&StoredRecord> {
    self.positions.get(&id).and_then(|seq| self.rows.get(seq))
  }

  fn with_key(&self, key: &str) -> Vec<StoredRecord> {
    self
      .by_key
      .get(key)
      .map(|seqs| seqs.iter().filter_map(|seq| self.rows.get(seq)).cloned().collect())
      .unwrap_or_default()
  }

  fn upsert(&mut self, record: StoredRecord) {
    let seq = match self.positions.get(&record.id) {
      Some(&seq) => {
        if let Some(old) = self.rows.get(&seq) {
          let old_key = old.natural_key.clone();
          self.unindex(old_key.as_deref(), seq);
        }
        seq
      }
      None => {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.positions.insert(record.id, seq);
        seq
      }
    };

    self.place(seq, record);
  }

  fn place(&mut self, seq: u64, record: StoredRecord) {
    if let Some(key) = &record.natural_key {
      self.by_key.entry(key.clone()).or_default().insert(seq);
    }
    self.rows.insert(seq, record);
  }

  fn entry(&self, id: Uuid) -> Option<(u64, StoredRecord)> {
    let seq = *self.positions.get(&id)?;
    self.rows.get(&seq).map(|record| (seq, record.clone()))
  }

  /// Deja la fila `id` como estaba antes de una operación.
  fn restore(&mut self, id: Uuid, prior: Option<(u64, StoredRecord)>, next_seq: u64) {
    self.remove(id);
    if let Some((seq, record)) = prior {
      self.positions.insert(id, seq);
      self.place(seq, record);
    }
    self.next_seq = next_seq;
  }

  fn remove(&mut self, id: Uuid) -> bool {
    let Some(seq) = self.positions.remove(&id) else {
      return false;
    };
    if let Some(old) = self.rows.remove(&seq) {
      self.unindex(old.natural_key.as_deref(), seq);
    }
    true
  }

  fn unindex(&mut self, key: Option<&str>, seq: u64) {
    let Some(key) = key else { return };
    if let Some(seqs) = self.by_key.get_mut(key) {
      seqs.remove(&seq);
      if seqs.is_empty() {
        self.by_key.remove(key);
      }
    }
  }
}

type State = HashMap<EntityKind, Table>;

/// Store en memoria, de referencia para tests y para usos embebidos.
///
/// Todas las colecciones se registran al construirlo, así que `fetch_all`
/// nunca devuelve `None` para un tipo conocido.
#[derive(Debug)]
pub struct InMemoryCatalogStore {
  state: RwLock<State>,
}

impl InMemoryCatalogStore {
  pub fn new() -> Self {
    let state = EntityKind::ALL.into_iter().map(|kind| (kind, Table::default())).collect();
    Self { state: RwLock::new(state) }
  }
}

impl Default for InMemoryCatalogStore {
  fn default() -> Self {
    Self::new()
  }
}

/// Estado previo de una fila tocada dentro de una transacción.
struct Undo {
  kind: EntityKind,
  id: Uuid,
  prior: Option<(u64, StoredRecord)>,
  next_seq: u64,
}

/// Transacción de escritura sobre el estado vivo.
///
/// Cada `put`/`remove` apunta antes el estado previo de la fila. Si la
/// transacción no se confirma, el log se deshace en orden inverso al soltarla.
struct Staged<'a> {
  state: &'a mut State,
  undo: Vec<Undo>,
  committed: bool,
}

impl Staged<'_> {
  fn table_mut(&mut self, kind: EntityKind, id: Uuid) -> &mut Table {
    let table = self.state.entry(kind).or_default();
    self.undo.push(Undo { kind, id, prior: table.entry(id), next_seq: table.next_seq });
    table
  }

  fn commit(mut self) {
    self.committed = true;
  }
}

impl Drop for Staged<'_> {
  fn drop(&mut self) {
    if self.committed {
      return;
    }
    while let Some(Undo { kind, id, prior, next_seq }) = self.undo.pop() {
      if let Some(table) = self.state.get_mut(&kind) {
        table.restore(id, prior, next_seq);
      }
    }
  }
}

enum MemorySession<'s, 'a> {
  Snapshot(&'a State),
  Staged(&'s mut Staged<'a>),
}

impl MemorySession<'_, '_> {
  fn state(&self) -> &State {
    match self {
      MemorySession::Snapshot(state) => state,
      MemorySession::Staged(tx) => &*tx.state,
    }
  }

  fn table_mut(&mut self, kind: EntityKind, id: Uuid) -> Result<&mut Table, RepoError> {
    match self {
      MemorySession::Snapshot(_) => Err(RepoError::ReadOnly),
      MemorySession::Staged(tx) => Ok(tx.table_mut(kind, id)),
    }
  }
}

impl CatalogSession for MemorySession<'_, '_> {
  fn fetch(&mut self, kind: EntityKind, id: Uuid) -> Result<Option<StoredRecord>, RepoError> {
    Ok(self.state().get(&kind).and_then(|table| table.get(id)).cloned())
  }

  fn fetch_all(&mut self, kind: EntityKind) -> Result<Option<Vec<StoredRecord>>, RepoError> {
    Ok(self.state().get(&kind).map(|table| table.rows.values().cloned().collect()))
  }

  fn fetch_by_natural_key(
    &mut self,
    kind: EntityKind,
    key: &str,
  ) -> Result<Vec<StoredRecord>, RepoError> {
    Ok(self.state().get(&kind).map(|table| table.with_key(key)).unwrap_or_default())
  }

  fn put(&mut self, record: StoredRecord) -> Result<(), RepoError> {
    self.table_mut(record.kind, record.id)?.upsert(record);
    Ok(())
  }

  fn remove(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, RepoError> {
    Ok(self.table_mut(kind, id)?.remove(id))
  }
}

impl CatalogStore for InMemoryCatalogStore {
  fn read<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    let state = self.state.read().map_err(|_| lock_err("catalog.read"))?;
    f(&mut MemorySession::Snapshot(&state))
  }

  fn write<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut dyn CatalogSession) -> Result<T, RepoError>,
  {
    // El lock de escritura se mantiene durante toda la transacción; si `f`
    // falla, `Staged` deshace sus cambios al soltarse.
    let mut state = self.state.write().map_err(|_| lock_err("catalog.write"))?;
    let mut tx = Staged { state: &mut *state, undo: Vec::new(), committed: false };
    let out = f(&mut MemorySession::Staged(&mut tx))?;
    tx.commit();
    Ok(out)
  }
}
