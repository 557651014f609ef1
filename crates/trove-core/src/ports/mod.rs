pub mod catalog_store;

pub use catalog_store::{CatalogSession, CatalogStore, RepoError, StoredRecord, TypedSession};
