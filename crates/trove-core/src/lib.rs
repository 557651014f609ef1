pub mod domain;
pub mod errors;
pub mod identity;
pub mod ports;
pub mod services;
pub mod store;

pub use errors::CoreError;
pub use identity::IdentityResolver;
pub use ports::{CatalogSession, CatalogStore, RepoError, StoredRecord, TypedSession};
pub use services::{CatalogService, RankingEngine};
pub use store::InMemoryCatalogStore;
