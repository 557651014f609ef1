pub mod catalog_service;
pub mod ranking;

pub use catalog_service::CatalogService;
pub use ranking::RankingEngine;
