pub mod artist;
pub mod credit;
pub mod entity;
pub mod ids;
pub mod natural_key;
pub mod performance;
pub mod rating;
pub mod release;
pub mod release_format;
pub mod review;
pub mod track;
pub mod validation;

pub use artist::Artist;
pub use credit::{ArtistInstrumentCredit, Instrument};
pub use entity::Entity;
pub use ids::{ArtistId, CatalogId, CreditId, InstrumentId, PerformanceId, ReleaseId, ReleaseTrackId, ReviewId};
pub use natural_key::{EntityKind, NaturalKey};
pub use performance::Performance;
pub use rating::Rating;
pub use release::Release;
pub use release_format::ReleaseFormat;
pub use review::Review;
pub use track::ReleaseTrack;
pub use validation::ValidationError;
