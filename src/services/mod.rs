// Service exports
pub mod cache;
pub mod postgres;
pub mod profile_store;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{InteractionKind, PostgresClient, PostgresError};
pub use profile_store::{ProfileStoreClient, StoreError};
