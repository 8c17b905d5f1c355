// Service exports
pub mod cache;
pub mod ghl;
pub mod postgres;

pub use cache::{CacheStats, MatchCache};
pub use ghl::{GhlClient, GhlError, PushReport};
pub use postgres::{PostgresClient, PostgresError};
