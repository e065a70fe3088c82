//! Trending events: which upcoming events are drawing the most registrations.
//!
//! [`compute_trending`] is the pure ranking step. [`TrendingGate`] puts a
//! cache-aside layer in front of it so the store is scanned at most once per
//! TTL window while the cache is healthy.

use std::time::Duration;

mod gate;
mod ranking;

pub use gate::{SnapshotSource, TrendingError, TrendingGate, TrendingSnapshot};
pub use ranking::compute_trending;

/// Cache key the snapshot is stored under.
pub const TRENDING_CACHE_KEY: &str = "trendingEvents";

/// How long a computed snapshot is served before it is recomputed.
pub const TRENDING_TTL: Duration = Duration::from_secs(15 * 60);

/// Maximum number of entries in a snapshot.
pub const TRENDING_LIMIT: usize = 5;
