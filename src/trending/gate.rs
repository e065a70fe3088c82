use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{compute_trending, TRENDING_CACHE_KEY, TRENDING_LIMIT, TRENDING_TTL};
use crate::cache::TrendingCache;
use crate::store::{EventStore, StoreError};

#[derive(Debug, Error)]
pub enum TrendingError {
    #[error("data access failed: {0}")]
    DataAccess(#[from] StoreError),

    #[error("failed to serialize trending snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Served from the cache; the store was not read.
    Cache,
    /// Recomputed because the cache had nothing usable.
    Computed,
    /// Recomputed because the cache could not be read.
    Degraded,
}

/// The trending list as returned to clients.
///
/// `events` is kept as JSON so a cached snapshot is handed back exactly as it
/// was stored.
#[derive(Debug, Clone)]
pub struct TrendingSnapshot {
    pub source: SnapshotSource,
    pub events: Value,
}

/// Cache-aside front for the trending ranking.
///
/// No coordination happens between concurrent misses: each recomputes and
/// writes, and the last write wins.
#[derive(Clone)]
pub struct TrendingGate {
    store: Arc<dyn EventStore>,
    cache: Arc<dyn TrendingCache>,
    ttl: Duration,
    limit: usize,
}

impl TrendingGate {
    pub fn new(store: Arc<dyn EventStore>, cache: Arc<dyn TrendingCache>) -> Self {
        Self {
            store,
            cache,
            ttl: TRENDING_TTL,
            limit: TRENDING_LIMIT,
        }
    }

    pub async fn trending(&self) -> Result<TrendingSnapshot, TrendingError> {
        let source = match self.cache.get(TRENDING_CACHE_KEY).await {
            Ok(Some(raw)) if !raw.is_empty() => match parse_snapshot(&raw) {
                Some(events) => {
                    debug!("Cache hit for trending events");
                    return Ok(TrendingSnapshot {
                        source: SnapshotSource::Cache,
                        events,
                    });
                }
                None => {
                    warn!("Cached trending snapshot is malformed, recomputing");
                    SnapshotSource::Computed
                }
            },
            Ok(_) => {
                debug!("Cache miss for trending events");
                SnapshotSource::Computed
            }
            Err(e) => {
                warn!(error = %e, "Trending cache read failed, computing directly");
                SnapshotSource::Degraded
            }
        };

        let events = self.recompute().await?;

        if let Err(e) = self
            .cache
            .set(TRENDING_CACHE_KEY, &events.to_string(), self.ttl)
            .await
        {
            warn!(error = %e, "Failed to store trending snapshot");
        }

        Ok(TrendingSnapshot { source, events })
    }

    async fn recompute(&self) -> Result<Value, TrendingError> {
        let (registrations, events) = tokio::try_join!(
            self.store.find_registrations(),
            self.store.find_events()
        )?;

        let trending = compute_trending(&registrations, &events, Utc::now(), self.limit);
        info!(
            entries = trending.len(),
            registrations = registrations.len(),
            "Recomputed trending events"
        );

        Ok(serde_json::to_value(trending)?)
    }
}

/// Accepts either the bare list or a full `{"trendingEvents": [...]}` body.
fn parse_snapshot(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw).ok()? {
        list @ Value::Array(_) => Some(list),
        Value::Object(mut body) => match body.remove(TRENDING_CACHE_KEY)? {
            list @ Value::Array(_) => Some(list),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DisabledCache, MemoryCache};
    use crate::models::{Event, Registration, RegistrationForm};
    use crate::store::MemoryStore;
    use chrono::Duration as ChronoDuration;
    use uuid::Uuid;

    async fn seeded_store() -> (Arc<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let event = Event::new("Code Sprint", Utc::now() + ChronoDuration::days(2));
        let event_id = event.id;
        store.insert_event(event).await;

        for i in 0..2 {
            let form = RegistrationForm {
                name: format!("p{i}"),
                email: format!("p{i}@campus.edu"),
                registration_num: format!("R{i}"),
                phone: "9000000000".to_string(),
                team_size: 1,
                team_members: None,
            };
            store
                .insert_registration(&Registration::from_form(event_id, Uuid::new_v4(), form))
                .await
                .unwrap();
        }
        (store, event_id)
    }

    #[test]
    fn test_parse_snapshot_shapes() {
        assert_eq!(parse_snapshot("[]"), Some(Value::Array(vec![])));
        assert_eq!(
            parse_snapshot(r#"{"trendingEvents":[{"eventId":"x","count":2}]}"#),
            Some(serde_json::json!([{"eventId": "x", "count": 2}]))
        );
        assert_eq!(parse_snapshot("{not json"), None);
        assert_eq!(parse_snapshot(r#"{"other":[]}"#), None);
        assert_eq!(parse_snapshot("42"), None);
    }

    #[tokio::test]
    async fn test_miss_computes_and_populates_cache() {
        let (store, event_id) = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        let gate = TrendingGate::new(store.clone(), cache.clone());

        let snapshot = gate.trending().await.unwrap();

        assert_eq!(snapshot.source, SnapshotSource::Computed);
        assert_eq!(snapshot.events[0]["eventId"], event_id.to_string());
        assert_eq!(snapshot.events[0]["count"], 2);

        let stored = cache.get(TRENDING_CACHE_KEY).await.unwrap().unwrap();
        assert_eq!(stored, snapshot.events.to_string());
    }

    #[tokio::test]
    async fn test_hit_skips_store() {
        let (store, _) = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        let gate = TrendingGate::new(store.clone(), cache.clone());

        let first = gate.trending().await.unwrap();
        let reads_after_miss = store.read_count();
        let second = gate.trending().await.unwrap();
        let third = gate.trending().await.unwrap();

        assert_eq!(second.source, SnapshotSource::Cache);
        assert_eq!(store.read_count(), reads_after_miss);
        assert_eq!(first.events.to_string(), second.events.to_string());
        assert_eq!(second.events.to_string(), third.events.to_string());
        assert_eq!(cache.set_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_recomputed_and_replaced() {
        let (store, _) = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(TRENDING_CACHE_KEY, "{\"trendingEvents\": [", TRENDING_TTL)
            .await
            .unwrap();
        let gate = TrendingGate::new(store.clone(), cache.clone());

        let snapshot = gate.trending().await.unwrap();

        assert_eq!(snapshot.source, SnapshotSource::Computed);
        assert_eq!(snapshot.events.as_array().unwrap().len(), 1);
        assert!(parse_snapshot(&cache.get(TRENDING_CACHE_KEY).await.unwrap().unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_cache_failures_degrade_to_direct_computation() {
        let (store, _) = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        cache.fail_gets(true);
        cache.fail_sets(true);
        let gate = TrendingGate::new(store.clone(), cache.clone());

        let snapshot = gate.trending().await.unwrap();

        assert_eq!(snapshot.source, SnapshotSource::Degraded);
        assert_eq!(snapshot.events[0]["count"], 2);
        assert_eq!(cache.set_count(), 1);

        let disabled = TrendingGate::new(store, Arc::new(DisabledCache));
        assert_eq!(
            disabled.trending().await.unwrap().source,
            SnapshotSource::Degraded
        );
    }

    #[tokio::test]
    async fn test_write_failure_still_returns_computed_result() {
        let (store, event_id) = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        cache.fail_sets(true);
        let gate = TrendingGate::new(store.clone(), cache.clone());

        let first = gate.trending().await.unwrap();
        let second = gate.trending().await.unwrap();

        assert_eq!(first.source, SnapshotSource::Computed);
        assert_eq!(first.events[0]["eventId"], event_id.to_string());
        assert_eq!(first.events[0]["count"], 2);
        // Nothing was stored, so the next read recomputes as well.
        assert_eq!(second.source, SnapshotSource::Computed);
        assert_eq!(cache.set_count(), 2);
        assert_eq!(cache.get(TRENDING_CACHE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let (store, _) = seeded_store().await;
        store.set_unavailable(true);
        let cache = Arc::new(MemoryCache::new());
        let gate = TrendingGate::new(store, cache.clone());

        let err = gate.trending().await.unwrap_err();

        assert!(matches!(err, TrendingError::DataAccess(_)));
        assert_eq!(cache.set_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_list() {
        let gate = TrendingGate::new(Arc::new(MemoryStore::new()), Arc::new(MemoryCache::new()));
        let snapshot = gate.trending().await.unwrap();
        assert_eq!(snapshot.events, Value::Array(vec![]));
    }
}
