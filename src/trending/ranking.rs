use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Event, Registration, TrendingEntry};

/// Ranks upcoming events by how many registrations point at them.
///
/// Registrations are joined to `events` by id; those whose event is missing
/// or not strictly after `now` are dropped. Every remaining registration
/// counts once, duplicates included. Entries are ordered by count descending,
/// then by event id ascending, and cut to `limit`.
pub fn compute_trending(
    registrations: &[Registration],
    events: &[Event],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<TrendingEntry> {
    let upcoming: HashMap<Uuid, &Event> = events
        .iter()
        .filter(|event| event.is_upcoming(now))
        .map(|event| (event.id, event))
        .collect();

    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for registration in registrations {
        if upcoming.contains_key(&registration.event_id) {
            *counts.entry(registration.event_id).or_default() += 1;
        }
    }

    let mut ranked: Vec<(Uuid, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .filter_map(|(event_id, count)| {
            upcoming
                .get(&event_id)
                .map(|event| TrendingEntry::snapshot(event, count))
        })
        .collect()
}
