use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Event;

/// One row of the trending list: an upcoming event with its registration
/// count and a snapshot of the fields the explore page renders.
///
/// The snapshot fields keep the names [`Event`] is serialized with, so a
/// trending entry renders anywhere an event does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    #[serde(rename = "eventId")]
    pub event_id: Uuid,
    pub count: u64,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    pub event_description: Option<String>,
    pub club_name: Option<String>,
    pub venue: Option<String>,
    pub poster: String,
    pub organizer_email: Option<String>,
    pub team_size: i32,
}

impl TrendingEntry {
    pub fn snapshot(event: &Event, count: u64) -> Self {
        Self {
            event_id: event.id,
            count,
            event_name: event.event_name.clone(),
            event_date: event.event_date,
            event_description: event.event_description.clone(),
            club_name: event.club_name.clone(),
            venue: event.venue.clone(),
            poster: event.poster.clone(),
            organizer_email: event.organizer_email.clone(),
            team_size: event.team_size,
        }
    }
}
