use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An event published by a club admin.
///
/// `event_name` is the lookup key used by the public routes. Storage does not
/// enforce uniqueness on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    pub event_description: Option<String>,
    pub club_name: Option<String>,
    pub venue: Option<String>,
    pub team_size: i32,
    pub organizer_email: Option<String>,
    pub rewards: Option<String>,
    pub poster: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Builds an event with the storage defaults applied: team size 1, an
    /// empty poster and both timestamps set to now.
    pub fn new(event_name: impl Into<String>, event_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_name: event_name.into(),
            event_date,
            event_description: None,
            club_name: None,
            venue: None,
            team_size: 1,
            organizer_email: None,
            rewards: None,
            poster: String::new(),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the event starts strictly after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.event_date > now
    }
}
