//! Persistence for events and registrations.
//!
//! Handlers and the trending gate only see [`EventStore`]. [`PgStore`] is the
//! production backend; [`MemoryStore`] keeps everything in process and is what
//! the tests run against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, Registration, RegistrationHistory};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("event {0} does not exist")]
    EventNotFound(Uuid),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every event, in no particular order.
    async fn find_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Every registration, in no particular order.
    async fn find_registrations(&self) -> Result<Vec<Registration>, StoreError>;

    /// Events dated strictly after `after`, soonest first.
    async fn upcoming_events(&self, after: DateTime<Utc>) -> Result<Vec<Event>, StoreError>;

    /// Case-insensitive substring match on name, club name and description.
    async fn search_events(&self, query: &str) -> Result<Vec<Event>, StoreError>;

    async fn event_by_name(&self, name: &str) -> Result<Option<Event>, StoreError>;

    /// Events whose `created_by` is `user_id`, soonest first.
    async fn events_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError>;

    /// Persists a registration. The referenced event must exist.
    async fn insert_registration(&self, registration: &Registration) -> Result<(), StoreError>;

    async fn registrations_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>, StoreError>;

    /// Registrations made by `user_id`, newest first, each joined to its event.
    async fn registrations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RegistrationHistory>, StoreError>;
}
