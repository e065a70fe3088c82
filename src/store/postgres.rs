use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{EventStore, StoreError};
use crate::models::{Event, Registration, RegistrationHistory};

const EVENT_COLUMNS: &str = "id, event_name, event_date, event_description, club_name, venue, \
     team_size, organizer_email, rewards, poster, created_by, created_at, updated_at";

const REGISTRATION_COLUMNS: &str = "id, event_id, name, email, registration_num, phone, \
     team_size, team_members, user_id, registered_at";

/// PostgreSQL-backed store using runtime-checked queries.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Successfully connected to database");

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Escapes LIKE metacharacters so user input only ever matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl EventStore for PgStore {
    async fn find_events(&self) -> Result<Vec<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events");
        Ok(sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_registrations(&self) -> Result<Vec<Registration>, StoreError> {
        let sql = format!("SELECT {REGISTRATION_COLUMNS} FROM registrations");
        Ok(sqlx::query_as::<_, Registration>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn upcoming_events(&self, after: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        let sql =
            format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_date > $1 ORDER BY event_date");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(after)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_events(&self, query: &str) -> Result<Vec<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE event_name ILIKE $1 OR club_name ILIKE $1 OR event_description ILIKE $1 \
             ORDER BY event_date"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn event_by_name(&self, name: &str) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_name = $1 LIMIT 1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn events_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let sql =
            format!("SELECT {EVENT_COLUMNS} FROM events WHERE created_by = $1 ORDER BY event_date");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_registration(&self, registration: &Registration) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO registrations ({REGISTRATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        sqlx::query(&sql)
            .bind(registration.id)
            .bind(registration.event_id)
            .bind(&registration.name)
            .bind(&registration.email)
            .bind(&registration.registration_num)
            .bind(&registration.phone)
            .bind(registration.team_size)
            .bind(&registration.team_members)
            .bind(registration.user_id)
            .bind(registration.registered_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn registrations_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>, StoreError> {
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 \
             ORDER BY registered_at"
        );
        Ok(sqlx::query_as::<_, Registration>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn registrations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RegistrationHistory>, StoreError> {
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE user_id = $1 \
             ORDER BY registered_at DESC"
        );
        let registrations = sqlx::query_as::<_, Registration>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        if registrations.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<Uuid> = registrations.iter().map(|r| r.event_id).collect();
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)");
        let events: HashMap<Uuid, Event> = sqlx::query_as::<_, Event>(&sql)
            .bind(&event_ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|event| (event.id, event))
            .collect();

        Ok(registrations
            .into_iter()
            .filter_map(|registration| {
                let event = events.get(&registration.event_id)?.clone();
                Some(RegistrationHistory {
                    registration,
                    event,
                })
            })
            .collect())
    }
}
