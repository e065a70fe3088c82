use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, StoreError};
use crate::models::{Event, Registration, RegistrationHistory};

/// In-process store.
///
/// Counts every trait call in [`MemoryStore::read_count`] and can be switched
/// into a failing mode with [`MemoryStore::set_unavailable`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
    registrations: RwLock<Vec<Registration>>,
    unavailable: AtomicBool,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_event(&self, event: Event) {
        self.events.write().await.push(event);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of store calls served (or refused) so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find_events(&self) -> Result<Vec<Event>, StoreError> {
        self.check()?;
        Ok(self.events.read().await.clone())
    }

    async fn find_registrations(&self) -> Result<Vec<Registration>, StoreError> {
        self.check()?;
        Ok(self.registrations.read().await.clone())
    }

    async fn upcoming_events(&self, after: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        self.check()?;
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.is_upcoming(after))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.event_date);
        Ok(events)
    }

    async fn search_events(&self, query: &str) -> Result<Vec<Event>, StoreError> {
        self.check()?;
        let needle = query.to_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&needle))
        };

        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| {
                contains(Some(e.event_name.as_str()))
                    || contains(e.club_name.as_deref())
                    || contains(e.event_description.as_deref())
            })
            .cloned()
            .collect();
        events.sort_by_key(|e| e.event_date);
        Ok(events)
    }

    async fn event_by_name(&self, name: &str) -> Result<Option<Event>, StoreError> {
        self.check()?;
        Ok(self
            .events
            .read()
            .await
            .iter()
            .find(|e| e.event_name == name)
            .cloned())
    }

    async fn events_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        self.check()?;
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.created_by == Some(user_id))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.event_date);
        Ok(events)
    }

    async fn insert_registration(&self, registration: &Registration) -> Result<(), StoreError> {
        self.check()?;
        let exists = self
            .events
            .read()
            .await
            .iter()
            .any(|e| e.id == registration.event_id);
        if !exists {
            return Err(StoreError::EventNotFound(registration.event_id));
        }

        self.registrations.write().await.push(registration.clone());
        Ok(())
    }

    async fn registrations_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>, StoreError> {
        self.check()?;
        let mut registrations: Vec<Registration> = self
            .registrations
            .read()
            .await
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by_key(|r| r.registered_at);
        Ok(registrations)
    }

    async fn registrations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RegistrationHistory>, StoreError> {
        self.check()?;
        let events: HashMap<Uuid, Event> = self
            .events
            .read()
            .await
            .iter()
            .map(|e| (e.id, e.clone()))
            .collect();
        let mut history: Vec<RegistrationHistory> = self
            .registrations
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let event = events.get(&r.event_id)?.clone();
                Some(RegistrationHistory {
                    registration: r.clone(),
                    event,
                })
            })
            .collect();
        history.sort_by(|a, b| b.registration.registered_at.cmp(&a.registration.registered_at));
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegistrationForm;
    use chrono::Duration;

    fn form(name: &str) -> RegistrationForm {
        RegistrationForm {
            name: name.to_string(),
            email: format!("{name}@campus.edu"),
            registration_num: "21BCE0001".to_string(),
            phone: "9000000000".to_string(),
            team_size: 1,
            team_members: None,
        }
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_fields() {
        let store = MemoryStore::new();
        let mut robotics = Event::new("Bot Wars", Utc::now() + Duration::days(3));
        robotics.club_name = Some("Robotics Club".to_string());
        let mut music = Event::new("Open Mic", Utc::now() + Duration::days(2));
        music.event_description = Some("An evening of ACOUSTIC sets".to_string());
        store.insert_event(robotics).await;
        store.insert_event(music).await;

        let hits = store.search_events("robotics").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event_name, "Bot Wars");

        let hits = store.search_events("acoustic").await.unwrap();
        assert_eq!(hits[0].event_name, "Open Mic");

        assert!(store.search_events("chess").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_registration_requires_existing_event() {
        let store = MemoryStore::new();
        let orphan = Registration::from_form(Uuid::new_v4(), Uuid::new_v4(), form("ghost"));
        assert!(matches!(
            store.insert_registration(&orphan).await,
            Err(StoreError::EventNotFound(_))
        ));
        assert!(store.find_registrations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_joins_events_for_user() {
        let store = MemoryStore::new();
        let event = Event::new("Quiz Night", Utc::now() + Duration::days(1));
        let event_id = event.id;
        store.insert_event(event).await;

        let user = Uuid::new_v4();
        let mine = Registration::from_form(event_id, user, form("me"));
        let theirs = Registration::from_form(event_id, Uuid::new_v4(), form("them"));
        store.insert_registration(&mine).await.unwrap();
        store.insert_registration(&theirs).await.unwrap();

        let history = store.registrations_for_user(user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].event.event_name, "Quiz Night");
        assert_eq!(history[0].registration.id, mine.id);

        let second = Event::new("Hackfest", Utc::now() + Duration::days(4));
        let second_id = second.id;
        store.insert_event(second).await;
        let mut later = Registration::from_form(second_id, user, form("me"));
        later.registered_at = mine.registered_at + Duration::seconds(5);
        store.insert_registration(&later).await.unwrap();

        let history = store.registrations_for_user(user).await.unwrap();
        let joined: Vec<(Uuid, Uuid)> = history
            .iter()
            .map(|h| (h.registration.event_id, h.event.id))
            .collect();
        assert_eq!(joined, vec![(second_id, second_id), (event_id, event_id)]);
    }

    #[tokio::test]
    async fn test_events_created_by_filters_on_creator() {
        let store = MemoryStore::new();
        let admin = Uuid::new_v4();
        let mut later = Event::new("Later", Utc::now() + Duration::days(9));
        later.created_by = Some(admin);
        let mut sooner = Event::new("Sooner", Utc::now() + Duration::days(1));
        sooner.created_by = Some(admin);
        let mut other = Event::new("Other", Utc::now() + Duration::days(2));
        other.created_by = Some(Uuid::new_v4());
        store.insert_event(later).await;
        store.insert_event(sooner).await;
        store.insert_event(other).await;
        store.insert_event(Event::new("Orphan", Utc::now())).await;

        let names: Vec<String> = store
            .events_created_by(admin)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_name)
            .collect();
        assert_eq!(names, vec!["Sooner", "Later"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_and_counts_reads() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.find_events().await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.read_count(), 1);
    }
}
