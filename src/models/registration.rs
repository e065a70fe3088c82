use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub registration_num: String,
    pub phone: String,
    pub team_size: i32,
    pub team_members: String,
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// Materialises a submitted form into a registration for `event_id`.
    pub fn from_form(event_id: Uuid, user_id: Uuid, form: RegistrationForm) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name: form.name,
            email: form.email,
            registration_num: form.registration_num,
            phone: form.phone,
            team_size: form.team_size,
            team_members: form.team_members.unwrap_or_default(),
            user_id,
            registered_at: Utc::now(),
        }
    }
}

/// Body of `POST /api/register-event/{event_name}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub registration_num: String,
    pub phone: String,
    pub team_size: i32,
    #[serde(default)]
    pub team_members: Option<String>,
}

/// Column width of every text field on a registration row.
pub const MAX_FIELD_LEN: usize = 255;

impl RegistrationForm {
    /// Name of the first field longer than [`MAX_FIELD_LEN`] characters.
    pub fn oversized_field(&self) -> Option<&'static str> {
        [
            ("name", Some(self.name.as_str())),
            ("email", Some(self.email.as_str())),
            ("registrationNum", Some(self.registration_num.as_str())),
            ("phone", Some(self.phone.as_str())),
            ("teamMembers", self.team_members.as_deref()),
        ]
        .into_iter()
        .find(|(_, value)| value.is_some_and(|v| v.chars().count() > MAX_FIELD_LEN))
        .map(|(field, _)| field)
    }
}

/// A caller's registration with the event it points at.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationHistory {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: Event,
}
