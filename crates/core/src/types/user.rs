//! Canonical user record and the editable subset sent on create/update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A user record in its normalized shape.
///
/// Whatever field names the remote store uses, every record is converted to
/// this type before it reaches the cache or the views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Always present; empty when the store sent none.
    pub skills: Vec<String>,
    /// ISO-8601 timestamp as received (or synthesized at adaptation time).
    pub registration_date: String,
}

impl User {
    /// Full display name, "First Last".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Registration timestamp parsed as RFC 3339, if well-formed.
    #[must_use]
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.registration_date)
    }

    /// The editable fields of this record.
    #[must_use]
    pub fn form_data(&self) -> UserFormData {
        UserFormData {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            skills: self.skills.clone(),
        }
    }
}

/// The mutable subset of [`User`] used for create and update.
///
/// `id` and `registrationDate` are assigned outside the form and are never
/// part of this payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: Vec<String>,
}

impl UserFormData {
    /// Copy of this payload with blank (whitespace-only) skills removed.
    #[must_use]
    pub fn without_blank_skills(&self) -> Self {
        Self {
            skills: self
                .skills
                .iter()
                .filter(|skill| !skill.trim().is_empty())
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// Current time formatted the way registration dates are stored
/// (`2024-01-15T10:30:00.000Z`).
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 timestamp.
///
/// Values without an offset (`2024-03-01T12:00:00`) are read as UTC, and a
/// bare date as midnight UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
