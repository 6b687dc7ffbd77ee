//! Conversion from raw store records to canonical [`User`]s.

use roster_core::{User, UserId, now_timestamp};
use serde_json::Value;

use super::error::StoreError;
use super::types::RawUser;

/// Convert a raw store record into a [`User`].
///
/// - `id` must be an integer or a numeric string.
/// - `skills` keeps string elements of an array; anything else becomes empty.
/// - The registration date is `registrationDate`, else `createdAt`, else now.
///   Blank strings count as absent.
/// - Missing name and email fields become empty strings.
///
/// # Errors
///
/// Returns `StoreError::Api` if the id cannot be interpreted.
pub fn normalize_user(raw: RawUser) -> Result<User, StoreError> {
    let id = parse_id(&raw.id)?;
    let registration_date = non_blank(raw.registration_date)
        .or_else(|| non_blank(raw.created_at))
        .unwrap_or_else(now_timestamp);

    Ok(User {
        id,
        first_name: raw.first_name.unwrap_or_default(),
        last_name: raw.last_name.unwrap_or_default(),
        email: raw.email.unwrap_or_default(),
        skills: normalize_skills(raw.skills),
        registration_date,
    })
}

fn parse_id(value: &Value) -> Result<UserId, StoreError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(UserId::new)
            .ok_or_else(|| StoreError::Api(format!("Invalid user id: {number}"))),
        Value::String(text) => text
            .parse::<UserId>()
            .map_err(|e| StoreError::Api(format!("Invalid user id: {e}"))),
        Value::Null => Err(StoreError::Api("User record has no id".to_string())),
        other => Err(StoreError::Api(format!("Invalid user id: {other}"))),
    }
}

fn normalize_skills(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(skill) => Some(skill),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
