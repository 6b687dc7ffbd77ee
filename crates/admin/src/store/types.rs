//! Wire types exchanged with the user store.

use roster_core::UserFormData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user record exactly as the store returns it.
///
/// The store is loose about shapes: ids arrive as numbers or numeric strings,
/// `skills` may be missing or not an array, and older records carry
/// `createdAt` instead of `registrationDate`. Everything is optional here and
/// resolved in [`super::conversions::normalize_user`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Value,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /users`: the form fields plus the registration timestamp.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody<'a> {
    #[serde(flatten)]
    pub data: &'a UserFormData,
    pub registration_date: String,
}
