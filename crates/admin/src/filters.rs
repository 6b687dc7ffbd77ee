//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use roster_core::parse_timestamp;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a registration timestamp as `dd.MM.yyyy`.
///
/// Usage in templates: `{{ user.registration_date|registration_date }}`
#[askama::filter_fn]
pub fn registration_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_registration_date(&value.to_string()))
}

/// `dd.MM.yyyy` for parseable timestamps; anything else is returned as is.
#[must_use]
pub fn format_registration_date(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || value.to_string(),
        |timestamp| timestamp.format("%d.%m.%Y").to_string(),
    )
}
