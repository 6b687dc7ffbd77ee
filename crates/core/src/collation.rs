//! Locale-aware string ordering for the display locale.
//!
//! Names and emails in the user list are ordered with the CLDR collation
//! rules of the configured locale (ICU4X compiled data), not by code point.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::Locale;

/// Errors that can occur when building a [`Collation`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollationError {
    /// The locale tag is not a valid BCP-47 tag.
    #[error("invalid locale tag {0:?}")]
    InvalidLocale(String),
    /// No collation data is available for the locale.
    #[error("collation data unavailable for {locale}: {reason}")]
    Unavailable { locale: String, reason: String },
}

/// A shareable collator bound to one locale.
#[derive(Clone)]
pub struct Collation {
    locale: Locale,
    collator: Arc<CollatorBorrowed<'static>>,
}

impl fmt::Debug for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collation")
            .field("locale", &self.locale.to_string())
            .finish_non_exhaustive()
    }
}

impl Collation {
    /// Build a collator for a BCP-47 locale tag such as `ru`, `de` or `sv-SE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag does not parse or the locale has no
    /// collation data.
    pub fn for_locale(tag: &str) -> Result<Self, CollationError> {
        let locale: Locale = tag
            .parse()
            .map_err(|_| CollationError::InvalidLocale(tag.to_string()))?;

        let collator = Collator::try_new(
            CollatorPreferences::from(locale.clone()),
            CollatorOptions::default(),
        )
        .map_err(|e| CollationError::Unavailable {
            locale: tag.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            locale,
            collator: Arc::new(collator),
        })
    }

    /// Compare two strings under this locale's rules.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }

    /// The locale tag this collator was built for.
    #[must_use]
    pub fn locale(&self) -> String {
        self.locale.to_string()
    }
}
