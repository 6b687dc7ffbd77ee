//! Sorting and pagination for the user list.
//!
//! Both are pure transforms over a snapshot of the cached list; nothing here
//! is persisted. The list page keeps its state in query parameters
//! (`?sort=lastName&dir=desc&page=2`).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collation::Collation;
use crate::types::User;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable column of the user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
    RegistrationDate,
}

impl SortField {
    /// Every sortable field, in column order.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::RegistrationDate,
    ];

    /// Query parameter value for this field.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::RegistrationDate => "registrationDate",
        }
    }

    /// Parse a query parameter value.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_param() == value)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Query parameter value.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse a query parameter value.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Create a sort state.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Build from optional query parameters, falling back to id ascending.
    #[must_use]
    pub fn from_params(sort: Option<&str>, dir: Option<&str>) -> Self {
        Self {
            field: sort.and_then(SortField::from_param).unwrap_or_default(),
            direction: dir.and_then(SortDirection::from_param).unwrap_or_default(),
        }
    }

    /// State after clicking the header of `field`.
    ///
    /// Clicking the active column flips the direction; clicking another
    /// column selects it in ascending order.
    #[must_use]
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::new(field, SortDirection::Asc)
        }
    }

    /// Direction shown on `field`'s header, if it is the active column.
    #[must_use]
    pub fn direction_for(self, field: SortField) -> Option<SortDirection> {
        (self.field == field).then_some(self.direction)
    }
}

/// Compare two users on one field, ascending.
fn compare_by(field: SortField, a: &User, b: &User, collation: &Collation) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::FirstName => collation.compare(&a.first_name, &b.first_name),
        SortField::LastName => collation.compare(&a.last_name, &b.last_name),
        SortField::Email => collation.compare(&a.email, &b.email),
        SortField::RegistrationDate => registration_millis(a).cmp(&registration_millis(b)),
    }
}

/// Registration date as epoch milliseconds; unparseable dates count as 0.
fn registration_millis(user: &User) -> i64 {
    user.registered_at()
        .map_or(0, |timestamp| timestamp.timestamp_millis())
}

/// Sort `users` in place. The sort is stable, so equal keys keep their
/// fetched order.
pub fn sort_users(users: &mut [User], state: SortState, collation: &Collation) {
    users.sort_by(|a, b| state.direction.apply(compare_by(state.field, a, b, collation)));
}

/// Sorted copy of `users`.
#[must_use]
pub fn sorted_users(users: &[User], state: SortState, collation: &Collation) -> Vec<User> {
    let mut sorted = users.to_vec();
    sort_users(&mut sorted, state, collation);
    sorted
}

/// Fixed-size, 1-indexed pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Create a paginator; a page size of 0 is treated as 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total` rows (`ceil(total / page_size)`).
    #[must_use]
    pub const fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Slice out 1-indexed `page`.
    ///
    /// Out-of-range pages (0 or past the end) are not clamped; they produce a
    /// page with no items.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> Page<'a, T> {
        let total = items.len();
        let start = page.saturating_sub(1).saturating_mul(self.page_size);
        let slice: &[T] = if page == 0 {
            &[]
        } else {
            items
                .get(start..total.min(start.saturating_add(self.page_size)))
                .unwrap_or(&[])
        };

        Page {
            items: slice,
            page,
            page_size: self.page_size,
            page_count: self.page_count(total),
            total,
        }
    }
}

/// One page of a sorted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-indexed page number as requested.
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total: usize,
}

impl<T> Page<'_, T> {
    /// 1-based position of the first row on this page (0 when empty).
    #[must_use]
    pub const fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last row on this page (0 when empty).
    #[must_use]
    pub const fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// Page numbers `1..=page_count` for the page links.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.page_count).collect()
    }
}
