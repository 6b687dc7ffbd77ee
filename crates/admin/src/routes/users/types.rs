//! View types shared by the user pages.

use roster_core::form::UserForm;
use roster_core::listing::{Page, SortState};
use roster_core::validation::FieldErrors;
use roster_core::{User, UserId};
use serde::Deserialize;

use crate::components::data_table::{list_params, list_url};

/// List page query parameters (`?sort=lastName&dir=desc&page=2`).
///
/// Values are taken as strings so that garbage falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn sort_state(&self) -> SortState {
        SortState::from_params(self.sort.as_deref(), self.dir.as_deref())
    }

    /// Requested page; missing or non-numeric values mean page 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }

    /// The list position a page was rendered at.
    #[must_use]
    pub fn at(sort: SortState, page: usize) -> Self {
        Self {
            sort: Some(sort.field.as_param().to_string()),
            dir: Some(sort.direction.as_param().to_string()),
            page: Some(page.to_string()),
        }
    }

    const fn is_empty(&self) -> bool {
        self.sort.is_none() && self.dir.is_none() && self.page.is_none()
    }

    /// `?sort=..&dir=..&page=..` for this position, or nothing when no
    /// parameter was given.
    #[must_use]
    pub fn query_suffix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", list_params(self.sort_state(), self.page()))
        }
    }

    /// URL of the list at this position.
    #[must_use]
    pub fn return_url(&self) -> String {
        format!("/{}", self.query_suffix())
    }
}

/// One row of the users table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: String,
    pub registration_date: String,
    /// A delete for this row is in flight; its actions are disabled.
    pub busy: bool,
    pub edit_href: String,
    pub delete_href: String,
}

impl UserRow {
    #[must_use]
    pub fn new(user: &User, busy: bool, position: &ListQuery) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            skills: user.skills.join(", "),
            registration_date: user.registration_date.clone(),
            busy,
            edit_href: edit_href(user.id),
            delete_href: delete_href(user.id, position),
        }
    }
}

/// A numbered page link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Pagination controls, present only when there is more than one page.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub links: Vec<PageLink>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

impl PaginationView {
    #[must_use]
    pub fn build<T>(page: &Page<'_, T>, sort: SortState) -> Option<Self> {
        if page.page_count <= 1 {
            return None;
        }

        Some(Self {
            links: page
                .page_numbers()
                .into_iter()
                .map(|number| PageLink {
                    number,
                    href: list_url(sort, number),
                    current: number == page.page,
                })
                .collect(),
            previous_href: page
                .has_previous()
                .then(|| list_url(sort, page.page.saturating_sub(1).min(page.page_count))),
            next_href: page.has_next().then(|| list_url(sort, page.page + 1)),
        })
    }
}

/// One editable skill input.
#[derive(Debug, Clone)]
pub struct SkillRow {
    pub index: usize,
    pub value: String,
    pub can_remove: bool,
}

/// Everything the form template needs from a [`UserForm`].
#[derive(Debug, Clone)]
pub struct UserFormView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: Vec<SkillRow>,
    pub errors: FieldErrors,
    pub submit_error: Option<String>,
    pub busy: bool,
}

impl From<&UserForm> for UserFormView {
    fn from(form: &UserForm) -> Self {
        let can_remove = form.skills.can_remove();
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            skills: form
                .skills
                .entries()
                .iter()
                .enumerate()
                .map(|(index, value)| SkillRow {
                    index,
                    value: value.clone(),
                    can_remove,
                })
                .collect(),
            errors: form.errors().clone(),
            submit_error: form.submit_error().map(ToString::to_string),
            busy: form.is_submitting(),
        }
    }
}

#[must_use]
pub fn edit_href(id: UserId) -> String {
    format!("/users/{id}/edit")
}

/// Delete confirmation URL, carrying the list position to return to.
#[must_use]
pub fn delete_href(id: UserId, position: &ListQuery) -> String {
    format!("/users/{id}/delete{}", position.query_suffix())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roster_core::listing::{Pagination, SortDirection, SortField};

    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery {
            sort: Some("nonsense".to_string()),
            dir: Some("sideways".to_string()),
            page: Some("two".to_string()),
        };
        assert_eq!(query.sort_state(), SortState::default());
        assert_eq!(query.page(), 1);

        let query = ListQuery {
            sort: Some("email".to_string()),
            dir: Some("desc".to_string()),
            page: Some("3".to_string()),
        };
        assert_eq!(
            query.sort_state(),
            SortState::new(SortField::Email, SortDirection::Desc)
        );
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn test_list_position_urls() {
        let empty = ListQuery::default();
        assert_eq!(empty.return_url(), "/");
        assert_eq!(delete_href(UserId::new(4), &empty), "/users/4/delete");

        let position = ListQuery::at(SortState::new(SortField::LastName, SortDirection::Desc), 2);
        assert_eq!(position.return_url(), "/?sort=lastName&dir=desc&page=2");
        assert_eq!(
            delete_href(UserId::new(4), &position),
            "/users/4/delete?sort=lastName&dir=desc&page=2"
        );
    }

    #[test]
    fn test_pagination_hidden_for_single_page() {
        let items: Vec<u32> = (0..10).collect();
        let page = Pagination::new(10).page(&items, 1);
        assert!(PaginationView::build(&page, SortState::default()).is_none());
    }

    #[test]
    fn test_pagination_links() {
        let items: Vec<u32> = (0..25).collect();
        let page = Pagination::new(10).page(&items, 2);
        let view = PaginationView::build(&page, SortState::default());

        let view = view.unwrap();
        assert_eq!(view.links.len(), 3);
        assert!(view.links[1].current);
        assert_eq!(
            view.previous_href.as_deref(),
            Some("/?sort=id&dir=asc&page=1")
        );
        assert_eq!(view.next_href.as_deref(), Some("/?sort=id&dir=asc&page=3"));
    }
}
