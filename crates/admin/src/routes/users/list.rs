//! Users list page handlers.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use roster_core::listing::{SortState, sorted_users};
use tracing::instrument;

use crate::{
    components::data_table::{ColumnHeader, users_table_config},
    filters,
    routes::render_html,
    state::AppState,
};

use super::types::{ListQuery, PaginationView, UserRow};

/// Users list page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub current_path: String,
    /// Data table ID.
    pub table_id: String,
    /// Column headers with sort links.
    pub headers: Vec<ColumnHeader>,
    /// Rows on the requested page.
    pub rows: Vec<UserRow>,
    pub empty_title: String,
    pub empty_description: Option<String>,
    /// Set when the list could not be fetched; replaces the table.
    pub load_error: Option<String>,
    /// Inline error from a failed action on this page.
    pub banner: Option<String>,
    pub first_index: usize,
    pub last_index: usize,
    pub total: usize,
    pub pagination: Option<PaginationView>,
}

/// Users list page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    render_index(&state, query.sort_state(), query.page(), None).await
}

/// Drop every cached query and return to the list.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Redirect {
    state.queries().invalidate_all().await;
    tracing::info!("User cache refreshed");
    Redirect::to("/")
}

/// Render the list for a sort state and page, optionally with an error banner.
///
/// A failed fetch renders the "Failed to load users" panel with status 502.
pub(super) async fn render_index(
    state: &AppState,
    sort: SortState,
    page: usize,
    banner: Option<String>,
) -> Response {
    let config = users_table_config();
    let mut template = UsersIndexTemplate {
        current_path: "/".to_string(),
        table_id: config.table_id.clone(),
        headers: config.headers(sort),
        rows: vec![],
        empty_title: config.empty_title.clone(),
        empty_description: config.empty_description.clone(),
        load_error: None,
        banner,
        first_index: 0,
        last_index: 0,
        total: 0,
        pagination: None,
    };

    match state.queries().users().await {
        Ok(users) => {
            let sorted = sorted_users(&users, sort, state.collation());
            let pending = state.queries().pending_deletes().snapshot();
            let position = ListQuery::at(sort, page);
            let page = state.pagination().page(&sorted, page);

            template.rows = page
                .items
                .iter()
                .map(|user| UserRow::new(user, pending.contains(&user.id), &position))
                .collect();
            template.first_index = page.first_index();
            template.last_index = page.last_index();
            template.total = page.total;
            template.pagination = PaginationView::build(&page, sort);

            render_html(&template).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch users");
            template.load_error = Some(e.to_string());
            (StatusCode::BAD_GATEWAY, render_html(&template)).into_response()
        }
    }
}
