//! Delete confirmation and delete handlers.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use roster_core::UserId;
use tracing::instrument;

use crate::{error::AppError, filters, routes::render_html, state::AppState};

use super::form::not_found;
use super::list::render_index;
use super::types::{ListQuery, delete_href};

/// Delete confirmation page template.
#[derive(Template)]
#[template(path = "users/delete.html")]
pub struct DeleteConfirmTemplate {
    pub current_path: String,
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub action_url: String,
    /// List position to go back to.
    pub cancel_href: String,
    /// A delete for this user is already in flight.
    pub busy: bool,
}

fn parse_id(raw: &str) -> Result<UserId, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid user id: {e}")))
}

/// Delete confirmation handler.
///
/// The list position (`sort`, `dir`, `page`) rides along on the form action
/// so the delete can return to it.
#[instrument(skip(state))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(position): Query<ListQuery>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    let Some(user) = state.queries().user(id).await? else {
        return Ok(not_found(id));
    };

    let template = DeleteConfirmTemplate {
        current_path: "/".to_string(),
        id: id.to_string(),
        display_name: user.display_name(),
        email: user.email,
        action_url: delete_href(id, &position),
        cancel_href: position.return_url(),
        busy: state.queries().pending_deletes().contains(id),
    };

    Ok(render_html(&template).into_response())
}

/// Delete user handler.
///
/// While the store call is in flight the row is marked busy. On failure the
/// list is re-rendered at the caller's position with an error banner and the
/// row still present.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(position): Query<ListQuery>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    let Some(guard) = state.queries().pending_deletes().begin(id) else {
        tracing::warn!(user_id = %id, "Delete already in progress");
        let banner = format!("User {id} is already being deleted");
        let page =
            render_index(&state, position.sort_state(), position.page(), Some(banner)).await;
        return Ok((StatusCode::CONFLICT, page).into_response());
    };

    let result = state.queries().delete(id).await;
    drop(guard);

    match result {
        Ok(()) => Ok(Redirect::to(&position.return_url()).into_response()),
        Err(e) => {
            tracing::error!(user_id = %id, error = %e, "Failed to delete user");
            let status = AppError::from(e.clone()).status();
            let banner = format!("Failed to delete user {id}: {e}");
            let page =
                render_index(&state, position.sort_state(), position.page(), Some(banner)).await;
            Ok((status, page).into_response())
        }
    }
}
