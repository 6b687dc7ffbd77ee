//! Create and edit form handlers.
//!
//! The form posts back to its own URL. The `action` field picks between
//! saving and the skill row buttons; skill actions only re-render the form.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use roster_core::UserId;
use roster_core::form::{FormAction, FormError, FormInput, FormMode, UserForm};
use tracing::instrument;

use crate::{error::AppError, filters, routes::render_html, state::AppState, store::StoreError};

use super::types::{UserFormView, edit_href};

/// Create/edit form template.
#[derive(Template)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub current_path: String,
    pub title: String,
    pub action_url: String,
    pub submit_label: String,
    pub form: UserFormView,
}

impl UserFormTemplate {
    fn for_form(form: &UserForm) -> Self {
        let (title, action_url, submit_label) = match form.mode() {
            FormMode::Create => (
                "New user".to_string(),
                "/users/new".to_string(),
                "Create".to_string(),
            ),
            FormMode::Edit(id) => (
                format!("Edit user {id}"),
                edit_href(id),
                "Save".to_string(),
            ),
        };

        Self {
            current_path: action_url.clone(),
            title,
            action_url,
            submit_label,
            form: UserFormView::from(form),
        }
    }
}

/// "User not found" panel shown instead of the form.
#[derive(Template)]
#[template(path = "users/not_found.html")]
pub struct UserNotFoundTemplate {
    pub current_path: String,
    pub id: String,
}

/// Render the not-found panel with status 404.
pub(super) fn not_found(id: UserId) -> Response {
    let template = UserNotFoundTemplate {
        current_path: "/".to_string(),
        id: id.to_string(),
    };
    (StatusCode::NOT_FOUND, render_html(&template)).into_response()
}

/// Split submitted form pairs into field values and the requested action.
///
/// Repeated `skills` keys keep their submitted order.
#[must_use]
pub fn parse_submission(pairs: Vec<(String, String)>) -> (FormInput, FormAction) {
    let mut input = FormInput::default();
    let mut action = FormAction::Save;

    for (key, value) in pairs {
        match key.as_str() {
            "firstName" => input.first_name = value,
            "lastName" => input.last_name = value,
            "email" => input.email = value,
            "skills" => input.skills.push(value),
            "action" => action = FormAction::from_param(&value),
            _ => {}
        }
    }

    (input, action)
}

fn parse_id(raw: &str) -> Result<UserId, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid user id: {e}")))
}

fn transition_error(e: &FormError) -> AppError {
    AppError::Internal(e.to_string())
}

/// New user form handler.
#[instrument]
pub async fn new_user() -> Response {
    render_html(&UserFormTemplate::for_form(&UserForm::create())).into_response()
}

/// Create user handler.
#[instrument(skip(state, pairs))]
pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let (input, action) = parse_submission(pairs);
    let form = UserForm::with_input(FormMode::Create, input);
    handle_submission(&state, form, action).await
}

/// Edit user form handler.
#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    match state.queries().user(id).await? {
        Some(user) => {
            let form = UserForm::edit(&user);
            Ok(render_html(&UserFormTemplate::for_form(&form)).into_response())
        }
        None => Ok(not_found(id)),
    }
}

/// Update user handler.
#[instrument(skip(state, pairs))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let (input, action) = parse_submission(pairs);
    let form = UserForm::with_input(FormMode::Edit(id), input);
    handle_submission(&state, form, action).await
}

/// Drive a submitted form through its state machine.
///
/// - Skill actions re-render the form in `Editing`.
/// - Validation failures re-render with field errors (422).
/// - A store failure re-renders with the message inline; a missing record
///   in edit mode shows the not-found panel instead.
/// - Success redirects to the list.
async fn handle_submission(
    state: &AppState,
    mut form: UserForm,
    action: FormAction,
) -> Result<Response, AppError> {
    if action != FormAction::Save {
        form.apply_action(action)
            .map_err(|e| transition_error(&e))?;
        return Ok(render_html(&UserFormTemplate::for_form(&form)).into_response());
    }

    let payload = match form.submit() {
        Ok(payload) => payload,
        Err(FormError::Invalid(errors)) => {
            tracing::debug!(?errors, "User form rejected");
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                render_html(&UserFormTemplate::for_form(&form)),
            )
                .into_response());
        }
        Err(e) => return Err(transition_error(&e)),
    };

    let result = match form.mode() {
        FormMode::Create => state.queries().create(&payload).await,
        FormMode::Edit(id) => state.queries().update(id, &payload).await,
    };

    match result {
        Ok(user) => {
            form.succeed().map_err(|e| transition_error(&e))?;
            tracing::info!(user_id = %user.id, "User saved");
            Ok(Redirect::to("/").into_response())
        }
        Err(StoreError::NotFound(id)) => Ok(not_found(id)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save user");
            let status = AppError::from(e.clone()).status();
            form.fail(e.to_string()).map_err(|e| transition_error(&e))?;
            Ok((status, render_html(&UserFormTemplate::for_form(&form))).into_response())
        }
    }
}
