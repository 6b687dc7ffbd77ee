//! User management route handlers.
//!
//! This module contains handlers for the user list, the create/edit form and
//! the delete confirmation flow.

mod delete;
mod form;
mod list;
pub mod types;

pub use types::{ListQuery, PaginationView, UserFormView, UserRow};

pub use list::{UsersIndexTemplate, index, refresh};

pub use form::{
    UserFormTemplate, UserNotFoundTemplate, create, edit, new_user, parse_submission, update,
};

pub use delete::{DeleteConfirmTemplate, confirm_delete, delete};
