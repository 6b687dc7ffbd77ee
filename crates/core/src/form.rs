//! User create/edit form model.
//!
//! The form moves through `Idle -> Editing -> Submitting` and then either
//! `Succeeded` (the page navigates away) or back to `Editing` with the
//! failure message surfaced.
//!
//! ```
//! use roster_core::form::{FormInput, FormPhase, UserForm};
//!
//! let mut form = UserForm::create();
//! form.apply_input(FormInput {
//!     first_name: "Ivan".into(),
//!     last_name: "Petrov".into(),
//!     email: "ivan@example.com".into(),
//!     skills: vec!["".into(), "Go".into(), "".into()],
//! }).unwrap();
//!
//! let payload = form.submit().unwrap();
//! assert_eq!(payload.skills, vec!["Go".to_string()]);
//! assert_eq!(form.phase(), FormPhase::Submitting);
//! ```

use std::fmt;

use crate::types::{User, UserFormData, UserId};
use crate::validation::{FieldErrors, validate};

/// Errors produced by form transitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The requested transition is not allowed from the current phase.
    #[error("cannot {action} while the form is {from}")]
    InvalidTransition { from: FormPhase, action: &'static str },
    /// One or more fields failed validation.
    #[error("form has invalid fields")]
    Invalid(FieldErrors),
}

/// Lifecycle phase of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Editing,
    Submitting,
    Succeeded,
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
        })
    }
}

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
}

/// Ordered, editable list of skill inputs.
///
/// Always holds at least one row so the form keeps an input to type into;
/// blank rows are dropped from the submitted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillList(Vec<String>);

impl Default for SkillList {
    fn default() -> Self {
        Self(vec![String::new()])
    }
}

impl SkillList {
    /// Build from existing entries; an empty list becomes one blank row.
    #[must_use]
    pub fn from_entries(entries: Vec<String>) -> Self {
        if entries.is_empty() {
            Self::default()
        } else {
            Self(entries)
        }
    }

    /// Append a blank row.
    pub fn append(&mut self) {
        self.0.push(String::new());
    }

    /// Remove the row at `index`.
    ///
    /// Returns `false` (and leaves the list untouched) when the index is out
    /// of range or only one row remains.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.0.len() <= 1 || index >= self.0.len() {
            return false;
        }
        self.0.remove(index);
        true
    }

    /// Replace the text of the row at `index`. Returns `false` if out of range.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Whether a row may be removed (more than one remains).
    #[must_use]
    pub fn can_remove(&self) -> bool {
        self.0.len() > 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Non-blank entries, in order.
    #[must_use]
    pub fn filled(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|skill| !skill.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Raw field values as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: Vec<String>,
}

/// What the submit button asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormAction {
    #[default]
    Save,
    AddSkill,
    RemoveSkill(usize),
}

impl FormAction {
    /// Parse the `action` field (`save`, `add_skill`, `remove_skill:<index>`).
    /// Unknown values mean `Save`.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value.split_once(':') {
            Some(("remove_skill", index)) => index
                .parse()
                .map_or(Self::Save, Self::RemoveSkill),
            _ if value == "add_skill" => Self::AddSkill,
            _ => Self::Save,
        }
    }
}

/// State of one create or edit form.
#[derive(Debug, Clone)]
pub struct UserForm {
    mode: FormMode,
    phase: FormPhase,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: SkillList,
    errors: FieldErrors,
    submit_error: Option<String>,
}

impl UserForm {
    /// Blank form for a new user.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            phase: FormPhase::Idle,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            skills: SkillList::default(),
            errors: FieldErrors::default(),
            submit_error: None,
        }
    }

    /// Form pre-filled from an existing record.
    #[must_use]
    pub fn edit(user: &User) -> Self {
        Self {
            mode: FormMode::Edit(user.id),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            skills: SkillList::from_entries(user.skills.clone()),
            ..Self::create()
        }
    }

    /// Form for `mode` holding `input`, already in `Editing`.
    #[must_use]
    pub fn with_input(mode: FormMode, input: FormInput) -> Self {
        let mut form = Self {
            mode,
            ..Self::create()
        };
        form.fill(input);
        form.phase = FormPhase::Editing;
        form
    }

    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Message of the last failed submission, if any.
    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting)
    }

    fn fill(&mut self, input: FormInput) {
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.email = input.email;
        self.skills = SkillList::from_entries(input.skills);
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Idle | FormPhase::Editing => Ok(()),
            from => Err(FormError::InvalidTransition { from, action }),
        }
    }

    /// Replace the field values with user input (`Idle | Editing -> Editing`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while submitting or after success.
    pub fn apply_input(&mut self, input: FormInput) -> Result<(), FormError> {
        self.ensure_editable("edit")?;
        self.fill(input);
        self.phase = FormPhase::Editing;
        Ok(())
    }

    /// Apply a skill row action (`Idle | Editing -> Editing`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while submitting or after success.
    pub fn apply_action(&mut self, action: FormAction) -> Result<(), FormError> {
        self.ensure_editable("edit skills")?;
        match action {
            FormAction::AddSkill => self.skills.append(),
            FormAction::RemoveSkill(index) => {
                self.skills.remove(index);
            }
            FormAction::Save => {}
        }
        self.phase = FormPhase::Editing;
        Ok(())
    }

    /// Validate and start submitting (`Editing -> Submitting`).
    ///
    /// On success returns the payload with blank skills removed. On
    /// validation failure the form stays in `Editing` with field errors set.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` with the field errors, or `InvalidTransition` when
    /// the form is not in `Editing`.
    pub fn submit(&mut self) -> Result<UserFormData, FormError> {
        if self.phase != FormPhase::Editing {
            return Err(FormError::InvalidTransition {
                from: self.phase,
                action: "submit",
            });
        }

        let payload = UserFormData {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            skills: self.skills.filled(),
        };

        self.errors = validate(&payload);
        if !self.errors.is_empty() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        self.submit_error = None;
        self.phase = FormPhase::Submitting;
        Ok(payload)
    }

    /// Record a successful save (`Submitting -> Succeeded`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no submission is in progress.
    pub fn succeed(&mut self) -> Result<(), FormError> {
        if self.phase != FormPhase::Submitting {
            return Err(FormError::InvalidTransition {
                from: self.phase,
                action: "complete",
            });
        }
        self.phase = FormPhase::Succeeded;
        Ok(())
    }

    /// Record a failed save (`Submitting -> Editing`), keeping the entered
    /// values so the user can resubmit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no submission is in progress.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), FormError> {
        if self.phase != FormPhase::Submitting {
            return Err(FormError::InvalidTransition {
                from: self.phase,
                action: "fail",
            });
        }
        self.submit_error = Some(message.into());
        self.phase = FormPhase::Editing;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_input(skills: &[&str]) -> FormInput {
        FormInput {
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            email: "ivan@example.com".to_string(),
            skills: skills.iter().map(ToString::to_string).collect(),
        }
    }

    fn stored_user(skills: Vec<String>) -> User {
        User {
            id: UserId::new(9),
            first_name: "Olga".to_string(),
            last_name: "Smirnova".to_string(),
            email: "olga@example.com".to_string(),
            skills,
            registration_date: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_create_form_starts_blank_with_one_skill_row() {
        let form = UserForm::create();
        assert_eq!(form.phase(), FormPhase::Idle);
        assert_eq!(form.mode(), FormMode::Create);
        assert!(form.first_name.is_empty());
        assert_eq!(form.skills.entries(), &[String::new()]);
    }

    #[test]
    fn test_edit_form_populates_from_record() {
        let form = UserForm::edit(&stored_user(vec!["SQL".to_string()]));
        assert_eq!(form.mode(), FormMode::Edit(UserId::new(9)));
        assert_eq!(form.first_name, "Olga");
        assert_eq!(form.skills.entries(), &["SQL".to_string()]);

        let no_skills = UserForm::edit(&stored_user(vec![]));
        assert_eq!(no_skills.skills.entries(), &[String::new()]);
    }

    #[test]
    fn test_submit_filters_blank_skills() {
        let mut form = UserForm::create();
        form.apply_input(valid_input(&["", "Go", ""])).unwrap();
        let payload = form.submit().unwrap();
        assert_eq!(payload.skills, vec!["Go".to_string()]);
        assert_eq!(form.phase(), FormPhase::Submitting);
    }

    #[test]
    fn test_invalid_submit_stays_editing() {
        let mut form = UserForm::create();
        let mut input = valid_input(&[]);
        input.email = "nope".to_string();
        form.apply_input(input).unwrap();

        let err = form.submit().unwrap_err();
        assert!(matches!(err, FormError::Invalid(ref errors) if errors.email.is_some()));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.errors().email.is_some());
    }

    #[test]
    fn test_failure_returns_to_editing_with_message() {
        let mut form = UserForm::create();
        form.apply_input(valid_input(&["Rust"])).unwrap();
        form.submit().unwrap();
        form.fail("API error: HTTP 500").unwrap();

        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.submit_error(), Some("API error: HTTP 500"));
        assert_eq!(form.first_name, "Ivan");

        // Resubmitting clears the previous failure.
        form.submit().unwrap();
        assert_eq!(form.submit_error(), None);
        form.succeed().unwrap();
        assert_eq!(form.phase(), FormPhase::Succeeded);
    }

    #[test]
    fn test_illegal_transitions() {
        let mut form = UserForm::create();
        assert!(matches!(
            form.submit(),
            Err(FormError::InvalidTransition {
                from: FormPhase::Idle,
                ..
            })
        ));
        assert!(form.succeed().is_err());
        assert!(form.fail("boom").is_err());

        form.apply_input(valid_input(&[])).unwrap();
        form.submit().unwrap();
        assert!(form.apply_input(valid_input(&[])).is_err());
        assert!(form.apply_action(FormAction::AddSkill).is_err());

        form.succeed().unwrap();
        assert!(form.submit().is_err());
    }

    #[test]
    fn test_last_skill_row_cannot_be_removed() {
        let mut skills = SkillList::default();
        assert!(!skills.can_remove());
        assert!(!skills.remove(0));
        assert_eq!(skills.len(), 1);

        skills.append();
        assert!(skills.set(1, "Docker"));
        assert!(skills.remove(0));
        assert_eq!(skills.entries(), &["Docker".to_string()]);
        assert!(!skills.remove(5));
        assert!(!skills.set(5, "x"));
    }

    #[test]
    fn test_skill_actions_keep_editing() {
        let mut form = UserForm::with_input(FormMode::Create, valid_input(&["A", "B"]));
        form.apply_action(FormAction::AddSkill).unwrap();
        assert_eq!(form.skills.len(), 3);
        form.apply_action(FormAction::RemoveSkill(0)).unwrap();
        assert_eq!(
            form.skills.entries(),
            &["B".to_string(), String::new()]
        );
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_form_action_parsing() {
        assert_eq!(FormAction::from_param("save"), FormAction::Save);
        assert_eq!(FormAction::from_param("add_skill"), FormAction::AddSkill);
        assert_eq!(
            FormAction::from_param("remove_skill:2"),
            FormAction::RemoveSkill(2)
        );
        assert_eq!(FormAction::from_param("remove_skill:x"), FormAction::Save);
        assert_eq!(FormAction::from_param("whatever"), FormAction::Save);
    }
}
