//! Client-side validation for the login and signup forms.
//!
//! A form with class `auth-form` is a signup form when it contains an
//! `#email` field, otherwise a login form. Validation stops at the first
//! failing field: submission is cancelled, one alert is raised and that
//! field is focused.

use thiserror::Error;

use crate::dom::{Document, EventType, NodeId};
use crate::error::DomResult;
use crate::page::{Mount, Page};

/// Prompt text of the forgot-password link.
pub const RESET_PROMPT: &str = "Please enter your email address to reset your password:";

/// Which auth form is on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFormKind {
    Login,
    Signup,
}

/// Fields the validator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    /// Element id of the field's input.
    #[must_use]
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
        }
    }
}

/// Raw field values at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// The first field that failed validation and the alert to show.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldError {
    pub field: AuthField,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: AuthField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate the fields of a login or signup form.
///
/// Blank checks use trimmed values; the password comparison uses the raw
/// values.
pub fn validate(kind: AuthFormKind, fields: &AuthFields) -> Result<(), FieldError> {
    let blank = |value: &str| value.trim().is_empty();

    match kind {
        AuthFormKind::Login => {
            if blank(&fields.username) {
                return Err(FieldError::new(
                    AuthField::Username,
                    "Please enter your username",
                ));
            }
            if blank(&fields.password) {
                return Err(FieldError::new(
                    AuthField::Password,
                    "Please enter your password",
                ));
            }
        }
        AuthFormKind::Signup => {
            if blank(&fields.username) {
                return Err(FieldError::new(AuthField::Username, "Please enter a username"));
            }
            if blank(&fields.email) {
                return Err(FieldError::new(AuthField::Email, "Please enter your email"));
            }
            if blank(&fields.password) {
                return Err(FieldError::new(AuthField::Password, "Please enter a password"));
            }
            if fields.password != fields.confirm_password {
                return Err(FieldError::new(
                    AuthField::ConfirmPassword,
                    "Passwords do not match",
                ));
            }
        }
    }
    Ok(())
}

/// Confirmation shown after the reset prompt.
pub fn reset_confirmation(email: &str) -> String {
    format!("A password reset link has been sent to {email}")
}

/// Mounts the auth-form behaviour on a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthForms;

impl AuthForms {
    /// Attach the submit validator and the forgot-password handler.
    ///
    /// Pages without an `.auth-form` or `.forgot-password` get an empty mount.
    pub fn mount(page: &Page) -> DomResult<Mount> {
        let mut mount = Mount::new(page, "auth");
        let (form, forgot) = {
            let doc = page.document();
            (
                doc.query_selector(".auth-form")?,
                doc.query_selector(".forgot-password")?,
            )
        };

        if let Some(form) = form {
            let kind = {
                let doc = page.document();
                if doc.query_within(form, "#email")?.is_some() {
                    AuthFormKind::Signup
                } else {
                    AuthFormKind::Login
                }
            };

            mount.listen(form, EventType::Submit, move |page, event| {
                let (fields, ids) = {
                    let doc = page.document();
                    read_fields(&doc, form)
                };
                if let Err(error) = validate(kind, &fields) {
                    event.prevent_default();
                    tracing::debug!(
                        name: "auth.validation.failed",
                        field = error.field.element_id(),
                        "Auth form submission blocked"
                    );
                    page.dialogs().alert(error.message);
                    if let Some(id) = ids.get(error.field) {
                        page.document().focus(id);
                    }
                }
            });
        }

        if let Some(link) = forgot {
            mount.listen(link, EventType::Click, |page, event| {
                event.prevent_default();
                let answer = page.dialogs().prompt(RESET_PROMPT);
                if let Some(email) = answer.filter(|e| !e.is_empty()) {
                    page.dialogs().alert(&reset_confirmation(&email));
                }
            });
        }

        Ok(mount)
    }
}

/// Node ids of the fields inside one form.
#[derive(Debug, Default, Clone, Copy)]
struct FieldIds {
    username: Option<NodeId>,
    email: Option<NodeId>,
    password: Option<NodeId>,
    confirm_password: Option<NodeId>,
}

impl FieldIds {
    fn get(&self, field: AuthField) -> Option<NodeId> {
        match field {
            AuthField::Username => self.username,
            AuthField::Email => self.email,
            AuthField::Password => self.password,
            AuthField::ConfirmPassword => self.confirm_password,
        }
    }
}

// Missing fields read as empty.
fn read_fields(doc: &Document, form: NodeId) -> (AuthFields, FieldIds) {
    let find = |field: AuthField| {
        doc.descendants(form)
            .into_iter()
            .find(|&n| doc[n].id() == Some(field.element_id()))
    };
    let ids = FieldIds {
        username: find(AuthField::Username),
        email: find(AuthField::Email),
        password: find(AuthField::Password),
        confirm_password: find(AuthField::ConfirmPassword),
    };
    let value = |id: Option<NodeId>| id.map(|n| doc[n].value().to_string()).unwrap_or_default();
    let fields = AuthFields {
        username: value(ids.username),
        email: value(ids.email),
        password: value(ids.password),
        confirm_password: value(ids.confirm_password),
    };
    (fields, ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str, confirm: &str) -> AuthFields {
        AuthFields {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_login_requires_username_first() {
        let err = validate(AuthFormKind::Login, &AuthFields::default()).unwrap_err();
        assert_eq!(err.field, AuthField::Username);
        assert_eq!(err.to_string(), "Please enter your username");
    }

    #[test]
    fn test_login_blank_password() {
        let fields = AuthFields {
            username: "ada".into(),
            password: "   ".into(),
            ..AuthFields::default()
        };
        let err = validate(AuthFormKind::Login, &fields).unwrap_err();
        assert_eq!(err.field, AuthField::Password);
    }

    #[test]
    fn test_signup_order() {
        let cases = [
            (signup(" ", "", "", ""), AuthField::Username, "Please enter a username"),
            (signup("ada", "", "", ""), AuthField::Email, "Please enter your email"),
            (signup("ada", "a@b.c", "", ""), AuthField::Password, "Please enter a password"),
            (
                signup("ada", "a@b.c", "secret", "secreT"),
                AuthField::ConfirmPassword,
                "Passwords do not match",
            ),
        ];
        for (fields, field, message) in cases {
            let err = validate(AuthFormKind::Signup, &fields).unwrap_err();
            assert_eq!((err.field, err.message), (field, message));
        }
    }

    #[test]
    fn test_signup_password_compare_is_untrimmed() {
        let fields = signup("ada", "a@b.c", "secret ", "secret");
        assert!(validate(AuthFormKind::Signup, &fields).is_err());

        let fields = signup("ada", "a@b.c", "secret", "secret");
        assert!(validate(AuthFormKind::Signup, &fields).is_ok());
    }

    #[test]
    fn test_login_ignores_confirm_field() {
        let fields = AuthFields {
            username: "ada".into(),
            password: "pw".into(),
            confirm_password: "other".into(),
            ..AuthFields::default()
        };
        assert!(validate(AuthFormKind::Login, &fields).is_ok());
    }
}
