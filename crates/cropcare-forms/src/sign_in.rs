//! Sign-in form

use crate::error::{FieldInputError, FieldValue, FormErrors, FormField, Validate};
use crate::registration::is_email_shaped;

/// Fields of the sign-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignInField {
    Email,
    Password,
    /// Form-level problem not tied to one control
    Form,
}

impl FormField for SignInField {
    fn name(&self) -> &'static str {
        match self {
            SignInField::Email => "email",
            SignInField::Password => "password",
            SignInField::Form => "form",
        }
    }
}

/// Credentials as entered
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignInDraft {
    pub email: String,
    pub password: String,
}

impl SignInDraft {
    /// Create from credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Overwrite a field
    ///
    /// # Errors
    /// `Form` is not an input.
    pub fn set_field(
        &mut self,
        field: SignInField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldInputError> {
        let text = value.into().into_text().unwrap_or_default();
        match field {
            SignInField::Email => self.email = text.trim().to_string(),
            SignInField::Password => self.password = text,
            SignInField::Form => {
                return Err(FieldInputError::NotAScalarField {
                    field: field.name(),
                })
            }
        }
        Ok(())
    }
}

// Keep the password out of logs
impl std::fmt::Debug for SignInDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInDraft")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validate for SignInDraft {
    type Field = SignInField;

    fn validate(&self) -> FormErrors<SignInField> {
        let mut errors = FormErrors::new();
        if !is_email_shaped(self.email.trim()) {
            errors.insert(SignInField::Email, "Invalid email format");
        }
        if self.password.is_empty() {
            errors.insert(SignInField::Password, "Password is required");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_email_shape_and_password() {
        let errors = SignInDraft::default().validate();
        assert!(errors.contains(SignInField::Email));
        assert!(errors.contains(SignInField::Password));

        assert!(SignInDraft::new("farmer@example.com", "pw").validate().is_empty());
        assert!(SignInDraft::new(" farmer@example.com ", "pw").validate().is_empty());
    }

    #[test]
    fn email_is_trimmed_password_is_not() {
        let mut draft = SignInDraft::default();
        draft.set_field(SignInField::Email, "  farmer@example.com ").unwrap();
        draft.set_field(SignInField::Password, " pw ").unwrap();
        assert_eq!(draft.email, "farmer@example.com");
        assert_eq!(draft.password, " pw ");
    }

    #[test]
    fn debug_redacts_password() {
        let shown = format!("{:?}", SignInDraft::new("a@b.co", "hunter22"));
        assert!(!shown.contains("hunter22"));
    }
}
