//! Change-password form on the settings screen

use crate::error::{FieldInputError, FieldValue, FormErrors, FormField, Validate};
use crate::registration::{raw_text, PASSWORD_MIN_LEN};

/// Shown when a change-password submit fails validation
pub const CHECK_PASSWORD_FIELDS_MESSAGE: &str = "Please check your password fields";

/// Fields of the change-password form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangePasswordField {
    OldPassword,
    NewPassword,
    ConfirmPassword,
    /// Form-level problem not tied to one control
    Form,
}

impl FormField for ChangePasswordField {
    fn name(&self) -> &'static str {
        match self {
            ChangePasswordField::OldPassword => "oldPassword",
            ChangePasswordField::NewPassword => "newPassword",
            ChangePasswordField::ConfirmPassword => "confirmPassword",
            ChangePasswordField::Form => "form",
        }
    }
}

/// Password change as entered
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ChangePasswordDraft {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for ChangePasswordDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordDraft").finish_non_exhaustive()
    }
}

impl Validate for ChangePasswordDraft {
    type Field = ChangePasswordField;

    fn validate(&self) -> FormErrors<ChangePasswordField> {
        let mut errors = FormErrors::new();
        if self.old_password.is_empty() {
            errors.insert(
                ChangePasswordField::OldPassword,
                "Current password is required",
            );
        }
        if self.new_password.chars().count() < PASSWORD_MIN_LEN {
            errors.insert(
                ChangePasswordField::NewPassword,
                "New password must be at least 6 characters",
            );
        }
        if self.new_password != self.confirm_password {
            errors.insert(ChangePasswordField::ConfirmPassword, "Passwords don't match");
        }
        errors
    }
}

/// Field state store behind the change-password panel
#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    draft: ChangePasswordDraft,
    errors: FormErrors<ChangePasswordField>,
}

impl ChangePasswordForm {
    /// Create empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current values
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &ChangePasswordDraft {
        &self.draft
    }

    /// Errors from the last validation, minus fields edited since
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FormErrors<ChangePasswordField> {
        &self.errors
    }

    /// Overwrite a field and clear its error
    ///
    /// # Errors
    /// `Form` is not an input.
    pub fn set_field(
        &mut self,
        field: ChangePasswordField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldInputError> {
        let text = raw_text(value.into());
        let d = &mut self.draft;
        match field {
            ChangePasswordField::OldPassword => d.old_password = text,
            ChangePasswordField::NewPassword => d.new_password = text,
            ChangePasswordField::ConfirmPassword => d.confirm_password = text,
            ChangePasswordField::Form => {
                return Err(FieldInputError::NotAScalarField {
                    field: field.name(),
                });
            }
        }
        self.errors.clear(field);
        Ok(())
    }

    /// Re-run every rule and store the result; returns whether valid
    pub fn validate(&mut self) -> bool {
        self.errors = self.draft.validate();
        self.errors.is_empty()
    }

    /// Clear values and errors after a successful change
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
