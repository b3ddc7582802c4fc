//! CropCare Forms - dashboard form state and validation
//!
//! Pure, synchronous logic behind the dashboard's input screens:
//! - Option catalogs (crops, soil, irrigation)
//! - Drafts and their validators (registration, sign-in, change password, new
//!   field, new detection)
//! - Field state stores that clear a field's error as soon as it is edited
//!
//! # Example
//!
//! ```rust
//! use cropcare_forms::{CropKind, RegistrationField, RegistrationForm};
//!
//! let mut form = RegistrationForm::new();
//! form.set_field(RegistrationField::Name, "Abdul").unwrap();
//! form.set_field(RegistrationField::Email, "abdul@x.com").unwrap();
//! form.set_field(RegistrationField::Password, "secret1").unwrap();
//! form.set_field(RegistrationField::ConfirmPassword, "secret1").unwrap();
//! form.add_crop(CropKind::Rice);
//!
//! assert!(form.validate());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod change_password;
pub mod detection;
pub mod error;
pub mod field;
mod input;
pub mod registration;
pub mod sign_in;

pub use catalog::{CropKind, IrrigationType, SoilType, UnknownOption};
pub use change_password::{ChangePasswordDraft, ChangePasswordField, ChangePasswordForm};
pub use detection::{
    DetectionDraft, DetectionField, DetectionForm, ImageRejected, ImageUpload, MAX_IMAGE_BYTES,
};
pub use error::{FieldInputError, FieldValue, FormErrors, FormField, Validate};
pub use field::{FieldForm, FieldFormField, NewFieldDraft};
pub use registration::{is_email_shaped, RegistrationDraft, RegistrationField, RegistrationForm};
pub use sign_in::{SignInDraft, SignInField};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the dashboard forms
    pub use crate::{
        CropKind, FieldValue, FormErrors, FormField, RegistrationDraft, RegistrationField,
        RegistrationForm, Validate,
    };
}
