//! Farmer registration form
//!
//! Provides:
//! - `RegistrationDraft`: the values typed so far
//! - Validation of the draft into per-field messages
//! - `RegistrationForm`: the field state store the registration screen edits

use crate::catalog::{CropKind, IrrigationType, SoilType};
use crate::error::{FieldInputError, FieldValue, FormErrors, FormField, Validate};
use crate::input;
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted name (characters)
pub const NAME_MAX_LEN: usize = 100;
/// Shortest accepted password (characters)
pub const PASSWORD_MIN_LEN: usize = 6;
/// Longest accepted password (characters)
pub const PASSWORD_MAX_LEN: usize = 50;
/// Upper bound on years of farming experience
pub const MAX_EXPERIENCE_YEARS: i64 = 100;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

// Bangladeshi mobile: country or trunk prefix, operator digit 3-9, 8 subscriber digits
static BD_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+8801|8801|01)[3-9]\d{8}$").expect("phone pattern is valid"));

/// Check the `local@domain.tld` shape shared by the sign-up and sign-in forms
#[must_use]
pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Fields of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    Address,
    Photo,
    CropTypes,
    FarmSize,
    FarmingExperience,
    FarmLocation,
    SoilType,
    IrrigationType,
    /// Form-level problem not tied to one control
    Form,
}

impl FormField for RegistrationField {
    fn name(&self) -> &'static str {
        match self {
            RegistrationField::Name => "name",
            RegistrationField::Email => "email",
            RegistrationField::Password => "password",
            RegistrationField::ConfirmPassword => "confirmPassword",
            RegistrationField::Phone => "phone",
            RegistrationField::Address => "address",
            RegistrationField::Photo => "photo",
            RegistrationField::CropTypes => "cropTypes",
            RegistrationField::FarmSize => "farmSize",
            RegistrationField::FarmingExperience => "farmingExperience",
            RegistrationField::FarmLocation => "farmLocation",
            RegistrationField::SoilType => "soilType",
            RegistrationField::IrrigationType => "irrigationType",
            RegistrationField::Form => "form",
        }
    }
}

/// Registration values as entered
#[derive(Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Profile photo URL
    pub photo: Option<String>,
    /// Selected crops; insertion ordered, no duplicates
    pub crop_types: Vec<CropKind>,
    /// Acres
    pub farm_size: Option<f64>,
    /// Years
    pub farming_experience: Option<i64>,
    pub farm_location: Option<String>,
    pub soil_type: Option<SoilType>,
    pub irrigation_type: Option<IrrigationType>,
}

// Keep both passwords out of logs
impl std::fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("phone", &self.phone)
            .field("address", &self.address)
            .field("photo", &self.photo)
            .field("crop_types", &self.crop_types)
            .field("farm_size", &self.farm_size)
            .field("farming_experience", &self.farming_experience)
            .field("farm_location", &self.farm_location)
            .field("soil_type", &self.soil_type)
            .field("irrigation_type", &self.irrigation_type)
            .finish()
    }
}

impl RegistrationDraft {
    /// Display labels of the selected crops, in selection order
    #[must_use]
    pub fn crop_labels(&self) -> Vec<&'static str> {
        self.crop_types.iter().map(CropKind::label).collect()
    }
}

impl Validate for RegistrationDraft {
    type Field = RegistrationField;

    fn validate(&self) -> FormErrors<RegistrationField> {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.insert(RegistrationField::Name, "Name is required");
        } else if self.name.chars().count() > NAME_MAX_LEN {
            errors.insert(
                RegistrationField::Name,
                "Name must be less than 100 characters",
            );
        }

        if self.email.trim().is_empty() {
            errors.insert(RegistrationField::Email, "Email is required");
        } else if !is_email_shaped(self.email.trim()) {
            errors.insert(RegistrationField::Email, "Invalid email format");
        }

        let password_len = self.password.chars().count();
        if password_len == 0 {
            errors.insert(RegistrationField::Password, "Password is required");
        } else if password_len < PASSWORD_MIN_LEN {
            errors.insert(
                RegistrationField::Password,
                "Password must be at least 6 characters",
            );
        } else if password_len > PASSWORD_MAX_LEN {
            errors.insert(
                RegistrationField::Password,
                "Password must be less than 50 characters",
            );
        }

        if self.password != self.confirm_password {
            errors.insert(RegistrationField::ConfirmPassword, "Passwords don't match");
        }

        if let Some(phone) = present(self.phone.as_deref()) {
            if !BD_PHONE_RE.is_match(phone) {
                errors.insert(RegistrationField::Phone, "Invalid Bangladesh phone number");
            }
        }

        if let Some(photo) = present(self.photo.as_deref()) {
            if url::Url::parse(photo).is_err() {
                errors.insert(RegistrationField::Photo, "Invalid photo URL");
            }
        }

        if self.crop_types.is_empty() {
            errors.insert(
                RegistrationField::CropTypes,
                "At least one crop type is required",
            );
        }

        if let Some(size) = self.farm_size {
            if size.is_nan() || size <= 0.0 {
                errors.insert(RegistrationField::FarmSize, "Farm size must be positive");
            }
        }

        if let Some(years) = self.farming_experience {
            if years < 0 {
                errors.insert(
                    RegistrationField::FarmingExperience,
                    "Experience cannot be negative",
                );
            } else if years > MAX_EXPERIENCE_YEARS {
                errors.insert(
                    RegistrationField::FarmingExperience,
                    "Experience seems unrealistic",
                );
            }
        }

        errors
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Field state store behind the registration screen
///
/// Edits clear the edited field's error immediately; the full rule set only
/// runs again on `validate`.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    draft: RegistrationDraft,
    errors: FormErrors<RegistrationField>,
}

impl RegistrationForm {
    /// Create empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing values
    #[inline]
    #[must_use]
    pub fn from_draft(draft: RegistrationDraft) -> Self {
        Self {
            draft,
            errors: FormErrors::new(),
        }
    }

    /// Current values
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Errors from the last validation, minus fields edited since
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FormErrors<RegistrationField> {
        &self.errors
    }

    /// Overwrite a field
    ///
    /// Optional text fields treat blank input as absent. Numeric fields
    /// accept text or numbers; catalog fields accept their wire value.
    ///
    /// # Errors
    /// The field is left unchanged if the value cannot be represented, or if
    /// the field is `CropTypes`/`Form` (use `add_crop`/`remove_crop`).
    pub fn set_field(
        &mut self,
        field: RegistrationField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldInputError> {
        let value = value.into();
        let d = &mut self.draft;
        match field {
            RegistrationField::Name => d.name = value.into_text().unwrap_or_default(),
            RegistrationField::Email => {
                d.email = value.into_text().unwrap_or_default().trim().to_string();
            }
            RegistrationField::Password => d.password = raw_text(value),
            RegistrationField::ConfirmPassword => d.confirm_password = raw_text(value),
            RegistrationField::Phone => d.phone = value.into_text(),
            RegistrationField::Address => d.address = value.into_text(),
            RegistrationField::Photo => d.photo = value.into_text(),
            RegistrationField::FarmLocation => d.farm_location = value.into_text(),
            RegistrationField::FarmSize => d.farm_size = input::number(field.name(), value)?,
            RegistrationField::FarmingExperience => {
                d.farming_experience = input::integer(field.name(), value)?;
            }
            RegistrationField::SoilType => d.soil_type = input::option(field.name(), value)?,
            RegistrationField::IrrigationType => {
                d.irrigation_type = input::option(field.name(), value)?;
            }
            RegistrationField::CropTypes | RegistrationField::Form => {
                return Err(FieldInputError::NotAScalarField {
                    field: field.name(),
                });
            }
        }
        self.errors.clear(field);
        Ok(())
    }

    /// Append a crop unless already selected; returns whether it was added
    pub fn add_crop(&mut self, crop: CropKind) -> bool {
        if self.draft.crop_types.contains(&crop) {
            return false;
        }
        self.draft.crop_types.push(crop);
        self.errors.clear(RegistrationField::CropTypes);
        true
    }

    /// Remove the crop at `index`; out-of-range indices do nothing
    pub fn remove_crop(&mut self, index: usize) -> Option<CropKind> {
        if index < self.draft.crop_types.len() {
            Some(self.draft.crop_types.remove(index))
        } else {
            None
        }
    }

    /// Display labels of the selected crops
    #[inline]
    #[must_use]
    pub fn crop_labels(&self) -> Vec<&'static str> {
        self.draft.crop_labels()
    }

    /// Crops still available for selection
    #[must_use]
    pub fn available_crops(&self) -> Vec<CropKind> {
        CropKind::ALL
            .into_iter()
            .filter(|c| !self.draft.crop_types.contains(c))
            .collect()
    }

    /// Re-run every rule and store the result; returns whether valid
    pub fn validate(&mut self) -> bool {
        self.errors = self.draft.validate();
        self.errors.is_empty()
    }

    /// Replace the stored errors wholesale
    pub fn set_errors(&mut self, errors: FormErrors<RegistrationField>) {
        self.errors = errors;
    }

    /// Discard everything entered
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// Passwords keep surrounding whitespace
pub(crate) fn raw_text(value: FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s,
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Empty => String::new(),
    }
}
