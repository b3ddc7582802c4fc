//! Detection submission form
//!
//! Collects a crop photo, the field it was taken in and the crop shown.
//! Image selection is gated before it ever reaches the draft.

use crate::catalog::CropKind;
use crate::error::{FieldInputError, FieldValue, FormErrors, FormField, Validate};
use crate::input;

/// Largest accepted image (5 MiB)
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Fields of the detection form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetectionField {
    Image,
    FieldId,
    CropType,
    Notes,
    /// Form-level problem not tied to one control
    Form,
}

impl FormField for DetectionField {
    fn name(&self) -> &'static str {
        match self {
            DetectionField::Image => "image",
            DetectionField::FieldId => "fieldId",
            DetectionField::CropType => "cropType",
            DetectionField::Notes => "notes",
            DetectionField::Form => "form",
        }
    }
}

/// Metadata of a picked image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type reported by the picker
    pub content_type: String,
    pub size_bytes: u64,
}

impl ImageUpload {
    /// Create upload metadata
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
        }
    }
}

/// Why an image selection was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageRejected {
    /// Over `MAX_IMAGE_BYTES`
    #[error("Please select an image under 5MB")]
    TooLarge { size_bytes: u64 },

    /// Content type is not `image/*`
    #[error("Please select a valid image file")]
    NotAnImage { content_type: String },
}

/// Detection values as entered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionDraft {
    pub field_id: String,
    pub crop_type: Option<CropKind>,
    pub notes: String,
    pub image: Option<ImageUpload>,
}

impl Validate for DetectionDraft {
    type Field = DetectionField;

    fn validate(&self) -> FormErrors<DetectionField> {
        let mut errors = FormErrors::new();

        if self.image.is_none() {
            errors.insert(DetectionField::Image, "Please select an image");
        }
        if self.field_id.trim().is_empty() {
            errors.insert(DetectionField::FieldId, "Please select a field");
        }
        if self.crop_type.is_none() {
            errors.insert(DetectionField::CropType, "Please select a crop type");
        }

        errors
    }
}

/// Field state store behind the new-detection screen
#[derive(Debug, Clone, Default)]
pub struct DetectionForm {
    draft: DetectionDraft,
    errors: FormErrors<DetectionField>,
}

impl DetectionForm {
    /// Create empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current values
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &DetectionDraft {
        &self.draft
    }

    /// Errors from the last validation, minus fields edited since
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FormErrors<DetectionField> {
        &self.errors
    }

    /// Overwrite a text or select field and clear its error
    ///
    /// # Errors
    /// `Image` must go through `select_image`; unknown crops are refused.
    pub fn set_field(
        &mut self,
        field: DetectionField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldInputError> {
        let value = value.into();
        match field {
            DetectionField::FieldId => self.draft.field_id = value.into_text().unwrap_or_default(),
            DetectionField::Notes => self.draft.notes = value.into_text().unwrap_or_default(),
            DetectionField::CropType => {
                self.draft.crop_type = input::option(field.name(), value)?;
            }
            DetectionField::Image | DetectionField::Form => {
                return Err(FieldInputError::NotAScalarField {
                    field: field.name(),
                });
            }
        }
        self.errors.clear(field);
        Ok(())
    }

    /// Accept an image if it passes the size and type gate
    ///
    /// # Errors
    /// A rejected image leaves any previous selection in place.
    pub fn select_image(&mut self, image: ImageUpload) -> Result<(), ImageRejected> {
        if image.size_bytes > MAX_IMAGE_BYTES {
            return Err(ImageRejected::TooLarge {
                size_bytes: image.size_bytes,
            });
        }
        if !image.content_type.starts_with("image/") {
            return Err(ImageRejected::NotAnImage {
                content_type: image.content_type,
            });
        }
        self.draft.image = Some(image);
        self.errors.clear(DetectionField::Image);
        Ok(())
    }

    /// Drop the selected image
    pub fn remove_image(&mut self) -> Option<ImageUpload> {
        self.draft.image.take()
    }

    /// Re-run every rule and store the result; returns whether valid
    pub fn validate(&mut self) -> bool {
        self.errors = self.draft.validate();
        self.errors.is_empty()
    }
}
