//! New-field form
//!
//! A farmer registers each plot they grow on before submitting detections
//! against it.

use crate::catalog::{CropKind, IrrigationType, SoilType};
use crate::error::{FieldInputError, FieldValue, FormErrors, FormField, Validate};
use crate::input;
use chrono::NaiveDate;
use serde::Serialize;

/// Fields of the new-field form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldFormField {
    Name,
    CropType,
    Area,
    PlantingDate,
    ExpectedHarvest,
    Location,
    SoilType,
    IrrigationType,
    Notes,
    /// Form-level problem not tied to one control
    Form,
}

impl FormField for FieldFormField {
    fn name(&self) -> &'static str {
        match self {
            FieldFormField::Name => "name",
            FieldFormField::CropType => "cropType",
            FieldFormField::Area => "area",
            FieldFormField::PlantingDate => "plantingDate",
            FieldFormField::ExpectedHarvest => "expectedHarvest",
            FieldFormField::Location => "location",
            FieldFormField::SoilType => "soilType",
            FieldFormField::IrrigationType => "irrigationType",
            FieldFormField::Notes => "notes",
            FieldFormField::Form => "form",
        }
    }
}

/// Field values as entered
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFieldDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<CropKind>,
    /// Acres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_harvest: Option<NaiveDate>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<SoilType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<IrrigationType>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Validate for NewFieldDraft {
    type Field = FieldFormField;

    fn validate(&self) -> FormErrors<FieldFormField> {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.insert(FieldFormField::Name, "Field name is required");
        }
        if self.crop_type.is_none() {
            errors.insert(FieldFormField::CropType, "Crop type is required");
        }
        if !self.area.is_some_and(|a| a > 0.0) {
            errors.insert(FieldFormField::Area, "Valid area is required");
        }
        if self.planting_date.is_none() {
            errors.insert(FieldFormField::PlantingDate, "Planting date is required");
        }
        if self.location.trim().is_empty() {
            errors.insert(FieldFormField::Location, "Location is required");
        }
        if self.soil_type.is_none() {
            errors.insert(FieldFormField::SoilType, "Soil type is required");
        }
        if self.irrigation_type.is_none() {
            errors.insert(FieldFormField::IrrigationType, "Irrigation type is required");
        }

        errors
    }
}

/// Field state store behind the new-field screen
#[derive(Debug, Clone, Default)]
pub struct FieldForm {
    draft: NewFieldDraft,
    errors: FormErrors<FieldFormField>,
}

impl FieldForm {
    /// Create empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current values
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &NewFieldDraft {
        &self.draft
    }

    /// Errors from the last validation, minus fields edited since
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FormErrors<FieldFormField> {
        &self.errors
    }

    /// Overwrite a field and clear its error
    ///
    /// # Errors
    /// Unparseable numbers, dates or catalog values leave the field unchanged.
    pub fn set_field(
        &mut self,
        field: FieldFormField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldInputError> {
        let value = value.into();
        let d = &mut self.draft;
        match field {
            FieldFormField::Name => d.name = value.into_text().unwrap_or_default(),
            FieldFormField::Location => d.location = value.into_text().unwrap_or_default(),
            FieldFormField::Notes => d.notes = value.into_text().unwrap_or_default(),
            FieldFormField::CropType => d.crop_type = input::option(field.name(), value)?,
            FieldFormField::Area => d.area = input::number(field.name(), value)?,
            FieldFormField::PlantingDate => d.planting_date = input::date(field.name(), value)?,
            FieldFormField::ExpectedHarvest => {
                d.expected_harvest = input::date(field.name(), value)?;
            }
            FieldFormField::SoilType => d.soil_type = input::option(field.name(), value)?,
            FieldFormField::IrrigationType => {
                d.irrigation_type = input::option(field.name(), value)?;
            }
            FieldFormField::Form => {
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
}
