//! Error types for form state and validation
//!
//! Two kinds of failure live here:
//! - `FormErrors`: the per-field display messages a validator produces
//! - `FieldInputError`: a store refused a value it cannot represent

use crate::catalog::UnknownOption;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Closed set of fields belonging to one form
///
/// Implemented by a per-form enum with one variant per field plus a
/// form-level catch-all.
pub trait FormField: Copy + Ord + Debug {
    /// Name the UI binds the error message to
    fn name(&self) -> &'static str;
}

/// Anything that can be checked into a set of field errors
pub trait Validate {
    /// Field enum errors are keyed by
    type Field: FormField;

    /// Evaluate every rule; an empty result means valid
    fn validate(&self) -> FormErrors<Self::Field>;
}

/// Field -> message mapping produced by a validator
///
/// Holds at most one message per field. Iteration follows the field enum's
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors<F: FormField> {
    entries: BTreeMap<F, String>,
}

impl<F: FormField> FormErrors<F> {
    /// Create empty error set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record a message, replacing any previous one for the field
    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Message for a field
    #[inline]
    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    /// Whether a field has an error
    #[inline]
    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.entries.contains_key(&field)
    }

    /// Drop a field's error; returns whether one was recorded
    pub fn clear(&mut self, field: F) -> bool {
        self.entries.remove(&field).is_some()
    }

    /// No errors recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with errors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fields with errors, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.entries.keys().copied()
    }

    /// (field, message) pairs, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> + '_ {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl<F: FormField> Default for FormErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormField> Serialize for FormErrors<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field.name(), message)?;
        }
        map.end()
    }
}

/// Raw value coming from an input control
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text input, select value or date string
    Text(String),
    /// Numeric input already parsed by the control
    Number(f64),
    /// Control cleared
    Empty,
}

impl FieldValue {
    /// Text content with blank input folded into `None`
    pub(crate) fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Empty => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// A store could not accept a value for a field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldInputError {
    /// Numeric field given text that is not a number
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },

    /// Catalog field given a value outside the catalog
    #[error("{field}: {source}")]
    InvalidOption {
        field: &'static str,
        #[source]
        source: UnknownOption,
    },

    /// Date field given text that is not `YYYY-MM-DD`
    #[error("{field}: '{value}' is not a date")]
    InvalidDate { field: &'static str, value: String },

    /// Field has its own dedicated mutators
    #[error("{field} cannot be set directly")]
    NotAScalarField { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum TestField {
        First,
        Second,
    }

    impl FormField for TestField {
        fn name(&self) -> &'static str {
            match self {
                TestField::First => "first",
                TestField::Second => "second",
            }
        }
    }

    #[test]
    fn insert_replaces_previous_message() {
        let mut errors = FormErrors::new();
        errors.insert(TestField::First, "a");
        errors.insert(TestField::First, "b");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(TestField::First), Some("b"));
    }

    #[test]
    fn clear_reports_whether_present() {
        let mut errors = FormErrors::new();
        errors.insert(TestField::Second, "x");
        assert!(!errors.clear(TestField::First));
        assert!(errors.clear(TestField::Second));
        assert!(errors.is_empty());
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut errors = FormErrors::new();
        errors.insert(TestField::Second, "2");
        errors.insert(TestField::First, "1");
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec![TestField::First, TestField::Second]);
    }

    #[test]
    fn serializes_as_name_keyed_map() {
        let mut errors = FormErrors::new();
        errors.insert(TestField::Second, "bad");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "second": "bad" }));
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(FieldValue::from("   ").into_text(), None);
        assert_eq!(FieldValue::Empty.into_text(), None);
        assert_eq!(FieldValue::from("x").into_text(), Some("x".to_string()));
    }
}
