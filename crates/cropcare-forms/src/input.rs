//! Conversions from raw control values into typed draft fields

use crate::catalog::UnknownOption;
use crate::error::{FieldInputError, FieldValue};
use chrono::NaiveDate;
use std::str::FromStr;

/// Parse a numeric control; blank input is absent
pub(crate) fn number(field: &'static str, value: FieldValue) -> Result<Option<f64>, FieldInputError> {
    let parsed = match value {
        FieldValue::Empty => return Ok(None),
        FieldValue::Number(n) => n,
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| FieldInputError::NotANumber {
                    field,
                    value: s.clone(),
                })?
        }
    };

    if !parsed.is_finite() {
        return Err(FieldInputError::NotANumber {
            field,
            value: parsed.to_string(),
        });
    }
    Ok(Some(parsed))
}

/// Parse a whole-number control, truncating any fractional part
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn integer(field: &'static str, value: FieldValue) -> Result<Option<i64>, FieldInputError> {
    Ok(number(field, value)?.map(|n| n.trunc() as i64))
}

/// Parse a select control backed by a catalog
pub(crate) fn option<T>(field: &'static str, value: FieldValue) -> Result<Option<T>, FieldInputError>
where
    T: FromStr<Err = UnknownOption>,
{
    value
        .into_text()
        .map(|s| s.parse::<T>())
        .transpose()
        .map_err(|source| FieldInputError::InvalidOption { field, source })
}

/// Parse a date control (`YYYY-MM-DD`)
pub(crate) fn date(field: &'static str, value: FieldValue) -> Result<Option<NaiveDate>, FieldInputError> {
    match value.into_text() {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FieldInputError::InvalidDate { field, value: s }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SoilType;

    #[test]
    fn number_accepts_text_and_numbers() {
        assert_eq!(number("n", " 2.5 ".into()), Ok(Some(2.5)));
        assert_eq!(number("n", FieldValue::Number(4.0)), Ok(Some(4.0)));
        assert_eq!(number("n", "".into()), Ok(None));
    }

    #[test]
    fn number_rejects_garbage_and_non_finite() {
        assert!(matches!(
            number("n", "abc".into()),
            Err(FieldInputError::NotANumber { field: "n", .. })
        ));
        assert!(number("n", "NaN".into()).is_err());
        assert!(number("n", f64::INFINITY.into()).is_err());
    }

    #[test]
    fn integer_truncates() {
        assert_eq!(integer("i", "12.9".into()), Ok(Some(12)));
        assert_eq!(integer("i", "-3".into()), Ok(Some(-3)));
    }

    #[test]
    fn option_parses_catalog_values() {
        assert_eq!(option::<SoilType>("soil", "clay".into()), Ok(Some(SoilType::Clay)));
        assert_eq!(option::<SoilType>("soil", FieldValue::Empty), Ok(None));
        assert!(matches!(
            option::<SoilType>("soil", "gravel".into()),
            Err(FieldInputError::InvalidOption { field: "soil", .. })
        ));
    }

    #[test]
    fn date_requires_iso_format() {
        assert_eq!(
            date("d", "2024-03-01".into()),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1))
        );
        assert!(date("d", "01/03/2024".into()).is_err());
    }
}
