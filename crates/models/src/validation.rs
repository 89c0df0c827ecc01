//! Field validators shared by the entity modules.

use crate::errors::ModelError;

/// Trimmed, non-blank text for required columns.
pub fn required_text(field: &str, value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(v.to_string())
}

/// Like [`required_text`], capped at `max` characters (the varchar width).
pub fn required_text_max(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = required_text(field, value)?;
    check_len(field, &v, max)?;
    Ok(v)
}

/// Like [`optional_text`], capped at `max` characters.
pub fn optional_text_max(field: &str, value: Option<String>, max: usize) -> Result<Option<String>, ModelError> {
    let v = optional_text(value);
    if let Some(s) = &v {
        check_len(field, s, max)?;
    }
    Ok(v)
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

/// Blank optional text collapses to `None`; forms submit empty strings for untouched inputs.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn non_negative_amount(field: &str, value: Option<f64>) -> Result<Option<f64>, ModelError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(ModelError::Validation(format!("{field} must be a non-negative amount")))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Acme  ").unwrap(), "Acme");
        assert!(matches!(required_text("name", "   "), Err(ModelError::Validation(_))));
    }

    #[test]
    fn length_caps_count_characters() {
        assert_eq!(required_text_max("name", &"é".repeat(255), 255).unwrap().chars().count(), 255);
        assert!(matches!(required_text_max("name", &"a".repeat(256), 255), Err(ModelError::Validation(_))));
        assert_eq!(optional_text_max("phone", Some("  ".into()), 4).unwrap(), None);
        assert!(optional_text_max("phone", Some("12345".into()), 4).is_err());
    }

    #[test]
    fn optional_text_collapses_blank() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" 555-0100 ".into())), Some("555-0100".into()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn amounts_must_be_finite_and_non_negative() {
        assert_eq!(non_negative_amount("price", Some(0.0)).unwrap(), Some(0.0));
        assert_eq!(non_negative_amount("price", None).unwrap(), None);
        assert!(non_negative_amount("price", Some(-1.5)).is_err());
        assert!(non_negative_amount("price", Some(f64::NAN)).is_err());
    }
}
