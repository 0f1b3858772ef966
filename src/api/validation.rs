//! Input validation for API requests.
//!
//! Required-field checks collect every missing field before failing, so the
//! client sees `Missing required fields: a, b` rather than one field at a
//! time. Fields are reported in the order they are checked.

use super::error::ApiError;

#[derive(Debug, Default)]
pub struct FieldCheck {
    missing: Vec<&'static str>,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a required field. Absent, empty, and whitespace-only all
    /// count as missing; a placeholder is returned so callers can keep
    /// destructuring and fail once at `finish`.
    pub fn require(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(format!(
                "Missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

/// Normalize an optional field: empty and whitespace-only collapse to `None`
/// so they persist as SQL NULL instead of empty strings.
pub fn normalized(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
