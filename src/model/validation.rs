//! Client-side payload checks run before anything is submitted upstream.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::amount::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "must be a valid email address")]
    pub message: String,
}

/// Inline field errors for a rejected payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "is required");
        }
    }

    pub fn require_opt(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.require(field, v);
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_email(value) {
            self.add(field, "must be a valid email address");
        }
    }

    pub fn non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.add(field, "must be zero or greater");
        }
    }

    pub fn percentage(&mut self, field: &str, value: f64) {
        if !(0.0..=100.0).contains(&value) {
            self.add(field, "must be between 0 and 100");
        }
    }

    /// A non-negative amount, written as a number or a numeric string.
    pub fn amount(&mut self, field: &str, value: &Amount) {
        match value.as_f64() {
            Some(v) => self.non_negative(field, v),
            None => self.add(field, "must be a number"),
        }
    }

    pub fn rate(&mut self, field: &str, value: &Amount) {
        match value.as_f64() {
            Some(v) => self.percentage(field, v),
            None => self.add(field, "must be a number"),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Payloads checked before submission.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
