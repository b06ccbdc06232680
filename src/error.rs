//! Error taxonomy for the formula engine
//!
//! Validation failures are collected per field and returned as a list.
//! Configuration errors describe broken formula tables and are raised as soon
//! as a table is built or looked up. Non-convergence is not an error at all:
//! it is encoded in the projection result.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What was wrong with a single input field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    /// NaN or infinite
    NotFinite,
    /// Monetary or count value below zero
    Negative,
    /// Outside the hard bounds of the clamp policy
    OutOfRange { min: f64, max: f64 },
    /// Must be strictly greater than zero
    NotPositive,
}

/// A validation failure attached to one named input field
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {kind}")]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::NotFinite => write!(f, "must be a finite number"),
            FieldErrorKind::Negative => write!(f, "must not be negative"),
            FieldErrorKind::OutOfRange { min, max } => {
                write!(f, "must be between {} and {}", min, max)
            }
            FieldErrorKind::NotPositive => write!(f, "must be greater than zero"),
        }
    }
}

/// Non-empty list of field-level validation failures
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {}", summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Names of the offending fields, in the order they were checked
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A formula table that cannot be used to compute anything
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{table} table is empty")]
    EmptyTable { table: &'static str },

    #[error("{table} table is not strictly increasing at row {row} ({previous} then {current})")]
    UnsortedTable {
        table: &'static str,
        row: usize,
        previous: f64,
        current: f64,
    },

    #[error("{table} table factor {value} at row {row} is outside 0..=100")]
    FactorOutOfRange {
        table: &'static str,
        row: usize,
        value: f64,
    },

    #[error("{table} table factors move away from the full value at row {row}")]
    NonMonotonicFactors { table: &'static str, row: usize },

    #[error("{table} table has invalid value {value} at row {row}")]
    InvalidValue {
        table: &'static str,
        row: usize,
        value: f64,
    },

    #[error("no {table} entry for plan year {year}")]
    MissingPlanYear { table: &'static str, year: i32 },

    #[error("no {table} entry effective on or before {year}")]
    NoEffectiveEntry { table: &'static str, year: i32 },

    #[error("no match schedule for plan variant {variant}")]
    MissingVariant { variant: String },

    #[error("match schedule for {variant} has conflicting automatic contribution rows")]
    ConflictingAutomatic { variant: String },

    #[error("clamp policy range for {field} is not usable ({min}..={max})")]
    InvalidPolicy {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Failure to read a table directory from disk
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error returned by the calculator facade
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("formula configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Message safe to show to an end user.
    ///
    /// Configuration errors are deployment defects and collapse to a generic
    /// message; validation errors keep their field detail.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Validation(errors) => summarize(&errors.0),
            EngineError::Config(_) => "This calculation is currently unavailable.".to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_message() {
        let err = FieldError::new("currentBalance", FieldErrorKind::Negative);
        assert_eq!(err.to_string(), "currentBalance: must not be negative");
    }

    #[test]
    fn test_validation_errors_summary() {
        let errors = ValidationErrors(vec![
            FieldError::new("currentAge", FieldErrorKind::NotFinite),
            FieldError::new(
                "withdrawalRatePct",
                FieldErrorKind::OutOfRange { min: 0.0, max: 100.0 },
            ),
        ]);
        assert_eq!(errors.fields(), vec!["currentAge", "withdrawalRatePct"]);
        assert_eq!(
            errors.to_string(),
            "invalid input: currentAge: must be a finite number; withdrawalRatePct: must be between 0 and 100"
        );
    }

    #[test]
    fn test_config_error_hides_detail_from_users() {
        let err = EngineError::from(ConfigError::MissingPlanYear {
            table: "contribution limits",
            year: 2031,
        });
        assert!(!err.is_validation());
        assert_eq!(err.user_message(), "This calculation is currently unavailable.");
        assert!(err.to_string().contains("2031"));
    }
}
