//! # Error Types
//!
//! Domain-specific error types for compras-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  compras-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CnpjError        - CNPJ checksum failures (cnpj.rs)               │
//! │                                                                         │
//! │  compras-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  compras-backup errors (separate crate)                                │
//! │  └── BackupError      - Snapshot / restore failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → Terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, supplier, id)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::cnpj::CnpjError;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item cannot be found.
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Company cannot be found.
    #[error("Company not found: {0}")]
    CompanyNotFound(i64),

    /// Supplier cannot be found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(i64),

    /// An order was requested but no company is registered.
    ///
    /// ## When This Occurs
    /// - `order` command on an empty `company` table
    #[error("No company registered; add a company first")]
    NoDefaultCompany,

    /// The stored supplier-price text is not a JSON object of numbers.
    #[error("Invalid supplier-price map: {0}")]
    InvalidPriceMap(String),

    /// A single validation failure.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Several validation failures collected by a composite validator.
    #[error("Validation failed: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

impl CoreError {
    /// Wraps a composite validator's output, returning `Ok(())` when it is empty.
    ///
    /// ## Example
    /// ```rust
    /// use compras_core::{CoreError, Supplier};
    /// use compras_core::validation::validate_supplier;
    ///
    /// let supplier = Supplier::new("", "", "");
    /// let result = CoreError::check(validate_supplier(&supplier));
    /// assert!(matches!(result, Err(CoreError::Invalid(_))));
    /// ```
    pub fn check(errors: Vec<ValidationError>) -> CoreResult<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Invalid(errors))
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// They are always user-correctable and never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below the configured minimum.
    #[error("{field} must be greater than or equal to {min}")]
    BelowMinimum { field: String, min: f64 },

    /// Numeric value is above the configured maximum.
    #[error("{field} must be less than or equal to {max}")]
    AboveMaximum { field: String, max: f64 },

    /// Value must be positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Text could not be parsed as a real number.
    #[error("{field} must be a valid number")]
    NotANumber { field: String },

    /// Text could not be parsed as an integer.
    #[error("{field} must be a valid integer")]
    NotAnInteger { field: String },

    /// Invalid format (e.g., unknown status label).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// CNPJ failed the checksum rules.
    #[error(transparent)]
    Cnpj(#[from] CnpjError),

    /// An item has no supplier quote at all.
    #[error("At least one supplier with a price is required")]
    MissingSupplierPrice,

    /// A supplier key in the price map is blank.
    #[error("Supplier name cannot be empty")]
    BlankSupplier,

    /// A quoted price is zero or negative.
    #[error("Price for supplier {supplier} must be greater than zero")]
    InvalidPrice { supplier: String },

    /// A spreadsheet row is shorter than the expected layout.
    #[error("Row must have at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("Description");
        assert_eq!(err.to_string(), "Description is required");

        let err = ValidationError::TooShort {
            field: "Description".to_string(),
            min: 3,
        };
        assert_eq!(err.to_string(), "Description must be at least 3 characters");

        let err = ValidationError::InvalidPrice {
            supplier: "Fornecedor A".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Price for supplier Fornecedor A must be greater than zero"
        );
    }

    #[test]
    fn test_numeric_bounds_render_without_trailing_zeroes() {
        let err = ValidationError::BelowMinimum {
            field: "Quantity".to_string(),
            min: 0.01,
        };
        assert_eq!(err.to_string(), "Quantity must be greater than or equal to 0.01");
    }

    #[test]
    fn test_invalid_joins_messages() {
        let err = CoreError::Invalid(vec![
            ValidationError::required("Name"),
            ValidationError::MissingSupplierPrice,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Name is required; At least one supplier with a price is required"
        );
    }

    #[test]
    fn test_check_accepts_empty_list() {
        assert!(CoreError::check(Vec::new()).is_ok());
        assert!(CoreError::check(vec![ValidationError::BlankSupplier]).is_err());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("code").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
