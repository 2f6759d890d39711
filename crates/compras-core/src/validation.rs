//! # Validation Module
//!
//! Field, CNPJ and composite validators for Compras.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field validators                                             │
//! │  ├── validate_required / validate_length                               │
//! │  ├── validate_numeric / validate_integer (raw text → number)           │
//! │  └── validate_cnpj                                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Composite validators (return Vec<ValidationError>)           │
//! │  ├── validate_item_form      raw form strings                          │
//! │  ├── validate_item           an Item about to be written               │
//! │  ├── validate_company / validate_supplier                              │
//! │  └── validate_spreadsheet_row                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL constraints only                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field validators stop at the first problem. Composite validators collect
//! every problem so a form can show them all at once; an empty list means
//! the input is valid.
//!
//! ## Usage
//! ```rust
//! use compras_core::validation::{validate_numeric, ValidationConfig};
//!
//! let config = ValidationConfig::default();
//! let price = validate_numeric("R$ 5,50", "Price", Some(config.min_price), Some(config.max_price)).unwrap();
//! assert_eq!(price, 5.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::cnpj;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::prices::SupplierPrices;
use crate::types::{Company, Item, ItemStatus, Supplier};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Number of leading spreadsheet columns that carry item data.
pub const SPREADSHEET_MIN_COLUMNS: usize = 6;

// =============================================================================
// Configuration
// =============================================================================

/// Bounds applied by the item validators.
///
/// Loaded from the `[validation]` table of `compras.toml`; missing keys take
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_description_length: usize,
    pub max_description_length: usize,
    pub min_code_length: usize,
    pub max_code_length: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub min_quantity: f64,
    pub max_quantity: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            min_description_length: 3,
            max_description_length: 200,
            min_code_length: 1,
            max_code_length: 50,
            min_price: 0.01,
            max_price: 999_999.99,
            min_quantity: 0.01,
            max_quantity: 999_999.99,
        }
    }
}

impl ValidationConfig {
    /// Checks that every minimum is at most its maximum, and that prices,
    /// quantities and codes can never be zero or negative.
    pub fn validate(&self) -> CoreResult<()> {
        let mut errors = Vec::new();

        let mut require = |field: &str, ok: bool, reason: &str| {
            if !ok {
                errors.push(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: reason.to_string(),
                });
            }
        };

        require(
            "description length",
            self.min_description_length <= self.max_description_length,
            "minimum exceeds maximum",
        );
        require(
            "code length",
            self.min_code_length <= self.max_code_length,
            "minimum exceeds maximum",
        );
        require("price", self.min_price <= self.max_price, "minimum exceeds maximum");
        require(
            "quantity",
            self.min_quantity <= self.max_quantity,
            "minimum exceeds maximum",
        );

        require("code length", self.min_code_length >= 1, "minimum must be at least 1");
        require("price", self.min_price > 0.0, "minimum must be greater than zero");
        require("quantity", self.min_quantity > 0.0, "minimum must be greater than zero");

        CoreError::check(errors)
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Trimmed value must be non-empty.
///
/// ## Example
/// ```rust
/// use compras_core::validation::validate_required;
///
/// assert!(validate_required("Parafuso", "Description").is_ok());
/// assert!(validate_required("   ", "Description").is_err());
/// ```
pub fn validate_required(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Trimmed character count must lie in `[min, max]`.
///
/// An empty value passes; pair with [`validate_required`] when the field is
/// mandatory.
pub fn validate_length(value: &str, min: usize, max: usize, field: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Ok(());
    }

    let length = value.trim().chars().count();
    if length < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if length > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Parses a real number as typed by a Brazilian user.
///
/// Accepts an optional `R$` prefix and a comma or dot decimal separator.
/// Returns `None` for anything that is not a finite number.
///
/// ```rust
/// use compras_core::validation::parse_decimal;
///
/// assert_eq!(parse_decimal("R$ 12,90"), Some(12.9));
/// assert_eq!(parse_decimal("3.5"), Some(3.5));
/// assert_eq!(parse_decimal("abc"), None);
/// ```
pub fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned = value.trim().trim_start_matches("R$").trim().replace(',', ".");
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a real number and checks optional inclusive bounds.
///
/// ## Rules
/// - Empty text → `Required`
/// - Unparseable text → `NotANumber`
/// - Below `min` → `BelowMinimum`, above `max` → `AboveMaximum`
pub fn validate_numeric(
    value: &str,
    field: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> ValidationResult<f64> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    let number = parse_decimal(value).ok_or_else(|| ValidationError::NotANumber {
        field: field.to_string(),
    })?;

    if let Some(min) = min {
        if number < min {
            return Err(ValidationError::BelowMinimum {
                field: field.to_string(),
                min,
            });
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(ValidationError::AboveMaximum {
                field: field.to_string(),
                max,
            });
        }
    }

    Ok(number)
}

/// Parses an integer and checks optional inclusive bounds.
pub fn validate_integer(
    value: &str,
    field: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> ValidationResult<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    let number: i64 = value.parse().map_err(|_| ValidationError::NotAnInteger {
        field: field.to_string(),
    })?;

    if let Some(min) = min {
        if number < min {
            return Err(ValidationError::BelowMinimum {
                field: field.to_string(),
                min: min as f64,
            });
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(ValidationError::AboveMaximum {
                field: field.to_string(),
                max: max as f64,
            });
        }
    }

    Ok(number)
}

/// CNPJ checksum validation as a field validator.
///
/// See [`cnpj::validate_cnpj`] for the rules.
pub fn validate_cnpj(value: &str) -> ValidationResult<()> {
    cnpj::validate_cnpj(value).map_err(ValidationError::from)
}

/// Parses a status label or storage key.
pub fn parse_status(value: &str) -> ValidationResult<ItemStatus> {
    value.parse()
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Raw text of the item form (or of a spreadsheet row).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemForm {
    pub description: String,
    pub code: String,
    pub brand: String,
    pub supplier: String,
    pub price: String,
    pub quantity: String,
}

impl ItemForm {
    /// Validates the form and builds a new `To Buy` item from it.
    ///
    /// The brand defaults to `"N/A"` when blank.
    pub fn into_item(self, config: &ValidationConfig) -> CoreResult<Item> {
        CoreError::check(validate_item_form(&self, config))?;

        let price = validate_numeric(&self.price, "Price", None, None)?;
        let quantity = validate_numeric(&self.quantity, "Quantity", None, None)?;

        Ok(Item::new(
            self.description.trim(),
            self.code.trim(),
            self.brand,
            quantity,
            SupplierPrices::single(self.supplier.trim(), price),
        ))
    }
}

/// Validates raw item form input.
///
/// ## Rules
/// 1. Description and code are required and within the configured lengths
/// 2. Supplier is required
/// 3. Price and quantity parse as numbers within the configured bounds
pub fn validate_item_form(form: &ItemForm, config: &ValidationConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    push_err(&mut errors, validate_required(&form.description, "Description"));
    push_err(
        &mut errors,
        validate_length(
            &form.description,
            config.min_description_length,
            config.max_description_length,
            "Description",
        ),
    );

    push_err(&mut errors, validate_required(&form.code, "Code"));
    push_err(
        &mut errors,
        validate_length(&form.code, config.min_code_length, config.max_code_length, "Code"),
    );

    push_err(&mut errors, validate_required(&form.supplier, "Supplier"));

    push_err(
        &mut errors,
        validate_numeric(&form.price, "Price", Some(config.min_price), Some(config.max_price)),
    );
    push_err(
        &mut errors,
        validate_numeric(
            &form.quantity,
            "Quantity",
            Some(config.min_quantity),
            Some(config.max_quantity),
        ),
    );

    errors
}

/// Validates an item about to be written.
///
/// ## Rules
/// 1. Description and code are required and within the configured lengths
/// 2. Quantity is greater than zero and at most the configured maximum
/// 3. At least one supplier quote is present
/// 4. No supplier key is blank and every price is greater than zero
pub fn validate_item(item: &Item, config: &ValidationConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    push_err(&mut errors, validate_required(&item.description, "Description"));
    push_err(
        &mut errors,
        validate_length(
            &item.description,
            config.min_description_length,
            config.max_description_length,
            "Description",
        ),
    );
    push_err(&mut errors, validate_required(&item.code, "Code"));
    push_err(
        &mut errors,
        validate_length(&item.code, config.min_code_length, config.max_code_length, "Code"),
    );

    if !(item.quantity > 0.0) {
        errors.push(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    } else if item.quantity > config.max_quantity {
        errors.push(ValidationError::AboveMaximum {
            field: "Quantity".to_string(),
            max: config.max_quantity,
        });
    }

    if item.prices.is_empty() {
        errors.push(ValidationError::MissingSupplierPrice);
    }

    for (supplier, price) in item.prices.iter() {
        if supplier.trim().is_empty() {
            errors.push(ValidationError::BlankSupplier);
        }
        if !(price > 0.0) {
            errors.push(ValidationError::InvalidPrice {
                supplier: supplier.to_string(),
            });
        } else if price > config.max_price {
            errors.push(ValidationError::AboveMaximum {
                field: format!("Price for supplier {}", supplier),
                max: config.max_price,
            });
        }
    }

    errors
}

/// Validates a company: name, CNPJ checksum and buyer name.
pub fn validate_company(company: &Company) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    push_err(&mut errors, validate_required(&company.name, "Company name"));
    push_err(&mut errors, validate_cnpj(&company.cnpj));
    push_err(&mut errors, validate_required(&company.buyer_name, "Buyer name"));
    errors
}

/// Validates a supplier: name, CNPJ checksum and seller name.
pub fn validate_supplier(supplier: &Supplier) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    push_err(&mut errors, validate_required(&supplier.name, "Supplier name"));
    push_err(&mut errors, validate_cnpj(&supplier.cnpj));
    push_err(&mut errors, validate_required(&supplier.seller_name, "Seller name"));
    errors
}

/// Validates one spreadsheet row.
///
/// The first six columns are description, code, brand, supplier, price and
/// quantity; extra columns (such as status) are ignored.
///
/// ## Example
/// ```rust
/// use compras_core::validation::{validate_spreadsheet_row, ValidationConfig};
///
/// let config = ValidationConfig::default();
/// let row = ["PARAFUSO", "P001", "ABC", "Fornecedor A", "5,50", "10"];
/// assert!(validate_spreadsheet_row(&row, &config).is_empty());
/// assert_eq!(validate_spreadsheet_row(&row[..4], &config).len(), 1);
/// ```
pub fn validate_spreadsheet_row<S: AsRef<str>>(
    columns: &[S],
    config: &ValidationConfig,
) -> Vec<ValidationError> {
    if columns.len() < SPREADSHEET_MIN_COLUMNS {
        return vec![ValidationError::TooFewColumns {
            expected: SPREADSHEET_MIN_COLUMNS,
            found: columns.len(),
        }];
    }

    let column = |i: usize| columns[i].as_ref().to_string();
    let form = ItemForm {
        description: column(0),
        code: column(1),
        brand: column(2),
        supplier: column(3),
        price: column(4),
        quantity: column(5),
    };

    validate_item_form(&form, config)
}

fn push_err<T>(errors: &mut Vec<ValidationError>, result: ValidationResult<T>) {
    if let Err(err) = result {
        errors.push(err);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ItemForm {
        ItemForm {
            description: "Parafuso".to_string(),
            code: "P001".to_string(),
            brand: "ABC".to_string(),
            supplier: "Fornecedor A".to_string(),
            price: "5,50".to_string(),
            quantity: "10".to_string(),
        }
    }

    #[test]
    fn test_validate_length() {
        assert!(validate_length("", 3, 10, "Description").is_ok());
        assert!(validate_length("  ab  ", 3, 10, "Description").is_err());
        assert!(validate_length("abc", 3, 10, "Description").is_ok());
        assert!(validate_length("çãoé", 1, 4, "Description").is_ok());
        assert_eq!(
            validate_length("abcdef", 1, 5, "Code"),
            Err(ValidationError::TooLong {
                field: "Code".to_string(),
                max: 5
            })
        );
    }

    #[test]
    fn test_validate_numeric() {
        assert_eq!(validate_numeric("10,5", "Quantity", None, None), Ok(10.5));
        assert_eq!(validate_numeric(" R$0.01 ", "Price", Some(0.01), None), Ok(0.01));
        assert!(matches!(
            validate_numeric("", "Price", None, None),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_numeric("dez", "Price", None, None),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            validate_numeric("0", "Price", Some(0.01), None),
            Err(ValidationError::BelowMinimum { .. })
        ));
        assert!(matches!(
            validate_numeric("1000000", "Price", None, Some(999_999.99)),
            Err(ValidationError::AboveMaximum { .. })
        ));
        assert!(matches!(
            validate_numeric("inf", "Price", None, None),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_validate_integer() {
        assert_eq!(validate_integer(" 30 ", "max_backups", Some(1), None), Ok(30));
        assert!(matches!(
            validate_integer("2.5", "max_backups", None, None),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            validate_integer("0", "max_backups", Some(1), None),
            Err(ValidationError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn test_validate_item_form() {
        let config = ValidationConfig::default();
        assert!(validate_item_form(&form(), &config).is_empty());

        let mut bad = form();
        bad.description = "ab".to_string();
        bad.supplier = " ".to_string();
        bad.price = "0".to_string();
        let errors = validate_item_form(&bad, &config);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_item_form_into_item() {
        let item = form().into_item(&ValidationConfig::default()).unwrap();
        assert_eq!(item.description, "Parafuso");
        assert_eq!(item.quantity, 10.0);
        assert_eq!(item.prices.get("Fornecedor A"), Some(5.5));
        assert_eq!(item.status, ItemStatus::ToBuy);

        let mut bad = form();
        bad.quantity = "-1".to_string();
        assert!(matches!(
            bad.into_item(&ValidationConfig::default()),
            Err(CoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_item() {
        let config = ValidationConfig::default();
        let mut item = Item::new("Parafuso", "P001", "ABC", 10.0, SupplierPrices::single("A", 5.5));
        assert!(validate_item(&item, &config).is_empty());

        item.quantity = 0.0;
        item.prices = SupplierPrices::new();
        let errors = validate_item(&item, &config);
        assert!(errors.contains(&ValidationError::MustBePositive {
            field: "Quantity".to_string()
        }));
        assert!(errors.contains(&ValidationError::MissingSupplierPrice));

        item.quantity = 1.0;
        item.prices = SupplierPrices::from([(" ", 1.0), ("B", -2.0)]);
        let errors = validate_item(&item, &config);
        assert!(errors.contains(&ValidationError::BlankSupplier));
        assert!(errors.contains(&ValidationError::InvalidPrice {
            supplier: "B".to_string()
        }));
    }

    #[test]
    fn test_validate_company_and_supplier() {
        let company = Company::new("ACME", "11.222.333/0001-81", "Maria");
        assert!(validate_company(&company).is_empty());

        let company = Company::new("", "11.222.333/0001-82", "");
        let errors = validate_company(&company);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Cnpj(cnpj::CnpjError::CheckDigitMismatch)));

        let supplier = Supplier::new("Fornecedor A", "45.997.418/0001-53", "João");
        assert!(validate_supplier(&supplier).is_empty());
    }

    #[test]
    fn test_validate_spreadsheet_row() {
        let config = ValidationConfig::default();
        let row = vec!["PARAFUSO", "P001", "ABC", "Fornecedor A", "R$ 5,50", "10", "To Buy"];
        assert!(validate_spreadsheet_row(&row, &config).is_empty());

        let errors = validate_spreadsheet_row(&row[..5], &config);
        assert_eq!(
            errors,
            vec![ValidationError::TooFewColumns {
                expected: 6,
                found: 5
            }]
        );
    }

    #[test]
    fn test_config_validate() {
        assert!(ValidationConfig::default().validate().is_ok());

        let config = ValidationConfig {
            min_price: 10.0,
            max_price: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_non_positive_minimums() {
        let config = ValidationConfig {
            min_price: -100.0,
            min_quantity: -100.0,
            ..Default::default()
        };
        match config.validate() {
            Err(CoreError::Invalid(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation errors, got {:?}", other),
        }

        let config = ValidationConfig {
            min_price: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ValidationConfig {
            min_code_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
