//! # CNPJ
//!
//! Checksum validation for the Brazilian company tax identifier.
//!
//! ## Check Digit Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CNPJ: 11.222.333/0001-81                                               │
//! │                                                                         │
//! │  digits:   1  1  2  2  2  3  3  3  0  0  0  1 │ 8  1                    │
//! │  weights:  5  4  3  2  9  8  7  6  5  4  3  2 │     ← first check digit │
//! │  weights:  6  5  4  3  2  9  8  7  6  5  4  3   2   ← second check digit│
//! │                                                                         │
//! │  Weights cycle 2..9 reading right to left.                             │
//! │  sum % 11 < 2  → digit 0                                               │
//! │  otherwise     → digit 11 - (sum % 11)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Number of digits in a CNPJ.
pub const CNPJ_LEN: usize = 14;

/// Reasons a CNPJ is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CnpjError {
    #[error("CNPJ is required")]
    Empty,

    #[error("CNPJ must have 14 digits (found {found})")]
    WrongLength { found: usize },

    #[error("CNPJ is invalid: all digits are identical")]
    RepeatedDigits,

    #[error("CNPJ is invalid: check digits do not match")]
    CheckDigitMismatch,
}

/// Strips every non-digit character.
///
/// ```rust
/// use compras_core::cnpj::normalize_cnpj;
///
/// assert_eq!(normalize_cnpj("11.222.333/0001-81"), "11222333000181");
/// ```
pub fn normalize_cnpj(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Computes one check digit over `digits` using the weighted-sum modulo-11 rule.
fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(position, &digit)| u32::from(digit) * (2 + (position as u32 % 8)))
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

/// Computes both check digits for a 12-digit CNPJ base.
///
/// Returns `None` when `base` does not contain exactly 12 digits after
/// stripping punctuation.
///
/// ```rust
/// use compras_core::cnpj::cnpj_check_digits;
///
/// assert_eq!(cnpj_check_digits("11.222.333/0001"), Some([8, 1]));
/// ```
pub fn cnpj_check_digits(base: &str) -> Option<[u8; 2]> {
    let mut digits: Vec<u8> = base
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.len() != CNPJ_LEN - 2 {
        return None;
    }

    let first = check_digit(&digits);
    digits.push(first);
    let second = check_digit(&digits);

    Some([first, second])
}

/// Validates a CNPJ, accepting any punctuation around the digits.
///
/// ## Rules
/// 1. Non-digit characters are ignored
/// 2. Exactly 14 digits must remain
/// 3. All-identical digits (`00000000000000`, ...) are rejected
/// 4. Both check digits must match
///
/// ## Example
/// ```rust
/// use compras_core::cnpj::{validate_cnpj, CnpjError};
///
/// assert!(validate_cnpj("11.222.333/0001-81").is_ok());
/// assert_eq!(validate_cnpj("11.222.333/0001-82"), Err(CnpjError::CheckDigitMismatch));
/// assert_eq!(validate_cnpj("123"), Err(CnpjError::WrongLength { found: 3 }));
/// ```
pub fn validate_cnpj(value: &str) -> Result<(), CnpjError> {
    if value.trim().is_empty() {
        return Err(CnpjError::Empty);
    }

    let digits: Vec<u8> = value
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.len() != CNPJ_LEN {
        return Err(CnpjError::WrongLength {
            found: digits.len(),
        });
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return Err(CnpjError::RepeatedDigits);
    }

    let first = check_digit(&digits[..12]);
    if digits[12] != first {
        return Err(CnpjError::CheckDigitMismatch);
    }

    let second = check_digit(&digits[..13]);
    if digits[13] != second {
        return Err(CnpjError::CheckDigitMismatch);
    }

    Ok(())
}

/// Formats 14 digits as `XX.XXX.XXX/XXXX-XX`.
///
/// Input that does not reduce to 14 digits is returned unchanged.
pub fn format_cnpj(value: &str) -> String {
    let d = normalize_cnpj(value);
    if d.len() != CNPJ_LEN {
        return value.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &d[0..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn with_check_digits(base: &str) -> String {
        let [a, b] = cnpj_check_digits(base).unwrap();
        format!("{}{}{}", base, a, b)
    }

    #[test]
    fn test_known_valid_cnpjs() {
        assert!(validate_cnpj("11.222.333/0001-81").is_ok());
        assert!(validate_cnpj("11222333000181").is_ok());
        assert!(validate_cnpj("45.997.418/0001-53").is_ok());
        assert!(validate_cnpj("06.990.590/0001-23").is_ok());
    }

    #[test]
    fn test_rejects_wrong_length_and_repeated_digits() {
        assert_eq!(validate_cnpj(""), Err(CnpjError::Empty));
        assert_eq!(validate_cnpj("   "), Err(CnpjError::Empty));
        assert_eq!(
            validate_cnpj("1122233300018"),
            Err(CnpjError::WrongLength { found: 13 })
        );
        assert_eq!(
            validate_cnpj("abc"),
            Err(CnpjError::WrongLength { found: 0 })
        );
        assert_eq!(
            validate_cnpj("11.111.111/1111-11"),
            Err(CnpjError::RepeatedDigits)
        );
        assert_eq!(validate_cnpj("00000000000000"), Err(CnpjError::RepeatedDigits));
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("11.222.333/0001-81"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("123"), "123");
    }

    #[test]
    fn test_cnpj_check_digits_requires_twelve_digits() {
        assert_eq!(cnpj_check_digits("1122233300"), None);
        assert_eq!(cnpj_check_digits("112223330001"), Some([8, 1]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        // 12-digit bases that are not a single repeated digit
        fn base() -> impl Strategy<Value = String> {
            "[0-9]{12}".prop_filter("repeated digits", |s| {
                s.bytes().any(|b| b != s.as_bytes()[0])
            })
        }

        proptest! {
            #[test]
            fn prop_generated_cnpjs_are_accepted(base in base()) {
                let cnpj = with_check_digits(&base);
                prop_assert!(validate_cnpj(&cnpj).is_ok(), "rejected {}", cnpj);
                prop_assert!(validate_cnpj(&format_cnpj(&cnpj)).is_ok());
            }

            #[test]
            fn prop_check_digit_mutations_are_rejected(
                base in base(),
                position in 12usize..14,
                offset in 1u8..10,
            ) {
                let cnpj = with_check_digits(&base);
                let mut mutated = cnpj.into_bytes();
                mutated[position] = b'0' + (mutated[position] - b'0' + offset) % 10;
                let mutated = String::from_utf8(mutated).unwrap();

                prop_assert!(validate_cnpj(&mutated).is_err(), "accepted {}", mutated);
            }
        }
    }
}
