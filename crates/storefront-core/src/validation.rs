//! # Validation Module
//!
//! Input validation utilities for cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Route layer (out of tree)                                    │
//! │  └── Body parsing into serde_json::Value                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── JSON shape checks (parse_quantity, parse_price)                   │
//! │  └── Field rules (name, price, quantity, discount, coupon code)        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart                                                         │
//! │  └── Membership rules (not found, insufficient quantity)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{parse_quantity, validate_quantity};
//! use serde_json::json;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert_eq!(parse_quantity(&json!(3)), Ok(3));
//! assert!(parse_quantity(&json!(1.5)).is_err());
//! ```

use serde_json::Value;

use crate::error::ValidationError;
use crate::money::{DiscountRate, Money};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty or whitespace only
///
/// The name is not trimmed for storage; list lookups use the exact string.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(())
}

/// Validates a coupon code before it is added to a coupon table.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - Must not have leading or trailing whitespace (lookups are exact)
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.trim() != code {
        return Err(ValidationError::InvalidType {
            field: "coupon code".to_string(),
            expected: "free of surrounding whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## User Workflow
/// ```text
/// add_item(apple, 0)
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      └── qty <= 0? → Error: "quantity must be a positive integer"
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > DiscountRate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::from(DiscountRate::MAX_BPS),
        });
    }

    Ok(())
}

// =============================================================================
// JSON Validators
// =============================================================================

/// Parses a quantity from an untyped JSON value.
///
/// ## Rules
/// - `null` means the default quantity of 1
/// - Must be a JSON number with no fractional part
/// - Must be positive
///
/// ## Example
/// ```rust
/// use storefront_core::validation::parse_quantity;
/// use serde_json::{json, Value};
///
/// assert_eq!(parse_quantity(&Value::Null), Ok(1));
/// assert_eq!(parse_quantity(&json!(2.0)), Ok(2));
/// assert!(parse_quantity(&json!(-1)).is_err());
/// assert!(parse_quantity(&json!("2")).is_err());
/// ```
pub fn parse_quantity(value: &Value) -> ValidationResult<i64> {
    let field = || "quantity".to_string();

    let qty = match value {
        Value::Null => return Ok(1),
        Value::Number(n) => match n.as_i64() {
            Some(qty) => qty,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                Some(f) if f.fract() == 0.0 => return Err(ValidationError::Overflow { field: field() }),
                _ => return Err(ValidationError::MustBeInteger { field: field() }),
            },
        },
        _ => {
            return Err(ValidationError::InvalidType {
                field: field(),
                expected: "a number".to_string(),
            })
        }
    };

    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses a decimal price in major units (`1.5` = 150 cents).
///
/// Rounds to the nearest cent, half away from zero.
pub fn parse_price(value: &Value) -> ValidationResult<i64> {
    match value {
        Value::Number(n) => Money::parse_major(&n.to_string())
            .map(|money| money.cents())
            .ok_or_else(|| ValidationError::Overflow {
                field: "price".to_string(),
            }),
        _ => Err(ValidationError::InvalidType {
            field: "price".to_string(),
            expected: "a number".to_string(),
        }),
    }
}

/// Parses a price given directly in cents.
pub fn parse_price_cents(value: &Value) -> ValidationResult<i64> {
    match value.as_i64() {
        Some(cents) => Ok(cents),
        None => Err(ValidationError::InvalidType {
            field: "priceCents".to_string(),
            expected: "an integer".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Apple").is_ok());
        assert!(validate_item_name(" Apple ").is_ok());

        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("SAVE10").is_ok());
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code(" SAVE10").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert_eq!(
            validate_price_cents(-100),
            Err(ValidationError::Negative {
                field: "price".to_string()
            })
        );
    }

    #[test]
    fn test_validate_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(2000).is_ok());
        assert!(validate_discount_bps(10000).is_ok());
        assert!(validate_discount_bps(10001).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&Value::Null), Ok(1));
        assert_eq!(parse_quantity(&json!(3)), Ok(3));
        assert_eq!(parse_quantity(&json!(4.0)), Ok(4));

        assert!(matches!(
            parse_quantity(&json!(1.5)),
            Err(ValidationError::MustBeInteger { .. })
        ));
        assert!(matches!(
            parse_quantity(&json!(-1)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity(&json!(0)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity(&json!("3")),
            Err(ValidationError::InvalidType { .. })
        ));
        assert!(matches!(
            parse_quantity(&json!(1e30)),
            Err(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&json!(1.5)), Ok(150));
        assert_eq!(parse_price(&json!(10)), Ok(1000));
        assert_eq!(parse_price(&json!(0.1)), Ok(10));
        assert!(parse_price(&json!("1.5")).is_err());
        assert!(parse_price(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_price_cents() {
        assert_eq!(parse_price_cents(&json!(150)), Ok(150));
        assert!(parse_price_cents(&json!(1.5)).is_err());
    }
}
