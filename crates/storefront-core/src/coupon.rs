//! # Coupons
//!
//! Coupon codes resolve to a [`DiscountRate`] through the [`CouponResolver`]
//! trait. The cart holds a resolver instead of a hardcoded table, so the
//! set of codes can come from configuration or a catalog service.
//!
//! ## Lookup Flow
//! ```text
//! apply_coupon("SAVE10")
//!      │
//!      ▼
//! resolver.resolve("SAVE10") ──► Some(1000 bps) ──► discount = 10%
//!      │
//!      └──────────────────────► None ──────────► discount = 0
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::DiscountRate;
use crate::validation::{self, ValidationResult};

/// Codes every default table knows: `(code, basis points)`.
pub const BUILTIN_COUPONS: &[(&str, u32)] = &[("SAVE10", 1000), ("SAVE20", 2000)];

// =============================================================================
// Resolver Trait
// =============================================================================

/// Looks up the discount for a coupon code.
///
/// Codes are matched exactly. Returning `None` means "unknown code", which
/// the cart treats as "no discount" rather than an error.
pub trait CouponResolver: fmt::Debug + Send + Sync {
    fn resolve(&self, code: &str) -> Option<DiscountRate>;
}

// =============================================================================
// Coupon Table
// =============================================================================

/// A static map of coupon code → discount rate.
///
/// ## Example
/// ```rust
/// use storefront_core::coupon::{CouponResolver, CouponTable};
/// use storefront_core::money::DiscountRate;
///
/// let table = CouponTable::default();
/// assert_eq!(table.resolve("SAVE10"), Some(DiscountRate::from_bps(1000)));
/// assert_eq!(table.resolve("save10"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponTable {
    codes: BTreeMap<String, DiscountRate>,
}

impl CouponTable {
    /// Creates a table with no codes.
    pub fn empty() -> Self {
        CouponTable {
            codes: BTreeMap::new(),
        }
    }

    /// Adds or replaces a code, returning the previous rate.
    ///
    /// ## Errors
    /// - Blank code, or code with surrounding whitespace
    /// - Rate above 100%
    pub fn insert(
        &mut self,
        code: impl Into<String>,
        rate: DiscountRate,
    ) -> ValidationResult<Option<DiscountRate>> {
        let code = code.into();
        validation::validate_coupon_code(&code)?;
        validation::validate_discount_bps(rate.bps())?;
        Ok(self.codes.insert(code, rate))
    }

    /// Removes a code, returning its rate.
    pub fn remove(&mut self, code: &str) -> Option<DiscountRate> {
        self.codes.remove(code)
    }

    /// Returns the rate for a code.
    pub fn get(&self, code: &str) -> Option<DiscountRate> {
        self.codes.get(code).copied()
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Checks if the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The largest discount any code grants (zero for an empty table).
    pub fn max_rate(&self) -> DiscountRate {
        self.codes.values().copied().max().unwrap_or_default()
    }

    /// Iterates codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DiscountRate)> {
        self.codes.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Checks every entry, for tables built by deserialization.
    pub fn validate(&self) -> ValidationResult<()> {
        for (code, rate) in &self.codes {
            validation::validate_coupon_code(code)?;
            validation::validate_discount_bps(rate.bps())?;
        }
        Ok(())
    }
}

impl Default for CouponTable {
    /// The built-in codes: `SAVE10` (10%) and `SAVE20` (20%).
    fn default() -> Self {
        let codes = BUILTIN_COUPONS
            .iter()
            .map(|(code, bps)| (code.to_string(), DiscountRate::from_bps(*bps)))
            .collect();
        CouponTable { codes }
    }
}

impl CouponResolver for CouponTable {
    fn resolve(&self, code: &str) -> Option<DiscountRate> {
        self.get(code)
    }
}

// =============================================================================
// Closure Resolver
// =============================================================================

/// Adapts a closure into a [`CouponResolver`].
///
/// ## Example
/// ```rust
/// use storefront_core::coupon::{CouponResolver, FnResolver};
/// use storefront_core::money::DiscountRate;
///
/// let staff = FnResolver::new(|code: &str| {
///     code.starts_with("STAFF-").then(|| DiscountRate::from_bps(2500))
/// });
/// assert_eq!(staff.resolve("STAFF-42"), Some(DiscountRate::from_bps(2500)));
/// ```
pub struct FnResolver<F>(F);

impl<F> FnResolver<F>
where
    F: Fn(&str) -> Option<DiscountRate> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnResolver(f)
    }
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnResolver")
    }
}

impl<F> CouponResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<DiscountRate> + Send + Sync,
{
    fn resolve(&self, code: &str) -> Option<DiscountRate> {
        (self.0)(code)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
