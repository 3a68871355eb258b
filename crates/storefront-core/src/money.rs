//! # Money Module
//!
//! Provides the `Money` type for monetary values and `DiscountRate` for
//! coupon percentages.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    1.1 × 3 = 3.3000000000000003  ❌ WRONG!                              │
//! │                                                                         │
//! │  A cart total therefore has to be re-rounded every time it is read.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    110 cents × 3 = 330 cents                                           │
//! │    Discounts round once, to the nearest cent, when applied             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(1000); // $10.00
//! let subtotal = price * 2;            // $20.00
//!
//! let total = subtotal.apply_discount(DiscountRate::from_bps(1000)); // 10% off
//! assert_eq!(total.cents(), 1800);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `subtotal - total` stay representable
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare integer** of cents
///
/// ## Where Money is Used
/// ```text
/// LineItem.price_cents ──► LineItem::line_total() ──► Cart subtotal
///                                                         │
///                                     DiscountRate ───────┤
///                                                         ▼
///                                                    Cart total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount in major units ("1.5" = $1.50).
    ///
    /// Digits past the second decimal place round half away from zero.
    /// Exponent notation is accepted for values JSON serializers emit that
    /// way. Returns `None` for malformed, non-finite, or out-of-range input.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::parse_major("1.5"), Some(Money::from_cents(150)));
    /// assert_eq!(Money::parse_major("10"), Some(Money::from_cents(1000)));
    /// assert_eq!(Money::parse_major("0.125"), Some(Money::from_cents(13)));
    /// assert_eq!(Money::parse_major("abc"), None);
    /// ```
    pub fn parse_major(input: &str) -> Option<Money> {
        let input = input.trim();
        if input.contains(['e', 'E']) {
            return Self::parse_major_float(input);
        }

        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };

        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let cents = whole
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths)?
            .checked_add(i64::from(round_up))?;

        Some(Money(if negative { -cents } else { cents }))
    }

    fn parse_major_float(input: &str) -> Option<Money> {
        let value: f64 = input.parse().ok()?;
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount in major units as a float, for display only.
    ///
    /// The value is already rounded to two decimal places.
    #[inline]
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_mul_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the amount left after taking `rate` off, rounded to the
    /// nearest cent (half away from zero).
    ///
    /// Computed as `amount × (10000 − bps) / 10000` in one step, so the
    /// result equals the rounded discounted total rather than the amount
    /// minus a separately rounded discount.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(2000); // $20.00
    /// let total = subtotal.apply_discount(DiscountRate::from_bps(1000)); // 10%
    /// assert_eq!(total.cents(), 1800); // $18.00
    ///
    /// // 5 cents at 10% off = 4.5 cents → 5 cents
    /// let tiny = Money::from_cents(5).apply_discount(DiscountRate::from_bps(1000));
    /// assert_eq!(tiny.cents(), 5);
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        let keep = i128::from(DiscountRate::MAX_BPS - rate.bps().min(DiscountRate::MAX_BPS));
        // i128 keeps `cents × 10000` from overflowing
        let scaled = i128::from(self.0) * keep;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Front-ends format for display
/// themselves to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the `SAVE10` coupon)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// 100%, the largest meaningful discount.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (`12.5` = 12.5%).
    ///
    /// Returns `None` unless `0 <= pct <= 100`.
    pub fn from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return None;
        }
        Some(DiscountRate((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks the rate is at most 100%.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 <= Self::MAX_BPS
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_parse_major() {
        assert_eq!(Money::parse_major("1.5"), Some(Money::from_cents(150)));
        assert_eq!(Money::parse_major("10"), Some(Money::from_cents(1000)));
        assert_eq!(Money::parse_major("0.99"), Some(Money::from_cents(99)));
        assert_eq!(Money::parse_major(".5"), Some(Money::from_cents(50)));
        assert_eq!(Money::parse_major("-2.25"), Some(Money::from_cents(-225)));
        assert_eq!(Money::parse_major("1e2"), Some(Money::from_cents(10000)));

        assert_eq!(Money::parse_major(""), None);
        assert_eq!(Money::parse_major("."), None);
        assert_eq!(Money::parse_major("1.2.3"), None);
        assert_eq!(Money::parse_major("ten"), None);
        assert_eq!(Money::parse_major("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_major_rounds_half_away_from_zero() {
        assert_eq!(Money::parse_major("0.125"), Some(Money::from_cents(13)));
        assert_eq!(Money::parse_major("0.1249"), Some(Money::from_cents(12)));
        assert_eq!(Money::parse_major("-0.125"), Some(Money::from_cents(-13)));
    }

    #[test]
    fn test_apply_discount() {
        let subtotal = Money::from_cents(2000);
        assert_eq!(subtotal.apply_discount(DiscountRate::from_bps(1000)).cents(), 1800);
        assert_eq!(subtotal.apply_discount(DiscountRate::from_bps(2000)).cents(), 1600);
        assert_eq!(subtotal.apply_discount(DiscountRate::zero()).cents(), 2000);
        assert_eq!(subtotal.apply_discount(DiscountRate::from_bps(10_000)).cents(), 0);
    }

    #[test]
    fn test_apply_discount_rounds_to_nearest_cent() {
        // $0.99 at 10% off = 89.1 cents → 89
        let total = Money::from_cents(99).apply_discount(DiscountRate::from_bps(1000));
        assert_eq!(total.cents(), 89);

        // $0.15 at 10% off = 13.5 cents → 14
        let total = Money::from_cents(15).apply_discount(DiscountRate::from_bps(1000));
        assert_eq!(total.cents(), 14);
    }

    #[test]
    fn test_checked_mul_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_cents(897)));
        assert_eq!(Money::from_cents(2).checked_mul_quantity(i64::MAX), None);
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        assert_eq!(DiscountRate::from_percentage(10.0), Some(DiscountRate::from_bps(1000)));
        assert_eq!(DiscountRate::from_percentage(12.5), Some(DiscountRate::from_bps(1250)));
        assert_eq!(DiscountRate::from_percentage(100.0), Some(DiscountRate::from_bps(10_000)));
        assert_eq!(DiscountRate::from_percentage(-1.0), None);
        assert_eq!(DiscountRate::from_percentage(100.5), None);
        assert_eq!(DiscountRate::from_percentage(f64::NAN), None);
    }

    #[test]
    fn test_discount_rate_checks() {
        assert!(DiscountRate::default().is_zero());
        assert!(DiscountRate::from_bps(10_000).is_valid());
        assert!(!DiscountRate::from_bps(10_001).is_valid());
        assert_eq!(DiscountRate::from_bps(1000).to_string(), "10%");
    }
}
