//! # Cart
//!
//! The shopping cart aggregate: active items, saved-for-later items, a
//! coupon discount, and a derived total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation               items                 saved_for_later          │
//! │  ─────────               ─────                 ───────────────          │
//! │                                                                         │
//! │  add_item ─────────────► push / qty += n                                │
//! │  remove_item ──────────► qty -= n / remove                              │
//! │  save_for_later ───────► remove ─────────────► push                     │
//! │  move_to_cart ─────────► push ◄─────────────── remove                   │
//! │  apply_coupon ─────────► (discount only)                                │
//! │  clear_cart ───────────► clear                 clear                    │
//! │                                                                         │
//! │  Every mutation ends in recalculate_total():                            │
//! │    total = round(Σ price × qty over items × (1 − discount))             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Membership
//! A name is in exactly one of {absent, items, saved_for_later} unless it
//! was re-added to `items` while parked (see [`Cart::move_to_cart`]).
//! Within each list names are unique.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};
use ts_rs::TS;
use uuid::Uuid;

use crate::coupon::{CouponResolver, CouponTable};
use crate::error::{CartError, CartResult, ValidationError};
use crate::money::{DiscountRate, Money};
use crate::types::{LineItem, NewItem};
use crate::validation;

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Names are unique within `items` and within `saved_for_later`
/// - Every quantity is > 0
/// - `total` is recomputed after every mutation and never set directly
/// - Only `items` contributes to the total
///
/// ## Ownership
/// A cart belongs to one shopping session. It is `Send + Sync` so a host
/// can move it between threads, but it does no locking of its own.
#[derive(Debug, Clone)]
pub struct Cart {
    id: String,
    items: Vec<LineItem>,
    saved_for_later: Vec<LineItem>,
    discount: DiscountRate,
    applied_coupon: Option<String>,
    total: Money,
    created_at: DateTime<Utc>,
    coupons: Arc<dyn CouponResolver>,
}

impl Cart {
    /// Creates a new empty cart using the built-in coupon table.
    pub fn new() -> Self {
        Self::with_shared_coupons(Arc::new(CouponTable::default()))
    }

    /// Creates a new empty cart that resolves coupons through `coupons`.
    pub fn with_coupons(coupons: impl CouponResolver + 'static) -> Self {
        Self::with_shared_coupons(Arc::new(coupons))
    }

    /// Creates a new empty cart sharing a resolver with other carts.
    pub fn with_shared_coupons(coupons: Arc<dyn CouponResolver>) -> Self {
        Cart {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            saved_for_later: Vec::new(),
            discount: DiscountRate::zero(),
            applied_coupon: None,
            total: Money::zero(),
            created_at: Utc::now(),
            coupons,
        }
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Adds `quantity` of an item, or raises the quantity of an existing
    /// entry with the same name.
    ///
    /// ## Behavior
    /// - Name already in `items`: quantity increases; the stored price and
    ///   attributes are kept and the new ones ignored
    /// - Otherwise: a new entry is appended to `items`
    ///
    /// ## Errors
    /// - [`CartError::InvalidItem`]: blank name, missing or negative price
    /// - [`CartError::InvalidQuantity`]: quantity <= 0, or the new quantity
    ///   would overflow
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{Cart, Money, NewItem};
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(NewItem::new("Apple", Money::from_cents(150)), 2)?;
    /// cart.add_item(NewItem::new("Apple", Money::from_cents(150)), 3)?;
    ///
    /// assert_eq!(cart.items()[0].quantity, 5);
    /// assert_eq!(cart.total(), Money::from_cents(750));
    /// # Ok::<(), storefront_core::CartError>(())
    /// ```
    pub fn add_item(&mut self, item: NewItem, quantity: i64) -> CartResult<()> {
        let line = item.into_line_item(quantity)?;
        debug!(name = %line.name, quantity = quantity, "Adding item to cart");

        match self.items.iter_mut().find(|i| i.name == line.name) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(quantity_overflow)?;
            }
            None => self.items.push(line),
        }

        self.recalculate_total();
        Ok(())
    }

    /// Adds a single unit of an item.
    pub fn add_one(&mut self, item: NewItem) -> CartResult<()> {
        self.add_item(item, 1)
    }

    /// Adds an item from an untyped JSON payload.
    ///
    /// `quantity` may be `null` (meaning 1) or a positive integral number.
    ///
    /// ## Example
    /// ```rust
    /// use serde_json::json;
    /// use storefront_core::Cart;
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item_json(&json!({ "name": "Apple", "price": 1.5 }), &json!(2))?;
    /// assert_eq!(cart.items()[0].price_cents, 150);
    ///
    /// assert!(cart.add_item_json(&json!(null), &json!(1)).is_err());
    /// assert!(cart.add_item_json(&json!({ "name": "Apple", "price": 1.5 }), &json!(1.5)).is_err());
    /// # Ok::<(), storefront_core::CartError>(())
    /// ```
    pub fn add_item_json(&mut self, item: &Value, quantity: &Value) -> CartResult<()> {
        let item = NewItem::from_json(item)?;
        // Item problems are reported before quantity problems.
        let name_and_price_ok = validation::validate_item_name(&item.name).is_ok()
            && item.price_cents.is_some_and(|c| c >= 0);
        let quantity = match validation::parse_quantity(quantity) {
            Ok(qty) => qty,
            Err(_) if !name_and_price_ok => 0,
            Err(e) => return Err(CartError::InvalidQuantity(e)),
        };
        self.add_item(item, quantity)
    }

    /// Removes `quantity` units of the named item, deleting the entry when
    /// it reaches zero.
    ///
    /// ## Errors
    /// Checked in this order:
    /// 1. [`CartError::ItemNotFound`]: name not in `items`
    /// 2. [`CartError::InvalidQuantity`]: quantity <= 0
    /// 3. [`CartError::InsufficientQuantity`]: quantity > held quantity
    pub fn remove_item(&mut self, name: &str, quantity: i64) -> CartResult<()> {
        let index = self
            .position(name)
            .ok_or_else(|| CartError::not_in_items(name))?;
        validation::validate_quantity(quantity).map_err(CartError::InvalidQuantity)?;

        let held = self.items[index].quantity;
        if held < quantity {
            return Err(CartError::InsufficientQuantity {
                name: name.to_string(),
                held,
                requested: quantity,
            });
        }

        debug!(name = %name, quantity = quantity, "Removing item from cart");
        if held == quantity {
            self.items.remove(index);
        } else {
            self.items[index].quantity = held - quantity;
        }

        self.recalculate_total();
        Ok(())
    }

    /// Removes a single unit of the named item.
    pub fn remove_one(&mut self, name: &str) -> CartResult<()> {
        self.remove_item(name, 1)
    }

    /// Moves the named entry, with its whole quantity, to the end of the
    /// saved-for-later list.
    ///
    /// The discount stays; the total drops by the entry's line total.
    pub fn save_for_later(&mut self, name: &str) -> CartResult<()> {
        let index = self
            .position(name)
            .ok_or_else(|| CartError::not_in_items(name))?;

        // Merge if the name is already parked, to keep names unique.
        let moved_quantity = self.items[index].quantity;
        let merge_into = self.saved_position(name);
        if let Some(parked) = merge_into {
            if self.saved_for_later[parked].quantity.checked_add(moved_quantity).is_none() {
                return Err(quantity_overflow());
            }
        }

        debug!(name = %name, "Saving item for later");
        let item = self.items.remove(index);
        match merge_into {
            Some(parked) => self.saved_for_later[parked].quantity += item.quantity,
            None => self.saved_for_later.push(item),
        }

        self.recalculate_total();
        Ok(())
    }

    /// Moves the named entry from saved-for-later to the end of `items`.
    ///
    /// If the same name was added to `items` while this entry was parked,
    /// the parked quantity is merged into the active entry (whose price
    /// wins, as with [`Cart::add_item`]).
    pub fn move_to_cart(&mut self, name: &str) -> CartResult<()> {
        let index = self
            .saved_position(name)
            .ok_or_else(|| CartError::not_in_saved(name))?;

        let moved_quantity = self.saved_for_later[index].quantity;
        let merge_into = self.position(name);
        if let Some(active) = merge_into {
            if self.items[active].quantity.checked_add(moved_quantity).is_none() {
                return Err(quantity_overflow());
            }
        }

        debug!(name = %name, "Moving saved item back to cart");
        let item = self.saved_for_later.remove(index);
        match merge_into {
            Some(active) => self.items[active].quantity += item.quantity,
            None => self.items.push(item),
        }

        self.recalculate_total();
        Ok(())
    }

    // =========================================================================
    // Discount & Reset
    // =========================================================================

    /// Applies a coupon code and returns the resulting discount.
    ///
    /// ## Behavior
    /// - Known code: discount set to its rate
    /// - Unknown code: discount reset to zero, replacing any earlier coupon
    ///
    /// Never fails. An unknown code is not an error.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{Cart, Money, NewItem};
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(NewItem::new("Apple", Money::from_cents(1000)), 2)?;
    ///
    /// cart.apply_coupon("SAVE10");
    /// assert_eq!(cart.total(), Money::from_cents(1800));
    ///
    /// cart.apply_coupon("INVALID");
    /// assert_eq!(cart.total(), Money::from_cents(2000));
    /// # Ok::<(), storefront_core::CartError>(())
    /// ```
    pub fn apply_coupon(&mut self, code: &str) -> DiscountRate {
        match self.coupons.resolve(code).filter(DiscountRate::is_valid) {
            Some(rate) => {
                debug!(code = %code, bps = rate.bps(), "Coupon applied");
                self.discount = rate;
                self.applied_coupon = Some(code.to_string());
            }
            None => {
                debug!(code = %code, "Unknown coupon, discount cleared");
                self.discount = DiscountRate::zero();
                self.applied_coupon = None;
            }
        }

        self.recalculate_total();
        self.discount
    }

    /// Empties both lists and drops the discount.
    ///
    /// The cart keeps its id; `created_at` restarts.
    pub fn clear_cart(&mut self) {
        debug!(cart_id = %self.id, "Clearing cart");
        self.items.clear();
        self.saved_for_later.clear();
        self.discount = DiscountRate::zero();
        self.applied_coupon = None;
        self.total = Money::zero();
        self.created_at = Utc::now();
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// The discounted total, in whole cents.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Sum of line totals over `items`, before discount.
    pub fn subtotal(&self) -> Money {
        let cents = self
            .items
            .iter()
            .fold(0_i64, |sum, item| sum.saturating_add(item.line_total().cents()));
        Money::from_cents(cents)
    }

    /// How much the coupon takes off (`subtotal - total`).
    pub fn discount_amount(&self) -> Money {
        self.subtotal() - self.total
    }

    /// Summary for API responses.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn recalculate_total(&mut self) {
        let subtotal = self.subtotal();
        self.total = subtotal.apply_discount(self.discount);
        trace!(subtotal = %subtotal, total = %self.total, "Cart total recalculated");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The cart's id (UUID v4).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The active discount rate.
    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    /// The coupon code behind the active discount.
    pub fn applied_coupon(&self) -> Option<&str> {
        self.applied_coupon.as_deref()
    }

    /// Returns a copy of the active items.
    ///
    /// Changing the returned vector does not change the cart.
    pub fn items(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Returns a copy of the saved-for-later items.
    pub fn saved_for_later(&self) -> Vec<LineItem> {
        self.saved_for_later.clone()
    }

    /// Iterates the active items without copying.
    pub fn iter_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Iterates the saved items without copying.
    pub fn iter_saved(&self) -> impl Iterator<Item = &LineItem> {
        self.saved_for_later.iter()
    }

    /// Looks up an active item by name.
    pub fn item(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Looks up a saved item by name.
    pub fn saved_item(&self, name: &str) -> Option<&LineItem> {
        self.saved_for_later.iter().find(|i| i.name == name)
    }

    /// Checks if the name is among the active items.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Checks if there are no active items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of distinct active items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all active items.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |sum, item| sum.saturating_add(item.quantity))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|i| i.name == name)
    }

    fn saved_position(&self, name: &str) -> Option<usize> {
        self.saved_for_later.iter().position(|i| i.name == name)
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Captures the persistent state of the cart.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            id: self.id.clone(),
            items: self.items.clone(),
            saved_for_later: self.saved_for_later.clone(),
            discount_bps: self.discount.bps(),
            applied_coupon: self.applied_coupon.clone(),
            created_at: self.created_at,
        }
    }

    /// Rebuilds a cart from a snapshot.
    ///
    /// The discount is taken from the snapshot as-is; the coupon is not
    /// looked up again, so a code withdrawn since keeps its rate on carts
    /// that already had it.
    ///
    /// ## Errors
    /// - [`CartError::InvalidItem`] / [`CartError::InvalidQuantity`]: an
    ///   entry breaks the line item rules
    /// - [`CartError::DuplicateItem`]: a name repeats within one list
    /// - [`CartError::InvalidDiscount`]: discount above 100%
    pub fn restore(snapshot: CartSnapshot, coupons: Arc<dyn CouponResolver>) -> CartResult<Cart> {
        let discount = DiscountRate::from_bps(snapshot.discount_bps);
        if !discount.is_valid() {
            return Err(CartError::InvalidDiscount {
                bps: snapshot.discount_bps,
            });
        }

        for list in [&snapshot.items, &snapshot.saved_for_later] {
            for (i, item) in list.iter().enumerate() {
                item.validate()?;
                if list[..i].iter().any(|other| other.name == item.name) {
                    return Err(CartError::DuplicateItem {
                        name: item.name.clone(),
                    });
                }
            }
        }

        let mut cart = Cart {
            id: snapshot.id,
            items: snapshot.items,
            saved_for_later: snapshot.saved_for_later,
            discount,
            applied_coupon: snapshot.applied_coupon.filter(|_| !discount.is_zero()),
            total: Money::zero(),
            created_at: snapshot.created_at,
            coupons,
        };
        cart.recalculate_total();
        debug!(cart_id = %cart.id, items = cart.items.len(), "Cart restored from snapshot");
        Ok(cart)
    }
}

/// Error for a merge whose quantity would not fit in an `i64`.
fn quantity_overflow() -> CartError {
    CartError::InvalidQuantity(ValidationError::Overflow {
        field: "quantity".to_string(),
    })
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The persistent state of a cart.
///
/// The total is not stored; [`Cart::restore`] recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub id: String,
    pub items: Vec<LineItem>,
    pub saved_for_later: Vec<LineItem>,
    pub discount_bps: u32,
    pub applied_coupon: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub saved_count: usize,
    pub subtotal_cents: i64,
    pub discount_bps: u32,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            saved_count: cart.saved_for_later.len(),
            subtotal_cents: cart.subtotal().cents(),
            discount_bps: cart.discount.bps(),
            discount_cents: cart.discount_amount().cents(),
            total_cents: cart.total.cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
