//! # storefront-core: Shopping Cart Domain Logic
//!
//! This crate holds the cart and everything it needs: line items, integer
//! money, coupon lookup, validation, and typed errors. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Route Layer (host app)                       │   │
//! │  │    POST /cart/items ──► DELETE /cart/items ──► POST /coupon     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ serde_json::Value                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │   money   │  │  coupon   │  │ validation│  │   │
//! │  │   │   Cart    │  │   Money   │  │ Resolver  │  │   rules   │  │   │
//! │  │   │ LineItem  │  │ Discount  │  │  Table    │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                 storefront-config                               │   │
//! │  │        coupon table + logging from TOML / environment           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The cart aggregate, totals summary and snapshots
//! - [`types`] - Line items and the insertion payload
//! - [`money`] - Money in cents and discount rates in basis points
//! - [`coupon`] - Coupon code lookup
//! - [`error`] - Cart error types
//! - [`validation`] - Field rules and JSON parsing
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: Prices and totals are cents (i64); the discount
//!    is rounded once, on the total
//! 2. **Atomic Operations**: A failed operation leaves the cart untouched
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Money, NewItem};
//!
//! let mut cart = Cart::new();
//! cart.add_item(NewItem::new("Apple", Money::from_cents(1000)), 2)?;
//! cart.apply_coupon("SAVE10");
//!
//! // $20.00 less 10%
//! assert_eq!(cart.total(), Money::from_cents(1800));
//!
//! cart.save_for_later("Apple")?;
//! assert_eq!(cart.total(), Money::zero());
//! # Ok::<(), storefront_core::CartError>(())
//! ```
//!
//! ## Wire Format
//!
//! Item payloads may carry the price as a decimal `price` in major units
//! or as integer `priceCents`. Line items always serialize with
//! `priceCents` only, so `{ "name": "Apple", "price": 1.5 }` comes back as
//! `{ "name": "Apple", "priceCents": 150, "quantity": 2 }`. Failures
//! serialize as an [`ErrorBody`].
//!
//! ```rust
//! use serde_json::json;
//! use storefront_core::Cart;
//!
//! let mut cart = Cart::new();
//! cart.add_item_json(&json!({ "name": "Apple", "price": 1.5 }), &json!(2))?;
//! assert_eq!(
//!     serde_json::to_value(cart.items()).unwrap(),
//!     json!([{ "name": "Apple", "priceCents": 150, "quantity": 2 }])
//! );
//!
//! let err = cart.remove_item("Pear", 1).unwrap_err();
//! assert_eq!(serde_json::to_value(err.to_body()).unwrap()["code"], "ITEM_NOT_FOUND");
//! # Ok::<(), storefront_core::CartError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coupon;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Cart` instead of
// `use storefront_core::cart::Cart`

pub use cart::{Cart, CartSnapshot, CartTotals};
pub use coupon::{CouponResolver, CouponTable, FnResolver};
pub use error::{CartError, CartList, CartResult, ErrorBody, ErrorCode, ValidationError};
pub use money::{DiscountRate, Money};
pub use types::{Attributes, LineItem, NewItem};
