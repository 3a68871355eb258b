//! # storefront-config: Runtime Configuration for Storefront
//!
//! Loads the coupon table and logging settings, and installs the tracing
//! subscriber. Everything that touches the file system or the environment
//! lives here so that `storefront-core` stays free of I/O.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Host Startup                                    │
//! │                                                                         │
//! │  StorefrontConfig::load_or_default(None)                                │
//! │       │                                                                 │
//! │       ├──► telemetry::init_tracing(&config.logging)                     │
//! │       │                                                                 │
//! │       └──► config.shared_coupons() ──► Cart::with_shared_coupons(..)    │
//! │                                        (one cart per session)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use storefront_config::StorefrontConfig;
//! use storefront_core::{Money, NewItem};
//!
//! let config = StorefrontConfig::from_toml_str("[coupons]\nWELCOME = 1500\n")?;
//!
//! let mut cart = config.new_cart();
//! cart.add_item(NewItem::new("Lamp", Money::from_cents(4000)), 1).unwrap();
//! cart.apply_coupon("WELCOME");
//! assert_eq!(cart.total(), Money::from_cents(3400));
//! # Ok::<(), storefront_config::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{LogFormat, LoggingConfig, StorefrontConfig};
pub use error::{ConfigError, ConfigResult};
pub use telemetry::init_tracing;
