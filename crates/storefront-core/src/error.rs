//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CartError        - Cart operation failures                        │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  storefront-config errors (separate crate)                             │
//! │  └── ConfigError      - Config file / environment failures             │
//! │                                                                         │
//! │  Host errors (route layer, out of tree)                                │
//! │  └── maps ErrorCode + http_status() to a response body                 │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → ErrorCode → HTTP response         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, quantities)
//! 3. Errors are enum variants, never String
//! 4. A failed operation leaves the cart exactly as it was

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Cart List
// =============================================================================

/// Which of the two cart lists an operation looked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CartList {
    /// The active items that make up the total.
    Items,
    /// Items parked with "save for later".
    SavedForLater,
}

impl std::fmt::Display for CartList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartList::Items => write!(f, "cart"),
            CartList::SavedForLater => write!(f, "saved items"),
        }
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Cart operation errors.
///
/// Every variant is raised synchronously, before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The item payload is unusable.
    ///
    /// ## When This Occurs
    /// - Item is missing (`null`) or not a JSON object
    /// - `name` is missing or blank
    /// - `price` is missing or negative
    #[error("Invalid item: {0}")]
    InvalidItem(ValidationError),

    /// Quantity is not a positive integer (or would overflow).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(ValidationError),

    /// No entry with this name in the list operated on.
    #[error("Item not found in {list}: {name}")]
    ItemNotFound { name: String, list: CartList },

    /// `remove_item` asked for more than the cart holds.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Apple x3
    ///      │
    ///      ▼
    /// remove_item("Apple", 4)
    ///      │
    ///      ▼
    /// InsufficientQuantity { name: "Apple", held: 3, requested: 4 }
    ///      │
    ///      ▼
    /// Cart still holds Apple x3
    /// ```
    #[error("Cannot remove more items than exist in cart: {name} has {held}, requested {requested}")]
    InsufficientQuantity {
        name: String,
        held: i64,
        requested: i64,
    },

    /// A restored snapshot lists the same name twice in one list.
    #[error("Duplicate item in snapshot: {name}")]
    DuplicateItem { name: String },

    /// A restored snapshot carries a discount above 100%.
    #[error("Invalid discount: {bps} basis points")]
    InvalidDiscount { bps: u32 },
}

impl CartError {
    /// Shorthand for a not-found error on the active list.
    pub(crate) fn not_in_items(name: &str) -> Self {
        CartError::ItemNotFound {
            name: name.to_string(),
            list: CartList::Items,
        }
    }

    /// Shorthand for a not-found error on the saved list.
    pub(crate) fn not_in_saved(name: &str) -> Self {
        CartError::ItemNotFound {
            name: name.to_string(),
            list: CartList::SavedForLater,
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::InvalidItem(_) => ErrorCode::InvalidItem,
            CartError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            CartError::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            CartError::InsufficientQuantity { .. } => ErrorCode::InsufficientQuantity,
            CartError::DuplicateItem { .. } => ErrorCode::DuplicateItem,
            CartError::InvalidDiscount { .. } => ErrorCode::InvalidDiscount,
        }
    }

    /// Suggested HTTP status for a route layer reporting this error.
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    /// The response body a route layer sends for this error.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::from(self)
    }
}

// =============================================================================
// Error Body
// =============================================================================

/// Error payload for API responses.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ITEM_NOT_FOUND",
///   "message": "Item not found in saved items: Apple",
///   "item": "Apple",
///   "list": "saved_for_later"
/// }
/// ```
/// `item` and `list` are present only for errors about a named entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub item: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub list: Option<CartList>,
}

impl From<&CartError> for ErrorBody {
    fn from(err: &CartError) -> Self {
        let (item, list) = match err {
            CartError::ItemNotFound { name, list } => (Some(name.clone()), Some(*list)),
            CartError::InsufficientQuantity { name, .. } | CartError::DuplicateItem { name } => {
                (Some(name.clone()), None)
            }
            _ => (None, None),
        };

        ErrorBody {
            code: err.code(),
            message: err.to_string(),
            item,
            list,
        }
    }
}

// =============================================================================
// Error Code
// =============================================================================

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.code) {
///   case 'ITEM_NOT_FOUND':
///     refreshCart();
///     break;
///   case 'INVALID_QUANTITY':
///     showForm(e.message);
///     break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item payload failed validation (400)
    InvalidItem,

    /// Quantity failed validation (400)
    InvalidQuantity,

    /// Named item is not in the list (404)
    ItemNotFound,

    /// Removing more than the cart holds (409)
    InsufficientQuantity,

    /// Snapshot contains duplicate names (422)
    DuplicateItem,

    /// Snapshot discount out of range (422)
    InvalidDiscount,
}

impl ErrorCode {
    /// Suggested HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InvalidItem | ErrorCode::InvalidQuantity => 400,
            ErrorCode::ItemNotFound => 404,
            ErrorCode::InsufficientQuantity => 409,
            ErrorCode::DuplicateItem | ErrorCode::InvalidDiscount => 422,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a single field doesn't meet requirements.
/// Cart operations wrap them in [`CartError::InvalidItem`] or
/// [`CartError::InvalidQuantity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field has the wrong JSON type.
    #[error("{field} must be {expected}")]
    InvalidType { field: String, expected: String },

    /// Value must be positive.
    #[error("{field} must be a positive integer")]
    MustBePositive { field: String },

    /// Value must be a whole number.
    #[error("{field} must be an integer")]
    MustBeInteger { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// An attribute uses a key that belongs to a line item field.
    #[error("{field} is a reserved key")]
    Reserved { field: String },

    /// Arithmetic on the value would overflow.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================
