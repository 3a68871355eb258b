//! # Domain Types
//!
//! Line items and the payload used to insert them.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐    add_item     ┌─────────────────────┐        │
//! │  │      NewItem        │ ──────────────► │      LineItem       │        │
//! │  │  ─────────────────  │   (validated)   │  ─────────────────  │        │
//! │  │  name               │                 │  name (list key)    │        │
//! │  │  price_cents: Opt   │                 │  price_cents        │        │
//! │  │  attributes         │                 │  quantity           │        │
//! │  └─────────────────────┘                 │  attributes         │        │
//! │            ▲                             └─────────────────────┘        │
//! │            │ from_json                                                  │
//! │   untyped JSON from the route layer                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Attribute Pass-Through
//! Any extra fields on an incoming item (image URL, SKU, colour...) are kept
//! in `attributes` and flattened back out when the item is serialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CartError, CartResult, ValidationError};
use crate::money::Money;
use crate::validation;

/// Extra item fields carried through the cart unchanged.
pub type Attributes = BTreeMap<String, Value>;

/// Keys of an item payload that are not treated as attributes.
///
/// A line item serializes its attributes flattened next to its own fields,
/// so an attribute under one of these keys would collide with them.
pub const RESERVED_KEYS: &[&str] = &["name", "price", "priceCents", "quantity"];

/// Checks if `key` names a line item field rather than an attribute.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

// =============================================================================
// Line Item
// =============================================================================

/// One product line in the cart or the saved-for-later list.
///
/// ## Snapshot Semantics
/// `price_cents` is frozen when the line is first added. Adding the same
/// name again only raises `quantity`; a different price on the later add
/// is ignored.
///
/// ## Serialization
/// ```json
/// { "name": "Apple", "priceCents": 150, "quantity": 2, "sku": "APL-1" }
/// ```
/// The unit price goes over the wire as integer `priceCents` only; a
/// decimal `price` is accepted on input ([`NewItem::from_json`]) but never
/// emitted. Clients render `priceCents / 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique key within one list.
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Quantity held, always > 0.
    pub quantity: i64,

    /// Pass-through fields supplied at insertion.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    #[ts(skip)]
    pub attributes: Attributes,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    ///
    /// Saturates instead of overflowing.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents.saturating_mul(self.quantity))
    }

    /// Looks up a pass-through attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Checks the fields a stored line item must satisfy.
    pub(crate) fn validate(&self) -> CartResult<()> {
        validation::validate_item_name(&self.name).map_err(CartError::InvalidItem)?;
        validation::validate_price_cents(self.price_cents).map_err(CartError::InvalidItem)?;
        validation::validate_quantity(self.quantity).map_err(CartError::InvalidQuantity)?;
        if let Some(key) = self.attributes.keys().find(|key| is_reserved_key(key)) {
            return Err(CartError::InvalidItem(ValidationError::Reserved {
                field: key.clone(),
            }));
        }
        Ok(())
    }
}

// =============================================================================
// New Item
// =============================================================================

/// The payload for [`Cart::add_item`](crate::cart::Cart::add_item).
///
/// `price_cents` is optional so that a payload without a price can be
/// represented and rejected with a precise error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewItem {
    pub name: String,
    pub price_cents: Option<i64>,
    pub attributes: Attributes,
}

impl NewItem {
    /// Creates a payload with a name and a price.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{Money, NewItem};
    ///
    /// let apple = NewItem::new("Apple", Money::from_cents(150))
    ///     .with_attribute("sku", "APL-1");
    /// assert_eq!(apple.price_cents, Some(150));
    /// ```
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        NewItem {
            name: name.into(),
            price_cents: Some(price.cents()),
            attributes: Attributes::new(),
        }
    }

    /// Adds a pass-through attribute.
    ///
    /// Reserved keys (`name`, `price`, `priceCents`, `quantity`) are
    /// ignored; set those through the payload's own fields.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !is_reserved_key(&key) {
            self.attributes.insert(key, value.into());
        }
        self
    }

    /// Parses an untyped JSON item, as received from an HTTP body.
    ///
    /// ## Accepted Shape
    /// ```json
    /// { "name": "Apple", "price": 1.5, "colour": "red" }
    /// { "name": "Apple", "priceCents": 150 }
    /// ```
    /// `priceCents` wins when both are present. Every other key except
    /// `quantity` becomes an attribute.
    ///
    /// ## Errors
    /// - `null` → `InvalidItem("item is required")`
    /// - not an object → `InvalidItem("item must be an object")`
    /// - `name` or price of the wrong JSON type → `InvalidItem`
    ///
    /// A missing name or price is not rejected here; `add_item` reports it.
    pub fn from_json(value: &Value) -> CartResult<NewItem> {
        let object = match value {
            Value::Null => {
                return Err(CartError::InvalidItem(ValidationError::Required {
                    field: "item".to_string(),
                }))
            }
            Value::Object(object) => object,
            _ => {
                return Err(CartError::InvalidItem(ValidationError::InvalidType {
                    field: "item".to_string(),
                    expected: "an object".to_string(),
                }))
            }
        };

        let name = match object.get("name") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(CartError::InvalidItem(ValidationError::InvalidType {
                    field: "name".to_string(),
                    expected: "a string".to_string(),
                }))
            }
        };

        let price_cents = match (object.get("priceCents"), object.get("price")) {
            (Some(cents), _) if !cents.is_null() => Some(
                validation::parse_price_cents(cents).map_err(CartError::InvalidItem)?,
            ),
            (_, Some(price)) if !price.is_null() => {
                Some(validation::parse_price(price).map_err(CartError::InvalidItem)?)
            }
            _ => None,
        };

        let attributes = object
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(NewItem {
            name,
            price_cents,
            attributes,
        })
    }

    /// Validates the payload and turns it into a line item.
    ///
    /// Checks run in order: name, price, quantity. Attributes under
    /// reserved keys are dropped.
    pub(crate) fn into_line_item(mut self, quantity: i64) -> CartResult<LineItem> {
        validation::validate_item_name(&self.name).map_err(CartError::InvalidItem)?;
        let price_cents = self.price_cents.ok_or_else(|| {
            CartError::InvalidItem(ValidationError::Required {
                field: "price".to_string(),
            })
        })?;
        validation::validate_price_cents(price_cents).map_err(CartError::InvalidItem)?;
        validation::validate_quantity(quantity).map_err(CartError::InvalidQuantity)?;
        self.attributes.retain(|key, _| !is_reserved_key(key));

        Ok(LineItem {
            name: self.name,
            price_cents,
            quantity,
            attributes: self.attributes,
        })
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
    fn test_line_item_totals() {
        let item = LineItem {
            name: "Apple".to_string(),
            price_cents: 150,
            quantity: 3,
            attributes: Attributes::new(),
        };
        assert_eq!(item.price(), Money::from_cents(150));
        assert_eq!(item.line_total(), Money::from_cents(450));
    }

    #[test]
    fn test_line_total_saturates() {
        let item = LineItem {
            name: "Yacht".to_string(),
            price_cents: i64::MAX / 2,
            quantity: 3,
            attributes: Attributes::new(),
        };
        assert_eq!(item.line_total().cents(), i64::MAX);
    }

    #[test]
    fn test_line_item_serialization_flattens_attributes() {
        let item = LineItem {
            name: "Apple".to_string(),
            price_cents: 150,
            quantity: 2,
            attributes: [("sku".to_string(), json!("APL-1"))].into_iter().collect(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Apple", "priceCents": 150, "quantity": 2, "sku": "APL-1" })
        );

        let back: LineItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_from_json_decimal_price() {
        let item = NewItem::from_json(&json!({ "name": "Apple", "price": 1.5 })).unwrap();
        assert_eq!(item.name, "Apple");
        assert_eq!(item.price_cents, Some(150));
        assert!(item.attributes.is_empty());
    }

    #[test]
    fn test_from_json_price_cents_wins() {
        let item =
            NewItem::from_json(&json!({ "name": "Apple", "price": 9.99, "priceCents": 150 }))
                .unwrap();
        assert_eq!(item.price_cents, Some(150));
    }

    #[test]
    fn test_from_json_keeps_attributes_and_drops_quantity() {
        let item = NewItem::from_json(&json!({
            "name": "Apple",
            "price": 1,
            "quantity": 7,
            "colour": "red",
            "tags": ["fruit"]
        }))
        .unwrap();

        assert_eq!(item.attributes.len(), 2);
        assert_eq!(item.attributes["colour"], json!("red"));
        assert!(!item.attributes.contains_key("quantity"));
    }

    #[test]
    fn test_from_json_rejects_null_and_non_objects() {
        let err = NewItem::from_json(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Invalid item: item is required");

        let err = NewItem::from_json(&json!("Apple")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid item: item must be an object");

        let err = NewItem::from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, CartError::InvalidItem(_)));
    }

    #[test]
    fn test_from_json_rejects_wrong_field_types() {
        let err = NewItem::from_json(&json!({ "name": 3, "price": 1 })).unwrap_err();
        assert!(matches!(err, CartError::InvalidItem(ValidationError::InvalidType { .. })));

        let err = NewItem::from_json(&json!({ "name": "Apple", "price": "cheap" })).unwrap_err();
        assert!(matches!(err, CartError::InvalidItem(ValidationError::InvalidType { .. })));
    }

    #[test]
    fn test_with_attribute_ignores_reserved_keys() {
        let item = NewItem::new("Apple", Money::from_cents(150))
            .with_attribute("quantity", 99)
            .with_attribute("priceCents", 1)
            .with_attribute("sku", "APL-1");

        assert_eq!(item.price_cents, Some(150));
        assert_eq!(item.attributes.len(), 1);
        assert_eq!(item.attributes["sku"], json!("APL-1"));
    }

    #[test]
    fn test_into_line_item_drops_reserved_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("quantity".to_string(), json!(99));
        attributes.insert("name".to_string(), json!("Pear"));
        attributes.insert("colour".to_string(), json!("red"));
        let item = NewItem {
            name: "Apple".to_string(),
            price_cents: Some(150),
            attributes,
        };

        let line = item.into_line_item(2).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.attributes.len(), 1);
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!({ "name": "Apple", "priceCents": 150, "quantity": 2, "colour": "red" })
        );
    }

    #[test]
    fn test_validate_rejects_reserved_attribute() {
        let mut line = NewItem::new("Apple", Money::from_cents(150))
            .into_line_item(1)
            .unwrap();
        assert!(line.validate().is_ok());

        line.attributes.insert("price".to_string(), json!(9.99));
        let err = line.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid item: price is a reserved key");
    }

    #[test]
    fn test_into_line_item_check_order() {
        let missing_everything = NewItem::default();
        let err = missing_everything.into_line_item(0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid item: name is required");

        let no_price = NewItem {
            name: "Apple".to_string(),
            ..NewItem::default()
        };
        let err = no_price.into_line_item(0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid item: price is required");

        let err = NewItem::new("Apple", Money::from_cents(150))
            .into_line_item(0)
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity(_)));
    }
}
