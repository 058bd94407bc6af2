//! Snapshots of the resources an order is built from.
//!
//! These are fetched verbatim from the services that own them and embedded in
//! the order by value, so later edits to the source records never change a
//! placed order.

use common::Money;
use serde::{Deserialize, Deserializer, Serialize};

/// A line item from the customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item identifier.
    #[serde(default)]
    pub id: String,

    /// Identifier of the cart that owns the item.
    #[serde(default)]
    pub cart_id: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit; never negative.
    #[serde(deserialize_with = "non_negative")]
    pub unit_price: Money,
}

impl Item {
    /// Creates a new item.
    pub fn new(
        id: impl Into<String>,
        cart_id: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            cart_id: cart_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the line total (quantity * unit_price), or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_multiply(self.quantity)
    }
}

fn non_negative<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    let amount = Money::deserialize(deserializer)?;
    if amount.is_negative() {
        return Err(serde::de::Error::custom(format!(
            "unit price {amount} is negative"
        )));
    }
    Ok(amount)
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub id: String,
    pub number: String,
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

/// A payment card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    pub id: String,
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

/// A customer profile.
///
/// The nested addresses and cards come along with the snapshot but the saga
/// only uses the single address and card named in the order request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub addresses: Vec<Address>,
    pub cards: Vec<Card>,
}

impl Customer {
    /// Name to print on a shipment: "first last", or the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Shipment details derived for an order; never fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Same as the customer ID.
    pub id: String,
    pub name: String,
}

impl Shipment {
    /// Derives the shipment for a customer.
    pub fn for_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_line_total() {
        let item = Item::new("i1", "c1", 3, Money::from_cents(1000));
        assert_eq!(item.line_total(), Some(Money::from_cents(3000)));
    }

    #[test]
    fn test_item_decodes_decimal_price() {
        let item: Item = serde_json::from_str(
            r#"{"id":"i1","cartId":"c1","quantity":2,"unitPrice":10.5}"#,
        )
        .unwrap();
        assert_eq!(item.unit_price.cents(), 1050);
        assert_eq!(item.cart_id, "c1");
    }

    #[test]
    fn test_item_rejects_negative_price() {
        let result: Result<Item, _> =
            serde_json::from_str(r#"{"id":"i1","quantity":1,"unitPrice":-1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_item_rejects_negative_quantity() {
        let result: Result<Item, _> =
            serde_json::from_str(r#"{"id":"i1","quantity":-2,"unitPrice":1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_name() {
        let mut customer = Customer {
            id: "c1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            ..Default::default()
        };
        assert_eq!(customer.display_name(), "Ada Lovelace");

        customer.last_name.clear();
        assert_eq!(customer.display_name(), "Ada");

        customer.first_name.clear();
        assert_eq!(customer.display_name(), "ada");
    }

    #[test]
    fn test_shipment_uses_customer_id() {
        let customer = Customer {
            id: "cust-7".to_string(),
            username: "seven".to_string(),
            ..Default::default()
        };
        let shipment = Shipment::for_customer(&customer);
        assert_eq!(shipment.id, "cust-7");
        assert_eq!(shipment.name, "seven");
    }
}
