//! The customer order aggregate.

use chrono::{DateTime, Utc};
use common::{Money, OrderId};
use serde::{Deserialize, Serialize};

use super::{Address, Card, Customer, Item, Shipment};

/// An order as placed by a customer.
///
/// A value snapshot: customer, address, card and items are copies taken when
/// the order was placed. The ID is absent until a store has persisted the
/// order and handed one back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    /// Store-assigned identifier.
    #[serde(default)]
    id: Option<OrderId>,

    customer_id: String,
    customer: Customer,
    address: Address,
    card: Card,
    items: Vec<Item>,
    shipment: Shipment,

    /// When the order was placed.
    date: DateTime<Utc>,

    total: Money,
}

impl CustomerOrder {
    /// Builds an unpersisted order from already-fetched snapshots.
    pub fn assemble(
        customer: Customer,
        address: Address,
        card: Card,
        items: Vec<Item>,
        total: Money,
        placed_at: DateTime<Utc>,
    ) -> Self {
        let shipment = Shipment::for_customer(&customer);
        Self {
            id: None,
            customer_id: customer.id.clone(),
            customer,
            address,
            card,
            items,
            shipment,
            date: placed_at,
            total,
        }
    }

    /// Returns the order carrying the ID its store assigned.
    pub fn persisted_as(self, id: OrderId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn id(&self) -> Option<&OrderId> {
        self.id.as_ref()
    }

    /// Returns true once a store has assigned an ID.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn shipment(&self) -> &Shipment {
        &self.shipment
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: "cust-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            addresses: vec![Address {
                id: "addr-other".to_string(),
                ..Default::default()
            }],
            cards: vec![],
        }
    }

    fn address() -> Address {
        Address {
            id: "addr-1".to_string(),
            number: "12".to_string(),
            street: "Analytical St".to_string(),
            city: "London".to_string(),
            postcode: "N1".to_string(),
            country: "UK".to_string(),
        }
    }

    #[test]
    fn test_assemble_builds_unpersisted_snapshot() {
        let now = Utc::now();
        let items = vec![Item::new("i1", "cart-1", 2, Money::from_cents(1000))];
        let order = CustomerOrder::assemble(
            customer(),
            address(),
            Card::default(),
            items.clone(),
            Money::from_cents(2499),
            now,
        );

        assert!(order.id().is_none());
        assert!(!order.is_persisted());
        assert_eq!(order.customer_id(), "cust-1");
        assert_eq!(order.shipment().id, "cust-1");
        assert_eq!(order.shipment().name, "Ada Lovelace");
        assert_eq!(order.address().id, "addr-1");
        assert_eq!(order.items(), items.as_slice());
        assert_eq!(order.total().cents(), 2499);
        assert_eq!(order.date(), now);
    }

    #[test]
    fn test_snapshot_is_independent_of_source() {
        let mut source = address();
        let order = CustomerOrder::assemble(
            customer(),
            source.clone(),
            Card::default(),
            vec![],
            Money::from_cents(499),
            Utc::now(),
        );
        source.street = "Elsewhere Rd".to_string();
        assert_eq!(order.address().street, "Analytical St");
    }

    #[test]
    fn test_persisted_as_sets_id_only() {
        let order = CustomerOrder::assemble(
            customer(),
            address(),
            Card::default(),
            vec![],
            Money::from_cents(499),
            Utc::now(),
        );
        let persisted = order.clone().persisted_as(OrderId::new("abc123"));
        assert_eq!(persisted.id().map(OrderId::as_str), Some("abc123"));
        assert_eq!(persisted.total(), order.total());
        assert_eq!(persisted.date(), order.date());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let order = CustomerOrder::assemble(
            customer(),
            address(),
            Card::default(),
            vec![],
            Money::from_cents(499),
            Utc::now(),
        )
        .persisted_as(OrderId::new("o-1"));
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], "o-1");
        assert_eq!(json["customerId"], "cust-1");
        assert_eq!(json["total"], serde_json::json!(4.99));

        let back: CustomerOrder = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
