//! The client-submitted order request.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The dependent resources an order request points at.
///
/// Variant order is the precedence used when several fetches fail at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Items,
    Address,
    Customer,
    Card,
}

impl ResourceKind {
    /// All kinds, in failure-precedence order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Items,
        ResourceKind::Address,
        ResourceKind::Customer,
        ResourceKind::Card,
    ];

    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Items => "items",
            ResourceKind::Address => "address",
            ResourceKind::Customer => "customer",
            ResourceKind::Card => "card",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to place an order.
///
/// Holds unresolved locators only; the saga fetches what they point at.
/// Missing JSON fields decode as empty strings so that they are reported as
/// validation failures rather than body-decoding failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub items: String,
    pub address: String,
    pub customer: String,
    pub card: String,
}

impl OrderRequest {
    /// Creates a request from the four locators.
    pub fn new(
        items: impl Into<String>,
        address: impl Into<String>,
        customer: impl Into<String>,
        card: impl Into<String>,
    ) -> Self {
        Self {
            items: items.into(),
            address: address.into(),
            customer: customer.into(),
            card: card.into(),
        }
    }

    /// Returns the locator for the given resource.
    pub fn locator(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Items => &self.items,
            ResourceKind::Address => &self.address,
            ResourceKind::Customer => &self.customer,
            ResourceKind::Card => &self.card,
        }
    }

    /// Checks that every locator is present and free of whitespace.
    ///
    /// Locators are checked in precedence order; the first offender is reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for kind in ResourceKind::ALL {
            let locator = self.locator(kind);
            if locator.trim().is_empty() {
                return Err(ValidationError::MissingLocator(kind));
            }
            if locator.chars().any(char::is_whitespace) {
                return Err(ValidationError::MalformedLocator {
                    kind,
                    locator: locator.to_string(),
                    reason: "contains whitespace".to_string(),
                });
            }
        }
        Ok(())
    }
}
