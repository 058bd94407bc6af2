//! Messages exchanged with the payment service.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::order::{Address, Card, Customer};

/// Body posted to the payment service to ask for an authorisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub address: Address,
    pub customer: Customer,
    pub card: Card,
    pub amount: Money,
}

/// The payment service's verdict on a proposed charge.
///
/// Authorisation checks the amount and books nothing. A negative verdict is a
/// normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorisation {
    pub authorised: bool,
    #[serde(default)]
    pub message: String,
}

impl Authorisation {
    /// A positive verdict.
    pub fn approved(message: impl Into<String>) -> Self {
        Self {
            authorised: true,
            message: message.into(),
        }
    }

    /// A negative verdict.
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            authorised: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_request_wire_shape() {
        let request = PaymentRequest {
            address: Address::default(),
            customer: Customer::default(),
            card: Card::default(),
            amount: Money::from_cents(3049),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"], serde_json::json!(30.49));
        assert!(json.get("address").is_some());
        assert!(json.get("customer").is_some());
        assert!(json.get("card").is_some());
    }

    #[test]
    fn test_authorisation_decodes_without_message() {
        let verdict: Authorisation = serde_json::from_str(r#"{"authorised":false}"#).unwrap();
        assert!(!verdict.authorised);
        assert_eq!(verdict.message, "");
    }
}
