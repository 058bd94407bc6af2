//! The authorisation rule.

use domain::{Authorisation, Money};

use crate::error::PaymentError;

/// Approves amounts up to a fixed ceiling.
#[derive(Debug, Clone, Copy)]
pub struct Authoriser {
    decline_over: Money,
}

impl Authoriser {
    /// Creates an authoriser that declines amounts strictly above `decline_over`.
    pub fn new(decline_over: Money) -> Self {
        Self { decline_over }
    }

    /// The ceiling above which payments are declined.
    pub fn decline_over(&self) -> Money {
        self.decline_over
    }

    /// Decides whether `amount` may be charged.
    pub fn authorise(&self, amount: Money) -> Result<Authorisation, PaymentError> {
        if !amount.is_positive() {
            return Err(PaymentError::InvalidAmount(amount));
        }

        if amount <= self.decline_over {
            Ok(Authorisation::approved("Payment authorised"))
        } else {
            Ok(Authorisation::declined(format!(
                "Payment declined: amount exceeds {}",
                self.decline_over
            )))
        }
    }
}
