//! Order pricing.

use common::Money;

use super::Item;
use crate::error::PricingError;

/// Flat shipping surcharge added to every order.
pub const FIXED_SHIPPING: Money = Money::from_cents(499);

/// Sum of quantity * unit price over all items.
pub fn subtotal(items: &[Item]) -> Result<Money, PricingError> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        let line = item.line_total().ok_or_else(|| PricingError::LineOverflow {
            item_id: item.id.clone(),
        })?;
        acc.checked_add(line).ok_or(PricingError::TotalOverflow)
    })
}

/// Amount to authorise and record for an order: subtotal plus shipping.
pub fn total(items: &[Item]) -> Result<Money, PricingError> {
    subtotal(items)?
        .checked_add(FIXED_SHIPPING)
        .ok_or(PricingError::TotalOverflow)
}
