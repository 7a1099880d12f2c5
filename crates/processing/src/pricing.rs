//! Discount math.

use cart_store::Discount;
use common::Money;

/// Computes the discounted total for one line: `price × quantity`, minus the
/// category discount when one applies.
pub fn line_total(price: Money, quantity: u32, discount: Option<&Discount>) -> Money {
    let gross = price.multiply(quantity);
    match discount {
        Some(d) => gross.apply_discount(d.percentage),
        None => gross,
    }
}
