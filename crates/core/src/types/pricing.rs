//! Derived cart pricing.
//!
//! The summary is computed per request from cart line snapshots and is never
//! persisted. All arithmetic uses [`Decimal`]; tax and total are rounded to
//! two decimal places with the away-from-zero midpoint convention.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Order value at or above which shipping is free.
#[must_use]
pub fn free_shipping_threshold() -> Decimal {
    Decimal::new(50, 0)
}

/// Flat shipping fee charged below the free-shipping threshold.
#[must_use]
pub fn flat_shipping_fee() -> Decimal {
    Decimal::new(999, 2)
}

/// Flat tax rate applied to the subtotal.
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Derived totals for a cart.
///
/// `subtotal` is the sum of snapshot price x quantity over all lines;
/// `shipping` is zero at or above the free-shipping threshold and the flat
/// fee below it; `tax` is the subtotal times the flat rate, rounded to
/// cents; `total` is the sum of the three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartSummary {
    /// Compute the summary from `(unit_price, quantity)` cart lines.
    ///
    /// The unit price is each line's stored snapshot price, not the
    /// product's live price.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, i32)>,
    {
        let subtotal = lines
            .into_iter()
            .map(|(price, quantity)| price * Decimal::from(quantity))
            .sum();
        Self::from_subtotal(subtotal)
    }

    /// Compute the summary from an already-summed subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let shipping = if subtotal >= free_shipping_threshold() {
            Decimal::ZERO
        } else {
            flat_shipping_fee()
        };
        let tax = (subtotal * tax_rate())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let total = subtotal + shipping + tax;

        Self {
            subtotal,
            shipping,
            tax,
            total,
        }
    }
}

/// Round a value to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round an average review rating to one decimal place.
///
/// Zero reviews yield a rating of 0.
#[must_use]
pub fn round_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // Review counts never approach f64 precision
    let mean = f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64;
    round_to_tenth(mean)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_summary_below_threshold() {
        // $49.00 -> shipping $9.99, tax $3.92, total $62.91
        let summary = CartSummary::from_subtotal(dec(4900));
        assert_eq!(summary.shipping, dec(999));
        assert_eq!(summary.tax, dec(392));
        assert_eq!(summary.total, dec(6291));
    }

    #[test]
    fn test_summary_above_threshold() {
        // $60.00 -> shipping $0, tax $4.80, total $64.80
        let summary = CartSummary::from_subtotal(dec(6000));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.tax, dec(480));
        assert_eq!(summary.total, dec(6480));
    }

    #[test]
    fn test_summary_at_exact_threshold_ships_free() {
        let summary = CartSummary::from_subtotal(dec(5000));
        assert_eq!(summary.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_summary_total_is_sum_of_parts() {
        let summary = CartSummary::from_subtotal(dec(1234));
        assert_eq!(
            summary.total,
            summary.subtotal + summary.shipping + summary.tax
        );
    }

    #[test]
    fn test_from_lines_multiplies_quantities() {
        // 3 x $10.00 + 2 x $5.50 = $41.00
        let summary = CartSummary::from_lines([(dec(1000), 3), (dec(550), 2)]);
        assert_eq!(summary.subtotal, dec(4100));
        assert_eq!(summary.shipping, dec(999));
    }

    #[test]
    fn test_empty_cart_summary() {
        let summary = CartSummary::from_lines([]);
        assert_eq!(summary.subtotal, Decimal::ZERO);
        // An empty cart still quotes the flat fee; there is nothing to ship,
        // but the threshold rule is the only input here.
        assert_eq!(summary.shipping, dec(999));
        assert_eq!(summary.tax, Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // $10.55 * 0.08 = 0.844 -> $0.84
        let summary = CartSummary::from_subtotal(dec(1055));
        assert_eq!(summary.tax, dec(84));
    }

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(&[]), 0.0);
        assert_eq!(round_rating(&[5, 4]), 4.5);
        assert_eq!(round_rating(&[3, 3, 4]), 3.3);
        assert_eq!(round_rating(&[5]), 5.0);
    }
}
