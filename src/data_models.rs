use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A backend-monitored Amazon listing, in the shape the pages work with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedProduct {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_price: Decimal,
    pub image_url: String,
    pub last_checked: DateTime<Utc>,
}

impl TrackedProduct {
    pub fn price_trend(&self) -> PriceTrend {
        PriceTrend::between(self.initial_price, self.current_price)
    }
}

/// Movement of the current price relative to the initial one.
///
/// `amount` is always the absolute difference and `percent` the absolute
/// relative change, both non-negative; the variant carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTrend {
    Increase { amount: Decimal, percent: Decimal },
    Decrease { amount: Decimal, percent: Decimal },
    Unchanged,
}

impl PriceTrend {
    pub fn between(initial: Decimal, current: Decimal) -> Self {
        let change = current - initial;
        if change.is_zero() {
            return PriceTrend::Unchanged;
        }
        // a zero initial price has no defined relative change
        let Some(percent) = change
            .checked_div(initial)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        else {
            return PriceTrend::Unchanged;
        };
        let (amount, percent) = (change.abs(), percent.abs());
        if change.is_sign_negative() {
            PriceTrend::Decrease { amount, percent }
        } else {
            PriceTrend::Increase { amount, percent }
        }
    }

    pub fn is_decrease(&self) -> bool {
        matches!(self, PriceTrend::Decrease { .. })
    }

    pub fn is_increase(&self) -> bool {
        matches!(self, PriceTrend::Increase { .. })
    }

    fn sign(&self) -> &'static str {
        match self {
            PriceTrend::Increase { .. } => "+",
            PriceTrend::Decrease { .. } => "-",
            PriceTrend::Unchanged => "",
        }
    }

    /// Signed percentage with one decimal, e.g. `-10.0%`.
    pub fn percent_display(&self) -> Option<String> {
        match self {
            PriceTrend::Increase { percent, .. } | PriceTrend::Decrease { percent, .. } => {
                Some(format!("{}{:.1}%", self.sign(), round_half_up(*percent, 1)))
            }
            PriceTrend::Unchanged => None,
        }
    }

    /// Signed amount with two decimals, e.g. `-₹10.00`.
    pub fn amount_display(&self, currency: &str) -> Option<String> {
        match self {
            PriceTrend::Increase { amount, .. } | PriceTrend::Decrease { amount, .. } => Some(
                format!("{}{currency}{:.2}", self.sign(), round_half_up(*amount, 2)),
            ),
            PriceTrend::Unchanged => None,
        }
    }
}

/// Halves round away from zero, so `10.125` shows as `10.13`.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

impl Display for PriceTrend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.percent_display() {
            Some(percent) => write!(f, "{percent}"),
            None => write!(f, "no change"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(value: f64) -> Decimal {
        Decimal::from_f64(value).unwrap()
    }

    #[test]
    fn price_drop_is_a_decrease() {
        let trend = PriceTrend::between(dec(100.0), dec(90.0));
        assert!(trend.is_decrease());
        assert_eq!(trend.percent_display().unwrap(), "-10.0%");
        assert_eq!(trend.amount_display("$").unwrap(), "-$10.00");
    }

    #[test]
    fn price_rise_is_an_increase() {
        let trend = PriceTrend::between(dec(100.0), dec(110.0));
        assert!(trend.is_increase());
        assert_eq!(trend.percent_display().unwrap(), "+10.0%");
        assert_eq!(trend.to_string(), "+10.0%");
    }

    #[test]
    fn zero_initial_price_has_no_defined_change() {
        let trend = PriceTrend::between(Decimal::ZERO, dec(100.0));
        assert_eq!(trend, PriceTrend::Unchanged);
        assert_eq!(trend.percent_display(), None);
        assert_eq!(trend.to_string(), "no change");
    }

    #[test]
    fn equal_prices_are_unchanged() {
        let trend = PriceTrend::between(dec(42.5), dec(42.5));
        assert_eq!(trend, PriceTrend::Unchanged);
        assert_eq!(trend.amount_display("₹"), None);
    }

    #[test]
    fn percent_ties_round_up() {
        let trend = PriceTrend::between(Decimal::from(400), Decimal::from(401));
        assert_eq!(trend.percent_display().unwrap(), "+0.3%");
        let trend = PriceTrend::between(Decimal::from(400), Decimal::from(399));
        assert_eq!(trend.percent_display().unwrap(), "-0.3%");
    }

    #[test]
    fn amount_ties_round_up() {
        let trend = PriceTrend::between(Decimal::new(10125, 3), Decimal::from(10));
        assert_eq!(trend.amount_display("$").unwrap(), "-$0.13");
        assert_eq!(round_half_up(Decimal::new(10125, 3), 2), Decimal::new(1013, 2));
    }

    #[test]
    fn percent_is_rounded_to_one_decimal() {
        let trend = PriceTrend::between(dec(3.0), dec(2.0));
        assert_eq!(trend.percent_display().unwrap(), "-33.3%");
    }
}
