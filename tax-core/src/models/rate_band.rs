use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Coarse classification of a marginal rate, used when listing brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateBand {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RateBand {
    pub fn for_rate(rate: Decimal) -> Self {
        if rate <= dec!(0.18) {
            Self::Low
        } else if rate <= dec!(0.31) {
            Self::Moderate
        } else if rate <= dec!(0.36) {
            Self::Elevated
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Elevated => "elevated",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RateBand {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(RateBand::for_rate(dec!(0.18)), RateBand::Low);
        assert_eq!(RateBand::for_rate(dec!(0.31)), RateBand::Moderate);
        assert_eq!(RateBand::for_rate(dec!(0.36)), RateBand::Elevated);
    }

    #[test]
    fn rates_between_edges_fall_into_next_band() {
        assert_eq!(RateBand::for_rate(dec!(0.26)), RateBand::Moderate);
        assert_eq!(RateBand::for_rate(dec!(0.39)), RateBand::High);
        assert_eq!(RateBand::for_rate(dec!(0.45)), RateBand::High);
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(RateBand::Elevated.to_string(), "elevated");
    }
}
