// =============================================================================
// Shared types used across the MarketDeck dashboard backend
// =============================================================================

use serde::{Deserialize, Serialize};

/// Named look-back window selectable from the dashboard sidebar.
///
/// Each variant maps to a fixed number of calendar days, matching the
/// period picker the frontend renders (1 month up to 5 years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
}

impl Period {
    /// Calendar days covered by this period.
    pub fn days(&self) -> i64 {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
        }
    }

    /// Short code used in query strings ("1m", "3m", "6m", "1y", "2y", "5y").
    pub fn code(&self) -> &'static str {
        match self {
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// All periods in sidebar order (used by the periods listing endpoint).
    pub fn all() -> [Period; 6] {
        [
            Self::OneMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::OneYear,
            Self::TwoYears,
            Self::FiveYears,
        ]
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::SixMonths
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
            Self::TwoYears => "2 Years",
            Self::FiveYears => "5 Years",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1mo" => Ok(Self::OneMonth),
            "3m" | "3mo" => Ok(Self::ThreeMonths),
            "6m" | "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            other => Err(format!(
                "invalid period '{other}' (expected one of 1m, 3m, 6m, 1y, 2y, 5y)"
            )),
        }
    }
}
