//! In-process market desk.
//!
//! Stands in for a market-data vendor: every analysis tool reads from fixed
//! tables keyed by symbol, with a default profile for unknown symbols. All
//! lookups are pure, so identical requests produce identical results.

pub mod fundamentals;
pub mod holdings;
pub mod news;
pub mod options;
pub mod overview;
pub mod portfolio;
pub mod screener;
pub mod technicals;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

pub use fundamentals::FundamentalAnalysis;
pub use holdings::UserHoldings;
pub use news::MarketNews;
pub use options::OptionsAnalysis;
pub use overview::MarketOverview;
pub use portfolio::PortfolioAnalysis;
pub use screener::ScreeningResult;
pub use technicals::TechnicalAnalysis;

/// Source of the mock-backed analysis results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketDesk {
    reference_date: Option<NaiveDate>,
}

impl MarketDesk {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reference_date: None,
        }
    }

    /// Pins the date news and calendar entries are relative to.
    #[must_use]
    pub const fn at(reference_date: NaiveDate) -> Self {
        Self {
            reference_date: Some(reference_date),
        }
    }

    /// The pinned reference date, or the current UTC date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Analyst or model recommendation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Rating {
    #[serde(rename = "strong buy")]
    StrongBuy,
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "hold")]
    Hold,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "strong sell")]
    StrongSell,
}

impl Rating {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "strong buy",
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Sell => "sell",
            Self::StrongSell => "strong sell",
        }
    }
}

/// Directional bias of a trend or indicator.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
}

impl Outlook {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

pub(crate) fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
