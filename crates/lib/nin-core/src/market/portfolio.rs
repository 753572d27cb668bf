use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use super::MarketDesk;
use crate::request::PortfolioHolding;

const CONCENTRATED_INDUSTRIES: usize = 2;
const MODERATE_INDUSTRIES: usize = 4;
const OVERWEIGHT_PERCENT: f64 = 40.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Diversification {
    /// Percentage of portfolio value per industry; sums to 100.
    pub by_industry: BTreeMap<String, f64>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub volatility: f64,
    pub beta: f64,
    pub sharpe_ratio: f64,
    pub recommendation: String,
}

/// Trailing returns as fractions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Performance {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioAnalysis {
    pub diversification: Diversification,
    pub risk: RiskMetrics,
    pub performance: Performance,
}

impl MarketDesk {
    /// Allocates portfolio value by industry. Risk and performance figures
    /// are fixed.
    #[must_use]
    pub fn portfolio(&self, holdings: &[PortfolioHolding]) -> PortfolioAnalysis {
        let by_industry = allocation(holdings);
        PortfolioAnalysis {
            diversification: Diversification {
                recommendation: diversification_advice(&by_industry),
                by_industry,
            },
            risk: RiskMetrics {
                volatility: 15.2,
                beta: 1.2,
                sharpe_ratio: 0.8,
                recommendation:
                    "Consider adding some defensive stocks to reduce portfolio volatility."
                        .to_string(),
            },
            performance: Performance {
                daily: 0.005,
                weekly: 0.012,
                monthly: 0.035,
                yearly: 0.128,
                recommendation: "Your portfolio is performing well, but consider rebalancing to capture growth in the technology sector.".to_string(),
            },
        }
    }
}

fn allocation(holdings: &[PortfolioHolding]) -> BTreeMap<String, f64> {
    let mut values: BTreeMap<String, f64> = BTreeMap::new();
    for holding in holdings {
        *values.entry(holding.industry.clone()).or_default() +=
            holding.current_price * holding.shares;
    }
    let total: f64 = values.values().sum();
    if total <= 0.0 {
        return values.into_keys().map(|industry| (industry, 0.0)).collect();
    }
    values
        .into_iter()
        .map(|(industry, value)| (industry, value / total * 100.0))
        .collect()
}

/// Largest allocation; ties go to the alphabetically first industry.
fn heaviest(by_industry: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    by_industry
        .iter()
        .fold(None, |best: Option<(&str, f64)>, (industry, share)| match best {
            Some((_, top)) if top >= *share => best,
            _ => Some((industry.as_str(), *share)),
        })
}

fn diversification_advice(by_industry: &BTreeMap<String, f64>) -> String {
    let (industry, share) = heaviest(by_industry).unwrap_or(("", 0.0));
    if by_industry.len() <= CONCENTRATED_INDUSTRIES {
        format!(
            "Your portfolio is highly concentrated. Consider diversifying beyond {industry} to reduce sector-specific risk."
        )
    } else if share > OVERWEIGHT_PERCENT {
        format!(
            "You have {share:.1}% of your portfolio in {industry}. Consider reducing this exposure to minimize sector risk."
        )
    } else {
        "Your portfolio has good diversification across industries.".to_string()
    }
}

impl PortfolioAnalysis {
    fn spread(&self) -> &'static str {
        match self.diversification.by_industry.len() {
            0..=CONCENTRATED_INDUSTRIES => "highly concentrated in a few industries",
            3..=MODERATE_INDUSTRIES => "moderately diversified across a few industries",
            _ => "well diversified across multiple industries",
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "I've analyzed your portfolio and here are the key insights:\n\n\
             **Diversification**: Your portfolio is {}\n\n\
             **Risk Profile**: Your portfolio has a beta of {:.2} and a Sharpe ratio of {:.2}\n\n\
             **Performance**: Your portfolio has returned {:.2}% over the past month",
            self.spread(),
            self.risk.beta,
            self.risk.sharpe_ratio,
            self.performance.monthly * 100.0
        )
    }

    #[must_use]
    pub fn report(&self) -> String {
        let mut table = String::from("## Industry Diversification\n\n");
        table.push_str("| Industry | Allocation |\n|----------|------------|\n");
        for (industry, share) in &self.diversification.by_industry {
            let _ = writeln!(table, "| {industry} | {share:.2}% |");
        }

        table.push_str("\n## Risk Metrics\n\n");
        table.push_str("| Metric | Value |\n|--------|-------|\n");
        let _ = writeln!(table, "| Volatility | {:.2}% |", self.risk.volatility);
        let _ = writeln!(table, "| Beta | {:.2} |", self.risk.beta);
        let _ = writeln!(table, "| Sharpe Ratio | {:.2} |", self.risk.sharpe_ratio);

        let performance = &self.performance;
        table.push_str("\n## Performance\n\n");
        table.push_str("| Timeframe | Return |\n|-----------|--------|\n");
        for (label, value) in [
            ("Daily", performance.daily),
            ("Weekly", performance.weekly),
            ("Monthly", performance.monthly),
            ("Yearly", performance.yearly),
        ] {
            let _ = writeln!(table, "| {label} | {:.2}% |", value * 100.0);
        }

        table.push_str("\n## Recommendations\n\n");
        let _ = writeln!(
            table,
            "- **Diversification**: {}",
            self.diversification.recommendation
        );
        let _ = writeln!(table, "- **Risk Management**: {}", self.risk.recommendation);
        let _ = writeln!(
            table,
            "- **Performance Improvement**: {}",
            performance.recommendation
        );
        table
    }
}
