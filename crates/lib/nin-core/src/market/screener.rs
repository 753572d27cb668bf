use std::fmt::Write;

use serde::Serialize;

use super::{MarketDesk, Outlook};
use crate::format::{arrow, grouped};
use crate::request::{ChangePeriod, Range, ScreeningCriteria};

/// Trailing price changes, in percent.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PriceChanges {
    #[serde(rename = "1d")]
    pub one_day: f64,
    #[serde(rename = "1w")]
    pub one_week: f64,
    #[serde(rename = "1m")]
    pub one_month: f64,
    #[serde(rename = "3m")]
    pub three_months: f64,
    #[serde(rename = "6m")]
    pub six_months: f64,
    #[serde(rename = "1y")]
    pub one_year: f64,
}

impl PriceChanges {
    #[must_use]
    pub const fn get(&self, period: ChangePeriod) -> f64 {
        match period {
            ChangePeriod::OneDay => self.one_day,
            ChangePeriod::OneWeek => self.one_week,
            ChangePeriod::OneMonth => self.one_month,
            ChangePeriod::ThreeMonths => self.three_months,
            ChangePeriod::SixMonths => self.six_months,
            ChangePeriod::OneYear => self.one_year,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MovingAverageLevels {
    pub ma50: f64,
    pub ma200: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockTechnicals {
    pub rsi: f64,
    pub macd: Outlook,
    pub moving_averages: MovingAverageLevels,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScreenedStock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub market_cap: f64,
    pub price: f64,
    pub pe_ratio: f64,
    pub dividend: f64,
    pub price_change: PriceChanges,
    pub volume: f64,
    pub technicals: StockTechnicals,
}

impl ScreenedStock {
    /// Whether every supplied criterion holds for this stock.
    #[must_use]
    pub fn matches(&self, criteria: &ScreeningCriteria) -> bool {
        let price_band = Range {
            min: criteria.min_price,
            max: criteria.max_price,
        };
        if !price_band.contains(self.price) {
            return false;
        }
        if criteria
            .market_cap
            .is_some_and(|band| !band.contains(self.market_cap))
        {
            return false;
        }
        if criteria
            .sector
            .as_deref()
            .is_some_and(|sector| sector != self.sector)
        {
            return false;
        }
        if criteria
            .pe_ratio
            .is_some_and(|range| !range.contains(self.pe_ratio))
        {
            return false;
        }
        if criteria
            .dividend
            .and_then(|dividend| dividend.min)
            .is_some_and(|min| self.dividend < min)
        {
            return false;
        }
        if let Some(filter) = criteria.price_change {
            let change = self.price_change.get(filter.period);
            let range = Range {
                min: filter.min,
                max: filter.max,
            };
            if !range.contains(change) {
                return false;
            }
        }
        if criteria
            .volume
            .and_then(|volume| volume.min)
            .is_some_and(|min| self.volume < min)
        {
            return false;
        }
        if let Some(technicals) = criteria.technicals {
            let own = &self.technicals;
            if technicals.rsi.is_some_and(|range| !range.contains(own.rsi)) {
                return false;
            }
            if technicals
                .macd
                .is_some_and(|macd| macd.as_str() != own.macd.as_str())
            {
                return false;
            }
            if technicals.moving_averages.is_some_and(|signal| {
                !signal.holds(
                    self.price,
                    own.moving_averages.ma50,
                    own.moving_averages.ma200,
                )
            }) {
                return false;
            }
        }
        true
    }
}

/// Stocks that passed the screen, with the criteria that were applied.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreeningResult {
    pub stocks: Vec<ScreenedStock>,
    pub criteria: ScreeningCriteria,
}

impl MarketDesk {
    #[must_use]
    pub fn screen(&self, criteria: ScreeningCriteria) -> ScreeningResult {
        let stocks = universe()
            .into_iter()
            .filter(|stock| stock.matches(&criteria))
            .collect();
        ScreeningResult { stocks, criteria }
    }
}

impl ScreeningResult {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "I've found {} stocks that match your screening criteria.",
            self.stocks.len()
        )
    }

    #[must_use]
    pub fn report(&self) -> String {
        if self.stocks.is_empty() {
            return "No stocks match the specified criteria.".to_string();
        }

        let mut table = String::from("## Screening Results\n\n");
        table.push_str("| Symbol | Name | Sector | Price | P/E | Div % | 1M Change | RSI | MACD |\n");
        table.push_str("|--------|------|--------|-------|-----|-------|-----------|-----|------|\n");
        for stock in &self.stocks {
            let month = stock.price_change.one_month;
            let _ = writeln!(
                table,
                "| {} | {} | {} | ₹{} | {:.1} | {:.1}% | {} {:.1}% | {} | {} |",
                stock.symbol,
                stock.name,
                stock.sector,
                stock.price,
                stock.pe_ratio,
                stock.dividend,
                arrow(month),
                month.abs(),
                stock.technicals.rsi,
                stock.technicals.macd.as_str()
            );
        }

        table.push_str("\n## Applied Criteria\n\n");
        let applied = applied_criteria(&self.criteria);
        if applied.is_empty() {
            table.push_str("No specific criteria applied.");
        } else {
            table.push_str(&applied.join("\n"));
        }
        table
    }
}

fn applied_criteria(criteria: &ScreeningCriteria) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(band) = criteria.market_cap {
        lines.push(format!("- Market Cap: {}", band.as_str()));
    }
    if let Some(sector) = &criteria.sector {
        lines.push(format!("- Sector: {sector}"));
    }
    let price_band = Range {
        min: criteria.min_price,
        max: criteria.max_price,
    };
    if price_band != Range::default() {
        lines.push(format!("- Price: {}", price_band.describe("")));
    }
    if let Some(range) = criteria.pe_ratio {
        lines.push(format!("- P/E Ratio: {}", range.describe("")));
    }
    if let Some(min) = criteria.dividend.and_then(|dividend| dividend.min) {
        lines.push(format!("- Dividend: min {min}%"));
    }
    if let Some(filter) = criteria.price_change {
        let range = Range {
            min: filter.min,
            max: filter.max,
        };
        lines.push(format!(
            "- {} Price Change: {}",
            filter.period.as_str().to_uppercase(),
            range.describe("%")
        ));
    }
    if let Some(min) = criteria.volume.and_then(|volume| volume.min) {
        lines.push(format!("- Volume: min {}", grouped(min)));
    }
    if let Some(technicals) = criteria.technicals {
        if let Some(range) = technicals.rsi {
            lines.push(format!("- RSI: {}", range.describe("")));
        }
        if let Some(macd) = technicals.macd {
            lines.push(format!("- MACD: {}", macd.as_str()));
        }
        if let Some(signal) = technicals.moving_averages {
            lines.push(format!("- Moving Averages: {}", signal.as_str()));
        }
    }
    lines
}

#[allow(clippy::too_many_arguments)]
fn stock(
    symbol: &str,
    name: &str,
    sector: &str,
    market_cap: f64,
    price: f64,
    (pe_ratio, dividend): (f64, f64),
    changes: [f64; 6],
    volume: f64,
    technicals: (f64, Outlook, f64, f64),
) -> ScreenedStock {
    let [one_day, one_week, one_month, three_months, six_months, one_year] = changes;
    ScreenedStock {
        symbol: symbol.to_string(),
        name: name.to_string(),
        sector: sector.to_string(),
        market_cap,
        price,
        pe_ratio,
        dividend,
        price_change: PriceChanges {
            one_day,
            one_week,
            one_month,
            three_months,
            six_months,
            one_year,
        },
        volume,
        technicals: StockTechnicals {
            rsi: technicals.0,
            macd: technicals.1,
            moving_averages: MovingAverageLevels {
                ma50: technicals.2,
                ma200: technicals.3,
            },
        },
    }
}

fn universe() -> Vec<ScreenedStock> {
    vec![
        stock(
            "RELIANCE",
            "Reliance Industries Ltd",
            "Oil & Gas",
            1_750_000_000_000.0,
            2650.0,
            (22.5, 0.5),
            [0.8, 2.5, 5.2, 8.7, 12.3, 18.5],
            5_000_000.0,
            (62.0, Outlook::Bullish, 2550.0, 2400.0),
        ),
        stock(
            "TCS",
            "Tata Consultancy Services Ltd",
            "IT",
            1_250_000_000_000.0,
            3400.0,
            (28.2, 1.2),
            [1.2, 3.5, 4.8, 7.2, 9.5, 15.2],
            2_500_000.0,
            (58.0, Outlook::Bullish, 3300.0, 3100.0),
        ),
        stock(
            "HDFCBANK",
            "HDFC Bank Ltd",
            "Banking",
            1_100_000_000_000.0,
            1550.0,
            (18.5, 1.5),
            [-0.5, 1.2, 3.5, 5.8, 8.2, 12.5],
            4_000_000.0,
            (45.0, Outlook::Neutral, 1520.0, 1480.0),
        ),
        stock(
            "INFY",
            "Infosys Ltd",
            "IT",
            750_000_000_000.0,
            1600.0,
            (24.8, 2.0),
            [1.5, 4.2, 6.5, 9.8, 14.2, 20.5],
            3_000_000.0,
            (65.0, Outlook::Bullish, 1550.0, 1450.0),
        ),
        stock(
            "SUNPHARMA",
            "Sun Pharmaceutical Industries Ltd",
            "Pharma",
            500_000_000_000.0,
            1050.0,
            (32.5, 0.8),
            [-1.2, -2.5, -0.5, 2.5, 5.8, 8.5],
            1_500_000.0,
            (38.0, Outlook::Bearish, 1080.0, 1020.0),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{
        MacdTrend, MarketCapBand, Minimum, MovingAverageSignal, PriceChangeFilter,
        TechnicalFilter,
    };

    fn symbols(result: &ScreeningResult) -> Vec<&str> {
        result.stocks.iter().map(|s| s.symbol.as_str()).collect()
    }

    #[test]
    fn empty_criteria_return_whole_universe() {
        let result = MarketDesk::new().screen(ScreeningCriteria::default());
        assert_eq!(result.stocks.len(), 5);
        assert!(result.report().ends_with("No specific criteria applied."));
    }

    #[test]
    fn sector_filter_is_exact() {
        let criteria = ScreeningCriteria {
            sector: Some("IT".to_string()),
            ..ScreeningCriteria::default()
        };
        let result = MarketDesk::new().screen(criteria);
        assert_eq!(symbols(&result), vec!["TCS", "INFY"]);
        assert_eq!(
            result.summary(),
            "I've found 2 stocks that match your screening criteria."
        );
        assert!(result.report().contains("- Sector: IT"));
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let criteria = ScreeningCriteria {
            market_cap: Some(MarketCapBand::Large),
            dividend: Some(Minimum { min: Some(1.0) }),
            technicals: Some(TechnicalFilter {
                macd: Some(MacdTrend::Bullish),
                ..TechnicalFilter::default()
            }),
            ..ScreeningCriteria::default()
        };
        let result = MarketDesk::new().screen(criteria);
        assert_eq!(symbols(&result), vec!["TCS", "INFY"]);
    }

    #[test]
    fn price_change_and_moving_average_filters() {
        let criteria = ScreeningCriteria {
            price_change: Some(PriceChangeFilter {
                period: ChangePeriod::OneMonth,
                min: Some(0.0),
                max: None,
            }),
            technicals: Some(TechnicalFilter {
                moving_averages: Some(MovingAverageSignal::Crossover50),
                ..TechnicalFilter::default()
            }),
            ..ScreeningCriteria::default()
        };
        let result = MarketDesk::new().screen(criteria);
        assert_eq!(symbols(&result), vec!["RELIANCE", "TCS", "HDFCBANK", "INFY"]);
        let report = result.report();
        assert!(report.contains("- 1M Price Change: min 0%"));
        assert!(report.contains("- Moving Averages: crossover50"));
    }

    #[test]
    fn price_bounds_apply() {
        let criteria = ScreeningCriteria {
            min_price: Some(1500.0),
            max_price: Some(2000.0),
            ..ScreeningCriteria::default()
        };
        let result = MarketDesk::new().screen(criteria);
        assert_eq!(symbols(&result), vec!["HDFCBANK", "INFY"]);
        assert!(result.report().contains("- Price: min 1500, max 2000"));
    }

    #[test]
    fn no_match_reports_plainly() {
        let criteria = ScreeningCriteria {
            sector: Some("Telecom".to_string()),
            ..ScreeningCriteria::default()
        };
        let result = MarketDesk::new().screen(criteria);
        assert!(result.stocks.is_empty());
        assert_eq!(result.report(), "No stocks match the specified criteria.");
        assert_eq!(
            result.summary(),
            "I've found 0 stocks that match your screening criteria."
        );
    }

    #[test]
    fn report_row_format() {
        let criteria = ScreeningCriteria {
            sector: Some("Pharma".to_string()),
            ..ScreeningCriteria::default()
        };
        let report = MarketDesk::new().screen(criteria).report();
        assert!(report.contains(
            "| SUNPHARMA | Sun Pharmaceutical Industries Ltd | Pharma | ₹1050 | 32.5 | 0.8% | ▼ 0.5% | 38 | bearish |"
        ));
    }
}
