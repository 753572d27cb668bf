use std::fmt::Write;

use serde::Serialize;

use super::MarketDesk;
use crate::format::{arrow, grouped, sign};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub img: String,
    pub name: String,
    pub symbol: String,
    pub industry: String,
    /// Day change, in percent.
    pub change: f64,
    pub current_price: f64,
    pub quantity: f64,
    pub on_orders: f64,
    pub avg_price: f64,
    pub pnl: f64,
}

/// The demo account's holdings with portfolio totals.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserHoldings {
    pub holdings: Vec<Holding>,
    pub total_value: f64,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    pub pnl_percentage: f64,
}

impl MarketDesk {
    #[must_use]
    pub fn user_holdings(&self) -> UserHoldings {
        UserHoldings::from_holdings(demo_holdings())
    }
}

impl UserHoldings {
    /// Totals value at current price and P&L against the invested amount.
    #[must_use]
    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        let total_value = holdings.iter().map(|h| h.current_price * h.quantity).sum();
        let total_pnl = holdings.iter().map(|h| h.pnl).sum();
        let invested: f64 = holdings.iter().map(|h| h.avg_price * h.quantity).sum();
        let pnl_percentage = if invested > 0.0 {
            total_pnl / invested * 100.0
        } else {
            0.0
        };
        Self {
            holdings,
            total_value,
            total_pnl,
            pnl_percentage,
        }
    }

    fn totals_line(&self) -> String {
        format!(
            "{}₹{} ({}{:.2}%)",
            sign(self.total_pnl),
            grouped(self.total_pnl),
            sign(self.pnl_percentage),
            self.pnl_percentage
        )
    }

    fn table(&self) -> String {
        let mut table = String::from(
            "| Symbol | Name | Industry | Quantity | Price | Change | Avg Price | P&L |\n",
        );
        table.push_str("|--------|------|----------|----------|-------|--------|-----------|-----|\n");
        for holding in &self.holdings {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {:.2} | ₹{:.2} | {} {:.2}% | ₹{:.2} | {} ₹{:.2} |",
                holding.symbol,
                holding.name,
                holding.industry,
                holding.quantity,
                holding.current_price,
                arrow(holding.change),
                holding.change.abs(),
                holding.avg_price,
                arrow(holding.pnl),
                holding.pnl.abs()
            );
        }
        let _ = write!(
            table,
            "\n**Total Portfolio Value**: ₹{}\n**Total P&L**: {}",
            grouped(self.total_value),
            self.totals_line()
        );
        table
    }

    /// The summary embeds the full holdings table.
    #[must_use]
    pub fn summary(&self) -> String {
        let top = self
            .holdings
            .iter()
            .take(3)
            .map(|holding| {
                format!(
                    "- {} ({}): {:.2} shares at ₹{:.2}",
                    holding.name, holding.symbol, holding.quantity, holding.current_price
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Here are your current holdings:\n\n\
             Total Portfolio Value: ₹{}\n\
             Total P&L: {}\n\n\
             Top Holdings:\n{top}\n\nAll Holdings:\n{}",
            grouped(self.total_value),
            self.totals_line(),
            self.table()
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn holding(
    img: &str,
    name: &str,
    symbol: &str,
    industry: &str,
    change: f64,
    current_price: f64,
    (quantity, on_orders): (f64, f64),
    avg_price: f64,
    pnl: f64,
) -> Holding {
    Holding {
        img: img.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        industry: industry.to_string(),
        change,
        current_price,
        quantity,
        on_orders,
        avg_price,
        pnl,
    }
}

fn demo_holdings() -> Vec<Holding> {
    vec![
        holding(
            "https://image-url.png",
            "Tata Consultancy Service",
            "TCS",
            "IT",
            2.05,
            26_664.00,
            (0.262_314_28, 0.052_314_28),
            24_500.64,
            2000.0,
        ),
        holding(
            "https://image-url2.png",
            "HDFC Bank",
            "HDFCBANK",
            "Banking",
            -2.73,
            1598.29,
            (2474.423_612_32, 0.256_567),
            1566.64,
            200.0,
        ),
        holding(
            "https://image-url3.png",
            "Reliance Industries",
            "RELIANCE",
            "Oil & Gas",
            1.45,
            2890.75,
            (5.789_23, 0.0),
            2750.50,
            810.25,
        ),
        holding(
            "https://image-url4.png",
            "Infosys",
            "INFY",
            "IT",
            0.85,
            1450.60,
            (10.5, 1.2),
            1380.25,
            738.68,
        ),
        holding(
            "https://image-url5.png",
            "Bharti Airtel",
            "BHARTIARTL",
            "Telecom",
            -0.32,
            1120.40,
            (15.75, 0.0),
            1150.80,
            -478.80,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_are_derived_from_holdings() {
        let holdings = MarketDesk::new().user_holdings();
        assert_eq!(holdings.holdings.len(), 5);
        assert!((holdings.total_pnl - 3270.13).abs() < 1e-6);
        let expected_value: f64 = holdings
            .holdings
            .iter()
            .map(|h| h.current_price * h.quantity)
            .sum();
        assert!((holdings.total_value - expected_value).abs() < 1e-9);
        assert!(holdings.pnl_percentage > 0.0);
    }

    #[test]
    fn summary_embeds_table() {
        let summary = MarketDesk::new().user_holdings().summary();
        assert!(summary.starts_with("Here are your current holdings:"));
        assert!(summary.contains("- Tata Consultancy Service (TCS): 0.26 shares at ₹26664.00"));
        assert!(summary.contains("| BHARTIARTL | Bharti Airtel | Telecom | 15.75 | ₹1120.40 | ▼ 0.32% | ₹1150.80 | ▼ ₹478.80 |"));
        assert!(summary.contains("Total P&L: +₹3,270.13"));
    }

    #[test]
    fn metadata_uses_camel_case_totals() {
        let value = serde_json::to_value(MarketDesk::new().user_holdings()).expect("serialise");
        assert!(value.get("totalPnL").is_some());
        assert_eq!(value["holdings"][0]["avgPrice"], 24_500.64);
    }

    #[test]
    fn empty_holdings_have_zero_percentage() {
        let holdings = UserHoldings::from_holdings(Vec::new());
        assert!(holdings.pnl_percentage.abs() < f64::EPSILON);
    }
}
