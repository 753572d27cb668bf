use std::fmt::Write;

use nin_store::envelope::ResponseEnvelope;
use nin_store::models::binance::{BinanceHolding, BinanceHoldings};

use super::{NinControlPlane, ToolError, envelope};
use crate::format::grouped;

const LISTED_ASSETS: usize = 100;

impl NinControlPlane {
    /// `getUserBinanceHoldings`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the required Binance
    /// calls fail.
    pub async fn binance_holdings(&self) -> Result<ResponseEnvelope, ToolError> {
        let holdings = self
            .binance
            .holdings()
            .await
            .map_err(ToolError::provider("Error fetching Binance holdings"))?;
        envelope(
            binance_summary(&holdings),
            "User Binance Holdings",
            "Binance holdings data available in metadata",
            &holdings,
        )
    }
}

fn amount(text: &str) -> f64 {
    text.trim().parse().unwrap_or_default()
}

fn spot_table(spot: &[BinanceHolding]) -> String {
    if spot.is_empty() {
        return "No Binance holdings found or unable to fetch data.".to_string();
    }
    let mut table = String::from("**Spot Holdings:**\n| Asset | Free | Locked |\n|-------|------|--------|\n");
    for holding in spot.iter().take(LISTED_ASSETS) {
        let _ = writeln!(
            table,
            "| {} | {:.6} | {:.6} |",
            holding.asset,
            amount(&holding.free),
            amount(&holding.locked)
        );
    }
    if spot.len() > LISTED_ASSETS {
        let _ = write!(table, "\n... and {} more assets.", spot.len() - LISTED_ASSETS);
    }
    table
}

fn binance_summary(holdings: &BinanceHoldings) -> String {
    format!(
        "Here are your current Binance holdings:\n\nTotal Portfolio Value: ${}\n\n{}",
        grouped(holdings.total_value_usd),
        spot_table(&holdings.spot)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(asset: &str, free: &str, locked: &str) -> BinanceHolding {
        BinanceHolding {
            asset: asset.to_string(),
            free: free.to_string(),
            locked: locked.to_string(),
            price_in_usdt: "1.00000000".to_string(),
            usd_value: "0.00".to_string(),
        }
    }

    #[test]
    fn summary_lists_spot_rows() {
        let holdings = BinanceHoldings {
            spot: vec![holding("BTC", "0.5", "0.01"), holding("USDT", "1200", "0")],
            total_value_usd: 34_567.891,
        };
        let summary = binance_summary(&holdings);
        assert!(summary.starts_with(
            "Here are your current Binance holdings:\n\nTotal Portfolio Value: $34,567.89\n\n**Spot Holdings:**"
        ));
        assert!(summary.contains("| BTC | 0.500000 | 0.010000 |"));
        assert!(summary.contains("| USDT | 1200.000000 | 0.000000 |"));
        assert!(!summary.contains("more assets"));
    }

    #[test]
    fn empty_holdings_say_so() {
        let summary = binance_summary(&BinanceHoldings::default());
        assert!(summary.ends_with("No Binance holdings found or unable to fetch data."));
        assert!(summary.contains("Total Portfolio Value: $0"));
    }

    #[test]
    fn long_listings_are_truncated() {
        let spot: Vec<_> = (0..105)
            .map(|i| holding(&format!("A{i}"), "1", "0"))
            .collect();
        let table = spot_table(&spot);
        assert!(table.contains("| A99 |"));
        assert!(!table.contains("| A100 |"));
        assert!(table.ends_with("... and 5 more assets."));
    }
}
