use std::fmt::Write;

use serde::Serialize;

use super::{MarketDesk, Outlook};
use crate::format::{arrow, capitalize, grouped};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Positive => "🟢",
            Self::Negative => "🔴",
            Self::Neutral => "⚪",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    const fn upper(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub name: String,
    pub value: f64,
    pub change: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub market_trend: Outlook,
    pub key_indices: Vec<IndexQuote>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectorMove {
    pub name: String,
    pub change: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectorPerformance {
    pub top_performing: Vec<SectorMove>,
    pub worst_performing: Vec<SectorMove>,
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AverageSignal {
    pub period: String,
    pub value: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketTechnicals {
    pub macd: Outlook,
    pub rsi: f64,
    pub moving_averages: Vec<AverageSignal>,
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Headline {
    pub headline: String,
    pub impact: Impact,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsImpact {
    pub recent_news: Vec<Headline>,
    pub analysis: String,
}

/// Broad market snapshot returned by `analyzeMarket`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub overview: Overview,
    pub sectors: SectorPerformance,
    pub technical_indicators: MarketTechnicals,
    pub news_impact: NewsImpact,
}

impl MarketDesk {
    #[must_use]
    pub fn market_overview(&self, query: Option<&str>) -> MarketOverview {
        MarketOverview {
            query: query.map(ToString::to_string),
            overview: Overview {
                market_trend: Outlook::Bullish,
                key_indices: vec![
                    index("NIFTY 50", 22_450.25, 125.75, 0.56),
                    index("SENSEX", 73_850.45, 412.30, 0.56),
                    index("NIFTY BANK", 48_250.80, 320.45, 0.67),
                ],
                summary: "Markets are showing strength with broad-based buying across sectors. Global cues remain positive with US markets hitting new highs.".to_string(),
            },
            sectors: SectorPerformance {
                top_performing: vec![
                    sector("IT", 1.8),
                    sector("Banking", 1.2),
                    sector("Auto", 0.9),
                ],
                worst_performing: vec![
                    sector("Pharma", -0.5),
                    sector("FMCG", -0.3),
                    sector("Metal", -0.1),
                ],
                analysis: "IT sector is leading the gains on the back of strong Q1 results and positive management commentary. Banking stocks are also performing well due to improving credit growth and asset quality.".to_string(),
            },
            technical_indicators: MarketTechnicals {
                macd: Outlook::Bullish,
                rsi: 62.5,
                moving_averages: vec![
                    average("50-day", 21_800.0, Signal::Buy),
                    average("100-day", 21_200.0, Signal::Buy),
                    average("200-day", 20_500.0, Signal::Buy),
                ],
                analysis: "Technical indicators are showing bullish momentum with RSI at 62.5, indicating room for further upside. All major moving averages are suggesting a buy signal.".to_string(),
            },
            news_impact: NewsImpact {
                recent_news: vec![
                    headline("RBI Maintains Repo Rate at 6.5%", Impact::Neutral, "Economic Times"),
                    headline(
                        "IT Companies Report Strong Q1 Earnings",
                        Impact::Positive,
                        "Business Standard",
                    ),
                    headline("Global Markets Hit New Highs", Impact::Positive, "Financial Express"),
                ],
                analysis: "Recent news flow has been positive for the markets, especially for the IT sector. The RBI policy was on expected lines, maintaining a neutral stance.".to_string(),
            },
        }
    }
}

fn index(name: &str, value: f64, change: f64, percent_change: f64) -> IndexQuote {
    IndexQuote {
        name: name.to_string(),
        value,
        change,
        percent_change,
    }
}

fn sector(name: &str, change: f64) -> SectorMove {
    SectorMove {
        name: name.to_string(),
        change,
    }
}

fn average(period: &str, value: f64, signal: Signal) -> AverageSignal {
    AverageSignal {
        period: period.to_string(),
        value,
        signal,
    }
}

fn headline(text: &str, impact: Impact, source: &str) -> Headline {
    Headline {
        headline: text.to_string(),
        impact,
        source: source.to_string(),
    }
}

const fn rsi_signal(rsi: f64) -> &'static str {
    if rsi > 70.0 {
        "OVERBOUGHT"
    } else if rsi < 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

impl MarketOverview {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Here's the current market analysis:\n\n\
             **Market Overview**: The market is currently showing {} trends. {}\n\n\
             **Sector Performance**: {}\n\n\
             **Technical Outlook**: {}",
            self.overview.market_trend.as_str(),
            self.overview.summary,
            self.sectors.analysis,
            self.technical_indicators.analysis,
        )
    }

    #[must_use]
    pub fn report(&self) -> String {
        let mut table = String::from("## Market Overview\n\n");
        table.push_str("| Index | Value | Change | % Change |\n");
        table.push_str("|-------|-------|--------|----------|\n");
        for quote in &self.overview.key_indices {
            let direction = arrow(quote.change);
            let _ = writeln!(
                table,
                "| {} | {} | {direction} {:.2} | {direction} {:.2}% |",
                quote.name,
                grouped(quote.value),
                quote.change.abs(),
                quote.percent_change.abs()
            );
        }

        table.push_str("\n## Sector Performance\n\n");
        table.push_str("### Top Performing Sectors\n\n");
        table.push_str("| Sector | Change |\n|--------|--------|\n");
        for sector in &self.sectors.top_performing {
            let _ = writeln!(table, "| {} | ▲ {:.2}% |", sector.name, sector.change);
        }
        table.push_str("\n### Worst Performing Sectors\n\n");
        table.push_str("| Sector | Change |\n|--------|--------|\n");
        for sector in &self.sectors.worst_performing {
            let _ = writeln!(table, "| {} | ▼ {:.2}% |", sector.name, sector.change.abs());
        }

        let technicals = &self.technical_indicators;
        table.push_str("\n## Technical Indicators\n\n");
        table.push_str("| Indicator | Value | Signal |\n|-----------|-------|--------|\n");
        let _ = writeln!(
            table,
            "| RSI | {:.2} | {} |",
            technicals.rsi,
            rsi_signal(technicals.rsi)
        );
        let _ = writeln!(
            table,
            "| MACD | - | {} |",
            technicals.macd.as_str().to_uppercase()
        );
        for average in &technicals.moving_averages {
            let _ = writeln!(
                table,
                "| {} MA | {} | {} |",
                average.period,
                grouped(average.value),
                average.signal.upper()
            );
        }

        table.push_str("\n## Recent News Impact\n\n");
        table.push_str("| Headline | Impact | Source |\n|----------|--------|--------|\n");
        for news in &self.news_impact.recent_news {
            let _ = writeln!(
                table,
                "| {} | {} {} | {} |",
                news.headline,
                news.impact.marker(),
                capitalize(news.impact.as_str()),
                news.source
            );
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_trend_and_outlook() {
        let summary = MarketDesk::new().market_overview(None).summary();
        assert!(summary.starts_with("Here's the current market analysis:"));
        assert!(summary.contains("The market is currently showing bullish trends."));
        assert!(summary.contains("**Technical Outlook**: Technical indicators are showing"));
    }

    #[test]
    fn report_tables_indices_and_news() {
        let report = MarketDesk::new().market_overview(None).report();
        assert!(report.contains("| NIFTY 50 | 22,450.25 | ▲ 125.75 | ▲ 0.56% |"));
        assert!(report.contains("| Pharma | ▼ 0.50% |"));
        assert!(report.contains("| RSI | 62.50 | NEUTRAL |"));
        assert!(report.contains("| 200-day MA | 20,500 | BUY |"));
        assert!(report.contains("| RBI Maintains Repo Rate at 6.5% | ⚪ Neutral | Economic Times |"));
    }

    #[test]
    fn query_is_echoed_in_metadata() {
        let overview = MarketDesk::new().market_overview(Some("banks"));
        let value = serde_json::to_value(&overview).expect("serialise");
        assert_eq!(value["query"], "banks");
        assert_eq!(value["overview"]["marketTrend"], "bullish");
        let value = serde_json::to_value(MarketDesk::new().market_overview(None)).expect("serialise");
        assert!(value.get("query").is_none());
    }
}
