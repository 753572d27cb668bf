use std::fmt::Write;

use serde::Serialize;

use super::{MarketDesk, Outlook, Rating, owned};
use crate::format::{arrow, capitalize, sign};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BandSignal {
    Squeeze,
    Expansion,
    Neutral,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Short,
    Medium,
    Long,
}

impl Timeframe {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub current: f64,
    pub change: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trends {
    pub primary: Outlook,
    pub secondary: Outlook,
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Rsi {
    pub value: f64,
    pub signal: RsiSignal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: Outlook,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
    pub signal: BandSignal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MovingAverages {
    pub ma20: f64,
    pub ma50: f64,
    pub ma100: f64,
    pub ma200: f64,
    pub signal: Outlook,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub rsi: Rsi,
    pub macd: Macd,
    pub bollinger_bands: BollingerBands,
    pub moving_averages: MovingAverages,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Patterns {
    pub candlestick: Vec<String>,
    pub chart: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Volume {
    pub current: f64,
    pub average: f64,
    pub trend: VolumeTrend,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TechnicalRecommendation {
    pub action: Rating,
    pub timeframe: Timeframe,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TechnicalAnalysis {
    pub symbol: String,
    pub price: PriceSnapshot,
    pub trends: Trends,
    pub indicators: Indicators,
    pub patterns: Patterns,
    pub volume: Volume,
    pub recommendation: TechnicalRecommendation,
}

impl MarketDesk {
    /// Technical profile for `symbol`; unknown symbols get a flat default.
    #[must_use]
    pub fn technicals(&self, symbol: &str) -> TechnicalAnalysis {
        match symbol {
            "RELIANCE" => reliance(),
            "INFY" => infosys(),
            "HDFCBANK" => hdfc_bank(),
            "SUNPHARMA" => sun_pharma(),
            other => default_profile(other),
        }
    }
}

const fn rsi_label(value: f64) -> &'static str {
    if value >= 70.0 {
        "Overbought"
    } else if value <= 30.0 {
        "Oversold"
    } else {
        "Neutral"
    }
}

const fn rsi_signal_str(signal: RsiSignal) -> &'static str {
    match signal {
        RsiSignal::Overbought => "overbought",
        RsiSignal::Oversold => "oversold",
        RsiSignal::Neutral => "neutral",
    }
}

const fn band_signal_str(signal: BandSignal) -> &'static str {
    match signal {
        BandSignal::Squeeze => "squeeze",
        BandSignal::Expansion => "expansion",
        BandSignal::Neutral => "neutral",
    }
}

const fn volume_trend_str(trend: VolumeTrend) -> &'static str {
    match trend {
        VolumeTrend::Increasing => "increasing",
        VolumeTrend::Decreasing => "decreasing",
        VolumeTrend::Stable => "stable",
    }
}

fn levels(values: &[f64]) -> String {
    values
        .iter()
        .map(|level| format!("₹{level}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl TechnicalAnalysis {
    #[must_use]
    pub fn summary(&self) -> String {
        let price = &self.price;
        format!(
            "Here's the technical analysis for {symbol}:\n\n\
             **Current Price**: ₹{current} ({change_sign}{change} / {pct_sign}{pct}%)\n\n\
             **Trend**: {primary} (primary), {secondary} (secondary)\n\n\
             **Key Indicators**: RSI at {rsi} ({rsi_signal}), MACD is {macd}\n\n\
             **Recommendation**: {action} for {timeframe}-term",
            symbol = self.symbol,
            current = price.current,
            change_sign = sign(price.change),
            change = price.change,
            pct_sign = sign(price.percent_change),
            pct = price.percent_change,
            primary = capitalize(self.trends.primary.as_str()),
            secondary = capitalize(self.trends.secondary.as_str()),
            rsi = self.indicators.rsi.value,
            rsi_signal = rsi_signal_str(self.indicators.rsi.signal),
            macd = self.indicators.macd.trend.as_str(),
            action = capitalize(self.recommendation.action.as_str()),
            timeframe = self.recommendation.timeframe.as_str(),
        )
    }

    #[must_use]
    pub fn report(&self) -> String {
        let price = &self.price;
        let indicators = &self.indicators;
        let mut report = format!("# Technical Analysis Report: {}\n\n", self.symbol);

        report.push_str("## Price Information\n\n");
        let direction = arrow(price.change);
        let _ = writeln!(
            report,
            "Current Price: ₹{} ({direction} {:.2} / {direction} {:.2}%)\n",
            price.current,
            price.change.abs(),
            price.percent_change.abs()
        );

        report.push_str("## Trend Analysis\n\n");
        let _ = writeln!(report, "- Primary Trend: {}", capitalize(self.trends.primary.as_str()));
        let _ = writeln!(
            report,
            "- Secondary Trend: {}\n",
            capitalize(self.trends.secondary.as_str())
        );
        report.push_str("### Support & Resistance Levels\n\n");
        let _ = writeln!(report, "- Support Levels: {}", levels(&self.trends.support));
        let _ = writeln!(
            report,
            "- Resistance Levels: {}\n",
            levels(&self.trends.resistance)
        );

        report.push_str("## Technical Indicators\n\n");
        report.push_str("### RSI (Relative Strength Index)\n\n");
        let _ = writeln!(
            report,
            "Value: {} ({})",
            indicators.rsi.value,
            rsi_signal_str(indicators.rsi.signal)
        );
        let _ = writeln!(report, "{}\n", rsi_label(indicators.rsi.value));

        let macd = &indicators.macd;
        report.push_str("### MACD (Moving Average Convergence Divergence)\n\n");
        let _ = writeln!(report, "- MACD Line: {:.2}", macd.value);
        let _ = writeln!(report, "- Signal Line: {:.2}", macd.signal);
        let _ = writeln!(report, "- Histogram: {:.2}", macd.histogram);
        let _ = writeln!(report, "- Trend: {}\n", capitalize(macd.trend.as_str()));

        let bands = &indicators.bollinger_bands;
        report.push_str("### Bollinger Bands\n\n");
        let _ = writeln!(report, "- Upper Band: ₹{}", bands.upper);
        let _ = writeln!(report, "- Middle Band: ₹{}", bands.middle);
        let _ = writeln!(report, "- Lower Band: ₹{}", bands.lower);
        let _ = writeln!(report, "- Band Width: {:.2}%", bands.width);
        let _ = writeln!(
            report,
            "- Signal: {}\n",
            capitalize(band_signal_str(bands.signal))
        );

        let averages = &indicators.moving_averages;
        report.push_str("### Moving Averages\n\n");
        for (label, value) in [
            ("20-day", averages.ma20),
            ("50-day", averages.ma50),
            ("100-day", averages.ma100),
            ("200-day", averages.ma200),
        ] {
            let position = if price.current > value {
                "Price Above"
            } else {
                "Price Below"
            };
            let _ = writeln!(report, "- {label} MA: ₹{value} ({position})");
        }

        if !self.patterns.candlestick.is_empty() || !self.patterns.chart.is_empty() {
            report.push_str("\n## Patterns\n\n");
            if !self.patterns.candlestick.is_empty() {
                let _ = writeln!(
                    report,
                    "- Candlestick: {}",
                    self.patterns.candlestick.join(", ")
                );
            }
            if !self.patterns.chart.is_empty() {
                let _ = writeln!(report, "- Chart: {}", self.patterns.chart.join(", "));
            }
        }

        report.push_str("\n## Volume\n\n");
        let _ = writeln!(
            report,
            "- Current: {} | Average: {} ({})",
            crate::format::grouped(self.volume.current),
            crate::format::grouped(self.volume.average),
            volume_trend_str(self.volume.trend)
        );

        report.push_str("\n## Recommendation\n\n");
        let _ = writeln!(
            report,
            "**{}** ({}-term): {}",
            capitalize(self.recommendation.action.as_str()),
            self.recommendation.timeframe.as_str(),
            self.recommendation.reasoning
        );
        report
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    symbol: &str,
    price: (f64, f64, f64),
    trends: (Outlook, Outlook, &[f64], &[f64]),
    rsi: f64,
    macd: Macd,
    bollinger_bands: BollingerBands,
    moving_averages: MovingAverages,
    patterns: (&[&str], &[&str]),
    volume: Volume,
    recommendation: (Rating, Timeframe, &str),
) -> TechnicalAnalysis {
    TechnicalAnalysis {
        symbol: symbol.to_string(),
        price: PriceSnapshot {
            current: price.0,
            change: price.1,
            percent_change: price.2,
        },
        trends: Trends {
            primary: trends.0,
            secondary: trends.1,
            support: trends.2.to_vec(),
            resistance: trends.3.to_vec(),
        },
        indicators: Indicators {
            rsi: Rsi {
                value: rsi,
                signal: RsiSignal::Neutral,
            },
            macd,
            bollinger_bands,
            moving_averages,
        },
        patterns: Patterns {
            candlestick: owned(patterns.0),
            chart: owned(patterns.1),
        },
        volume,
        recommendation: TechnicalRecommendation {
            action: recommendation.0,
            timeframe: recommendation.1,
            reasoning: recommendation.2.to_string(),
        },
    }
}

const fn macd(value: f64, signal: f64, histogram: f64, trend: Outlook) -> Macd {
    Macd {
        value,
        signal,
        histogram,
        trend,
    }
}

const fn bands(upper: f64, middle: f64, lower: f64, width: f64, signal: BandSignal) -> BollingerBands {
    BollingerBands {
        upper,
        middle,
        lower,
        width,
        signal,
    }
}

const fn averages(ma20: f64, ma50: f64, ma100: f64, ma200: f64, signal: Outlook) -> MovingAverages {
    MovingAverages {
        ma20,
        ma50,
        ma100,
        ma200,
        signal,
    }
}

const fn volume(current: f64, average: f64, trend: VolumeTrend) -> Volume {
    Volume {
        current,
        average,
        trend,
    }
}

fn reliance() -> TechnicalAnalysis {
    profile(
        "RELIANCE",
        (2650.0, 25.5, 0.97),
        (
            Outlook::Bullish,
            Outlook::Bullish,
            &[2580.0, 2520.0, 2450.0],
            &[2680.0, 2750.0, 2820.0],
        ),
        62.0,
        macd(15.2, 10.5, 4.7, Outlook::Bullish),
        bands(2720.0, 2600.0, 2480.0, 9.2, BandSignal::Neutral),
        averages(2620.0, 2550.0, 2480.0, 2400.0, Outlook::Bullish),
        (
            &["Bullish Engulfing", "Three White Soldiers"],
            &["Ascending Triangle", "Cup and Handle"],
        ),
        volume(5_000_000.0, 4_200_000.0, VolumeTrend::Increasing),
        (
            Rating::Buy,
            Timeframe::Medium,
            "Strong uptrend with increasing volume and positive technical indicators. Price is above all major moving averages with bullish MACD crossover.",
        ),
    )
}

fn infosys() -> TechnicalAnalysis {
    profile(
        "INFY",
        (1600.0, 22.5, 1.43),
        (
            Outlook::Bullish,
            Outlook::Neutral,
            &[1550.0, 1520.0, 1480.0],
            &[1620.0, 1650.0, 1680.0],
        ),
        65.0,
        macd(12.5, 8.2, 4.3, Outlook::Bullish),
        bands(1640.0, 1580.0, 1520.0, 7.6, BandSignal::Neutral),
        averages(1580.0, 1550.0, 1520.0, 1450.0, Outlook::Bullish),
        (&["Morning Star", "Hammer"], &["Double Bottom", "Breakout"]),
        volume(3_000_000.0, 2_800_000.0, VolumeTrend::Increasing),
        (
            Rating::Buy,
            Timeframe::Medium,
            "Stock is in an uptrend with positive momentum. All moving averages are aligned bullishly and volume is increasing on up days.",
        ),
    )
}

fn hdfc_bank() -> TechnicalAnalysis {
    profile(
        "HDFCBANK",
        (1550.0, -8.5, -0.55),
        (
            Outlook::Neutral,
            Outlook::Bearish,
            &[1520.0, 1500.0, 1480.0],
            &[1580.0, 1600.0, 1620.0],
        ),
        45.0,
        macd(-2.5, -1.8, -0.7, Outlook::Neutral),
        bands(1600.0, 1560.0, 1520.0, 5.1, BandSignal::Squeeze),
        averages(1560.0, 1520.0, 1500.0, 1480.0, Outlook::Neutral),
        (&["Doji", "Spinning Top"], &["Rectangle", "Consolidation"]),
        volume(4_000_000.0, 4_200_000.0, VolumeTrend::Stable),
        (
            Rating::Hold,
            Timeframe::Medium,
            "Stock is consolidating in a range with neutral indicators. Wait for a clear breakout direction before taking new positions.",
        ),
    )
}

fn sun_pharma() -> TechnicalAnalysis {
    profile(
        "SUNPHARMA",
        (1050.0, -12.5, -1.18),
        (
            Outlook::Bearish,
            Outlook::Bearish,
            &[1020.0, 1000.0, 980.0],
            &[1080.0, 1100.0, 1120.0],
        ),
        38.0,
        macd(-8.5, -5.2, -3.3, Outlook::Bearish),
        bands(1100.0, 1070.0, 1040.0, 5.6, BandSignal::Neutral),
        averages(1070.0, 1080.0, 1060.0, 1020.0, Outlook::Bearish),
        (
            &["Bearish Engulfing", "Evening Star"],
            &["Head and Shoulders", "Descending Triangle"],
        ),
        volume(1_500_000.0, 1_300_000.0, VolumeTrend::Increasing),
        (
            Rating::Sell,
            Timeframe::Short,
            "Stock is in a downtrend with bearish indicators. Price is below key moving averages with increasing volume on down days.",
        ),
    )
}

fn default_profile(symbol: &str) -> TechnicalAnalysis {
    profile(
        symbol,
        (1000.0, 0.0, 0.0),
        (
            Outlook::Neutral,
            Outlook::Neutral,
            &[950.0, 900.0],
            &[1050.0, 1100.0],
        ),
        50.0,
        macd(0.0, 0.0, 0.0, Outlook::Neutral),
        bands(1050.0, 1000.0, 950.0, 10.0, BandSignal::Neutral),
        averages(1000.0, 1000.0, 1000.0, 1000.0, Outlook::Neutral),
        (&[], &[]),
        volume(1_000_000.0, 1_000_000.0, VolumeTrend::Stable),
        (
            Rating::Hold,
            Timeframe::Medium,
            "Insufficient data for a strong recommendation.",
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_neutral_hold() {
        let analysis = MarketDesk::new().technicals("UNLISTED");
        assert_eq!(analysis.symbol, "UNLISTED");
        assert!((analysis.indicators.rsi.value - 50.0).abs() < f64::EPSILON);
        assert_eq!(analysis.recommendation.action, Rating::Hold);
        assert_eq!(
            analysis.recommendation.reasoning,
            "Insufficient data for a strong recommendation."
        );
        assert!(analysis.patterns.candlestick.is_empty());
    }

    #[test]
    fn summary_carries_signed_change() {
        let summary = MarketDesk::new().technicals("HDFCBANK").summary();
        assert!(summary.contains("**Current Price**: ₹1550 (-8.5 / -0.55%)"));
        assert!(summary.contains("Neutral (primary), Bearish (secondary)"));
        assert!(summary.contains("**Recommendation**: Hold for medium-term"));
    }

    #[test]
    fn report_places_price_against_moving_averages() {
        let report = MarketDesk::new().technicals("SUNPHARMA").report();
        assert!(report.contains("Current Price: ₹1050 (▼ 12.50 / ▼ 1.18%)"));
        assert!(report.contains("- 50-day MA: ₹1080 (Price Below)"));
        assert!(report.contains("- 200-day MA: ₹1020 (Price Above)"));
        assert!(report.contains("- Support Levels: ₹1020, ₹1000, ₹980"));
    }
}
