use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use super::MarketDesk;
use crate::format::{capitalize, grouped};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    const fn ticker(self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegAction {
    Buy,
    Sell,
}

impl LegAction {
    const fn label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Skew {
    Normal,
    Reverse,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TermStructure {
    Contango,
    Backwardation,
    Flat,
}

/// A profit or loss bound; `Unlimited` serialises as the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Amount(f64),
    Unlimited,
}

impl Serialize for Bound {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(value) => serializer.serialize_f64(*value),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

impl Bound {
    fn render(self) -> String {
        match self {
            Self::Amount(value) => format!("₹{value}"),
            Self::Unlimited => "Unlimited".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    pub symbol: String,
    pub underlying_symbol: String,
    #[serde(rename = "type")]
    pub kind: OptionType,
    pub strike: f64,
    pub expiration: NaiveDate,
    pub bid: f64,
    pub ask: f64,
    pub last_price: f64,
    pub volume: u64,
    pub open_interest: u64,
    pub implied_volatility: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Volatility {
    pub historical: f64,
    pub implied: f64,
    pub skew: Skew,
    pub term: TermStructure,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub put_call_ratio: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct StrategyLeg {
    pub action: LegAction,
    #[serde(rename = "type")]
    pub kind: OptionType,
    pub strike: f64,
    pub expiration: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub contracts: Vec<StrategyLeg>,
    pub max_profit: Bound,
    pub max_loss: Bound,
    pub breakeven: Vec<f64>,
    /// Zero when profit is unbounded.
    pub risk_reward_ratio: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnusualActivity {
    pub contract: OptionContract,
    pub volume: u64,
    pub open_interest_ratio: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionsAnalysis {
    pub symbol: String,
    pub current_price: f64,
    pub volatility: Volatility,
    pub sentiment: Sentiment,
    pub strategies: Vec<Strategy>,
    pub unusual_activity: Vec<UnusualActivity>,
}

impl MarketDesk {
    /// Options profile for `symbol`; unknown symbols get a flat default.
    #[must_use]
    pub fn options(&self, symbol: &str) -> OptionsAnalysis {
        match symbol {
            "RELIANCE" => reliance(),
            "INFY" => infosys(),
            other => default_profile(other),
        }
    }
}

const fn skew_str(skew: Skew) -> &'static str {
    match skew {
        Skew::Normal => "normal",
        Skew::Reverse => "reverse",
        Skew::Flat => "flat",
    }
}

const fn term_str(term: TermStructure) -> &'static str {
    match term {
        TermStructure::Contango => "contango",
        TermStructure::Backwardation => "backwardation",
        TermStructure::Flat => "flat",
    }
}

#[allow(clippy::cast_precision_loss)]
fn count(value: u64) -> String {
    grouped(value as f64)
}

fn expiry_label(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

impl OptionsAnalysis {
    fn implied_above_historical(&self) -> bool {
        self.volatility.implied > self.volatility.historical
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let relation = if self.implied_above_historical() {
            "higher"
        } else {
            "lower"
        };
        let strategies = self
            .strategies
            .iter()
            .take(2)
            .map(|strategy| strategy.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "I've analyzed the options market for {}:\n\n\
             **Current Price**: ₹{}\n\n\
             **Implied Volatility**: {:.2}% ({relation} than historical)\n\n\
             **Market Sentiment**: {}\n\n\
             **Recommended Strategies**: {strategies}",
            self.symbol,
            self.current_price,
            self.volatility.implied * 100.0,
            self.sentiment.interpretation,
        )
    }

    #[must_use]
    pub fn report(&self) -> String {
        let mut report = format!("# Options Analysis Report: {}\n\n", self.symbol);

        report.push_str("## Market Overview\n\n");
        let _ = writeln!(report, "**Current Price**: ₹{}\n", self.current_price);

        let volatility = &self.volatility;
        report.push_str("## Volatility Analysis\n\n");
        let _ = writeln!(
            report,
            "- **Historical Volatility**: {:.2}%",
            volatility.historical * 100.0
        );
        let _ = writeln!(
            report,
            "- **Implied Volatility**: {:.2}%",
            volatility.implied * 100.0
        );
        let _ = writeln!(
            report,
            "- **Volatility Skew**: {}",
            capitalize(skew_str(volatility.skew))
        );
        let _ = writeln!(
            report,
            "- **Term Structure**: {}\n",
            capitalize(term_str(volatility.term))
        );
        report.push_str(if self.implied_above_historical() {
            "Implied volatility is higher than historical volatility, suggesting the market expects more price movement than recent history would indicate.\n\n"
        } else {
            "Implied volatility is lower than or equal to historical volatility, suggesting the market expects similar or less price movement compared to recent history.\n\n"
        });

        report.push_str("## Market Sentiment\n\n");
        let _ = writeln!(
            report,
            "**Put/Call Ratio**: {:.2}\n",
            self.sentiment.put_call_ratio
        );
        let _ = writeln!(report, "{}\n", self.sentiment.interpretation);

        report.push_str("## Recommended Options Strategies\n\n");
        for (index, strategy) in self.strategies.iter().enumerate() {
            let _ = writeln!(report, "### {}. {}\n", index + 1, strategy.name);
            let _ = writeln!(report, "{}\n", strategy.description);
            report.push_str("**Contracts:**\n\n");
            for leg in &strategy.contracts {
                let _ = writeln!(
                    report,
                    "- {} {} @ ₹{} (Exp: {})",
                    leg.action.label(),
                    leg.kind.ticker(),
                    leg.strike,
                    expiry_label(leg.expiration)
                );
            }
            report.push_str("\n**Risk/Reward Profile:**\n\n");
            let _ = writeln!(report, "- **Max Profit**: {}", strategy.max_profit.render());
            let _ = writeln!(report, "- **Max Loss**: {}", strategy.max_loss.render());
            let plural = if strategy.breakeven.len() > 1 { "s" } else { "" };
            let points = strategy
                .breakeven
                .iter()
                .map(|point| format!("₹{point}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(report, "- **Breakeven Point{plural}**: {points}");
            let ratio = if strategy.risk_reward_ratio.abs() < f64::EPSILON {
                "N/A (unlimited profit potential)".to_string()
            } else {
                format!("{:.2}", strategy.risk_reward_ratio)
            };
            let _ = writeln!(report, "- **Risk/Reward Ratio**: {ratio}\n");
        }

        if !self.unusual_activity.is_empty() {
            report.push_str("## Unusual Options Activity\n\n");
            for activity in &self.unusual_activity {
                let contract = &activity.contract;
                let _ = writeln!(
                    report,
                    "### {} @ ₹{} (Exp: {})\n",
                    contract.kind.ticker(),
                    contract.strike,
                    expiry_label(contract.expiration)
                );
                let _ = writeln!(report, "- **Volume**: {}", count(activity.volume));
                let _ = writeln!(
                    report,
                    "- **Open Interest**: {}",
                    count(contract.open_interest)
                );
                let _ = writeln!(
                    report,
                    "- **Volume/OI Ratio**: {:.2}",
                    activity.open_interest_ratio
                );
                let _ = writeln!(
                    report,
                    "- **Implied Volatility**: {:.2}%\n",
                    contract.implied_volatility * 100.0
                );
                let _ = writeln!(report, "**Analysis**: {}\n", activity.description);
            }
        }
        report
    }
}

fn december_expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 15).unwrap_or_default()
}

fn leg(action: LegAction, kind: OptionType, strike: f64) -> StrategyLeg {
    StrategyLeg {
        action,
        kind,
        strike,
        expiration: december_expiry(),
    }
}

fn strategy(
    name: &str,
    description: &str,
    contracts: Vec<StrategyLeg>,
    (max_profit, max_loss): (Bound, Bound),
    breakeven: &[f64],
    risk_reward_ratio: f64,
) -> Strategy {
    Strategy {
        name: name.to_string(),
        description: description.to_string(),
        contracts,
        max_profit,
        max_loss,
        breakeven: breakeven.to_vec(),
        risk_reward_ratio,
    }
}

fn covered_call(strike: f64, max_profit: f64, max_loss: f64, breakeven: f64, ratio: f64) -> Strategy {
    strategy(
        "Covered Call",
        "Own the stock and sell a call option against it",
        vec![leg(LegAction::Sell, OptionType::Call, strike)],
        (Bound::Amount(max_profit), Bound::Amount(max_loss)),
        &[breakeven],
        ratio,
    )
}

fn reliance() -> OptionsAnalysis {
    OptionsAnalysis {
        symbol: "RELIANCE".to_string(),
        current_price: 2650.0,
        volatility: Volatility {
            historical: 0.22,
            implied: 0.25,
            skew: Skew::Normal,
            term: TermStructure::Contango,
        },
        sentiment: Sentiment {
            put_call_ratio: 0.85,
            interpretation: "Slightly bullish sentiment with moderate call buying activity"
                .to_string(),
        },
        strategies: vec![
            strategy(
                "Bull Call Spread",
                "Buy a call option and sell a higher strike call option with the same expiration",
                vec![
                    leg(LegAction::Buy, OptionType::Call, 2700.0),
                    leg(LegAction::Sell, OptionType::Call, 2800.0),
                ],
                (Bound::Amount(5000.0), Bound::Amount(3000.0)),
                &[2730.0],
                0.6,
            ),
            strategy(
                "Cash-Secured Put",
                "Sell a put option with cash set aside to buy shares if assigned",
                vec![leg(LegAction::Sell, OptionType::Put, 2600.0)],
                (Bound::Amount(4500.0), Bound::Amount(255_500.0)),
                &[2555.0],
                56.78,
            ),
            strategy(
                "Iron Condor",
                "Sell a put spread and a call spread to profit from low volatility",
                vec![
                    leg(LegAction::Buy, OptionType::Put, 2500.0),
                    leg(LegAction::Sell, OptionType::Put, 2550.0),
                    leg(LegAction::Sell, OptionType::Call, 2750.0),
                    leg(LegAction::Buy, OptionType::Call, 2800.0),
                ],
                (Bound::Amount(2500.0), Bound::Amount(2500.0)),
                &[2525.0, 2775.0],
                1.0,
            ),
        ],
        unusual_activity: vec![UnusualActivity {
            contract: OptionContract {
                symbol: "RELIANCE23DEC2700CE".to_string(),
                underlying_symbol: "RELIANCE".to_string(),
                kind: OptionType::Call,
                strike: 2700.0,
                expiration: december_expiry(),
                bid: 45.5,
                ask: 46.5,
                last_price: 46.0,
                volume: 3500,
                open_interest: 1200,
                implied_volatility: 0.28,
                delta: 0.45,
                gamma: 0.002,
                theta: -0.35,
                vega: 0.15,
                rho: 0.05,
            },
            volume: 3500,
            open_interest_ratio: 2.92,
            description:
                "Unusual call buying activity at 2700 strike, suggesting bullish sentiment"
                    .to_string(),
        }],
    }
}

fn infosys() -> OptionsAnalysis {
    OptionsAnalysis {
        symbol: "INFY".to_string(),
        current_price: 1600.0,
        volatility: Volatility {
            historical: 0.25,
            implied: 0.28,
            skew: Skew::Normal,
            term: TermStructure::Flat,
        },
        sentiment: Sentiment {
            put_call_ratio: 0.95,
            interpretation: "Neutral sentiment with balanced put and call activity".to_string(),
        },
        strategies: vec![
            covered_call(1650.0, 7500.0, 152_500.0, 1525.0, 20.33),
            strategy(
                "Protective Put",
                "Own the stock and buy a put option to protect downside",
                vec![leg(LegAction::Buy, OptionType::Put, 1550.0)],
                (Bound::Unlimited, Bound::Amount(8000.0)),
                &[1630.0],
                0.0,
            ),
        ],
        unusual_activity: Vec::new(),
    }
}

fn default_profile(symbol: &str) -> OptionsAnalysis {
    OptionsAnalysis {
        symbol: symbol.to_string(),
        current_price: 1000.0,
        volatility: Volatility {
            historical: 0.20,
            implied: 0.20,
            skew: Skew::Flat,
            term: TermStructure::Flat,
        },
        sentiment: Sentiment {
            put_call_ratio: 1.0,
            interpretation: "Neutral market sentiment".to_string(),
        },
        strategies: vec![covered_call(1050.0, 5000.0, 95_000.0, 950.0, 19.0)],
        unusual_activity: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summary_lists_first_two_strategies() {
        let summary = MarketDesk::new().options("RELIANCE").summary();
        assert!(summary.contains("**Implied Volatility**: 25.00% (higher than historical)"));
        assert!(summary.contains("**Recommended Strategies**: Bull Call Spread, Cash-Secured Put"));
        assert!(!summary.contains("Iron Condor"));
    }

    #[test]
    fn unlimited_profit_serialises_as_string() {
        let analysis = MarketDesk::new().options("INFY");
        let value = serde_json::to_value(&analysis).expect("serialise");
        assert_eq!(value["strategies"][1]["maxProfit"], json!("unlimited"));
        assert_eq!(value["strategies"][1]["maxLoss"], json!(8000.0));
        assert_eq!(value["strategies"][0]["contracts"][0]["expiration"], json!("2023-12-15"));
    }

    #[test]
    fn report_renders_legs_and_activity() {
        let report = MarketDesk::new().options("RELIANCE").report();
        assert!(report.contains("- Buy CALL @ ₹2700 (Exp: 15 Dec 2023)"));
        assert!(report.contains("- **Breakeven Points**: ₹2525, ₹2775"));
        assert!(report.contains("## Unusual Options Activity"));
        assert!(report.contains("- **Volume**: 3,500"));
    }

    #[test]
    fn unknown_symbol_uses_flat_default() {
        let analysis = MarketDesk::new().options("ZOMATO");
        assert_eq!(analysis.symbol, "ZOMATO");
        assert_eq!(analysis.strategies.len(), 1);
        let report = analysis.report();
        assert!(report.contains("lower than or equal to historical volatility"));
        assert!(!report.contains("Unusual Options Activity"));
        let infy = MarketDesk::new().options("INFY").report();
        assert!(infy.contains("N/A (unlimited profit potential)"));
        assert!(infy.contains("- **Max Profit**: Unlimited"));
    }
}
