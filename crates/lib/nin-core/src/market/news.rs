use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::{MarketDesk, owned};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub date: NaiveDate,
    pub summary: String,
    pub url: String,
    pub sentiment: Tone,
    pub impact: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_symbols: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EconomicEvent {
    pub title: String,
    pub date: NaiveDate,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub impact: Severity,
    pub description: String,
}

/// Headlines, sector news and the economic calendar.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarketNews {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub top_news: Vec<NewsItem>,
    pub sector_news: BTreeMap<String, Vec<NewsItem>>,
    pub economic_calendar: Vec<EconomicEvent>,
}

struct Story<'a> {
    title: &'a str,
    source: &'a str,
    offset: u64,
    summary: &'a str,
    url: &'a str,
    impact: Severity,
    related: &'a [&'a str],
}

impl Story<'_> {
    fn dated(&self, today: NaiveDate) -> NewsItem {
        NewsItem {
            title: self.title.to_string(),
            source: self.source.to_string(),
            date: shift(today, self.offset),
            summary: self.summary.to_string(),
            url: self.url.to_string(),
            sentiment: Tone::Positive,
            impact: self.impact,
            related_symbols: owned(self.related),
        }
    }
}

fn shift(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(today)
}

const TOP_NEWS: [Story<'static>; 3] = [
    Story {
        title: "RBI Maintains Repo Rate at 6.5%, Focuses on Inflation Control",
        source: "Economic Times",
        offset: 0,
        summary: "The Reserve Bank of India (RBI) kept the repo rate unchanged at 6.5% for the fifth consecutive policy meeting, prioritizing inflation management while maintaining an optimistic outlook on economic growth. The central bank projected GDP growth at 7% for the fiscal year.",
        url: "https://economictimes.indiatimes.com/news/economy/policy",
        impact: Severity::Medium,
        related: &["RBI"],
    },
    Story {
        title: "US Treasury Yields Rise, Fed Faces Inflation Expectations",
        source: "Federal Reserve",
        offset: 1,
        summary: "The U.S. Treasury Yield Curve has shifted to the right, indicating higher yields for longer-term debt. The Federal Reserve is facing concerns about inflation, with central banks projecting higher GDP growth for the fiscal year.",
        url: "https://www.federalreserve.gov/monetarypolicy/fomccalendars.htm",
        impact: Severity::Medium,
        related: &["Treasury Yield Curve"],
    },
    Story {
        title: "China's Economy Hits Record High, Boosts Trade",
        source: "Economic Times",
        offset: 2,
        summary: "China's economy has reached a record high, with trade volumes surpassing previous records. The country's central bank has announced a series of monetary policy measures to support the economy.",
        url: "https://economictimes.indiatimes.com/news/international",
        impact: Severity::High,
        related: &["China"],
    },
];

const TECHNOLOGY_NEWS: [Story<'static>; 2] = [
    Story {
        title: "Apple Inc. (AAPL) Records Strong Year-End Performance",
        source: "MarketWatch",
        offset: 0,
        summary: "Apple Inc. (AAPL) has recorded strong year-end performance, with a 20% gain in stock price. The company's earnings have been reported as positive, and analysts expect a continuation of positive earnings growth.",
        url: "https://www.marketwatch.com/investing/stock/aapl",
        impact: Severity::High,
        related: &["AAPL"],
    },
    Story {
        title: "Microsoft Corp. (MSFT) Hits Record High, Boosts Revenue",
        source: "Financial Times",
        offset: 1,
        summary: "Microsoft Corp. (MSFT) has reached a record high in stock price, with a 15% gain in the past month. The company's earnings have been reported as positive, and analysts expect a continuation of positive earnings growth.",
        url: "https://www.ft.com/investing/stock/MSFT",
        impact: Severity::High,
        related: &["MSFT"],
    },
];

const HEALTHCARE_NEWS: [Story<'static>; 2] = [
    Story {
        title: "Johnson & Johnson (JNJ) Records Strong Year-End Performance",
        source: "Investing.com",
        offset: 0,
        summary: "Johnson & Johnson (JNJ) has recorded strong year-end performance, with a 10% gain in stock price. The company's earnings have been reported as positive, and analysts expect a continuation of positive earnings growth.",
        url: "https://www.investing.com/equities/johnson-johnson",
        impact: Severity::High,
        related: &["JNJ"],
    },
    Story {
        title: "P&G (PG) Records Strong Year-End Performance",
        source: "MarketWatch",
        offset: 1,
        summary: "P&G (PG) has recorded strong year-end performance, with a 5% gain in stock price. The company's earnings have been reported as positive, and analysts expect a continuation of positive earnings growth.",
        url: "https://www.marketwatch.com/investing/stock/pg",
        impact: Severity::High,
        related: &["PG"],
    },
];

impl MarketDesk {
    /// News and calendar entries dated today, +1 and +2 days from the desk's
    /// reference date.
    #[must_use]
    pub fn market_news(&self, query: Option<&str>) -> MarketNews {
        let today = self.today();
        let dated = |stories: &[Story<'_>]| -> Vec<NewsItem> {
            stories.iter().map(|story| story.dated(today)).collect()
        };

        let mut sector_news = BTreeMap::new();
        sector_news.insert("Technology".to_string(), dated(&TECHNOLOGY_NEWS));
        sector_news.insert("Healthcare".to_string(), dated(&HEALTHCARE_NEWS));

        MarketNews {
            query: query.map(ToString::to_string),
            top_news: dated(&TOP_NEWS),
            sector_news,
            economic_calendar: vec![
                EconomicEvent {
                    title: "US GDP Growth Rate Hits Record High".to_string(),
                    date: today,
                    country: "United States".to_string(),
                    actual: Some("7.5%".to_string()),
                    forecast: Some("7.5%".to_string()),
                    previous: Some("7.0%".to_string()),
                    impact: Severity::High,
                    description: "The United States' GDP growth rate has reached a record high, with a 7.5% increase in the past quarter. The country's central bank has announced a series of monetary policy measures to support the economy.".to_string(),
                },
                EconomicEvent {
                    title: "China's GDP Growth Rate Hits Record High".to_string(),
                    date: shift(today, 1),
                    country: "China".to_string(),
                    actual: Some("9.0%".to_string()),
                    forecast: Some("9.0%".to_string()),
                    previous: Some("8.5%".to_string()),
                    impact: Severity::High,
                    description: "China's GDP growth rate has reached a record high, with a 9.0% increase in the past quarter. The country's central bank has announced a series of monetary policy measures to support the economy.".to_string(),
                },
            ],
        }
    }
}

impl MarketNews {
    #[must_use]
    pub fn summary(&self) -> String {
        let headlines = self
            .top_news
            .iter()
            .take(3)
            .map(|news| format!("- {} ({})", news.title, news.source))
            .collect::<Vec<_>>()
            .join("\n");
        let events = self
            .economic_calendar
            .iter()
            .take(3)
            .map(|event| {
                format!(
                    "- {} | {}: {} (Impact: {})",
                    event.date,
                    event.country,
                    event.title,
                    event.impact.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Here are today's top market headlines and upcoming economic events:\n\n\
             **Top Headlines**:\n{headlines}\n\n\
             **Upcoming Economic Events**:\n{events}"
        )
    }

    #[must_use]
    pub fn report(&self) -> String {
        let mut table = String::from("| Date | Headline | Source |\n|------|----------|--------|\n");
        for news in &self.top_news {
            let _ = writeln!(table, "| {} | {} | {} |", news.date, news.title, news.source);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk() -> MarketDesk {
        MarketDesk::at(NaiveDate::from_ymd_opt(2024, 3, 30).expect("valid date"))
    }

    #[test]
    fn dates_follow_reference_date() {
        let news = desk().market_news(None);
        let dates: Vec<String> = news.top_news.iter().map(|n| n.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-30", "2024-03-31", "2024-04-01"]);
        assert_eq!(news.economic_calendar[1].date.to_string(), "2024-03-31");
    }

    #[test]
    fn summary_lists_headlines_and_events() {
        let summary = desk().market_news(Some("rates")).summary();
        assert!(summary.contains("- US Treasury Yields Rise, Fed Faces Inflation Expectations (Federal Reserve)"));
        assert!(summary.contains("- 2024-03-30 | United States: US GDP Growth Rate Hits Record High (Impact: high)"));
    }

    #[test]
    fn report_is_a_dated_table() {
        let report = desk().market_news(None).report();
        assert!(report.starts_with("| Date | Headline | Source |"));
        assert!(report.contains("| 2024-04-01 | China's Economy Hits Record High, Boosts Trade | Economic Times |"));
        assert_eq!(report.lines().count(), 5);
    }

    #[test]
    fn sectors_are_keyed_by_name() {
        let value = serde_json::to_value(desk().market_news(None)).expect("serialise");
        assert_eq!(value["sectorNews"]["Technology"][0]["relatedSymbols"][0], "AAPL");
        assert_eq!(value["topNews"][0]["date"], "2024-03-30");
    }
}
