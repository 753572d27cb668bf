//! Groww handlers: one provider call each, rendered into an envelope whose
//! reference metadata is the raw broker response.

use std::fmt::Write;

use nin_store::envelope::{Reference, ResponseEnvelope};
use nin_store::models::groww::{
    GrowwHolding, GrowwPosition, GrowwQuote, LtpPayload, OhlcPayload, OrderAck, OrderDetail,
    OrderMargin, UserMargin,
};

use super::{NinControlPlane, ToolError};
use crate::format::{grouped, rupees, rupees_grouped, strip_exchange_prefix};
use crate::providers::Fetched;
use crate::request::{
    MarginOrder, ModifyOrderArgs, OrderIdArgs, OrderMarginArgs, PlaceOrderArgs, PositionsArgs,
    QuoteArgs, SymbolsArgs,
};

const TABLE_ROWS: usize = 20;

fn raw_envelope<T>(
    summary: String,
    title: impl Into<String>,
    content: impl Into<String>,
    fetched: Fetched<T>,
) -> ResponseEnvelope {
    ResponseEnvelope::success(
        summary,
        Reference::text(title, content).with_metadata(fetched.raw),
    )
}

impl NinControlPlane {
    /// `getGrowwHoldings`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_holdings(&self) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .holdings()
            .await
            .map_err(ToolError::provider("Error fetching Groww holdings"))?;
        let holdings = &fetched.payload.holdings;
        let invested: f64 = holdings.iter().map(|h| h.quantity * h.average_price).sum();
        let summary = format!(
            "Here are your current Groww holdings:\n\n\
             Total Holdings: {} stocks\n\
             Total Investment Value: ₹{}\n\n{}",
            holdings.len(),
            grouped(invested),
            holdings_table(holdings)
        );
        Ok(raw_envelope(
            summary,
            "Groww Holdings Data",
            "Complete Groww holdings information",
            fetched,
        ))
    }

    /// `getGrowwPositions`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_positions(&self, args: &PositionsArgs) -> Result<ResponseEnvelope, ToolError> {
        let segment = args.segment.as_deref().filter(|s| !s.is_empty());
        let fetched = self
            .groww
            .positions(segment)
            .await
            .map_err(ToolError::provider("Error fetching Groww positions"))?;
        let scope = segment.map(|s| format!(" for {s}")).unwrap_or_default();
        let positions = &fetched.payload.positions;
        let summary = format!(
            "Here are your current Groww positions{scope}:\n\n\
             Total Positions: {}\n\n{}",
            positions.len(),
            positions_table(positions)
        );
        Ok(raw_envelope(
            summary,
            "Groww Positions Data",
            format!("Groww positions information{scope}"),
            fetched,
        ))
    }

    /// `getGrowwSymbolsLTP`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_ltp(&self, args: &SymbolsArgs) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .ltp(&args.symbols, &args.segment)
            .await
            .map_err(ToolError::provider("Error fetching LTP data"))?;
        let summary = format!(
            "Last Traded Prices for {} symbols:\n\n{}",
            args.symbols.len(),
            ltp_table(&fetched.payload)
        );
        Ok(raw_envelope(
            summary,
            "Groww LTP Data",
            "Last traded prices for requested symbols",
            fetched,
        ))
    }

    /// `getGrowwSymbolsOHLC`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_ohlc(&self, args: &SymbolsArgs) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .ohlc(&args.symbols, &args.segment)
            .await
            .map_err(ToolError::provider("Error fetching OHLC data"))?;
        let summary = format!(
            "OHLC Data for {} symbols:\n\n{}",
            args.symbols.len(),
            ohlc_table(&fetched.payload)
        );
        Ok(raw_envelope(
            summary,
            "Groww OHLC Data",
            "OHLC data for requested symbols",
            fetched,
        ))
    }

    /// `getGrowwSymbolQuote`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_quote(&self, args: &QuoteArgs) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .quote(&args.symbol, &args.exchange, &args.segment)
            .await
            .map_err(ToolError::provider(format!(
                "Error fetching quote for {}",
                args.symbol
            )))?;
        let summary = format!(
            "Detailed Quote for {}:\n\n{}",
            args.symbol,
            quote_summary(&args.symbol, &fetched.payload)
        );
        Ok(raw_envelope(
            summary,
            format!("Groww Quote - {}", args.symbol),
            format!("Detailed quote information for {}", args.symbol),
            fetched,
        ))
    }

    /// `placeGrowwOrder`
    ///
    /// # Errors
    /// Returns a provider or configuration error when Groww rejects the order.
    pub async fn place_groww_order(
        &self,
        args: &PlaceOrderArgs,
    ) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .place_order(args)
            .await
            .map_err(ToolError::provider("Error placing order"))?;
        let ack = &fetched.payload;
        let mut summary = format!(
            "Order placed successfully!\n\n\
             Order ID: {}\n\
             Status: {}\n\
             Symbol: {}\n\
             Quantity: {}\n\
             Type: {} {}\n",
            ack.groww_order_id,
            ack.order_status,
            args.trading_symbol,
            args.quantity,
            args.transaction_type,
            args.order_type
        );
        summary.push_str(&remark_line(ack));
        Ok(raw_envelope(
            summary,
            "Order Placement Response",
            "Order placement details",
            fetched,
        ))
    }

    /// `modifyGrowwOrder`
    ///
    /// # Errors
    /// Returns a provider or configuration error when Groww rejects the change.
    pub async fn modify_groww_order(
        &self,
        args: &ModifyOrderArgs,
    ) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .modify_order(args)
            .await
            .map_err(ToolError::provider("Error modifying order"))?;
        let summary = ack_summary("Order modified successfully!", &fetched.payload);
        Ok(raw_envelope(
            summary,
            "Order Modification Response",
            "Order modification details",
            fetched,
        ))
    }

    /// `cancelGrowwOrder`
    ///
    /// # Errors
    /// Returns a provider or configuration error when Groww rejects the cancel.
    pub async fn cancel_groww_order(&self, args: &OrderIdArgs) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .cancel_order(&args.order_id, &args.segment)
            .await
            .map_err(ToolError::provider("Error cancelling order"))?;
        let summary = ack_summary("Order cancelled successfully!", &fetched.payload);
        Ok(raw_envelope(
            summary,
            "Order Cancellation Response",
            "Order cancellation details",
            fetched,
        ))
    }

    /// `getGrowwOrderStatus`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_order_status(&self, args: &OrderIdArgs) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .order_detail(&args.order_id, &args.segment)
            .await
            .map_err(ToolError::provider("Error fetching order status"))?;
        let summary = order_detail_summary(&fetched.payload);
        Ok(raw_envelope(
            summary,
            format!("Order Details - {}", args.order_id),
            "Complete order information",
            fetched,
        ))
    }

    /// `getGrowwUserMargin`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_user_margin(&self) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .user_margin()
            .await
            .map_err(ToolError::provider("Error fetching user margin"))?;
        let summary = format!(
            "Your current Groww margin details:\n\n{}",
            user_margin_summary(&fetched.payload)
        );
        Ok(raw_envelope(
            summary,
            "Groww User Margin",
            "Complete user margin information",
            fetched,
        ))
    }

    /// `getGrowwOrderMargin`
    ///
    /// # Errors
    /// Returns a provider or configuration error when the Groww call fails.
    pub async fn groww_order_margin(
        &self,
        args: &OrderMarginArgs,
    ) -> Result<ResponseEnvelope, ToolError> {
        let fetched = self
            .groww
            .order_margin(&args.orders, &args.segment)
            .await
            .map_err(ToolError::provider("Error calculating order margin"))?;
        let subject = match args.orders.len() {
            1 => "order".to_string(),
            n => format!("{n} orders"),
        };
        let summary = format!(
            "Margin requirement for {subject}:\n\n{}",
            order_margin_summary(&fetched.payload, &args.orders)
        );
        Ok(raw_envelope(
            summary,
            "Groww Order Margin",
            "Margin requirement calculation",
            fetched,
        ))
    }
}

fn holdings_table(holdings: &[GrowwHolding]) -> String {
    if holdings.is_empty() {
        return "No holdings found in your Groww account.".to_string();
    }
    let mut table = String::from("**Current Holdings:**\n\n");
    table.push_str("| Symbol | Quantity | Avg Price | Current Value | Free Qty |\n");
    table.push_str("|--------|----------|-----------|---------------|----------|\n");
    for holding in holdings.iter().take(TABLE_ROWS) {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} |",
            holding.trading_symbol,
            holding.quantity,
            rupees(holding.average_price),
            rupees_grouped(holding.quantity * holding.average_price),
            holding.demat_free_quantity
        );
    }
    if holdings.len() > TABLE_ROWS {
        let _ = write!(table, "\n... and {} more holdings.", holdings.len() - TABLE_ROWS);
    }
    table
}

fn positions_table(positions: &[GrowwPosition]) -> String {
    if positions.is_empty() {
        return "No positions found in your Groww account.".to_string();
    }
    let mut table = String::from("**Current Positions:**\n\n");
    table.push_str("| Symbol | Qty | Net Price | Credit Qty | Debit Qty | Product | Exchange |\n");
    table.push_str("|--------|-----|-----------|------------|-----------|---------|----------|\n");
    for position in positions.iter().take(TABLE_ROWS) {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {} |",
            position.trading_symbol,
            position.quantity,
            rupees(position.net_price),
            position.credit_quantity,
            position.debit_quantity,
            position.product,
            position.exchange
        );
    }
    if positions.len() > TABLE_ROWS {
        let _ = write!(table, "\n... and {} more positions.", positions.len() - TABLE_ROWS);
    }
    table
}

fn ltp_table(prices: &LtpPayload) -> String {
    let mut table = String::from("**Last Traded Prices:**\n\n| Symbol | LTP |\n|--------|-----|\n");
    for (symbol, price) in prices {
        let _ = writeln!(
            table,
            "| {} | {} |",
            strip_exchange_prefix(symbol),
            rupees(*price)
        );
    }
    table
}

fn ohlc_table(bars: &OhlcPayload) -> String {
    let mut table = String::from("**OHLC Data:**\n\n");
    table.push_str("| Symbol | Open | High | Low | Close |\n");
    table.push_str("|--------|------|------|-----|-------|\n");
    for (symbol, value) in bars {
        let symbol = strip_exchange_prefix(symbol);
        match value.resolve() {
            Some(ohlc) => {
                let _ = writeln!(
                    table,
                    "| {symbol} | {} | {} | {} | {} |",
                    rupees(ohlc.open),
                    rupees(ohlc.high),
                    rupees(ohlc.low),
                    rupees(ohlc.close)
                );
            }
            None => {
                let _ = writeln!(table, "| {symbol} | - | - | - | - |");
            }
        }
    }
    table
}

fn quote_summary(symbol: &str, quote: &GrowwQuote) -> String {
    let mut summary = format!("**{symbol} - Detailed Quote:**\n\n");

    summary.push_str("**Price Information:**\n");
    let _ = writeln!(summary, "- Last Price: {}", rupees(quote.last_price));
    let _ = writeln!(
        summary,
        "- Day Change: {} ({:.2}%)",
        rupees(quote.day_change),
        quote.day_change_perc
    );
    let _ = writeln!(summary, "- Bid: {} ({})", rupees(quote.bid_price), quote.bid_quantity);
    let _ = writeln!(
        summary,
        "- Ask: {} ({})\n",
        rupees(quote.offer_price),
        quote.offer_quantity
    );

    summary.push_str("**Trading Information:**\n");
    let _ = writeln!(summary, "- Volume: {}", grouped(quote.volume));
    let _ = writeln!(summary, "- High: {}", rupees(quote.high_trade_range));
    let _ = writeln!(summary, "- Low: {}", rupees(quote.low_trade_range));
    let _ = writeln!(summary, "- 52W High: {}", rupees(quote.week_52_high));
    let _ = writeln!(summary, "- 52W Low: {}\n", rupees(quote.week_52_low));

    summary.push_str("**Circuit Limits:**\n");
    let _ = writeln!(summary, "- Upper: {}", rupees(quote.upper_circuit_limit));
    let _ = writeln!(summary, "- Lower: {}\n", rupees(quote.lower_circuit_limit));

    if let Some(market_cap) = quote.market_cap.filter(|cap| *cap > 0.0) {
        let _ = writeln!(summary, "**Market Cap:** {}\n", rupees_grouped(market_cap));
    }

    for (label, levels) in [("Bid", &quote.depth.buy), ("Ask", &quote.depth.sell)] {
        if levels.is_empty() {
            continue;
        }
        let _ = writeln!(summary, "**Top 3 {label} Levels:**");
        for (index, level) in levels.iter().take(3).enumerate() {
            let _ = writeln!(
                summary,
                "{}. {} ({})",
                index + 1,
                rupees(level.price),
                level.quantity
            );
        }
        summary.push('\n');
    }
    summary
}

fn remark_line(ack: &OrderAck) -> String {
    ack.remark
        .as_deref()
        .filter(|remark| !remark.is_empty())
        .map(|remark| format!("Remark: {remark}"))
        .unwrap_or_default()
}

fn ack_summary(headline: &str, ack: &OrderAck) -> String {
    format!(
        "{headline}\n\nOrder ID: {}\nStatus: {}\n{}",
        ack.groww_order_id,
        ack.order_status,
        remark_line(ack)
    )
}

fn order_detail_summary(order: &OrderDetail) -> String {
    let mut summary = format!("**Order Details - {}**\n\n", order.groww_order_id);

    summary.push_str("**Basic Information:**\n");
    let _ = writeln!(summary, "- Symbol: {}", order.trading_symbol);
    let _ = writeln!(
        summary,
        "- Type: {} {}",
        order.transaction_type, order.order_type
    );
    let _ = writeln!(summary, "- Status: {}", order.order_status);
    let _ = writeln!(summary, "- Exchange: {} ({})", order.exchange, order.segment);
    let _ = writeln!(summary, "- Product: {}\n", order.product);

    summary.push_str("**Quantity & Price:**\n");
    let _ = writeln!(summary, "- Quantity: {}", order.quantity);
    if let Some(filled) = order.filled_quantity {
        let _ = writeln!(summary, "- Filled: {filled}");
    }
    if let Some(pending) = order.remaining_quantity {
        let _ = writeln!(summary, "- Pending: {pending}");
    }
    let _ = writeln!(summary, "- Price: {}", rupees(order.price));
    if let Some(trigger) = order.trigger_price.filter(|price| *price > 0.0) {
        let _ = writeln!(summary, "- Trigger Price: {}", rupees(trigger));
    }
    if let Some(average) = order.average_fill_price {
        let _ = writeln!(summary, "- Average Fill Price: {}", rupees(average));
    }
    let _ = writeln!(summary, "- Validity: {}\n", order.validity);

    if let Some(created) = &order.created_at {
        summary.push_str("**Timing:**\n");
        let _ = writeln!(summary, "- Created: {created}");
        if let Some(exchange_time) = &order.exchange_time {
            let _ = writeln!(summary, "- Exchange Time: {exchange_time}");
        }
        if let Some(trade_date) = &order.trade_date {
            let _ = writeln!(summary, "- Trade Date: {trade_date}");
        }
        summary.push('\n');
    }

    if let Some(amo) = order.amo_status.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(summary, "**AMO Status:** {amo}");
    }
    if let Some(remark) = order.remark.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(summary, "**Remark:** {remark}");
    }
    summary
}

fn user_margin_summary(margin: &UserMargin) -> String {
    let equity = &margin.equity_margin_details;
    let fno = &margin.fno_margin_details;
    let mut summary = String::from("**Account Margin Overview:**\n\n");

    summary.push_str("**Cash & Collateral:**\n");
    let _ = writeln!(summary, "- Clear Cash: {}", rupees_grouped(margin.clear_cash));
    let _ = writeln!(summary, "- Net Margin Used: {}", rupees_grouped(margin.net_margin_used));
    let _ = writeln!(
        summary,
        "- Collateral Available: {}",
        rupees_grouped(margin.collateral_available)
    );
    let _ = writeln!(summary, "- Collateral Used: {}", rupees_grouped(margin.collateral_used));
    if margin.adhoc_margin > 0.0 {
        let _ = writeln!(summary, "- Adhoc Margin: {}", rupees_grouped(margin.adhoc_margin));
    }
    summary.push('\n');

    summary.push_str("**Equity Trading:**\n");
    for (label, value) in [
        ("Net Equity Margin Used", equity.net_equity_margin_used),
        ("CNC Balance Available", equity.cnc_balance_available),
        ("CNC Margin Used", equity.cnc_margin_used),
        ("MIS Balance Available", equity.mis_balance_available),
        ("MIS Margin Used", equity.mis_margin_used),
    ] {
        let _ = writeln!(summary, "- {label}: {}", rupees_grouped(value));
    }
    summary.push('\n');

    summary.push_str("**F&O Trading:**\n");
    for (label, value) in [
        ("Net F&O Margin Used", fno.net_fno_margin_used),
        ("Future Balance Available", fno.future_balance_available),
        ("Option Buy Balance", fno.option_buy_balance_available),
        ("Option Sell Balance", fno.option_sell_balance_available),
        ("SPAN Margin Used", fno.span_margin_used),
        ("Exposure Margin Used", fno.exposure_margin_used),
    ] {
        let _ = writeln!(summary, "- {label}: {}", rupees_grouped(value));
    }
    summary.push('\n');

    summary.push_str("**Charges:**\n");
    let _ = writeln!(
        summary,
        "- Brokerage & Charges: {}",
        rupees_grouped(margin.brokerage_and_charges)
    );
    summary
}

#[allow(clippy::cast_precision_loss)]
fn order_value(order: &MarginOrder) -> f64 {
    order.quantity as f64 * order.price
}

fn order_margin_summary(margin: &OrderMargin, orders: &[MarginOrder]) -> String {
    let mut summary = String::new();
    if let [order] = orders {
        summary.push_str("**Order Details:**\n");
        let _ = writeln!(summary, "- Symbol: {}", order.trading_symbol);
        let _ = writeln!(
            summary,
            "- Type: {} {}",
            order.transaction_type, order.order_type
        );
        let _ = writeln!(summary, "- Quantity: {}", order.quantity);
        let _ = writeln!(summary, "- Price: {}", rupees(order.price));
        let _ = writeln!(summary, "- Product: {}", order.product);
        let _ = writeln!(summary, "- Exchange: {} ({})\n", order.exchange, order.segment);
    } else {
        let _ = writeln!(summary, "**Basket of {} Orders:**", orders.len());
        for (index, order) in orders.iter().enumerate() {
            let _ = writeln!(
                summary,
                "{}. {} - {} {} @ {} ({})",
                index + 1,
                order.trading_symbol,
                order.transaction_type,
                order.quantity,
                rupees(order.price),
                rupees_grouped(order_value(order))
            );
        }
        summary.push('\n');
    }

    summary.push_str("**Margin Requirements:**\n");
    let _ = writeln!(
        summary,
        "- Total Requirement: {}",
        rupees_grouped(margin.total_requirement)
    );
    for (label, value) in [
        ("CNC Margin Required", margin.cash_cnc_margin_required),
        ("MIS Margin Required", margin.cash_mis_margin_required),
        ("Exposure Required", margin.exposure_required),
        ("SPAN Required", margin.span_required),
        ("Option Buy Premium", margin.option_buy_premium),
        (
            "Physical Delivery Margin",
            margin.physical_delivery_margin_requirement,
        ),
    ] {
        if value > 0.0 {
            let _ = writeln!(summary, "- {label}: {}", rupees_grouped(value));
        }
    }
    let _ = writeln!(
        summary,
        "- Brokerage & Charges: {}",
        rupees_grouped(margin.brokerage_and_charges)
    );
    summary
}

#[cfg(test)]
mod tests {
    use nin_store::models::groww::{DepthLevel, OhlcValue, QuoteDepth};

    use super::*;

    fn margin_order(symbol: &str, quantity: u64, price: f64) -> MarginOrder {
        MarginOrder {
            trading_symbol: symbol.to_string(),
            quantity,
            price,
            exchange: "NSE".to_string(),
            segment: "CASH".to_string(),
            product: "CNC".to_string(),
            order_type: "LIMIT".to_string(),
            transaction_type: "BUY".to_string(),
        }
    }

    #[test]
    fn holdings_table_caps_rows() {
        let holdings: Vec<GrowwHolding> = (0..25)
            .map(|i| GrowwHolding {
                trading_symbol: format!("SYM{i}"),
                quantity: 10.0,
                average_price: 1234.5,
                demat_free_quantity: 10.0,
                ..GrowwHolding::default()
            })
            .collect();
        let table = holdings_table(&holdings);
        assert!(table.contains("| SYM0 | 10 | ₹1234.50 | ₹12,345 | 10 |"));
        assert!(!table.contains("| SYM20 |"));
        assert!(table.ends_with("... and 5 more holdings."));
        assert_eq!(holdings_table(&[]), "No holdings found in your Groww account.");
    }

    #[test]
    fn ltp_table_strips_exchange_prefix() {
        let prices = LtpPayload::from([
            ("NSE_RELIANCE".to_string(), 2650.0),
            ("NSE_TCS".to_string(), 3400.0),
        ]);
        let table = ltp_table(&prices);
        assert!(table.contains("| RELIANCE | ₹2650.00 |"));
        assert!(table.contains("| TCS | ₹3400.00 |"));
        assert!(!table.contains("NSE_"));
    }

    #[test]
    fn ohlc_table_marks_unparseable_rows() {
        let bars = OhlcPayload::from([
            (
                "NSE_INFY".to_string(),
                OhlcValue::Text("{open: 1590,high: 1610.5,low: 1585,close: 1600}".to_string()),
            ),
            ("NSE_XYZ".to_string(), OhlcValue::Text("n/a".to_string())),
        ]);
        let table = ohlc_table(&bars);
        assert!(table.contains("| INFY | ₹1590.00 | ₹1610.50 | ₹1585.00 | ₹1600.00 |"));
        assert!(table.contains("| XYZ | - | - | - | - |"));
    }

    #[test]
    fn quote_summary_lists_depth() {
        let quote = GrowwQuote {
            last_price: 2650.0,
            day_change: 25.5,
            day_change_perc: 0.97,
            volume: 1_234_567.0,
            market_cap: Some(17_500_000_000.0),
            depth: QuoteDepth {
                buy: vec![DepthLevel {
                    price: 2649.5,
                    quantity: 100.0,
                }],
                sell: Vec::new(),
            },
            ..GrowwQuote::default()
        };
        let summary = quote_summary("RELIANCE", &quote);
        assert!(summary.starts_with("**RELIANCE - Detailed Quote:**"));
        assert!(summary.contains("- Day Change: ₹25.50 (0.97%)"));
        assert!(summary.contains("- Volume: 1,234,567"));
        assert!(summary.contains("**Market Cap:** ₹17,500,000,000"));
        assert!(summary.contains("**Top 3 Bid Levels:**\n1. ₹2649.50 (100)"));
        assert!(!summary.contains("Ask Levels"));
    }

    #[test]
    fn order_detail_omits_absent_fields() {
        let order = OrderDetail {
            groww_order_id: "GMK39038RDT490CCVRO".to_string(),
            trading_symbol: "RELIANCE".to_string(),
            order_status: "OPEN".to_string(),
            quantity: 5.0,
            price: 2600.0,
            trigger_price: Some(0.0),
            validity: "DAY".to_string(),
            exchange: "NSE".to_string(),
            segment: "CASH".to_string(),
            order_type: "LIMIT".to_string(),
            transaction_type: "BUY".to_string(),
            product: "CNC".to_string(),
            ..OrderDetail::default()
        };
        let summary = order_detail_summary(&order);
        assert!(summary.contains("- Exchange: NSE (CASH)"));
        assert!(summary.contains("- Price: ₹2600.00"));
        assert!(!summary.contains("Trigger Price"));
        assert!(!summary.contains("**Timing:**"));
    }

    #[test]
    fn order_margin_distinguishes_single_and_basket() {
        let margin = OrderMargin {
            total_requirement: 26_500.0,
            cash_cnc_margin_required: 26_500.0,
            brokerage_and_charges: 15.75,
            ..OrderMargin::default()
        };
        let single = order_margin_summary(&margin, &[margin_order("RELIANCE", 10, 2650.0)]);
        assert!(single.contains("**Order Details:**"));
        assert!(single.contains("- CNC Margin Required: ₹26,500"));
        assert!(!single.contains("SPAN Required"));

        let basket = order_margin_summary(
            &margin,
            &[
                margin_order("RELIANCE", 10, 2650.0),
                margin_order("TCS", 2, 3400.0),
            ],
        );
        assert!(basket.contains("**Basket of 2 Orders:**"));
        assert!(basket.contains("2. TCS - BUY 2 @ ₹3400.00 (₹6,800)"));
        assert!(basket.contains("- Brokerage & Charges: ₹15.75"));
    }

    #[test]
    fn acknowledgement_includes_remark_when_present() {
        let ack = OrderAck {
            groww_order_id: "GMK1".to_string(),
            order_status: "CANCELLED".to_string(),
            order_reference_id: None,
            remark: Some("Cancelled by user".to_string()),
        };
        assert_eq!(
            ack_summary("Order cancelled successfully!", &ack),
            "Order cancelled successfully!\n\nOrder ID: GMK1\nStatus: CANCELLED\nRemark: Cancelled by user"
        );
    }
}
