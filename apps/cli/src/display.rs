//! Terminal rendering of lookups.
//!
//! Everything here is pure string building so it can be tested without a
//! terminal; colors are applied only when the theme asks for them.

use std::fmt::Write;

use colored::{Color, Colorize};
use rust_decimal::{Decimal, RoundingStrategy};
use tickerview_quotes::{
    CompanyOverview, Guidance, HistoricalSeries, QuoteError, QuoteResolution, Snapshot,
};

const BILLION: u64 = 1_000_000_000;
const MILLION: u64 = 1_000_000;

/// Moving-average windows shown once a history is longer than the window.
const MOVING_AVERAGES: [usize; 2] = [20, 50];

/// Presentation settings.
#[derive(Clone, Debug)]
pub struct Theme {
    pub colors: bool,
    pub currency: String,
    /// Most recent bars listed under the price history.
    pub history_rows: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: true,
            currency: "$".to_string(),
            history_rows: 10,
        }
    }
}

impl Theme {
    pub fn plain() -> Self {
        Self {
            colors: false,
            ..Self::default()
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn strong(&self, text: &str) -> String {
        if self.colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn trend(&self, text: &str, value: Decimal) -> String {
        let color = if value.is_sign_negative() && !value.is_zero() {
            Color::Red
        } else {
            Color::Green
        };
        self.paint(text, color)
    }

    pub fn money(&self, value: Decimal) -> String {
        format!("{}{}", self.currency, two_places(value))
    }
}

// ============================================================================
// Number formatting
// ============================================================================

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimal places, zero padded.
pub fn two_places(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Always-signed two decimal places: `+2.75`, `-0.57`.
pub fn signed(value: Decimal) -> String {
    let rounded = round2(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{:.2}", rounded.abs())
    } else {
        format!("+{:.2}", rounded.abs())
    }
}

/// `+2.75 (+1.48%)`. `change_percent` is in whole percent.
pub fn format_change(change: Decimal, change_percent: Decimal) -> String {
    format!("{} ({}%)", signed(change), signed(change_percent))
}

/// Thousands separators: `3456789` becomes `3,456,789`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `$191.23B` from a billion up, `$850.00M` from a million up.
pub fn format_market_cap(theme: &Theme, market_cap: Decimal) -> String {
    let billion = Decimal::from(BILLION);
    let million = Decimal::from(MILLION);
    if market_cap.abs() >= billion {
        format!("{}{}B", theme.currency, two_places(market_cap / billion))
    } else if market_cap.abs() >= million {
        format!("{}{}M", theme.currency, two_places(market_cap / million))
    } else {
        theme.money(market_cap)
    }
}

/// Dividend yield arrives as a fraction: `0.0455` is shown as `4.55%`.
pub fn format_dividend_yield(fraction: Decimal) -> String {
    format!("{}%", two_places(fraction * Decimal::ONE_HUNDRED))
}

// ============================================================================
// Errors and guidance
// ============================================================================

/// What to tell the user after a failure, worded for the terminal.
pub fn guidance_text(guidance: Guidance, symbol: &str) -> String {
    match guidance {
        Guidance::FixInput => {
            "Stock symbols may only contain letters, numbers, hyphens or periods.".to_string()
        }
        Guidance::CheckConnection => {
            "Network issue detected. Please check your internet connection and try again."
                .to_string()
        }
        Guidance::RetryLater => {
            "The service is slow or answered unexpectedly. Please try again in a moment."
                .to_string()
        }
        Guidance::CheckSpelling => format!(
            "'{}' doesn't appear to be a valid stock symbol. Please check the spelling.",
            symbol.trim().to_ascii_uppercase()
        ),
        Guidance::UseDemoMode => "The data provider refused the request (rate limit or API key). \
             Wait a minute and try again, or run without an API key to browse demo data."
            .to_string(),
    }
}

/// Error line plus guidance, as printed for a failed lookup.
pub fn render_error(theme: &Theme, error: &QuoteError, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", theme.paint("Error:", Color::Red), error);
    let _ = writeln!(out, "{}", guidance_text(error.guidance(), symbol));
    if matches!(
        error.guidance(),
        Guidance::CheckSpelling | Guidance::FixInput
    ) {
        out.push('\n');
        out.push_str(&stock_guide());
    }
    out
}

/// Common symbols to try.
pub fn stock_guide() -> String {
    const GROUPS: &[(&str, &[(&str, &str)])] = &[
        ("Tech", &[("AAPL", "Apple"), ("MSFT", "Microsoft"), ("GOOGL", "Alphabet")]),
        ("Retail", &[("AMZN", "Amazon"), ("WMT", "Walmart"), ("TGT", "Target")]),
        ("Finance", &[("JPM", "JP Morgan"), ("BAC", "Bank of America"), ("V", "Visa")]),
        (
            "Entertainment",
            &[("NFLX", "Netflix"), ("DIS", "Disney"), ("CMCSA", "Comcast")],
        ),
    ];

    let mut out = String::from("Common stock symbols:\n");
    for (group, symbols) in GROUPS {
        let listed: Vec<String> = symbols
            .iter()
            .map(|(symbol, name)| format!("{} ({})", symbol, name))
            .collect();
        let _ = writeln!(out, "  {:<14} {}", format!("{}:", group), listed.join(", "));
    }
    out.push_str("Usage: SYMBOL [PERIOD] [INTERVAL], e.g. `IBM 5d daily`. Prefix with ! to refresh.\n");
    out
}

// ============================================================================
// Snapshot rendering
// ============================================================================

fn demo_banner(theme: &Theme, resolution: &QuoteResolution) -> Option<String> {
    if !resolution.is_demo() {
        return None;
    }
    let text = match &resolution.fallback_reason {
        Some(reason) => format!("Demo data: live quote unavailable ({})", reason),
        None => "Demo data: no API key configured".to_string(),
    };
    Some(theme.paint(&text, Color::Yellow))
}

fn render_quote(out: &mut String, theme: &Theme, snapshot: &Snapshot) {
    let quote = &snapshot.quote.quote;

    let _ = writeln!(
        out,
        "{}",
        theme.strong(&format!("{} ({})", snapshot.display_name, quote.symbol))
    );
    if let Some(banner) = demo_banner(theme, &snapshot.quote) {
        let _ = writeln!(out, "{}", banner);
    }
    let _ = writeln!(
        out,
        "{}  {}",
        theme.strong(&theme.money(quote.price)),
        theme.trend(&format_change(quote.change, quote.change_percent), quote.change)
    );
    if let Some(day) = quote.latest_trading_day {
        let _ = writeln!(out, "Last trading day: {}", day);
    }

    let mut details = Vec::new();
    if let Some(v) = quote.previous_close {
        details.push(format!("Previous Close: {}", theme.money(v)));
    }
    if let Some(v) = quote.open {
        details.push(format!("Open: {}", theme.money(v)));
    }
    if let Some(v) = quote.high {
        details.push(format!("Day High: {}", theme.money(v)));
    }
    if let Some(v) = quote.low {
        details.push(format!("Day Low: {}", theme.money(v)));
    }
    if let Some(v) = quote.volume {
        details.push(format!("Volume: {}", group_thousands(v)));
    }
    if !details.is_empty() {
        let _ = writeln!(out, "{}", details.join("  |  "));
    }
}

fn render_fundamentals(out: &mut String, theme: &Theme, overview: &CompanyOverview) {
    let mut figures = Vec::new();
    if let Some(v) = overview.market_cap {
        figures.push(format!("Market Cap: {}", format_market_cap(theme, v)));
    }
    if let Some(v) = overview.pe_ratio {
        figures.push(format!("P/E Ratio: {}", v));
    }
    if let Some(v) = overview.eps {
        figures.push(format!("EPS: {}", theme.money(v)));
    }
    if let Some(v) = overview.dividend_yield {
        figures.push(format!("Dividend Yield: {}", format_dividend_yield(v)));
    }
    if let Some(v) = overview.week_52_high {
        figures.push(format!("52 Week High: {}", theme.money(v)));
    }
    if let Some(v) = overview.week_52_low {
        figures.push(format!("52 Week Low: {}", theme.money(v)));
    }
    if !figures.is_empty() {
        let _ = writeln!(out, "{}", figures.join("  |  "));
    }

    let mut about = Vec::new();
    if let Some(v) = &overview.sector {
        about.push(format!("Sector: {}", v));
    }
    if let Some(v) = &overview.industry {
        about.push(format!("Industry: {}", v));
    }
    if let Some(v) = overview.employees {
        about.push(format!("Employees: {}", group_thousands(v)));
    }
    if let Some(v) = &overview.exchange {
        about.push(format!("Exchange: {}", v));
    }
    if overview.description.is_some() || !about.is_empty() {
        let _ = writeln!(out, "\n{}", theme.strong("About the Company"));
        if let Some(description) = &overview.description {
            let _ = writeln!(out, "{}", description);
        }
        if !about.is_empty() {
            let _ = writeln!(out, "{}", about.join("  |  "));
        }
    }
}

/// Price history table, most recent first, with the window's overall move.
pub fn render_history(theme: &Theme, series: &HistoricalSeries, period_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        theme.strong(&format!(
            "Price history ({}, {})",
            period_name, series.granularity
        ))
    );

    if series.is_empty() {
        let _ = writeln!(
            out,
            "No historical data available for the selected period and interval."
        );
        return out;
    }

    if let (Some(latest), Some(oldest)) = (series.bars().first(), series.bars().last()) {
        if !oldest.close.is_zero() {
            let change = latest.close - oldest.close;
            let percent = change / oldest.close * Decimal::ONE_HUNDRED;
            let _ = writeln!(
                out,
                "Change over window: {}",
                theme.trend(&format_change(change, percent), change)
            );
        }
    }

    let averages: Vec<String> = MOVING_AVERAGES
        .iter()
        .filter(|window| series.len() > **window)
        .filter_map(|window| {
            series
                .moving_average(*window)
                .map(|ma| format!("MA{}: {}", window, theme.money(ma)))
        })
        .collect();
    if !averages.is_empty() {
        let _ = writeln!(out, "{}", averages.join("  |  "));
    }

    let _ = writeln!(
        out,
        "{:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in series.bars().iter().take(theme.history_rows) {
        let close = format!("{:>10}", two_places(bar.close));
        let close = if bar.is_up() {
            theme.paint(&close, Color::Green)
        } else {
            theme.paint(&close, Color::Red)
        };
        let _ = writeln!(
            out,
            "{:<10}  {:>10}  {:>10}  {:>10}  {}  {:>14}",
            bar.date.to_string(),
            two_places(bar.open),
            two_places(bar.high),
            two_places(bar.low),
            close,
            group_thousands(bar.volume)
        );
    }
    if series.len() > theme.history_rows {
        let _ = writeln!(out, "... {} more rows", series.len() - theme.history_rows);
    }
    out
}

/// Full dashboard text for a snapshot.
pub fn render_snapshot(theme: &Theme, snapshot: &Snapshot) -> String {
    let mut out = String::new();
    render_quote(&mut out, theme, snapshot);

    if let Some(overview) = &snapshot.overview {
        render_fundamentals(&mut out, theme, overview);
    }

    if let Some(series) = &snapshot.history {
        out.push('\n');
        out.push_str(&render_history(theme, series, snapshot.period.display_name()));
    }

    for warning in &snapshot.warnings {
        let note = match warning {
            QuoteError::Unsupported { .. } => format!("{}", warning),
            _ => format!("{}. {}", warning, guidance_text(warning.guidance(), snapshot.symbol())),
        };
        let _ = writeln!(out, "{} {}", theme.paint("Note:", Color::Yellow), note);
    }
    out
}
