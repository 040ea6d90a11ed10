//! Command-line arguments and interactive request lines.
use clap::Parser;
use tickerview_quotes::{Granularity, Period, ProviderKind, QuoteError};

/// Look up stock quotes, company overviews and price history.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Ticker symbol to look up. Without one, requests are read from stdin
    /// as `SYMBOL [PERIOD] [INTERVAL]`; prefix a line with `!` to bypass the cache.
    pub symbol: Option<String>,

    /// Lookback window: 1d, 5d, 1m, 3m, 6m, 1y, 5y or all.
    #[arg(long, short, default_value_t = Period::default())]
    pub period: Period,

    /// Bar interval: daily, weekly or monthly.
    #[arg(long, short, default_value_t = Granularity::default())]
    pub interval: Granularity,

    /// Market data provider; overrides TICKERVIEW_PROVIDER.
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Skip cached results.
    #[arg(long)]
    pub refresh: bool,

    /// Plain output without ANSI colors.
    #[arg(long)]
    pub no_color: bool,
}

/// One lookup request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub symbol: String,
    pub period: Period,
    pub interval: Granularity,
    pub refresh: bool,
}

/// What a line typed at the prompt asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Lookup(Request),
    Help,
    Quit,
    Nothing,
}

impl Args {
    pub fn request(&self, symbol: &str) -> Request {
        Request {
            symbol: symbol.to_string(),
            period: self.period,
            interval: self.interval,
            refresh: self.refresh,
        }
    }
}

/// Parse `SYMBOL [PERIOD] [INTERVAL]`, with defaults taken from `args`.
///
/// Period and interval may come in either order. When only a period is
/// given and the default interval does not suit it, the period's first
/// allowed interval is used.
pub fn parse_line(line: &str, args: &Args) -> Result<Command, QuoteError> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Nothing),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let (refresh, line) = match line.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (args.refresh, line),
    };

    let mut words = line.split_whitespace();
    let symbol = words.next().unwrap_or_default().to_string();

    let mut period = None;
    let mut interval = None;
    for word in words {
        if let Ok(p) = word.parse::<Period>() {
            period = Some(p);
        } else {
            interval = Some(word.parse::<Granularity>()?);
        }
    }

    let period = period.unwrap_or(args.period);
    let interval = match interval {
        Some(interval) => interval,
        None if period.supports(args.interval) => args.interval,
        None => period
            .allowed_granularities()
            .first()
            .copied()
            .unwrap_or_default(),
    };

    Ok(Command::Lookup(Request {
        symbol,
        period,
        interval,
        refresh,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tickerview"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn lookup(line: &str, args: &Args) -> Request {
        match parse_line(line, args).unwrap() {
            Command::Lookup(request) => request,
            other => panic!("expected a lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_flag_defaults() {
        let args = args(&[]);
        assert!(args.symbol.is_none());
        assert_eq!(args.period, Period::ThreeMonths);
        assert_eq!(args.interval, Granularity::Daily);
        assert!(args.provider.is_none());
        assert!(!args.refresh && !args.no_color);
    }

    #[test]
    fn test_flags_parse_into_domain_types() {
        let args = args(&["ibm", "-p", "5y", "--interval", "monthly", "--provider", "fmp"]);
        assert_eq!(args.symbol.as_deref(), Some("ibm"));
        assert_eq!(args.period, Period::FiveYears);
        assert_eq!(args.interval, Granularity::Monthly);
        assert_eq!(args.provider, Some(ProviderKind::Fmp));
    }

    #[test]
    fn test_line_with_symbol_only_uses_defaults() {
        let args = args(&[]);
        let request = lookup("  aapl ", &args);
        assert_eq!(request.symbol, "aapl");
        assert_eq!(request.period, Period::ThreeMonths);
        assert_eq!(request.interval, Granularity::Daily);
        assert!(!request.refresh);
    }

    #[test]
    fn test_line_with_period_and_interval_in_any_order() {
        let args = args(&[]);
        let request = lookup("IBM weekly 1y", &args);
        assert_eq!(request.period, Period::OneYear);
        assert_eq!(request.interval, Granularity::Weekly);
    }

    #[test]
    fn test_bang_forces_refresh() {
        let args = args(&[]);
        assert!(lookup("!IBM 5d", &args).refresh);
        assert!(lookup("! IBM", &args).refresh);
    }

    #[test]
    fn test_period_picks_a_suitable_default_interval() {
        let args = args(&["--interval", "monthly"]);
        let request = lookup("IBM 5d", &args);
        assert_eq!(request.interval, Granularity::Daily);

        let request = lookup("IBM 5y", &args);
        assert_eq!(request.interval, Granularity::Monthly);
    }

    #[test]
    fn test_control_words() {
        let args = args(&[]);
        assert_eq!(parse_line("", &args).unwrap(), Command::Nothing);
        assert_eq!(parse_line("help", &args).unwrap(), Command::Help);
        assert_eq!(parse_line("EXIT", &args).unwrap(), Command::Quit);
    }

    #[test]
    fn test_unknown_word_is_a_validation_error() {
        let args = args(&[]);
        let err = parse_line("IBM hourly", &args).unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
    }
}
