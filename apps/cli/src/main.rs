mod cli;
mod config;
mod display;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use cli::{parse_line, Args, Command, Request};
use config::Config;
use display::Theme;
use tickerview_quotes::{QuoteResolver, RequestContext};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("TICKERVIEW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Run one lookup and print the result. Returns false when it failed.
async fn lookup(resolver: &QuoteResolver, theme: &Theme, request: &Request) -> bool {
    let context = if request.refresh {
        RequestContext::refresh()
    } else {
        RequestContext::default()
    };

    match resolver
        .fetch_snapshot(&context, &request.symbol, request.interval, request.period)
        .await
    {
        Ok(snapshot) => {
            tracing::debug!(
                "Rendered {} ({} warnings)",
                snapshot.symbol(),
                snapshot.warnings.len()
            );
            println!("{}", display::render_snapshot(theme, &snapshot));
            true
        }
        Err(e) => {
            tracing::debug!("Lookup for '{}' failed: {:?}", request.symbol, e);
            println!("{}", display::render_error(theme, &e, &request.symbol));
            false
        }
    }
}

async fn interactive(resolver: &QuoteResolver, theme: &Theme, args: &Args) -> anyhow::Result<()> {
    if resolver.is_demo_mode() {
        println!("Running with demo data. Set ALPHAVANTAGE_API_KEY for live quotes.");
    }
    println!("Enter a symbol (e.g. `IBM 5d daily`), `help` or `quit`.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line, args) {
            Ok(Command::Lookup(request)) => {
                lookup(resolver, theme, &request).await;
            }
            Ok(Command::Help) => println!("{}", display::stock_guide()),
            Ok(Command::Quit) => break,
            Ok(Command::Nothing) => {}
            Err(e) => println!("{}", display::render_error(theme, &e, &line)),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(provider) = args.provider {
        config.resolver.provider = provider;
    }

    let colors = !args.no_color && std::env::var_os("NO_COLOR").is_none();
    if !colors {
        colored::control::set_override(false);
    }
    let theme = Theme {
        colors,
        ..Theme::default()
    };

    let resolver = QuoteResolver::from_config(&config.resolver);

    match &args.symbol {
        Some(symbol) => {
            let request = args.request(symbol);
            if lookup(&resolver, &theme, &request).await {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        None => {
            interactive(&resolver, &theme, &args).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
