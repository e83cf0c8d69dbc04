use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cryptorec_core::domain::recommendation::VenueFilter;
use cryptorec_core::market::{CoinGeckoGateway, MarketDataGateway};
use cryptorec_core::source::{select_source, LiveSource};

#[derive(Debug, Parser)]
#[command(name = "cryptorec_worker")]
struct Args {
    /// Venue filter for recommendations (`binance`, `mexc` or `all`).
    #[arg(long, default_value = "all")]
    exchange: String,

    /// Print the market overview instead of recommendations.
    #[arg(long)]
    overview: bool,

    /// Serve from this static payload file instead of STATIC_PAYLOAD_PATH.
    #[arg(long)]
    static_payload: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = cryptorec_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if args.static_payload.is_some() {
        settings.static_payload_path = args.static_payload.clone();
    }

    let gateway: Arc<dyn MarketDataGateway> = Arc::new(CoinGeckoGateway::from_settings(&settings)?);
    let source = select_source(&settings, LiveSource::from_env(gateway));

    let output = if args.overview {
        let overview = source.market_overview().await.map_err(report)?;
        tracing::info!(entries = overview.data.len(), "market overview fetched");
        serde_json::to_value(&overview)?
    } else {
        let filter = VenueFilter::parse(Some(args.exchange.as_str()));
        let set = source.recommendations(&filter).await.map_err(report)?;
        tracing::info!(
            source = source.source_name(),
            total = set.total,
            returned = set.data.len(),
            "recommendation pass finished"
        );
        serde_json::to_value(&set)?
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");

    Ok(())
}

fn report(err: cryptorec_core::error::MarketError) -> anyhow::Error {
    let err = anyhow::Error::new(err);
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = %err, "pass failed");
    err
}

fn init_sentry(settings: &cryptorec_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.require_sentry_dsn().ok()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
