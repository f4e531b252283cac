use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vetrina_common::{Config, ScoreRubric};
use vetrina_scout::directory::PagineGialleSource;
use vetrina_scout::ledger::Ledger;
use vetrina_scout::pipeline::Pipeline;
use vetrina_scout::renderer::{BrowserlessRenderer, HttpFetcher};
use vetrina_scout::report;

#[derive(Parser, Debug)]
#[command(name = "vetrina-scout", about = "Business website discovery and quality scoring")]
struct Args {
    /// Region to search (es. Lombardia, Lazio, Toscana).
    #[arg(long)]
    region: String,

    /// Directory pages to visit.
    #[arg(long, default_value_t = 3)]
    pages: u32,

    /// Where to write the CSV report.
    #[arg(long, default_value = "vetrina_report.csv")]
    report: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(region = %args.region, pages = args.pages, "Vetrina scout starting");

    let config = Config::from_env();

    let renderer = BrowserlessRenderer::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
        config.max_render_sessions,
    );
    let fetcher = HttpFetcher::new();
    let searcher = ddg_client::DdgClient::new();

    let ledger = Arc::new(Ledger::open(&config.ledger_path)?);
    let pipeline = Pipeline::new(ledger.clone());

    let source = PagineGialleSource::new(&renderer, &config.directory_base_url, &args.region);
    pipeline.run_classification(&source, args.pages).await?;

    pipeline
        .run_resolution(
            &searcher,
            &fetcher,
            config.search_top_k,
            config.resolver_delay,
        )
        .await?;

    pipeline
        .run_scoring(&renderer, ScoreRubric::default(), config.max_render_sessions)
        .await?;

    report::write_csv(&ledger.snapshot(), &args.report)?;
    info!(report = %args.report, "Run complete");

    Ok(())
}
