use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use tokenwatch::{
    analysis::{AnalysisPipeline, PipelineSettings},
    apis::{llm::LlmClient, CoinMarketCapClient, OpenAiCompatClient, Provider},
    arguments::Arguments,
    clock::{Clock, SystemClock},
    config::{self, AiConfig},
    logger::{self, LogTag, LoggerConfig},
    marketdata::MarketDataService,
    paths,
    storage::AnalysisStore,
    tokens::{catalog::spawn_refresh_task, CatalogSettings, MentionDetector, TokenCatalog},
    webserver::{self, AppState, WebhookHistory},
};

/// Time allowed for background tasks to stop after the server exits
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        logger::error(LogTag::System, &format!("Fatal: {:#}", e));
        logger::flush();
        eprintln!("tokenwatch failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Arguments::parse();

    if let Some(dir) = args.data_dir.clone() {
        paths::set_base_directory(dir).map_err(anyhow::Error::msg)?;
    }
    paths::ensure_all_directories()
        .map_err(anyhow::Error::msg)
        .context("Failed to create required directories")?;

    logger::init(
        LoggerConfig::from_flags(args.verbose, args.quiet, &args.debug_keys()),
        &paths::get_logs_directory(),
    );
    logger::info(LogTag::System, "tokenwatch starting up...");

    config::load_config_from_path(&args.config).map_err(anyhow::Error::msg)?;
    let config = config::get_config_clone();
    let host = args.host.clone().unwrap_or_else(|| config.webserver.host.clone());
    let port = args.port.unwrap_or(config.webserver.port);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let market = &config.market_data;
    let cmc = Arc::new(
        CoinMarketCapClient::new(
            &market.base_url,
            market.api_key.clone(),
            market.timeout_secs,
            market.rate_limit_per_minute,
        )
        .map_err(anyhow::Error::msg)
        .context("Failed to create market data client")?,
    );

    let catalog = Arc::new(TokenCatalog::new(
        cmc.clone(),
        clock.clone(),
        CatalogSettings::from(market),
    ));
    let market_data = Arc::new(MarketDataService::with_clock(
        cmc.clone(),
        market.quotes_cache_secs,
        clock.clone(),
    ));
    let store = Arc::new(AnalysisStore::new(
        paths::get_analyses_path(&config.storage.file_name),
        config.storage.max_records,
    ));
    logger::info(
        LogTag::Storage,
        &format!("Analyses stored at {}", store.path().display()),
    );

    let pipeline = Arc::new(AnalysisPipeline::new(
        Arc::new(MentionDetector::new(catalog.clone())),
        market_data.clone(),
        build_summarizer(&config.ai)?,
        store.clone(),
        clock,
        PipelineSettings {
            app_id: config.webserver.app_id.clone(),
            temperature: config.ai.temperature,
        },
    ));

    let state = Arc::new(
        AppState::new(
            config.webserver.clone(),
            pipeline,
            store,
            catalog.clone(),
            market_data,
            Arc::new(WebhookHistory::new(config.webhook.history_size)),
        )
        .with_market_data_stats(cmc.stats_handle()),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let refresh_task = spawn_refresh_task(catalog, shutdown_rx.clone());

    let signal_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(signal) => {
                logger::info(
                    LogTag::System,
                    &format!("{} received, shutting down gracefully...", signal),
                );
                signal_shutdown.send_replace(true);
            }
            Err(e) => logger::error(
                LogTag::System,
                &format!("Failed to listen for shutdown signals: {}", e),
            ),
        }
    });

    let served = webserver::start_server(state, &host, port, shutdown_rx).await;

    shutdown_tx.send_replace(true);
    if tokio::time::timeout(SHUTDOWN_GRACE, refresh_task).await.is_err() {
        logger::warning(
            LogTag::System,
            "Catalog refresh task did not stop in time",
        );
    }

    logger::info(LogTag::System, "tokenwatch stopped");
    logger::flush();
    served.map_err(anyhow::Error::msg)
}

/// Resolves with the name of the first termination signal received
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|_| "Ctrl-C"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "Ctrl-C")
}

/// Summarizer client when AI credentials are configured
fn build_summarizer(ai: &AiConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    if !ai.is_configured() {
        logger::info(
            LogTag::Ai,
            "Skipping AI analysis setup - summarizer API key not configured",
        );
        return Ok(None);
    }

    let provider: Provider = ai.provider.parse().map_err(anyhow::Error::msg)?;
    let client = OpenAiCompatClient::new(
        provider,
        &ai.base_url,
        ai.api_key.clone(),
        ai.model.clone(),
        ai.timeout_secs,
    )
    .map_err(anyhow::Error::msg)
    .context("Failed to create AI summarizer client")?;

    logger::info(
        LogTag::Ai,
        &format!("AI summarizer enabled: {} ({})", provider, ai.model),
    );
    Ok(Some(Arc::new(client)))
}
