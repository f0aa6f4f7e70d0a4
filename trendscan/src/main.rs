use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use trendscan::{
    config::ScanConfig,
    logging::init_logging_from_env,
    report::{
        DeliveryOutcome, Reporter,
        sink::{FileSink, NotificationSink},
        telegram::TelegramSink,
    },
    run,
    scan::ScanOrchestrator,
};
use trendscan_data::provider::yahoo::YahooChart;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging_from_env();

    let config = match ScanConfig::resolve(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "failed to resolve scan config");
            return ExitCode::FAILURE;
        }
    };

    info!(
        symbols = config.symbols.len(),
        intervals = ?config.intervals,
        window_len = config.signal.window_len,
        slope_lookback = config.signal.slope_lookback,
        near_pct = config.signal.near_pct,
        concurrency = config.concurrency,
        "starting scan"
    );

    let provider = YahooChart::new(config.yahoo_base_url.clone(), config.request_timeout());
    let orchestrator = ScanOrchestrator::new(provider, config.signal, config.lookback())
        .with_concurrency(config.concurrency);

    match &config.telegram {
        Some(credentials) => {
            let sink = TelegramSink::new(
                config.telegram_base_url.clone(),
                credentials.bot_token.clone(),
                credentials.chat_id.clone(),
            )
            .with_timeout(config.request_timeout());
            scan_and_report(&orchestrator, sink, &config).await
        }
        None => {
            info!(
                output_dir = %config.output_dir.display(),
                "no Telegram credentials configured, writing report to file"
            );
            let sink = FileSink::new(config.output_dir.clone());
            scan_and_report(&orchestrator, sink, &config).await
        }
    }

    ExitCode::SUCCESS
}

async fn scan_and_report<Sink>(
    orchestrator: &ScanOrchestrator<YahooChart>,
    sink: Sink,
    config: &ScanConfig,
) where
    Sink: NotificationSink + Sync,
{
    let reporter = Reporter::new(sink, config.report_filename());

    match run(orchestrator, &reporter, &config.symbols, &config.intervals).await {
        Ok((_, DeliveryOutcome::Skipped)) => {
            info!("no candidates, nothing delivered");
        }
        Ok((_, DeliveryOutcome::Delivered { rows })) => {
            info!(rows, filename = %reporter.filename(), "report delivered");
        }
        Err(error) => {
            error!(%error, "failed to deliver report");
        }
    }
}
