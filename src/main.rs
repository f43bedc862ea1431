use clap::Parser;
use sim_ingest::utils::error::ErrorSeverity;
use sim_ingest::utils::{logger, validation::Validate};
use sim_ingest::{
    AppConfig, CliArgs, FileProcessor, InMemoryHandledSet, InMemorySimStore, IngestError,
    IngestLoop, LocalStorage, PgSimStore, Result, SimStore,
};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting SIM Data Processor...");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ SIM Data Processor stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref())?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let output = LocalStorage::new(config.output_folder.clone());

    if args.memory_store {
        tracing::warn!("⚠️ Using the in-memory store, records will not be persisted");
        return serve(InMemorySimStore::new(), output, &config, args.once).await;
    }

    let store = PgSimStore::connect(&config.database_url).await?;
    store.ensure_schema().await?;
    serve(store, output, &config, args.once).await
}

async fn serve<S: SimStore>(
    store: S,
    output: LocalStorage,
    config: &AppConfig,
    once: bool,
) -> Result<()> {
    let processor = FileProcessor::new(store, output);
    let mut ingest = IngestLoop::new(
        processor,
        InMemoryHandledSet::new(),
        config.input_folder.clone(),
        config.scan_interval,
    );

    if once {
        let summary = ingest.scan_once().await?;
        tracing::info!(
            "✅ Single scan done: {} processed, {} failed, {} deleted",
            summary.processed,
            summary.failed,
            summary.deleted
        );
        return Ok(());
    }

    ingest.run().await;
    Ok(())
}

fn exit_code(e: &IngestError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
