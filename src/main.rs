use clap::Parser;
use lunch_scraper::core::discovery::ProviderDiscovery;
use lunch_scraper::utils::{logger, validation::Validate};
use lunch_scraper::{
    CatalogClient, CliArgs, CollectionDate, DailyReport, DailySequencer, FixedCooldown,
    LocalStorage, NoThrottle, ScraperConfig, ScraperError,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting lunch-scraper");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match ScraperConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(exit_code(&e));
        }
    };

    // 套用命令列覆蓋設定
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
        tracing::info!("🔧 Data directory overridden to: {}", data_dir);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    // 收集日期每次執行只計算一次
    let date = CollectionDate::tomorrow();
    let storage = LocalStorage::new(config.storage.data_dir());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        print_plan(&config, &storage, &date)?;
        return Ok(());
    }

    let throttle = Arc::new(FixedCooldown::new(config.upstream.cooldown()));
    let sequencer = DailySequencer::from_config(&config, storage, throttle)?;

    let outcome = sequencer.run(&date).await.and_then(DailyReport::into_result);
    match outcome {
        Ok(report) => {
            tracing::info!(
                "✅ Collection finished for {}: {} of {} slots produced menus",
                report.date,
                report.completed_slots(),
                report.slots.len()
            );
            if let Some(notification) = &report.notification {
                tracing::info!("📦 {} menu files on disk", notification.summary.menu_files);
                println!("✅ {}", notification.message);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Collection failed: {} (Severity: {:?})",
                e,
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}

fn exit_code(error: &ScraperError) -> i32 {
    error.severity().exit_code()
}

fn print_plan(
    config: &ScraperConfig,
    storage: &LocalStorage,
    date: &CollectionDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = CatalogClient::new(&config.upstream)?;
    let discovery = ProviderDiscovery::new(
        client,
        config.upstream.delivery_place_id(),
        Arc::new(NoThrottle),
    );

    println!("📋 Collection Plan:");
    println!("  Date: {}", date);
    println!("  Catalog: {}", config.upstream.base_url());
    println!("  Delivery place: {}", config.upstream.delivery_place_id());
    println!("  Cooldown: {:?}", config.upstream.cooldown());
    println!("  Listing file: {}", storage.listing_path(date).display());
    println!("  Menu directory: {}", storage.menu_dir(date).display());
    println!("  Notification: {}", config.notification.topic_url());
    println!();

    println!("🕗 Slots ({}):", config.slots().len());
    for slot in config.slots() {
        println!("  {} -> {}", slot, discovery.discovery_url(date, slot)?);
    }

    Ok(())
}
