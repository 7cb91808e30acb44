use clap::Parser;
use saju_calc::core::ConfigProvider;
use saju_calc::utils::{logger, validation::Validate};
use saju_calc::{BatchEngine, BatchPipeline, LocalStorage, PillarCalculator, TomlConfig};

#[derive(Parser)]
#[command(name = "batch_saju")]
#[command(about = "Calculate four pillars charts for every row of a CSV file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "saju-batch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the input CSV path from config
    #[arg(long)]
    input: Option<String>,

    /// Override the output directory from config
    #[arg(long)]
    output: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();

    // 載入 TOML 配置（日誌尚未初始化，直接輸出到 stderr）
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting batch saju calculation");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.batch.input_path = input;
    }
    if let Some(output) = args.output.clone() {
        tracing::info!("🔧 Output overridden to: {}", output);
        config.batch.output_path = output;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No charts will be written");
        return;
    }

    // 路徑由設定檔決定，storage 以目前目錄為根
    let storage = LocalStorage::new(".".to_string());
    let pipeline = BatchPipeline::new(storage, config, PillarCalculator::new());
    let engine = BatchEngine::new(pipeline);

    match engine.run() {
        Ok(summary) => {
            tracing::info!("✅ Batch completed successfully!");
            println!("✅ Calculated {} charts ({} skipped)", summary.processed, summary.failed);
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    if let Some(name) = &config.batch.name {
        println!("  Batch: {}", name);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Default calendar: {}", config.default_calendar());
    println!(
        "  Invalid rows: {}",
        if config.skip_invalid_records() {
            "skip"
        } else {
            "fail"
        }
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
