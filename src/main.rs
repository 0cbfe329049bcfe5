use anyhow::Context;
use clap::Parser;
use park_rental::app::commands::execute;
use park_rental::core::ConfigProvider;
use park_rental::utils::error::ErrorSeverity;
use park_rental::utils::{logger, validation::Validate};
use park_rental::{
    AppConfig, CliConfig, LocalStorage, ParkError, ParkService, Persistence, SnapshotScope,
    SnapshotStore,
};

fn exit_code(e: &ParkError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,      // 查無資料，不視為失敗
        ErrorSeverity::Medium => 2,   // 輸入錯誤
        ErrorSeverity::High => 1,     // 配置錯誤
        ErrorSeverity::Critical => 3, // 檔案錯誤
    }
}

fn report_failure(context: &str, e: &ParkError) {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = AppConfig::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(cli.verbose, &config.logging.level);
    } else {
        logger::init_cli_logger(cli.verbose, &config.logging.level);
    }
    tracing::debug!("CLI args: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        report_failure("Configuration validation failed", &e);
        std::process::exit(1);
    }

    let store = SnapshotStore::new(LocalStorage::new(config.data_dir()));
    let mut service = ParkService::new();

    match store
        .load(&mut service, SnapshotScope::All, config.snapshot_file())
        .await
    {
        Ok(()) => {}
        Err(ParkError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(
                "📁 No snapshot at {}/{}, starting empty",
                config.data_dir(),
                config.snapshot_file()
            );
        }
        Err(e) => {
            report_failure("Loading the working snapshot failed", &e);
            std::process::exit(exit_code(&e));
        }
    }

    match execute(cli.command, &mut service, &store, &config).await {
        Ok(output) => {
            println!("{}", output.message);
            if output.mutated {
                store
                    .save(&service, SnapshotScope::All, config.snapshot_file())
                    .await
                    .context("Failed to save the working snapshot")?;
            }
        }
        Err(e) => {
            report_failure("Command failed", &e);
            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
