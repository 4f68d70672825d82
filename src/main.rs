use clap::Parser;
use licitaciones_etl::utils::error::{EtlError, ErrorSeverity};
use licitaciones_etl::utils::{logger, validation::Validate};
use licitaciones_etl::{
    CliConfig, ConfigProvider, EtlEngine, LicitacionesPipeline, LocalStorage, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting licitaciones-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(mut config) => {
                    if config.source.api_key.is_none() {
                        config.source.api_key = cli.api_key.clone();
                    }
                    let monitor = cli.monitor || config.monitoring_enabled();
                    run(config, monitor).await
                }
                Err(e) => Err(e),
            }
        }
        None => {
            let monitor = cli.monitor;
            run(cli, monitor).await
        }
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

async fn run<C>(config: C, monitor: bool) -> Result<String, EtlError>
where
    C: ConfigProvider + Validate,
{
    // 啟動前檢查：設定錯誤時不發出任何請求
    config.validate()?;

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = LicitacionesPipeline::new(storage, config)?;
    EtlEngine::new_with_monitoring(pipeline, monitor).run().await
}
