use clap::Parser;
use user_roster::core::greeting::greeting_now;
use user_roster::core::ConfigProvider;
use user_roster::utils::{logger, validation::Validate};
use user_roster::{build_source, CliConfig, LocalStorage, RosterEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting user-roster");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if settings.greet {
        println!("{}", greeting_now());
    }

    let result = match build_source(&settings) {
        Ok(source) => {
            let storage = LocalStorage::new(settings.output_path());
            RosterEngine::new(source, storage, settings.format)
                .with_output_file(settings.output_file_name())
                .run()
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            print!("{}", report.rendered);
            if !report.rendered.is_empty() && !report.rendered.ends_with('\n') {
                println!();
            }
            if let Some(path) = report.output_path {
                eprintln!("📁 Output saved to: {}/{}", settings.output_path(), path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Fetching users failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = e.exit_code();

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
