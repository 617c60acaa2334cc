use clap::Parser;

use snaplink::config::{AppConfig, Cli};
use snaplink::runtime::run_server;
use snaplink::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    if let Some(ref path) = cli.generate_config {
        AppConfig::default().save_to_file(path)?;
        println!("Sample configuration written to {}", path);
        return Ok(());
    }

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 日志 guard 必须存活到进程结束
    let _log_guards = match init_logging(&config.logging) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    if let Err(e) = run_server(config).await {
        tracing::error!("Server exited with error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
