use anyhow::Result;
use clap::Parser;
use jsonlist::app::JsonListApp;
use jsonlist::cli::{self, Cli};
use jsonlist::core::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(cli.level_filter())
        .init();

    tracing::debug!("Starting jsonlist...");

    // Load config or use defaults
    let config_path = cli.config.clone().or_else(AppConfig::default_path);
    let config = match config_path {
        Some(ref path) => AppConfig::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config: {:#}", e);
            AppConfig::default()
        }),
        None => AppConfig::default(),
    };

    let mut app = JsonListApp::new(config, config_path);
    cli::run(cli.command, &mut app, &mut std::io::stdout().lock())
}
