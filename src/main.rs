use anyhow::Context;
use clap::Parser;
use onsite_predict::adapters::http;
use onsite_predict::utils::{logger, validation::Validate};
use onsite_predict::{AppConfig, Cli, ServiceContext};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    logger::init_logger(&config.logging.level, cli.verbose, config.logging.json);
    tracing::info!("🚀 Starting onsite-predict v{}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let ctx = ServiceContext::from_config(&config);
    if !ctx.all_models_loaded() {
        tracing::warn!("⚠️ Some models failed to load; their endpoints will return errors");
    }

    if cli.check {
        display_summary(&config, &ctx);
        return Ok(());
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!("📡 Listening on http://{}", address);

    http::serve(listener, Arc::new(ctx)).await?;
    Ok(())
}

fn display_summary(config: &AppConfig, ctx: &ServiceContext) {
    println!("📋 Configuration Summary:");
    println!("  Bind: {}", config.bind_address());
    println!("  Currency symbol: {}", ctx.formatter.symbol());
    println!(
        "  Indicator prefixes: {}",
        ctx.normalizer.prefixes().join(", ")
    );
    println!();
    println!("🧠 Models:");
    for model in ctx.models() {
        match (model.n_features(), model.load_error()) {
            (Some(width), _) => println!("  ✅ {} ({} features)", model.name(), width),
            (None, reason) => println!("  ❌ {}: {}", model.name(), reason.unwrap_or("not loaded")),
        }
    }
    println!();
    let names: Vec<&str> = ctx.construction_schema().names().collect();
    println!("🏗️ Construction features: {}", names.join(", "));
}
