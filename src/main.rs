use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use modoos::cli::{Cli, Commands};
use modoos::config::{StaticConfig, get_config, init_config_from};
use modoos::storage::StorageFactory;
use modoos::system::init_logging;

fn generate_config(output_path: Option<&str>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or("config.example.toml");
    if Path::new(path).exists() && !force {
        bail!("{} already exists, use --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!("Sample configuration written to {}", path);
    Ok(())
}

async fn migrate() -> Result<()> {
    let config = get_config();
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Migration failed")?;
    info!("{} schema is up to date", storage.backend_name());
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::GenerateConfig { output_path, force } = cli.command() {
        return generate_config(output_path.as_deref(), *force);
    }

    init_config_from(cli.config.as_deref());
    let _guard = init_logging(&get_config().logging)?;

    match cli.command() {
        Commands::Migrate => migrate().await,
        _ => modoos::runtime::run_server().await,
    }
}
