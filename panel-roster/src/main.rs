mod auth;
mod cli;
mod config;
mod services;
mod store;
mod web;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use cli::commands::{export, hash_password, import, serve};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli {
        config,
        data_dir,
        command,
    } = Cli::parse();

    match command {
        // Hashing a password needs no config or data directory
        Commands::HashPassword => hash_password::handle_hash_password_command(),
        Commands::Serve { bind } => {
            let mut config = load_config(config.as_deref(), data_dir)?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            serve::handle_serve_command(config).await
        }
        Commands::Import { table, file } => {
            let config = load_config(config.as_deref(), data_dir)?;
            import::handle_import_command(&config, table, &file).await
        }
        Commands::Export { table, output } => {
            let config = load_config(config.as_deref(), data_dir)?;
            export::handle_export_command(&config, table, &output).await
        }
    }
}

/// Config file and environment, then the `--data-dir` flag
fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/from/file\"\n").unwrap();

        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/file"));

        let config = load_config(Some(&path), Some(PathBuf::from("/from/flag"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/flag"));
    }
}
