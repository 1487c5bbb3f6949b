//! `serve`: run the HTTP server

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;

use crate::auth::{SessionStore, SpreadsheetVerifier};
use crate::config::Config;
use crate::services::PanelService;
use crate::store::{TableKind, TableStore};
use crate::web::{self, AppState};

pub async fn handle_serve_command(config: Config) -> Result<()> {
    let store = Arc::new(TableStore::new(&config.data_dir, config.files.clone()));
    store
        .initialize()
        .await
        .context("Failed to initialize table files")?;

    let credentials = store.path(TableKind::Credentials);
    if !credentials.exists() {
        log::warn!(
            "No credentials file at {}; every login will be rejected",
            credentials.display()
        );
    }

    println!(
        "Serving {} on {}",
        store.data_dir().display().to_string().cyan(),
        format!("http://{}", config.bind).bright_green().bold()
    );

    let state = AppState {
        panel: PanelService::new(store),
        sessions: Arc::new(SessionStore::new(config.session_ttl())),
        verifier: Arc::new(SpreadsheetVerifier::new(credentials)),
        config: Arc::new(config),
    };
    web::serve(state).await
}
