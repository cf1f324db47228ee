use std::sync::Arc;

use crate::api::HttpClient;
use crate::app::controller::AppController;
use crate::config::Config;
use crate::error::Result;
use crate::session::FileTokenStore;

/// Entry point used by `main` to bootstrap the controller stack.
pub async fn run(config: Config) -> Result<()> {
    let api = Arc::new(HttpClient::new(&config)?);
    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    log::debug!("Starting interactive mode against {}", config.api_url);
    let controller = AppController::new(config, api, tokens);
    controller.run().await
}
