//! HTTP API for movie searches.
//!
//! Every search request gets its own browser session, released before the
//! response is sent.

mod auth;
mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::scrapers::{Launcher, MovieSearch, WebDriverLauncher};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<MovieSearch>,
    /// Bearer tokens accepted on authenticated routes.
    pub api_tokens: Arc<Vec<String>>,
}

impl AppState {
    /// Build state backed by real WebDriver browsers.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Self::with_launcher(settings, Arc::new(WebDriverLauncher::new()))
    }

    pub fn with_launcher(settings: &Settings, launcher: Arc<dyn Launcher>) -> anyhow::Result<Self> {
        let options = settings.browser_options()?;
        if settings.api_tokens.is_empty() {
            tracing::warn!("No API tokens configured; every search request will be rejected");
        }

        Ok(Self {
            search: Arc::new(MovieSearch::new(
                launcher,
                options,
                settings.base_url.clone(),
            )),
            api_tokens: Arc::new(settings.api_tokens.clone()),
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
