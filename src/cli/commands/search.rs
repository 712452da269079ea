//! One-shot search command.

use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::scrapers::{MovieSearch, WebDriverLauncher};

/// Run a single search and print the response JSON to stdout.
pub async fn cmd_search(
    settings: &Settings,
    search_type: &str,
    query: &str,
    limit: usize,
) -> anyhow::Result<()> {
    let options = settings.browser_options()?;
    let search = MovieSearch::new(
        Arc::new(WebDriverLauncher::new()),
        options,
        settings.base_url.clone(),
    );

    eprintln!(
        "{} Searching {} for {:?} (limit {})",
        style("→").cyan(),
        search_type,
        query,
        limit
    );

    match search.search(search_type, query, limit).await {
        Ok(response) => {
            eprintln!(
                "  {} {} result(s)",
                style("✓").green(),
                response.size
            );
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("  {} Search failed: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}
