//! Movie database advanced search.
//!
//! One query opens the search page, fills the form, then reads result pages
//! until the caller's limit is met or the site runs out of pages:
//! - [`navigator`] submits the search form
//! - [`reader`] turns result items into [`SearchResult`]s
//! - [`paginator`] clicks through pages and enforces the limit
//!
//! [`SearchResult`]: crate::scrapers::SearchResult

mod locators;
pub mod navigator;
pub mod paginator;
pub mod reader;

pub use locators::{Locator, LocatorName, LocatorTable, Strategy};

use std::sync::Arc;

use futures::FutureExt;
use tracing::info;

use super::browser::{with_session, BrowserOptions, Launcher, Session};
use super::{to_response, ScrapeResult, SearchResponse};

/// Search page the form lives on.
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com/search/";

/// Run one query against an open session.
///
/// The session stays owned by the caller, who must release it whatever the
/// outcome.
pub async fn query(
    session: &Session,
    locators: &LocatorTable,
    base_url: &str,
    search_type: &str,
    query_text: &str,
    limit: usize,
) -> ScrapeResult<SearchResponse> {
    navigator::run_search(session, locators, base_url, search_type, query_text).await?;
    let results = paginator::collect(session, locators, limit).await?;
    Ok(to_response(results))
}

/// Runs queries, each in a fresh browser session.
#[derive(Clone)]
pub struct MovieSearch {
    launcher: Arc<dyn Launcher>,
    options: BrowserOptions,
    base_url: String,
    locators: LocatorTable,
}

impl MovieSearch {
    pub fn new(launcher: Arc<dyn Launcher>, options: BrowserOptions, base_url: String) -> Self {
        Self {
            launcher,
            options,
            base_url,
            locators: LocatorTable::new(),
        }
    }

    /// Open a session, run the query and release the session.
    pub async fn search(
        &self,
        search_type: &str,
        query_text: &str,
        limit: usize,
    ) -> ScrapeResult<SearchResponse> {
        info!(
            "Searching {:?} for {:?} (limit {})",
            search_type, query_text, limit
        );

        let locators = self.locators;
        let base_url = self.base_url.clone();
        let search_type = search_type.to_string();
        let query_text = query_text.to_string();

        with_session(self.launcher.as_ref(), &self.options, move |session| {
            async move {
                query(
                    session,
                    &locators,
                    &base_url,
                    &search_type,
                    &query_text,
                    limit,
                )
                .await
            }
            .boxed()
        })
        .await
    }
}
