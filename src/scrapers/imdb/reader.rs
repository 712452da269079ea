//! Extracts result items from the page currently shown.

use tracing::debug;

use super::locators::{LocatorName, LocatorTable};
use crate::scrapers::browser::{Element, Session};
use crate::scrapers::{ResultSet, ScrapeError, ScrapeResult, SearchResult};

/// Read result items from the current page into `results`.
///
/// Returns true as soon as `results` reaches its limit; items after that
/// point on the page are not read.
pub async fn read_page(
    session: &Session,
    locators: &LocatorTable,
    results: &mut ResultSet,
) -> ScrapeResult<bool> {
    let container = session
        .find(&locators.get(LocatorName::SearchResultsContainer))
        .await?;
    let items = container
        .find_all(&locators.get(LocatorName::ResultItemContainer))
        .await?;
    debug!("Result page has {} items", items.len());

    for item in items {
        if results.is_full() {
            return Ok(true);
        }
        let record = read_item(item.as_ref(), locators).await?;
        results.push(record);
        if results.is_full() {
            return Ok(true);
        }
    }

    Ok(false)
}

async fn read_item(item: &dyn Element, locators: &LocatorTable) -> ScrapeResult<SearchResult> {
    let title = item
        .find(&locators.get(LocatorName::Title))
        .await?
        .text()
        .await?;

    let year_text = item
        .find(&locators.get(LocatorName::Year))
        .await?
        .text()
        .await?;

    let score = match item.find(&locators.get(LocatorName::Score)).await {
        Ok(element) => parse_score(&element.text().await?)?,
        Err(e) => {
            debug!("No score for {:?}: {}", title, e);
            0.0
        }
    };

    Ok(SearchResult::new(title, normalize_year(&year_text), score))
}

/// Strip literal parentheses: `"(1999)"` becomes `"1999"`.
pub fn normalize_year(text: &str) -> String {
    text.replace(['(', ')'], "")
}

/// Parse a score the way it is displayed, e.g. `"7.5"`.
pub fn parse_score(text: &str) -> ScrapeResult<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ScrapeError::InvalidScore(text.to_string()))
}
