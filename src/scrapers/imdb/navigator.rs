//! Fills and submits the advanced search form.

use tracing::debug;

use super::locators::{LocatorName, LocatorTable};
use crate::scrapers::browser::Session;
use crate::scrapers::ScrapeResult;

/// Load the search page, pick `category`, type `query_text` and submit.
///
/// Every control here is required; a missing one fails the query.
pub async fn run_search(
    session: &Session,
    locators: &LocatorTable,
    base_url: &str,
    category: &str,
    query_text: &str,
) -> ScrapeResult<()> {
    session.goto(base_url).await?;

    let category_option = session
        .find(&locators.resolve(LocatorName::SearchType, Some(category)))
        .await?;
    category_option.click().await?;
    debug!("Selected search category {:?}", category);

    let search_box = session.find(&locators.get(LocatorName::SearchBox)).await?;
    search_box.send_keys(query_text).await?;

    let submit = session
        .find(&locators.get(LocatorName::SubmitButton))
        .await?;
    submit.click().await?;
    debug!("Submitted search for {:?}", query_text);

    Ok(())
}
