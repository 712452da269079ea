//! Walks result pages until the limit is met or there is no next page.

use tracing::{debug, info};

use super::locators::{LocatorName, LocatorTable};
use super::reader::read_page;
use crate::scrapers::browser::Session;
use crate::scrapers::{ResultSet, ScrapeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pagination {
    Paginating,
    Done,
}

/// Collect up to `limit` results starting from the page currently shown.
pub async fn collect(
    session: &Session,
    locators: &LocatorTable,
    limit: usize,
) -> ScrapeResult<ResultSet> {
    let mut results = ResultSet::new(limit);
    let mut state = Pagination::Paginating;
    let mut page = 1usize;

    while state == Pagination::Paginating {
        if results.is_full() {
            state = Pagination::Done;
            continue;
        }

        let limit_reached = read_page(session, locators, &mut results).await?;
        debug!("Page {}: {} results collected", page, results.len());

        state = if limit_reached || !click_next(session, locators).await {
            Pagination::Done
        } else {
            page += 1;
            Pagination::Paginating
        };
    }

    info!("Collected {} results over {} page(s)", results.len(), page);
    Ok(results)
}

/// Advance to the next page if the control is there and usable.
///
/// Any failure while trying counts as "no more pages". This also hides real
/// navigation errors behind a normal end of pagination.
pub async fn click_next(session: &Session, locators: &LocatorTable) -> bool {
    match try_click_next(session, locators).await {
        Ok(clicked) => clicked,
        Err(e) => {
            debug!("Next page unavailable: {}", e);
            false
        }
    }
}

async fn try_click_next(session: &Session, locators: &LocatorTable) -> ScrapeResult<bool> {
    let next = session.find(&locators.get(LocatorName::NextButton)).await?;
    if next.is_displayed().await? && next.is_enabled().await? {
        next.click().await?;
        return Ok(true);
    }
    Ok(false)
}
