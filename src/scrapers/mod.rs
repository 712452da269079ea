//! Browser-driven scraping of movie search results.

pub mod browser;
mod error;
pub mod imdb;
mod results;

pub use browser::{
    with_session, BrowserKind, BrowserOptions, Driver, DriverError, DriverResult, Element,
    Launcher, Session, WebDriverLauncher,
};
pub use error::{ScrapeError, ScrapeResult};
pub use imdb::{query, MovieSearch};
pub use results::{to_response, ResultSet, SearchResponse, SearchResult};
