//! Browser automation boundary.
//!
//! The scraper only issues generic automation commands: navigate, find an
//! element, click, type, read text, check visibility. Backends implement the
//! traits here; the WebDriver backend talks to chromedriver, geckodriver or a
//! Selenium endpoint, and tests plug in an in-memory fake.

mod config;
#[cfg(test)]
pub(crate) mod fake;
mod session;
mod webdriver;

pub use config::{BrowserKind, BrowserOptions};
pub use session::{with_session, Session};
pub use webdriver::WebDriverLauncher;

use async_trait::async_trait;

use crate::scrapers::imdb::Locator;

/// Result type for browser automation commands.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised by a browser automation backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Browser command failed: {0}")]
    Command(String),
    #[error("Failed to start browser: {0}")]
    Launch(String),
}

/// A node in the current page.
#[async_trait]
pub trait Element: Send + Sync {
    /// Find the first descendant matching `locator`.
    async fn find(&self, locator: &Locator) -> DriverResult<Box<dyn Element>>;

    /// Find every descendant matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Box<dyn Element>>>;

    async fn click(&self) -> DriverResult<()>;

    async fn send_keys(&self, text: &str) -> DriverResult<()>;

    /// Visible text of the node.
    async fn text(&self) -> DriverResult<String>;

    async fn is_displayed(&self) -> DriverResult<bool>;

    async fn is_enabled(&self) -> DriverResult<bool>;
}

/// A live browser controlled through an automation protocol.
///
/// Every call blocks the caller until the browser answers. There is no
/// command timeout; a hung browser hangs the caller.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn goto(&self, url: &str) -> DriverResult<()>;

    async fn maximize_window(&self) -> DriverResult<()>;

    /// Find the first element in the page matching `locator`.
    async fn find(&self, locator: &Locator) -> DriverResult<Box<dyn Element>>;

    /// Terminate the browser and anything started to host it.
    async fn quit(&mut self) -> DriverResult<()>;
}

/// Starts browsers for a given [`BrowserKind`].
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, kind: &BrowserKind, headless: bool) -> DriverResult<Box<dyn Driver>>;
}
