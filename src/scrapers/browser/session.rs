//! Browser session lifecycle.

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use super::{BrowserOptions, Driver, DriverError, Element, Launcher};
use crate::scrapers::imdb::Locator;
use crate::scrapers::ScrapeResult;

/// A single live browser, exclusively owned by whoever opened it.
///
/// [`Session::release`] takes the session by value, so it can only run once.
/// A session dropped without release (a cancelled or panicking query) quits
/// its browser on a background task instead.
pub struct Session {
    driver: Option<Box<dyn Driver>>,
    label: &'static str,
}

impl Session {
    /// Start a browser and maximize its viewport.
    pub async fn open(launcher: &dyn Launcher, options: &BrowserOptions) -> ScrapeResult<Self> {
        info!(
            "Opening {} browser session (headless={})",
            options.kind.label(),
            options.headless
        );
        let mut driver = launcher.launch(&options.kind, options.headless).await?;

        if let Err(e) = driver.maximize_window().await {
            if let Err(quit_err) = driver.quit().await {
                warn!("Failed to quit browser after setup error: {}", quit_err);
            }
            return Err(e.into());
        }

        Ok(Self::from_driver(driver, options.kind.label()))
    }

    /// Wrap an already started driver.
    pub fn from_driver(driver: Box<dyn Driver>, label: &'static str) -> Self {
        Self {
            driver: Some(driver),
            label,
        }
    }

    fn driver(&self) -> ScrapeResult<&dyn Driver> {
        self.driver
            .as_deref()
            .ok_or_else(|| DriverError::Command("session already released".into()).into())
    }

    pub async fn goto(&self, url: &str) -> ScrapeResult<()> {
        debug!("Navigating to {}", url);
        Ok(self.driver()?.goto(url).await?)
    }

    pub async fn find(&self, locator: &Locator) -> ScrapeResult<Box<dyn Element>> {
        Ok(self.driver()?.find(locator).await?)
    }

    /// Terminate the browser.
    pub async fn release(mut self) {
        self.shutdown().await;
    }

    async fn shutdown(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            info!("Releasing {} browser session", self.label);
            if let Err(e) = driver.quit().await {
                warn!("Failed to quit {} browser cleanly: {}", self.label, e);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let Some(mut driver) = self.driver.take() else {
            return;
        };
        let label = self.label;
        warn!("{} browser session dropped without release; quitting it", label);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = driver.quit().await {
                        warn!("Failed to quit dropped {} browser: {}", label, e);
                    }
                });
            }
            Err(_) => warn!("No runtime to quit dropped {} browser; it may be left running", label),
        }
    }
}

/// Open a session, run `f` against it and release it on every exit path.
///
/// If this future is dropped mid-query the session's drop handler does the
/// release.
pub async fn with_session<T, F>(
    launcher: &dyn Launcher,
    options: &BrowserOptions,
    f: F,
) -> ScrapeResult<T>
where
    F: for<'s> FnOnce(&'s Session) -> BoxFuture<'s, ScrapeResult<T>>,
{
    let session = Session::open(launcher, options).await?;
    let outcome = f(&session).await;
    session.release().await;
    outcome
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::FutureExt;

    use super::*;
    use crate::scrapers::browser::fake::{FakeLauncher, FakeSite};
    use crate::scrapers::{BrowserKind, ScrapeError};

    fn options() -> BrowserOptions {
        BrowserOptions::new(
            BrowserKind::RemoteEndpoint("http://localhost:4444".to_string()),
            true,
        )
    }

    #[tokio::test]
    async fn test_open_maximizes() {
        let launcher = FakeLauncher::new(FakeSite::numbered(&[1]));

        let session = Session::open(&launcher, &options()).await.unwrap();
        session.release().await;

        let log = launcher.log.lock().unwrap();
        assert!(log.maximized);
        assert_eq!(log.quits, 1);
    }

    #[tokio::test]
    async fn test_failed_maximize_quits_browser() {
        let mut site = FakeSite::numbered(&[1]);
        site.maximize_fails = true;
        let launcher = FakeLauncher::new(site);

        let err = Session::open(&launcher, &options()).await.err().unwrap();

        assert!(matches!(err, ScrapeError::Driver(DriverError::Command(_))));
        assert_eq!(launcher.quits(), 1);
    }

    #[tokio::test]
    async fn test_unreleased_session_quits_on_drop() {
        let launcher = FakeLauncher::new(FakeSite::numbered(&[1]));

        let session = Session::open(&launcher, &options()).await.unwrap();
        drop(session);

        assert_eq!(launcher.wait_for_quits(1).await, 1);
    }

    #[tokio::test]
    async fn test_cancelled_query_still_releases() {
        let mut site = FakeSite::numbered(&[1]);
        site.goto_hangs = true;
        let launcher = FakeLauncher::new(site);
        let options = options();

        let run = with_session(&launcher, &options, |session| {
            async move { session.goto("http://fake.test/").await }.boxed()
        });
        let outcome = tokio::time::timeout(Duration::from_millis(50), run).await;

        assert!(outcome.is_err());
        assert_eq!(launcher.wait_for_quits(1).await, 1);
    }

    #[tokio::test]
    async fn test_release_after_error_happens_once() {
        let launcher = FakeLauncher::new(FakeSite::numbered(&[1]));

        let outcome: ScrapeResult<()> = with_session(&launcher, &options(), |_session| {
            async move { Err(ScrapeError::ElementNotFound("query".to_string())) }.boxed()
        })
        .await;

        assert!(outcome.is_err());
        assert_eq!(launcher.wait_for_quits(2).await, 1);
    }
}
