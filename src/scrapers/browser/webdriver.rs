//! WebDriver backend.
//!
//! Local kinds start the driver binary (chromedriver or geckodriver) on a free
//! port and talk to it over HTTP; the remote kind talks to a Selenium hub
//! directly.

use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thirtyfour::error::WebDriverErrorInner;
use thirtyfour::prelude::*;
use tracing::{debug, info, warn};

use super::{BrowserKind, Driver, DriverError, DriverResult, Element, Launcher};
use crate::scrapers::imdb::{Locator, Strategy};

/// How long a freshly spawned driver binary gets to start listening.
const DRIVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Launches browsers over the WebDriver protocol.
#[derive(Debug, Default, Clone)]
pub struct WebDriverLauncher;

impl WebDriverLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Launcher for WebDriverLauncher {
    async fn launch(&self, kind: &BrowserKind, headless: bool) -> DriverResult<Box<dyn Driver>> {
        let session = match kind {
            BrowserKind::LocalExecutable(path) => {
                let service = DriverService::start(path).await?;
                let mut caps = DesiredCapabilities::chrome();
                if headless {
                    caps.set_headless().map_err(launch_error)?;
                }
                let driver = WebDriver::new(service.url(), caps)
                    .await
                    .map_err(launch_error)?;
                WebDriverSession::new(driver, Some(service))
            }
            BrowserKind::Firefox(path) => {
                let service = DriverService::start(path).await?;
                let mut caps = DesiredCapabilities::firefox();
                if headless {
                    caps.set_headless().map_err(launch_error)?;
                }
                let driver = WebDriver::new(service.url(), caps)
                    .await
                    .map_err(launch_error)?;
                WebDriverSession::new(driver, Some(service))
            }
            BrowserKind::RemoteEndpoint(url) => {
                info!("Connecting to remote WebDriver at {}", url);
                let mut caps = DesiredCapabilities::chrome();
                if headless {
                    caps.set_headless().map_err(launch_error)?;
                }
                let driver = WebDriver::new(url.as_str(), caps)
                    .await
                    .map_err(launch_error)?;
                WebDriverSession::new(driver, None)
            }
        };

        Ok(Box::new(session))
    }
}

fn launch_error(e: WebDriverError) -> DriverError {
    DriverError::Launch(e.to_string())
}

fn command_error(locator: Option<&Locator>, e: WebDriverError) -> DriverError {
    match (locator, e.as_inner()) {
        (Some(locator), WebDriverErrorInner::NoSuchElement(_)) => {
            DriverError::ElementNotFound(locator.selector.clone())
        }
        _ => DriverError::Command(e.to_string()),
    }
}

fn to_by(locator: &Locator) -> By {
    let selector = locator.selector.as_str();
    match locator.strategy {
        Strategy::Id => By::Id(selector),
        Strategy::ClassName => By::ClassName(selector),
        Strategy::XPath => By::XPath(selector),
    }
}

/// A driver binary started by us; killed when quit or dropped.
struct DriverService {
    process: Option<Child>,
    port: u16,
}

impl DriverService {
    async fn start(binary: &Path) -> DriverResult<Self> {
        let port = free_port()?;
        info!("Starting {} on port {}", binary.display(), port);

        let process = Command::new(binary)
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DriverError::Launch(format!("{}: {}", binary.display(), e)))?;

        let mut service = Self {
            process: Some(process),
            port,
        };

        let start = Instant::now();
        while start.elapsed() < DRIVER_STARTUP_TIMEOUT {
            if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                debug!("{} is accepting connections", binary.display());
                return Ok(service);
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        service.shutdown();
        Err(DriverError::Launch(format!(
            "{} did not start listening within {} seconds",
            binary.display(),
            DRIVER_STARTUP_TIMEOUT.as_secs()
        )))
    }

    fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    fn shutdown(&mut self) {
        if let Some(mut process) = self.process.take() {
            debug!("Stopping driver process on port {}", self.port);
            let _ = process.kill();
            let _ = process.wait();
        }
    }
}

impl Drop for DriverService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn free_port() -> DriverResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|e| DriverError::Launch(format!("no free local port: {}", e)))?;
    listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|e| DriverError::Launch(format!("no free local port: {}", e)))
}

/// One WebDriver session, plus the driver process hosting it when local.
struct WebDriverSession {
    driver: Option<WebDriver>,
    service: Option<DriverService>,
}

impl WebDriverSession {
    fn new(driver: WebDriver, service: Option<DriverService>) -> Self {
        Self {
            driver: Some(driver),
            service,
        }
    }

    fn driver(&self) -> DriverResult<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| DriverError::Command("WebDriver session already ended".into()))
    }
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.driver()?
            .goto(url)
            .await
            .map_err(|e| command_error(None, e))
    }

    async fn maximize_window(&self) -> DriverResult<()> {
        self.driver()?
            .maximize_window()
            .await
            .map_err(|e| command_error(None, e))
    }

    async fn find(&self, locator: &Locator) -> DriverResult<Box<dyn Element>> {
        let element = self
            .driver()?
            .find(to_by(locator))
            .await
            .map_err(|e| command_error(Some(locator), e))?;
        Ok(Box::new(WebDriverElement(element)))
    }

    async fn quit(&mut self) -> DriverResult<()> {
        let result = match self.driver.take() {
            Some(driver) => driver.quit().await.map_err(|e| command_error(None, e)),
            None => Ok(()),
        };
        if let Some(mut service) = self.service.take() {
            service.shutdown();
        }
        result
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.driver.is_some() {
            warn!("WebDriver session dropped without quit");
        }
    }
}

struct WebDriverElement(WebElement);

#[async_trait]
impl Element for WebDriverElement {
    async fn find(&self, locator: &Locator) -> DriverResult<Box<dyn Element>> {
        let element = self
            .0
            .find(to_by(locator))
            .await
            .map_err(|e| command_error(Some(locator), e))?;
        Ok(Box::new(WebDriverElement(element)))
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Box<dyn Element>>> {
        let elements = self
            .0
            .find_all(to_by(locator))
            .await
            .map_err(|e| command_error(Some(locator), e))?;
        Ok(elements
            .into_iter()
            .map(|e| Box::new(WebDriverElement(e)) as Box<dyn Element>)
            .collect())
    }

    async fn click(&self) -> DriverResult<()> {
        self.0.click().await.map_err(|e| command_error(None, e))
    }

    async fn send_keys(&self, text: &str) -> DriverResult<()> {
        self.0
            .send_keys(text)
            .await
            .map_err(|e| command_error(None, e))
    }

    async fn text(&self) -> DriverResult<String> {
        self.0.text().await.map_err(|e| command_error(None, e))
    }

    async fn is_displayed(&self) -> DriverResult<bool> {
        self.0
            .is_displayed()
            .await
            .map_err(|e| command_error(None, e))
    }

    async fn is_enabled(&self) -> DriverResult<bool> {
        self.0
            .is_enabled()
            .await
            .map_err(|e| command_error(None, e))
    }
}
