//! In-memory browser used by unit tests.
//!
//! Models the search form plus a list of result pages; records every command
//! so tests can assert on navigation, pagination and release.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BrowserKind, Driver, DriverError, DriverResult, Element, Launcher};
use crate::scrapers::imdb::{Locator, LocatorName, LocatorTable};

#[derive(Debug, Clone)]
pub(crate) struct FakeItem {
    pub title: String,
    pub year: String,
    pub score: Option<String>,
}

impl FakeItem {
    pub fn new(title: &str, year: &str, score: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            year: year.to_string(),
            score: score.map(str::to_string),
        }
    }
}

/// What the fake site looks like.
#[derive(Debug, Clone)]
pub(crate) struct FakeSite {
    pub categories: Vec<String>,
    pub pages: Vec<Vec<FakeItem>>,
    pub has_form: bool,
    pub next_enabled: bool,
    /// Fail the "is displayed" check on the next button with a protocol error.
    pub next_errors: bool,
    pub maximize_fails: bool,
    /// Navigation never completes.
    pub goto_hangs: bool,
}

impl FakeSite {
    pub fn with_pages(pages: Vec<Vec<FakeItem>>) -> Self {
        Self {
            categories: vec!["title".to_string(), "location".to_string()],
            pages,
            has_form: true,
            next_enabled: true,
            next_errors: false,
            maximize_fails: false,
            goto_hangs: false,
        }
    }

    /// `counts[i]` numbered items on page `i`.
    pub fn numbered(counts: &[usize]) -> Self {
        let mut n = 0;
        let pages: Vec<Vec<FakeItem>> = counts
            .iter()
            .map(|count| {
                (0..*count)
                    .map(|_| {
                        n += 1;
                        FakeItem::new(
                            &format!("Movie {}", n),
                            &format!("({})", 1990 + n),
                            Some("7.0"),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::with_pages(pages)
    }
}

/// Everything the fake saw.
#[derive(Debug, Default)]
pub(crate) struct FakeLog {
    pub visited: Vec<String>,
    pub selected_category: Option<String>,
    pub typed: Vec<String>,
    pub submitted: bool,
    pub current_page: usize,
    pub next_clicks: usize,
    pub items_read: usize,
    pub maximized: bool,
    pub launches: usize,
    pub quits: usize,
}

#[derive(Clone)]
pub(crate) struct FakeLauncher {
    site: Arc<FakeSite>,
    pub log: Arc<Mutex<FakeLog>>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            log: Arc::new(Mutex::new(FakeLog::default())),
        }
    }

    pub fn driver(&self) -> FakeDriver {
        self.log.lock().unwrap().launches += 1;
        FakeDriver {
            site: self.site.clone(),
            log: self.log.clone(),
        }
    }

    pub fn quits(&self) -> usize {
        self.log.lock().unwrap().quits
    }

    /// Wait for quits issued from background tasks to land.
    pub async fn wait_for_quits(&self, expected: usize) -> usize {
        for _ in 0..100 {
            if self.quits() >= expected {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.quits()
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self, _kind: &BrowserKind, _headless: bool) -> DriverResult<Box<dyn Driver>> {
        Ok(Box::new(self.driver()))
    }
}

pub(crate) struct FakeDriver {
    site: Arc<FakeSite>,
    log: Arc<Mutex<FakeLog>>,
}

fn not_found(locator: &Locator) -> DriverError {
    DriverError::ElementNotFound(locator.selector.clone())
}

#[async_trait]
impl Driver for FakeDriver {
    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.log.lock().unwrap().visited.push(url.to_string());
        if self.site.goto_hangs {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn maximize_window(&self) -> DriverResult<()> {
        if self.site.maximize_fails {
            return Err(DriverError::Command("window management unsupported".into()));
        }
        self.log.lock().unwrap().maximized = true;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> DriverResult<Box<dyn Element>> {
        let table = LocatorTable::new();
        let node = if self.site.has_form && *locator == table.get(LocatorName::SearchBox) {
            Node::SearchBox
        } else if self.site.has_form && *locator == table.get(LocatorName::SubmitButton) {
            Node::Submit
        } else if *locator == table.get(LocatorName::SearchResultsContainer) {
            Node::Container
        } else if *locator == table.get(LocatorName::NextButton) {
            let page = self.log.lock().unwrap().current_page;
            if page + 1 >= self.site.pages.len() {
                return Err(not_found(locator));
            }
            Node::Next
        } else if let Some(category) = self
            .site
            .categories
            .iter()
            .find(|c| *locator == table.resolve(LocatorName::SearchType, Some(c.as_str())))
        {
            Node::Category(category.clone())
        } else {
            return Err(not_found(locator));
        };

        Ok(Box::new(FakeElement {
            node,
            site: self.site.clone(),
            log: self.log.clone(),
        }))
    }

    async fn quit(&mut self) -> DriverResult<()> {
        self.log.lock().unwrap().quits += 1;
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Category(String),
    SearchBox,
    Submit,
    Container,
    Item(FakeItem),
    Text(String),
    Next,
}

struct FakeElement {
    node: Node,
    site: Arc<FakeSite>,
    log: Arc<Mutex<FakeLog>>,
}

impl FakeElement {
    fn child(&self, node: Node) -> Box<dyn Element> {
        Box::new(FakeElement {
            node,
            site: self.site.clone(),
            log: self.log.clone(),
        })
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn find(&self, locator: &Locator) -> DriverResult<Box<dyn Element>> {
        let table = LocatorTable::new();
        match &self.node {
            Node::Item(item) if *locator == table.get(LocatorName::Title) => {
                self.log.lock().unwrap().items_read += 1;
                Ok(self.child(Node::Text(item.title.clone())))
            }
            Node::Item(item) if *locator == table.get(LocatorName::Year) => {
                Ok(self.child(Node::Text(item.year.clone())))
            }
            Node::Item(item) if *locator == table.get(LocatorName::Score) => match &item.score {
                Some(score) => Ok(self.child(Node::Text(score.clone()))),
                None => Err(not_found(locator)),
            },
            _ => Err(not_found(locator)),
        }
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Box<dyn Element>>> {
        let table = LocatorTable::new();
        match &self.node {
            Node::Container if *locator == table.get(LocatorName::ResultItemContainer) => {
                let page = self.log.lock().unwrap().current_page;
                Ok(self
                    .site
                    .pages
                    .get(page)
                    .map(|items| {
                        items
                            .iter()
                            .map(|item| self.child(Node::Item(item.clone())))
                            .collect()
                    })
                    .unwrap_or_default())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&self) -> DriverResult<()> {
        let mut log = self.log.lock().unwrap();
        match &self.node {
            Node::Category(category) => log.selected_category = Some(category.clone()),
            Node::Submit => log.submitted = true,
            Node::Next => {
                log.current_page += 1;
                log.next_clicks += 1;
            }
            _ => {}
        }
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> DriverResult<()> {
        self.log.lock().unwrap().typed.push(text.to_string());
        Ok(())
    }

    async fn text(&self) -> DriverResult<String> {
        match &self.node {
            Node::Text(text) => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn is_displayed(&self) -> DriverResult<bool> {
        if matches!(self.node, Node::Next) && self.site.next_errors {
            return Err(DriverError::Command("stale element reference".into()));
        }
        Ok(true)
    }

    async fn is_enabled(&self) -> DriverResult<bool> {
        match self.node {
            Node::Next => Ok(self.site.next_enabled),
            _ => Ok(true),
        }
    }
}
