//! Selectors for the advanced search pages.
//!
//! These mirror the site's markup at one point in time. When the markup
//! changes, required lookups start failing with `ElementNotFound` while year
//! and score extraction silently degrade.

use serde::Serialize;

/// Placeholder replaced by the locator parameter.
const PARAM_PLACEHOLDER: &str = "${}";

/// How a selector string is interpreted by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Id,
    ClassName,
    XPath,
}

/// A resolved selector, ready to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

/// Logical names of every element the scraper touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorName {
    /// Category option in the search form; takes the category as parameter.
    SearchType,
    SearchBox,
    SubmitButton,
    SearchResultsContainer,
    ResultItemContainer,
    Title,
    Year,
    Score,
    NextButton,
}

impl LocatorName {
    pub const ALL: [LocatorName; 9] = [
        LocatorName::SearchType,
        LocatorName::SearchBox,
        LocatorName::SubmitButton,
        LocatorName::SearchResultsContainer,
        LocatorName::ResultItemContainer,
        LocatorName::Title,
        LocatorName::Year,
        LocatorName::Score,
        LocatorName::NextButton,
    ];

    fn entry(self) -> (Strategy, &'static str) {
        match self {
            LocatorName::SearchType => (Strategy::XPath, "//option[@value='${}']"),
            LocatorName::SearchBox => (Strategy::Id, "query"),
            LocatorName::SubmitButton => (
                Strategy::XPath,
                "//form[@action='/search/title-text/']//button[@type='submit']",
            ),
            LocatorName::SearchResultsContainer => (Strategy::ClassName, "lister-list"),
            LocatorName::ResultItemContainer => {
                (Strategy::XPath, ".//div[@class='lister-item mode-detail']")
            }
            LocatorName::Title => (Strategy::XPath, ".//h3/a"),
            LocatorName::Year => (
                Strategy::XPath,
                ".//span[@class='lister-item-year text-muted unbold']",
            ),
            LocatorName::Score => (Strategy::XPath, ".//strong"),
            LocatorName::NextButton => (Strategy::XPath, "//a[@class='lister-page-next next-page']"),
        }
    }
}

/// Fixed table from logical names to selectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocatorTable;

impl LocatorTable {
    pub const fn new() -> Self {
        Self
    }

    /// Selector for `name` with no parameter substituted.
    pub fn get(&self, name: LocatorName) -> Locator {
        let (strategy, selector) = name.entry();
        Locator {
            strategy,
            selector: selector.to_string(),
        }
    }

    /// Selector for `name`, substituting `param` for the placeholder when given.
    ///
    /// An empty parameter counts as absent and leaves the template as is.
    pub fn resolve(&self, name: LocatorName, param: Option<&str>) -> Locator {
        let mut locator = self.get(name);
        if let Some(value) = param.filter(|v| !v.is_empty()) {
            locator.selector = locator.selector.replace(PARAM_PLACEHOLDER, value);
        }
        locator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_substitution() {
        let locator = LocatorTable::new().resolve(LocatorName::SearchType, Some("title"));
        assert_eq!(locator.strategy, Strategy::XPath);
        assert_eq!(locator.selector, "//option[@value='title']");
    }

    #[test]
    fn test_empty_param_leaves_template() {
        let table = LocatorTable::new();
        assert_eq!(
            table.resolve(LocatorName::SearchType, Some("")),
            table.get(LocatorName::SearchType)
        );
        assert_eq!(
            table.resolve(LocatorName::SearchType, Some("")).selector,
            "//option[@value='${}']"
        );
    }

    #[test]
    fn test_unparameterized_lookup_is_unchanged() {
        let table = LocatorTable::new();
        assert_eq!(
            table.resolve(LocatorName::SearchBox, None),
            Locator {
                strategy: Strategy::Id,
                selector: "query".to_string()
            }
        );
        assert_eq!(
            table.get(LocatorName::SearchResultsContainer).strategy,
            Strategy::ClassName
        );
    }

    #[test]
    fn test_only_search_type_is_parameterized() {
        let table = LocatorTable::new();
        let parameterized: Vec<_> = LocatorName::ALL
            .iter()
            .filter(|name| table.get(**name).selector.contains(PARAM_PLACEHOLDER))
            .collect();
        assert_eq!(parameterized, vec![&LocatorName::SearchType]);
    }

    #[test]
    fn test_item_scoped_selectors_are_relative() {
        let table = LocatorTable::new();
        for name in [
            LocatorName::ResultItemContainer,
            LocatorName::Title,
            LocatorName::Year,
            LocatorName::Score,
        ] {
            assert!(table.get(name).selector.starts_with(".//"), "{:?}", name);
        }
    }
}
