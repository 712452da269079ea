//! imdbscrape - movie search scraping over browser automation.
//!
//! Drives a real browser through the movie database's advanced search form,
//! reads the result pages and serves the results over an authenticated HTTP
//! API or the command line.

pub mod cli;
pub mod config;
pub mod scrapers;
pub mod server;
