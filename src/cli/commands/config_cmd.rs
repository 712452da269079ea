//! Configuration display command.

use console::style;

use crate::config::{Config, Settings};

/// Print the effective settings. Tokens are counted, never shown.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => println!("{} Config file: {}", style("→").cyan(), path.display()),
        None => println!("{} No config file found; using defaults", style("→").dim()),
    }

    println!("{}", toml::to_string_pretty(settings)?);
    println!("# api_tokens: {} configured", settings.api_tokens.len());

    Ok(())
}
