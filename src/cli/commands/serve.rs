//! Web server command.

use std::net::SocketAddr;

use anyhow::Context;
use console::style;

use crate::config::Settings;

/// Port used when the bind address names only a host.
const DEFAULT_PORT: u16 = 3030;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let addr = resolve_bind_address(bind).await?;

    println!(
        "{} Driving {} browsers (headless: {})",
        style("→").cyan(),
        settings.driver_kind,
        settings.headless
    );
    if settings.api_tokens.is_empty() {
        eprintln!(
            "  {} No API tokens configured; set IMDBSCRAPE_API_TOKENS to accept requests",
            style("!").yellow()
        );
    }
    println!(
        "{} Starting imdbscrape server at http://{}",
        style("→").cyan(),
        addr
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, addr).await
}

/// Resolve a bind address to a socket address; host names are looked up.
async fn resolve_bind_address(bind: &str) -> anyhow::Result<SocketAddr> {
    let (host, port) = parse_bind_address(bind)?;
    let addr = tokio::net::lookup_host((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to resolve bind address {}", bind))?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Bind address {} resolved to nothing", bind));
    addr
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        anyhow::bail!("Invalid port in bind address: {}", bind);
    }

    Ok((bind.to_string(), DEFAULT_PORT))
}
