
use anyhow::{bail, Result};

pub mod log;
pub mod speed;

/// Expand a `host`, `host:`, `:port` or `host:port` string into a full
/// `ip:port` address, filling the gaps with `0.0.0.0` and `default_port`.
pub fn normalize_addr(addr: &str, default_port: u16) -> Result<String> {
    let mut parts = addr.splitn(3, ':');
    let host = parts.next().unwrap_or("");
    let port = parts.next();
    if parts.next().is_some() {
        bail!("too many \":\" in address [{}]", addr);
    }

    let host = if host.is_empty() { "0.0.0.0" } else { host };
    Ok(match port {
        Some(port) if !port.is_empty() => format!("{}:{}", host, port),
        _ => format!("{}:{}", host, default_port),
    })
}
