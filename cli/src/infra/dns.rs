//! System resolver — implements `AddressResolver` with `tokio::net::lookup_host`.

use std::net::IpAddr;

use anyhow::{Context, Result};

use crate::application::ports::AddressResolver;

/// Resolves through the host's configured resolver (`/etc/resolv.conf`,
/// `nsswitch`).
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((hostname, 0))
            .await
            .with_context(|| format!("resolving {hostname}"))?;
        let mut ips: Vec<IpAddr> = addrs.map(|a| a.ip()).collect();
        ips.sort();
        ips.dedup();
        tracing::debug!(hostname, ?ips, "resolved");
        Ok(ips)
    }
}
