//! DNS pre-flight: does the domain already point at this server?

use std::net::IpAddr;

use crate::application::ports::AddressResolver;

/// Result of comparing the domain's addresses with the supplied public IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsVerdict {
    /// The supplied IP is among the resolved addresses.
    Matches,
    /// The domain resolves, but not to the supplied IP.
    Mismatch { resolved: Vec<IpAddr> },
    /// The domain did not resolve at all.
    Unresolved(String),
}

impl DnsVerdict {
    /// Operator-facing description of a non-matching verdict.
    #[must_use]
    pub fn describe(&self, domain: &str, expected: IpAddr) -> String {
        match self {
            Self::Matches => format!("{domain} resolves to {expected}"),
            Self::Mismatch { resolved } => {
                let got: Vec<String> = resolved.iter().map(ToString::to_string).collect();
                format!(
                    "{domain} resolves to {} but this server is {expected}",
                    got.join(", ")
                )
            }
            Self::Unresolved(reason) => format!("{domain} does not resolve ({reason})"),
        }
    }
}

/// Resolve `domain` and compare with `expected`.
///
/// Never fails: resolution errors become [`DnsVerdict::Unresolved`] so the
/// operator can decide whether to continue.
pub async fn verify(resolver: &impl AddressResolver, domain: &str, expected: IpAddr) -> DnsVerdict {
    match resolver.resolve(domain).await {
        Ok(addrs) if addrs.contains(&expected) => DnsVerdict::Matches,
        Ok(addrs) if addrs.is_empty() => DnsVerdict::Unresolved("no addresses".to_string()),
        Ok(addrs) => DnsVerdict::Mismatch { resolved: addrs },
        Err(e) => DnsVerdict::Unresolved(format!("{e:#}")),
    }
}
