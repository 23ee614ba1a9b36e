//! Firewall rule bookkeeping over `ufw status` output.

/// Rules the deployment needs: SSH, plaintext HTTP and HTTPS.
pub const REQUIRED_RULES: &[&str] = &["22/tcp", "80/tcp", "443/tcp"];

/// Whether `ufw status` reports the firewall as enabled.
#[must_use]
pub fn is_active(status: &str) -> bool {
    status
        .lines()
        .any(|l| l.trim().eq_ignore_ascii_case("status: active"))
}

/// Rules from `wanted` that have no IPv4 `ALLOW` entry in `status`.
///
/// Adding only these keeps repeated runs from touching the rule set.
#[must_use]
pub fn missing_rules<'a>(status: &str, wanted: &[&'a str]) -> Vec<&'a str> {
    wanted
        .iter()
        .copied()
        .filter(|rule| !has_allow(status, rule))
        .collect()
}

fn has_allow(status: &str, rule: &str) -> bool {
    status.lines().any(|line| {
        let mut cols = line.split_whitespace();
        cols.next() == Some(rule) && cols.next().is_some_and(|c| c.eq_ignore_ascii_case("ALLOW"))
    })
}
