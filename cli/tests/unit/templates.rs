//! Golden tests for the generated nginx sites and the cron entry.

#![allow(clippy::expect_used)]

use std::path::Path;

use n8n_provision::domain::render::{ProxyVariant, render_cron, render_proxy_site};
use n8n_provision::domain::{CertMode, CertState, Settings};

use crate::helpers::{config, settings};

const PLAIN_GOLDEN: &str = include_str!("../fixtures/nginx-plain.golden");
const TLS_GOLDEN: &str = include_str!("../fixtures/nginx-tls.golden");

#[test]
fn test_plain_site_matches_golden() {
    let site = render_proxy_site(&config(), &settings(), ProxyVariant::Plain).expect("render");
    assert_eq!(site, PLAIN_GOLDEN);
}

#[test]
fn test_tls_site_matches_golden() {
    let site = render_proxy_site(&config(), &settings(), ProxyVariant::Tls).expect("render");
    assert_eq!(site, TLS_GOLDEN);
}

#[test]
fn test_every_state_picks_expected_site() {
    for (state, tls) in [
        (CertState::None, false),
        (CertState::Issued(CertMode::Integrated), true),
        (CertState::Issued(CertMode::Standalone), true),
        (CertState::Failed, false),
    ] {
        let site = render_proxy_site(&config(), &settings(), ProxyVariant::for_state(state))
            .expect("render");
        assert_eq!(site.contains("listen 443 ssl"), tls, "{state:?}");
        assert!(site.contains("location /.well-known/acme-challenge/"), "{state:?}");
        assert!(!site.contains("{{"), "unsubstituted placeholder for {state:?}");
    }
}

#[test]
fn test_custom_port_reaches_proxy_pass() {
    let custom = Settings {
        app_port: 15678,
        ..settings()
    };
    let site = render_proxy_site(&config(), &custom, ProxyVariant::Tls).expect("render");
    assert!(site.contains("proxy_pass http://127.0.0.1:15678;"));
}

#[test]
fn test_cron_entry_is_one_scheduled_line() {
    let cron = render_cron(&settings(), Path::new("/usr/local/bin/n8n-provision"));
    let scheduled: Vec<&str> = cron
        .lines()
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    assert_eq!(
        scheduled,
        vec![
            "0 2 * * * root /usr/local/bin/n8n-provision backup --work-dir /opt/n8n --retention-days 7 >> /var/log/n8n-backup.log 2>&1"
        ]
    );
    assert!(cron.ends_with('\n'), "cron.d files need a trailing newline");
}
