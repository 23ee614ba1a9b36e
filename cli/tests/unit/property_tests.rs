//! Property-based tests for validation, rendering and the certificate
//! strategy.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::time::{Duration, SystemTime};

use proptest::prelude::*;

use n8n_provision::domain::backup::is_expired;
use n8n_provision::domain::deployment::validate_domain;
use n8n_provision::domain::firewall::{REQUIRED_RULES, is_active, missing_rules};
use n8n_provision::domain::render::{port_binding, render_compose};
use n8n_provision::domain::{AdminPassword, CertMode, CertState, CertStep, DeploymentConfig, RawDeployment, Settings};

use crate::helpers::{raw, settings};

fn cert_state() -> impl Strategy<Value = CertState> {
    prop_oneof![
        Just(CertState::None),
        Just(CertState::Issued(CertMode::Integrated)),
        Just(CertState::Issued(CertMode::Standalone)),
        Just(CertState::Failed),
    ]
}

// ============================================================================
// validate_domain() property tests
// ============================================================================

proptest! {
    /// Dotted lowercase labels are accepted.
    #[test]
    fn prop_dotted_labels_accepted(
        labels in prop::collection::vec("[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?", 2..5)
    ) {
        let domain = labels.join(".");
        prop_assert!(validate_domain(&domain).is_ok(), "rejected {}", domain);
    }

    /// Anything carrying a scheme, path or port is rejected.
    #[test]
    fn prop_urls_rejected(
        host in "[a-z]{1,10}\\.[a-z]{2,6}",
        extra in prop_oneof![Just("https://"), Just("/"), Just(":8080"), Just(" ")],
    ) {
        let with_prefix = format!("{extra}{host}");
        let with_suffix = format!("{host}{extra}");
        prop_assert!(validate_domain(&with_prefix).is_err(), "accepted {}", with_prefix);
        prop_assert!(validate_domain(&with_suffix).is_err(), "accepted {}", with_suffix);
    }
}

// ============================================================================
// Certificate strategy property tests
// ============================================================================

proptest! {
    /// Whatever the attempts return, integrated runs first, each mode runs at
    /// most once, and the machine terminates in at most two attempts.
    #[test]
    fn prop_cert_strategy_terminates_in_order(results in prop::collection::vec(any::<bool>(), 2)) {
        let mut step = CertStep::Start.next(true);
        let mut attempts = Vec::new();
        let mut results = results.into_iter();
        while step.terminal_state().is_none() {
            let mode = step.attempt_mode().expect("non-terminal steps are attempts");
            attempts.push(mode);
            step = step.next(results.next().expect("at most two attempts"));
        }
        prop_assert_eq!(attempts.first().copied(), Some(CertMode::Integrated));
        prop_assert!(attempts.len() <= 2);
        prop_assert!(attempts.iter().filter(|m| **m == CertMode::Standalone).count() <= 1);
        if let Some(CertState::Issued(mode)) = step.terminal_state() {
            prop_assert_eq!(Some(&mode), attempts.last());
        }
    }

    /// Terminal steps are fixed points.
    #[test]
    fn prop_terminal_steps_are_fixed_points(result in any::<bool>()) {
        for terminal in [CertStep::Issued(CertMode::Integrated), CertStep::Failed] {
            prop_assert_eq!(terminal.next(result), terminal);
        }
    }
}

// ============================================================================
// Rendering property tests
// ============================================================================

proptest! {
    /// The container binds to loopback exactly when nginx fronts it with TLS.
    #[test]
    fn prop_loopback_binding_iff_tls_fronted(state in cert_state(), port in 1024u16..65535) {
        let s = Settings { app_port: port, ..settings() };
        let binding = port_binding(&s, state);
        prop_assert_eq!(binding.starts_with("127.0.0.1:"), state.tls_fronted());
        let suffix = format!("{port}:{port}");
        prop_assert!(binding.ends_with(&suffix));
    }

    /// The compose file is valid YAML naming the configured image for every
    /// state and password.
    #[test]
    fn prop_compose_is_valid_yaml(state in cert_state(), password in "[ -~]{1,40}") {
        let config = DeploymentConfig::validate(RawDeployment {
            admin_password: Some(AdminPassword::new(password.clone())),
            ..raw()
        });
        prop_assume!(config.is_ok());
        let yaml = render_compose(&config.expect("valid"), &settings(), state).expect("render");
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("valid YAML");
        let service = &doc["services"]["n8n"];
        prop_assert_eq!(service["image"].as_str(), Some("docker.n8n.io/n8nio/n8n:latest"));
        let env: Vec<&str> = service["environment"]
            .as_sequence()
            .expect("sequence")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        let expected = format!("N8N_BASIC_AUTH_PASSWORD={password}");
        prop_assert!(env.contains(&expected.as_str()));
    }
}

// ============================================================================
// Firewall and retention property tests
// ============================================================================

proptest! {
    /// Once every missing rule is added, nothing is missing.
    #[test]
    fn prop_firewall_rules_converge(present in prop::sample::subsequence(REQUIRED_RULES.to_vec(), 0..=3)) {
        let mut status = String::from("Status: active\n\nTo                         Action      From\n");
        for rule in &present {
            status.push_str(&format!("{rule:<27}ALLOW       Anywhere\n"));
        }
        let missing = missing_rules(&status, REQUIRED_RULES);
        prop_assert_eq!(missing.len() + present.len(), REQUIRED_RULES.len());
        for rule in &missing {
            status.push_str(&format!("{rule:<27}ALLOW       Anywhere\n"));
        }
        prop_assert!(missing_rules(&status, REQUIRED_RULES).is_empty());
        prop_assert!(is_active(&status));
    }

    /// Expiry is exactly "older than the window".
    #[test]
    fn prop_expiry_matches_window(age_secs in 0u64..(30 * 86_400), days in 1u32..30) {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(10 * 365 * 86_400);
        let modified = now - Duration::from_secs(age_secs);
        prop_assert_eq!(is_expired(modified, now, days), age_secs > u64::from(days) * 86_400);
    }
}
