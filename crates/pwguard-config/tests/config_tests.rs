// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the pwguard configuration system.

use figment::Jail;
use pwguard_config::diagnostic::ConfigError;
use pwguard_config::model::Environment;
use pwguard_config::{load_and_validate_str, load_config, load_config_from_str};

const VALID: &str = r#"
environment = "production"

[telegram]
token = "123:ABC"

[store]
url = "/var/lib/pwguard/vaults.db"
name = "data"

[crypto]
iterations = 4096
"#;

#[test]
fn valid_toml_uses_defaults_for_optional_keys() {
    let config = load_and_validate_str(VALID).expect("valid config");
    assert_eq!(config.environment(), Some(Environment::Production));
    assert_eq!(config.log_level, "info");
    assert_eq!(config.telegram.token, "123:ABC");
    assert!(config.telegram.allowed_users.is_empty());
    assert_eq!(config.store.url, "/var/lib/pwguard/vaults.db");
    assert_eq!(config.store.name, "data");
    assert_eq!(config.crypto.iterations, 4096);
    assert_eq!(config.session.reveal_ttl_secs, 10);
}

#[test]
fn optional_keys_can_be_overridden() {
    let toml = format!(
        "{VALID}\n[session]\nreveal_ttl_secs = 30\n"
    )
    .replace("token = \"123:ABC\"", "token = \"123:ABC\"\nallowed_users = [11, 22]");
    let config = load_and_validate_str(&toml).expect("valid config");
    assert_eq!(config.telegram.allowed_users, vec![11, 22]);
    assert_eq!(config.session.reveal_ttl_secs, 30);
}

#[test]
fn missing_required_key_is_reported_with_its_path() {
    let toml = VALID.replace("iterations = 4096", "");
    let errors = load_and_validate_str(&toml).expect_err("iterations are required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "crypto.iterations")),
        "got: {errors:?}"
    );
}

#[test]
fn unknown_key_gets_a_suggestion() {
    let toml = VALID.replace("name = \"data\"", "nmae = \"data\"");
    let errors = load_and_validate_str(&toml).expect_err("unknown key");
    match &errors[0] {
        ConfigError::UnknownKey { key, suggestion, .. } => {
            assert_eq!(key, "store.nmae");
            assert_eq!(suggestion.as_deref(), Some("name"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let toml = VALID.replace("iterations = 4096", "iterations = \"many\"");
    let errors = load_and_validate_str(&toml).expect_err("wrong type");
    assert!(matches!(&errors[0], ConfigError::InvalidType { key, .. } if key == "crypto.iterations"));
}

#[test]
fn validation_collects_every_problem() {
    let toml = VALID
        .replace("\"production\"", "\"staging\"")
        .replace("\"123:ABC\"", "\"  \"")
        .replace("\"data\"", "\"data; drop\"")
        .replace("4096", "0");
    let errors = load_and_validate_str(&toml).expect_err("invalid values");
    assert_eq!(errors.len(), 4, "got: {errors:?}");
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn mongo_url_is_rejected() {
    let toml = VALID.replace("/var/lib/pwguard/vaults.db", "mongodb://localhost:27017");
    let errors = load_and_validate_str(&toml).expect_err("not a sqlite path");
    assert!(errors[0].to_string().contains("store.url"));
}

#[test]
fn zero_reveal_ttl_is_rejected() {
    let toml = format!("{VALID}\n[session]\nreveal_ttl_secs = 0\n");
    let errors = load_and_validate_str(&toml).expect_err("ttl must be positive");
    assert!(errors[0].to_string().contains("reveal_ttl_secs"));
}

#[test]
fn environment_is_case_insensitive() {
    let config = load_config_from_str(&VALID.replace("production", "Development")).unwrap();
    assert_eq!(config.environment(), Some(Environment::Development));
}

#[test]
fn local_file_and_prefixed_env_merge() {
    Jail::expect_with(|jail| {
        jail.create_file("pwguard.toml", VALID)?;
        jail.set_env("PWGUARD_SESSION_REVEAL_TTL_SECS", "5");
        jail.set_env("PWGUARD_TELEGRAM_TOKEN", "from-env");

        let config = load_config()?;
        assert_eq!(config.session.reveal_ttl_secs, 5);
        assert_eq!(config.telegram.token, "from-env");
        assert_eq!(config.store.name, "data");
        Ok(())
    });
}

#[test]
fn legacy_variables_configure_everything() {
    Jail::expect_with(|jail| {
        jail.set_env("APP_ENV", "test");
        jail.set_env("TELEGRAM_KEY", "legacy-token");
        jail.set_env("MONGO_DB_URL", "vaults.db");
        jail.set_env("MONGO_DB_NAME", "data");
        jail.set_env("ITERATION", "4096");

        let config = load_config()?;
        assert_eq!(config.environment(), Some(Environment::Test));
        assert_eq!(config.telegram.token, "legacy-token");
        assert_eq!(config.store.url, "vaults.db");
        assert_eq!(config.crypto.iterations, 4096);
        Ok(())
    });
}

#[test]
fn legacy_variables_override_prefixed_ones() {
    Jail::expect_with(|jail| {
        jail.create_file("pwguard.toml", VALID)?;
        jail.set_env("PWGUARD_CRYPTO_ITERATIONS", "1");
        jail.set_env("ITERATION", "2048");

        let config = load_config()?;
        assert_eq!(config.crypto.iterations, 2048);
        Ok(())
    });
}

#[test]
fn debug_output_hides_the_token() {
    let config = load_config_from_str(VALID).unwrap();
    let dbg = format!("{config:?}");
    assert!(!dbg.contains("123:ABC"));
}
