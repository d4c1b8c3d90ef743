use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_sierra_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SIERRA_PORT");
        env::remove_var("SIERRA_BIND_ADDR");
        env::remove_var("SIERRA_EMBEDDING_MODEL_PATH");
        env::remove_var("SIERRA_QUESTION_CLASSIFIER_PATH");
        env::remove_var("SIERRA_STAGE_CLASSIFIER_PATH");
        env::remove_var("SIERRA_LLM_MODEL");
        env::remove_var("SIERRA_MOCK_PROVIDER");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert!(config.embedding_model_path.is_none());
    assert!(config.question_classifier_path.is_none());
    assert!(config.stage_classifier_path.is_none());
    assert_eq!(config.llm_model, "mistral-large-latest");
    assert!(!config.mock_provider);
}

#[test]
fn test_socket_addr() {
    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_sierra_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert!(config.embedding_model_path.is_none());
    assert!(!config.mock_provider);
}

#[test]
#[serial]
fn test_from_env_custom_values() {
    clear_sierra_env();

    with_env_vars(
        &[
            ("SIERRA_PORT", "9000"),
            ("SIERRA_BIND_ADDR", "::1"),
            ("SIERRA_EMBEDDING_MODEL_PATH", "/models/all-MiniLM-L6-v2"),
            ("SIERRA_QUESTION_CLASSIFIER_PATH", " /models/q_type "),
            ("SIERRA_STAGE_CLASSIFIER_PATH", ""),
            ("SIERRA_LLM_MODEL", "mistral-small-latest"),
            ("SIERRA_MOCK_PROVIDER", "1"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.port, 9000);
            assert_eq!(
                config.bind_addr,
                IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
            );
            assert_eq!(
                config.embedding_model_path,
                Some(PathBuf::from("/models/all-MiniLM-L6-v2"))
            );
            assert_eq!(
                config.question_classifier_path,
                Some(PathBuf::from("/models/q_type"))
            );
            assert!(config.stage_classifier_path.is_none());
            assert_eq!(config.llm_model, "mistral-small-latest");
            assert!(config.mock_provider);
        },
    );
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_sierra_env();

    with_env_vars(&[("SIERRA_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_sierra_env();

    with_env_vars(&[("SIERRA_PORT", "eighty")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("failed to parse port"));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_sierra_env();

    with_env_vars(&[("SIERRA_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
fn test_validate_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_missing_model_dir() {
    let config = Config {
        embedding_model_path: Some(PathBuf::from("/nonexistent/minilm")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_model_path_is_file() {
    let config = Config {
        stage_classifier_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_existing_model_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        embedding_model_path: Some(dir.path().to_path_buf()),
        question_classifier_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_blank_llm_model() {
    let config = Config {
        llm_model: "  ".to_string(),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
#[serial]
fn test_parse_from_env_helpers() {
    with_env_vars(&[("SIERRA_TEST_RATIO", "0.4")], || {
        assert_eq!(
            unit_interval_from_env("SIERRA_TEST_RATIO", 0.9).expect("valid"),
            0.4
        );
    });

    with_env_vars(&[("SIERRA_TEST_RATIO", "1.4")], || {
        let err = unit_interval_from_env("SIERRA_TEST_RATIO", 0.9).unwrap_err();
        assert!(err.to_string().contains("SIERRA_TEST_RATIO"));
    });

    with_env_vars(&[("SIERRA_TEST_RATIO", "lots")], || {
        assert!(parse_from_env::<f32>("SIERRA_TEST_RATIO").is_err());
    });

    assert_eq!(
        unit_interval_from_env("SIERRA_TEST_RATIO", 0.9).expect("unset"),
        0.9
    );
}
