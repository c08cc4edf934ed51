use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.store.backend, "sqlite");
    assert_eq!(config.store.job_set_name, "jobs_set");
    assert!(config.security.secret_key.is_none());
}

#[test]
fn test_store_path_default() {
    let store = StoreConfig::default();
    assert!(store.path.ends_with(".pingd/pingd.db"));
}

#[test]
fn test_durations() {
    let config = Config::default();
    assert_eq!(config.scheduler.reconcile_interval(), Duration::from_secs(10));
    assert_eq!(config.probe.default_timeout(), Duration::from_secs(30));
}

#[test]
fn test_user_agent_default() {
    let probe = ProbeConfig::default();
    assert!(probe.user_agent.starts_with("pingd/"));
}

#[test]
fn test_logging_default() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.format, "text");
    assert!(logging.dir.is_none());
}

#[test]
fn test_secret_key_not_in_debug() {
    let security = SecurityConfig {
        secret_key: Some("kHQXeA!12mR56<OVDC0G7ZNEi(WiecmZ".to_string()),
    };
    let debug = format!("{:?}", security);
    assert!(!debug.contains("kHQX"));
    assert!(debug.contains("redacted"));
}

#[test]
fn test_config_deserialization() {
    let content = r#"
        [store]
        backend = "memory"
        job_set_name = "custom_set"

        [scheduler]
        reconcile_interval_secs = 30
    "#;
    let config: Config = toml::from_str(content).unwrap();
    assert_eq!(config.store.backend, "memory");
    assert_eq!(config.store.job_set_name, "custom_set");
    assert_eq!(config.scheduler.reconcile_interval_secs, 30);
    assert_eq!(config.probe.default_timeout_secs, 30);
}

#[test]
fn test_config_serialization_skips_secret() {
    let config = Config::default();
    let out = toml::to_string(&config).unwrap();
    assert!(out.contains("[server]"));
    assert!(!out.contains("secret_key"));
}
