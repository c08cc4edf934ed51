use super::*;

fn sample_config() -> JobConfig {
    let id: JobId = "a8c14eb0-0fba-4b75-a461-e4d380317ab7".parse().unwrap();
    JobConfig::new(
        id,
        "* */1 * * * *",
        Task::new("http://test.org/ping", Duration::from_secs(60)).with_auth("Bearer", "test-token"),
    )
}

#[test]
fn test_job_id_roundtrip_text() {
    let id = JobId::new();
    let parsed: JobId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn test_job_id_rejects_garbage() {
    assert!("not-a-uuid".parse::<JobId>().is_err());
    assert!("".parse::<JobId>().is_err());
}

#[test]
fn test_job_ids_are_unique() {
    assert_ne!(JobId::new(), JobId::new());
}

#[test]
fn test_config_tag_is_id_text() {
    let config = sample_config();
    assert_eq!(config.tag(), "a8c14eb0-0fba-4b75-a461-e4d380317ab7");
}

#[test]
fn test_config_json_field_names() {
    let json = serde_json::to_value(sample_config()).unwrap();
    assert_eq!(json["CronExpression"], "* */1 * * * *");
    assert_eq!(json["UID"], "a8c14eb0-0fba-4b75-a461-e4d380317ab7");
    assert_eq!(json["Task"]["URL"], "http://test.org/ping");
    assert_eq!(json["Task"]["Timeout"], 60_000_000_000u64);
    assert_eq!(json["Task"]["AuthHeader"]["Scheme"], "Bearer");
    assert_eq!(json["Task"]["AuthHeader"]["Parameters"], "test-token");
    assert!(json["Task"]["ExpectedResponse"].is_null());
}

#[test]
fn test_config_deserialize_legacy_record() {
    let raw = r#"{
        "CronExpression": "* * * * * *",
        "UID": "a8c14eb0-0fba-4b75-a461-e4d380317ab7",
        "Task": {
            "URL": "http://x/ping",
            "Timeout": 1000000000,
            "AuthHeader": {"Scheme": "", "Parameters": ""},
            "ExpectedResponse": null
        }
    }"#;
    let config: JobConfig = serde_json::from_str(raw).unwrap();
    assert_eq!(config.cron_expression, "* * * * * *");
    assert_eq!(config.task.timeout, Duration::from_secs(1));
    assert_eq!(config.task.auth_header, AuthHeader::default());
    assert!(config.task.expected_response.is_null());
}

#[test]
fn test_task_defaults_when_fields_missing() {
    let raw = r#"{"URL": "http://x/ping"}"#;
    let task: Task = serde_json::from_str(raw).unwrap();
    assert_eq!(task.timeout, Duration::ZERO);
    assert!(task.auth_header.scheme.is_empty());
}

#[test]
fn test_parsed_scheme() {
    let none = AuthHeader::default();
    assert_eq!(none.parsed_scheme(), Ok(None));

    let bearer = AuthHeader {
        scheme: "Bearer".to_string(),
        parameters: "tok".to_string(),
    };
    assert_eq!(bearer.parsed_scheme(), Ok(Some(AuthScheme::Bearer)));

    let bad = AuthHeader {
        scheme: "Foo".to_string(),
        parameters: "tok".to_string(),
    };
    assert_eq!(bad.parsed_scheme(), Err("Foo".to_string()));
}

#[test]
fn test_scheme_is_case_sensitive() {
    assert!("bearer".parse::<AuthScheme>().is_err());
    assert_eq!("Digest".parse::<AuthScheme>(), Ok(AuthScheme::Digest));
    assert_eq!(AuthScheme::Basic.to_string(), "Basic");
}

#[test]
fn test_task_builders() {
    let task = Task::new("http://x", Duration::from_secs(5))
        .with_auth("Basic", "dXNlcjpwYXNz")
        .with_expected_response(serde_json::json!({"ok": true}));
    assert_eq!(task.auth_header.scheme, "Basic");
    assert_eq!(task.expected_response, serde_json::json!({"ok": true}));
}
