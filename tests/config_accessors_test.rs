//! Integration tests for provider and template lookups.

mod common;

use aicontent::ConfigError;
use common::{accessors_for, populated_config_dir, temp_dir, write_file};

#[test]
fn test_default_provider_settings() {
    let dir = populated_config_dir();
    let accessors = accessors_for(dir.path());

    assert_eq!(accessors.default_provider().unwrap(), "openai");

    let settings = accessors.provider_settings(None).unwrap();
    assert_eq!(settings["model"], "gpt-x");
    assert_eq!(settings["temperature"], 0.7);
}

#[test]
fn test_named_provider_is_returned_verbatim() {
    let dir = populated_config_dir();
    let settings = accessors_for(dir.path())
        .provider_settings(Some("anthropic"))
        .unwrap();

    let keys: Vec<&str> = settings.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["model", "max_tokens"]);
}

#[test]
fn test_unknown_provider() {
    let dir = populated_config_dir();
    let err = accessors_for(dir.path())
        .provider_settings(Some("mistral"))
        .unwrap_err();

    assert!(err.is_unknown_key());
    assert_eq!(err.to_string(), "Unknown LLM provider: mistral");
}

#[test]
fn test_default_provider_not_configured_falls_back() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "model_config.json",
        r#"{"providers": {"openai": {"model": "gpt-x"}}}"#,
    );

    let accessors = accessors_for(dir.path());
    assert_eq!(accessors.default_provider().unwrap(), "openai");
    assert_eq!(accessors.provider_settings(None).unwrap()["model"], "gpt-x");
}

#[test]
fn test_prompt_template_found() {
    let dir = populated_config_dir();
    let body = accessors_for(dir.path())
        .prompt_template("blog", "intro")
        .unwrap();
    assert_eq!(body, "Write an engaging introduction about {topic}.");
}

#[test]
fn test_prompt_template_missing_group_checked_first() {
    let dir = populated_config_dir();
    let err = accessors_for(dir.path())
        .prompt_template("newsletter", "intro")
        .unwrap_err();

    assert!(matches!(err, ConfigError::UnknownGroup(_)));
    assert_eq!(err.to_string(), "Template group 'newsletter' not found.");
}

#[test]
fn test_prompt_template_missing_template() {
    let dir = populated_config_dir();
    let err = accessors_for(dir.path())
        .prompt_template("email", "farewell")
        .unwrap_err();

    assert!(matches!(err, ConfigError::UnknownTemplate { .. }));
    assert_eq!(
        err.to_string(),
        "Template 'farewell' not found in group 'email'."
    );
}

#[test]
fn test_missing_documents_propagate() {
    let dir = temp_dir();
    let accessors = accessors_for(dir.path());

    assert!(accessors.default_provider().unwrap_err().is_not_found());
    assert!(accessors
        .prompt_template("blog", "intro")
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_multiline_template_returned_exactly() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "prompt_templates.yml",
        "content_generation:\n  base_template: |\n    Topic: {topic}\n    Tone: {tone}\n",
    );

    let body = accessors_for(dir.path())
        .prompt_template("content_generation", "base_template")
        .unwrap();
    assert_eq!(body, "Topic: {topic}\nTone: {tone}\n");
}
