//! Integration tests for cascading resolution and document caching.

mod common;

use std::sync::Arc;

use aicontent::{ConfigError, DocumentSlot};
use common::{resolver_for, temp_dir, write_file};

#[test]
fn test_yaml_wins_over_yml_and_json() {
    let dir = temp_dir();
    write_file(dir.path(), "seo.yaml", "source: yaml\n");
    write_file(dir.path(), "seo.yml", "source: yml\n");
    write_file(dir.path(), "seo.json", r#"{"source": "json"}"#);

    let resolver = resolver_for(dir.path());
    let doc = resolver.resolve(Some("seo")).unwrap();
    assert_eq!(doc["source"], "yaml");
}

#[test]
fn test_yml_wins_over_json() {
    let dir = temp_dir();
    write_file(dir.path(), "seo.yml", "source: yml\n");
    write_file(dir.path(), "seo.json", r#"{"source": "json"}"#);

    let doc = resolver_for(dir.path()).resolve(Some("seo")).unwrap();
    assert_eq!(doc["source"], "yml");
}

#[test]
fn test_json_only() {
    let dir = temp_dir();
    write_file(dir.path(), "seo.json", r#"{"source": "json", "depth": 2}"#);

    let doc = resolver_for(dir.path()).resolve(Some("seo")).unwrap();
    assert_eq!(doc["source"], "json");
    assert_eq!(doc["depth"], 2);
}

#[test]
fn test_formats_are_never_merged() {
    let dir = temp_dir();
    write_file(dir.path(), "seo.yaml", "a: 1\n");
    write_file(dir.path(), "seo.json", r#"{"b": 2}"#);

    let doc = resolver_for(dir.path()).resolve(Some("seo")).unwrap();
    assert!(doc.contains_key("a"));
    assert!(!doc.contains_key("b"));
}

#[test]
fn test_missing_document_names_provider() {
    let dir = temp_dir();
    let err = resolver_for(dir.path()).resolve(Some("seo")).unwrap_err();

    assert!(err.is_not_found());
    assert!(err
        .to_string()
        .starts_with("No configuration file found for provider: seo"));
}

#[test]
fn test_no_name_gives_empty_document() {
    let dir = temp_dir();
    let doc = resolver_for(dir.path()).resolve(None).unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_malformed_document_is_parse_error() {
    let dir = temp_dir();
    write_file(dir.path(), "seo.yaml", "providers: [unclosed\n");

    let err = resolver_for(dir.path()).resolve(Some("seo")).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_cached_document_is_shared_and_not_reread() {
    let dir = temp_dir();
    write_file(dir.path(), "model_config.yaml", "default_provider: openai\n");

    let resolver = resolver_for(dir.path());
    assert!(!resolver.is_cached(DocumentSlot::ModelConfig));

    let first = resolver.model_config().unwrap();
    write_file(dir.path(), "model_config.yaml", "default_provider: anthropic\n");
    let second = resolver.model_config().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second["default_provider"], "openai");
    assert!(resolver.is_cached(DocumentSlot::ModelConfig));
    assert!(!resolver.is_cached(DocumentSlot::PromptTemplates));
}

#[test]
fn test_failed_load_is_retried() {
    let dir = temp_dir();
    let resolver = resolver_for(dir.path());

    assert!(resolver.prompt_templates().unwrap_err().is_not_found());
    assert!(!resolver.is_cached(DocumentSlot::PromptTemplates));

    write_file(dir.path(), "prompt_templates.json", r#"{"blog": {}}"#);
    let doc = resolver.prompt_templates().unwrap();
    assert!(doc.contains_key("blog"));
}

#[test]
fn test_concurrent_first_access_shares_one_document() {
    let dir = temp_dir();
    write_file(dir.path(), "model_config.yaml", "default_provider: openai\n");
    let resolver = resolver_for(dir.path());

    let docs: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| resolver.model_config().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(docs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}
