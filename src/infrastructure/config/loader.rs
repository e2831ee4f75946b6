//! Single-file document loading
//!
//! Reads one YAML or JSON file into a [`ConfigDocument`]. Every failure is
//! logged with its path before it is returned.

use serde_json::Value;
use std::path::Path;
use tracing::{debug, error};

use crate::domain::errors::{ConfigError, ConfigResult, ParseFailure};
use crate::domain::models::{value_kind, ConfigDocument};

/// Load a YAML file into a mapping.
///
/// An empty (or comment-only) file yields an empty mapping. Merge keys
/// (`<<: *anchor`) are resolved before the document is returned.
pub fn load_yaml(path: &Path) -> ConfigResult<ConfigDocument> {
    let bytes = read_source(path, "YAML")?;
    let raw = decode(path, &bytes, "YAML")?;
    if raw.trim().is_empty() {
        return Ok(ConfigDocument::new());
    }

    let value = parse_yaml(raw).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to parse YAML config");
        ConfigError::parse(path, e)
    })?;

    into_mapping(path, value)
}

fn parse_yaml(raw: &str) -> Result<Value, serde_yaml::Error> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(raw)?;
    yaml.apply_merge()?;
    serde_yaml::from_value(yaml)
}

/// Load a JSON file into a mapping.
///
/// An empty file or a literal `null` yields an empty mapping.
pub fn load_json(path: &Path) -> ConfigResult<ConfigDocument> {
    let bytes = read_source(path, "JSON")?;
    let raw = decode(path, &bytes, "JSON")?;
    if raw.trim().is_empty() {
        return Ok(ConfigDocument::new());
    }

    let value: Value = serde_json::from_str(raw).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to parse JSON config");
        ConfigError::parse(path, e)
    })?;

    into_mapping(path, value)
}

/// Load a file, choosing the decoder from its extension.
///
/// `.json` is decoded as JSON; everything else as YAML.
pub fn load_document(path: &Path) -> ConfigResult<ConfigDocument> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}

fn read_source(path: &Path, kind: &str) -> ConfigResult<Vec<u8>> {
    if !path.exists() {
        error!(path = %path.display(), "{kind} config file not found");
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "Reading {kind} config");
    std::fs::read(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Failed to read {kind} config");
        ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Undecodable bytes are a content problem, not an I/O one.
fn decode<'a>(path: &Path, bytes: &'a [u8], kind: &str) -> ConfigResult<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| {
        error!(path = %path.display(), error = %e, "{kind} config is not valid UTF-8");
        ConfigError::parse(path, e)
    })
}

fn into_mapping(path: &Path, value: Value) -> ConfigResult<ConfigDocument> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ConfigDocument::new()),
        other => {
            let found = value_kind(&other);
            error!(path = %path.display(), found, "Config top level is not a mapping");
            Err(ConfigError::parse(path, ParseFailure::NotAMapping { found }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_preserves_key_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "order.yaml", "zeta: 1\nalpha: 2\nmid:\n  b: x\n  a: y\n");

        let doc = load_yaml(&path).unwrap();
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(doc["mid"]["a"], "y");
    }

    #[test]
    fn test_load_yaml_empty_file_is_empty_mapping() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.yaml", "");
        assert!(load_yaml(&path).unwrap().is_empty());

        let path = write(&dir, "blank.yaml", "   \n\n");
        assert!(load_yaml(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_yaml_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_yaml(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_yaml_malformed_wraps_decoder_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yaml", "providers: [unterminated\n");

        let err = load_yaml(&path).unwrap_err();
        match err {
            ConfigError::Parse { source, .. } => assert!(matches!(source, ParseFailure::Yaml(_))),
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_yaml_scalar_top_level_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "scalar.yaml", "just a string\n");

        let err = load_yaml(&path).unwrap_err();
        match err {
            ConfigError::Parse {
                source: ParseFailure::NotAMapping { found },
                ..
            } => assert_eq!(found, "string"),
            other => panic!("Expected NotAMapping, got {other:?}"),
        }
    }

    #[test]
    fn test_load_yaml_resolves_merge_keys() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "model_config.yaml",
            "base: &base\n  model: x\n  max_tokens: 512\nproviders:\n  openai:\n    <<: *base\n    temperature: 1\n",
        );

        let doc = load_yaml(&path).unwrap();
        let openai = doc["providers"]["openai"].as_object().unwrap();
        assert_eq!(openai["model"], "x");
        assert_eq!(openai["max_tokens"], 512);
        assert_eq!(openai["temperature"], 1);
        assert!(!openai.contains_key("<<"));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("latin1.yaml");
        std::fs::write(&yaml, b"key: \xff\xfe\n").unwrap();
        let json = dir.path().join("latin1.json");
        std::fs::write(&json, b"{\"key\": \"\xff\"}").unwrap();

        for path in [yaml, json] {
            match load_document(&path).unwrap_err() {
                ConfigError::Parse { source, .. } => {
                    assert!(matches!(source, ParseFailure::Encoding(_)));
                }
                other => panic!("Expected Parse error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "seo.json", r#"{"keywords": ["a", "b"], "depth": 3}"#);

        let doc = load_json(&path).unwrap();
        assert_eq!(doc["depth"], 3);
        assert_eq!(doc["keywords"][1], "b");
    }

    #[test]
    fn test_load_json_null_and_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_json(&write(&dir, "null.json", "null")).unwrap().is_empty());
        assert!(load_json(&write(&dir, "empty.json", "")).unwrap().is_empty());
    }

    #[test]
    fn test_load_json_malformed() {
        let dir = TempDir::new().unwrap();
        let err = load_json(&write(&dir, "bad.json", "{\"a\": }")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse {
                source: ParseFailure::Json(_),
                ..
            }
        ));
    }

    #[test]
    fn test_load_json_array_top_level_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = load_json(&write(&dir, "list.json", "[1, 2]")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse {
                source: ParseFailure::NotAMapping { found: "sequence" },
                ..
            }
        ));
    }

    #[test]
    fn test_load_document_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let json = write(&dir, "a.json", r#"{"kind": "json"}"#);
        let yml = write(&dir, "a.yml", "kind: yml\n");

        assert_eq!(load_document(&json).unwrap()["kind"], "json");
        assert_eq!(load_document(&yml).unwrap()["kind"], "yml");
    }
}
