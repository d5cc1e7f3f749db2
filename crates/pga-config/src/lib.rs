//! Layered YAML configuration for the Pangea admin tooling.
//!
//! Files merge in order (earlier docs are base, later docs override), the
//! merged document is canonicalized to compact JSON and hashed with SHA-256
//! so two operators can compare `config_hash` values instead of diffing
//! files. Secret-looking literal values abort the load: credentials belong
//! in the environment, never in config files.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

/// Known secret-like prefixes. A leaf string starting with one of these
/// fails the load with CONFIG_SECRET_DETECTED.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // Stripe / OpenAI style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
    "postgres://",  // connection string with inline credentials
    "postgresql://",
];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

/// Load and merge YAML files in order, then canonicalize and hash.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Same as [`load_layered_yaml`] but over in-memory documents (testing).
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json =
        serde_json::to_string(&sort_keys(&merged)).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Objects merge key-by-key; everything else is replaced by the override.
fn deep_merge(base: Value, over: Value) -> Value {
    match (base, over) {
        (Value::Object(mut base_map), Value::Object(over_map)) => {
            for (k, over_val) in over_map {
                let base_val = base_map.remove(&k).unwrap_or(Value::Null);
                base_map.insert(k, deep_merge(base_val, over_val));
            }
            Value::Object(base_map)
        }
        (_, over_other) => over_other,
    }
}

/// Recursively sort object keys so the canonical form is independent of
/// YAML key order.
fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                out.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut offending: Option<String> = None;
    walk_string_leaves(v, String::new(), &mut |pointer, s| {
        if offending.is_none() && looks_like_secret(s) {
            offending = Some(pointer.to_string());
        }
    });

    if let Some(ptr) = offending {
        bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
    }
    Ok(())
}

fn walk_string_leaves(v: &Value, pointer: String, f: &mut impl FnMut(&str, &str)) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                let token = k.replace('~', "~0").replace('/', "~1");
                walk_string_leaves(vv, format!("{pointer}/{token}"), f);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                walk_string_leaves(vv, format!("{pointer}/{i}"), f);
            }
        }
        Value::String(s) => f(&pointer, s),
        _ => {}
    }
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_docs_override_earlier() {
        let base = "db:\n  timeout_secs: 5\n  name: pangea\n";
        let over = "db:\n  timeout_secs: 30\n";
        let loaded = load_layered_yaml_from_strings(&[base, over]).unwrap();
        assert_eq!(
            loaded.config_json.pointer("/db/timeout_secs"),
            Some(&serde_json::json!(30))
        );
        assert_eq!(
            loaded.config_json.pointer("/db/name"),
            Some(&serde_json::json!("pangea"))
        );
    }

    #[test]
    fn hash_is_stable_across_key_order() {
        let a = "a: 1\nb: 2\n";
        let b = "b: 2\na: 1\n";
        let ha = load_layered_yaml_from_strings(&[a]).unwrap().config_hash;
        let hb = load_layered_yaml_from_strings(&[b]).unwrap().config_hash;
        assert_eq!(ha, hb);
    }

    #[test]
    fn secret_literal_aborts_load() {
        let doc = "broker:\n  api_key: sk_live_abcdef123456\n";
        let err = load_layered_yaml_from_strings(&[doc]).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("CONFIG_SECRET_DETECTED"));
        assert!(msg.contains("/broker/api_key"));
        assert!(!msg.contains("sk_live"));
    }

    #[test]
    fn connection_string_literal_aborts_load() {
        let doc = "db:\n  url: postgres://user:pw@localhost/pangea\n";
        assert!(load_layered_yaml_from_strings(&[doc]).is_err());
    }

    #[test]
    fn short_strings_are_not_secrets() {
        let doc = "labels:\n  - sk-now\n";
        assert!(load_layered_yaml_from_strings(&[doc]).is_ok());
    }
}
