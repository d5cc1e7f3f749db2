//! Append-only operations log for administrative commands.
//!
//! Every mutating admin operation (counter reconcile, identifier mint,
//! role grant) appends one JSON line. Optional hash chain: each entry can
//! carry hash_prev + hash_self so after-the-fact edits are detectable.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Append-only ops-log writer. One operation == one JSON line.
pub struct OpsLogWriter {
    path: PathBuf,
    hash_chain: bool,
    last_hash: Option<String>,
}

impl OpsLogWriter {
    /// Creates the writer and ensures parent dirs exist.
    pub fn new(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
        }

        Ok(Self {
            path,
            hash_chain,
            last_hash: None,
        })
    }

    /// Open a writer positioned after existing log content: the last
    /// entry's hash_self (if any) seeds the chain so appends from a new
    /// process keep the chain verifiable.
    pub fn resume(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let mut w = Self::new(path, hash_chain)?;
        if w.path.exists() {
            let content = fs::read_to_string(&w.path)
                .with_context(|| format!("read ops log {:?}", w.path))?;
            if let Some(line) = content.lines().rev().find(|l| !l.trim().is_empty()) {
                let ev: OpsEvent = serde_json::from_str(line.trim())
                    .context("parse last ops event for resume")?;
                w.last_hash = ev.hash_self;
            }
        }
        Ok(w)
    }

    /// Set last hash explicitly (e.g., after reading the last line of an
    /// existing log on restart).
    pub fn set_last_hash(&mut self, last_hash: Option<String>) {
        self.last_hash = last_hash;
    }

    pub fn last_hash(&self) -> Option<String> {
        self.last_hash.clone()
    }

    /// Append one operation record.
    pub fn append(&mut self, operation: &str, detail: Value) -> Result<OpsEvent> {
        let mut ev = OpsEvent {
            op_id: Uuid::new_v4(),
            ts_utc: Utc::now(),
            operation: operation.to_string(),
            detail,
            hash_prev: None,
            hash_self: None,
        };

        if self.hash_chain {
            ev.hash_prev = self.last_hash.clone();

            let self_hash = compute_event_hash(&ev)?;
            ev.hash_self = Some(self_hash.clone());
            self.last_hash = Some(self_hash);
        }

        let line = canonical_json_line(&ev)?;
        append_line(&self.path, &line)?;

        Ok(ev)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsEvent {
    pub op_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub operation: String,
    pub detail: Value,
    pub hash_prev: Option<String>,
    pub hash_self: Option<String>,
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open ops log {:?}", path))?;
    f.write_all(line.as_bytes())
        .context("write ops line failed")?;
    f.write_all(b"\n").context("write newline failed")?;
    Ok(())
}

/// Canonicalize by sorting keys recursively and emitting compact JSON.
fn canonical_json_line<T: Serialize>(v: &T) -> Result<String> {
    let raw = serde_json::to_value(v).context("serialize ops event failed")?;
    let sorted = sort_keys(&raw);
    serde_json::to_string(&sorted).context("json stringify failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

/// Chain hash is computed from canonical JSON of the event WITHOUT
/// hash_self (to avoid self-reference).
pub fn compute_event_hash(ev: &OpsEvent) -> Result<String> {
    let mut clone = ev.clone();
    clone.hash_self = None;

    let canonical = canonical_json_line(&clone)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Verify the hash chain integrity of an ops log file.
pub fn verify_hash_chain(path: impl AsRef<Path>) -> Result<VerifyResult> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("read ops log {:?}", path.as_ref()))?;
    verify_hash_chain_str(&content)
}

/// Same logic as [`verify_hash_chain`] over in-memory JSONL content.
pub fn verify_hash_chain_str(content: &str) -> Result<VerifyResult> {
    let mut prev_hash: Option<String> = None;
    let mut line_count = 0usize;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let ev: OpsEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("parse ops event at line {}", i + 1))?;

        line_count += 1;

        // 1. hash_prev must match the previous event's hash_self
        if ev.hash_prev != prev_hash {
            return Ok(VerifyResult::Broken {
                line: i + 1,
                reason: format!(
                    "hash_prev mismatch: expected {:?}, got {:?}",
                    prev_hash, ev.hash_prev
                ),
            });
        }

        // 2. hash_self must be correct for this event's content
        if let Some(ref claimed_hash) = ev.hash_self {
            let recomputed = compute_event_hash(&ev)?;
            if *claimed_hash != recomputed {
                return Ok(VerifyResult::Broken {
                    line: i + 1,
                    reason: format!(
                        "hash_self mismatch: claimed {}, recomputed {}",
                        claimed_hash, recomputed
                    ),
                });
            }
        }

        prev_hash = ev.hash_self.clone();
    }

    Ok(VerifyResult::Valid { lines: line_count })
}

/// Result of hash chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    /// The entire chain is valid.
    Valid { lines: usize },
    /// The chain is broken at the given line.
    Broken { line: usize, reason: String },
}
