//! Result recovery
//!
//! Pulls the verdict objects back out of raw program output. The payload
//! between the sentinel lines is tried first; when the markers are
//! missing or the payload does not parse (compiler chatter mixed into
//! the stream, truncated output), every `{"status":` object is bounded
//! by string-aware brace counting and parsed on its own.

use serde_json::Value;
use testsmith_common::types::Verdict;
use thiserror::Error;
use tracing::{debug, warn};

pub const RESULTS_START: &str = "___TEST_RESULTS_START___";
pub const RESULTS_END: &str = "___TEST_RESULTS_END___";

const VERDICT_SIGNATURE: &str = "{\"status\":";

#[derive(Debug, Error, PartialEq)]
pub enum RecoveryError {
    #[error("no valid results found in program output")]
    NoValidResults,
}

/// Recover verdict objects from `raw`.
pub fn extract(raw: &str) -> Result<Vec<Value>, RecoveryError> {
    if let Some(values) = between_sentinels(raw) {
        debug!(count = values.len(), "Recovered results between sentinels");
        return Ok(values);
    }

    let values = scan_objects(raw);
    if values.is_empty() {
        warn!(bytes = raw.len(), "No results recovered from output");
        return Err(RecoveryError::NoValidResults);
    }
    debug!(count = values.len(), "Recovered results by scanning");
    Ok(values)
}

/// Recover and decode verdicts, dropping objects that are not verdicts.
pub fn extract_verdicts(raw: &str) -> Result<Vec<Verdict>, RecoveryError> {
    let verdicts: Vec<Verdict> = extract(raw)?
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable verdict");
                None
            }
        })
        .collect();
    Ok(verdicts)
}

fn between_sentinels(raw: &str) -> Option<Vec<Value>> {
    let start = raw.find(RESULTS_START)? + RESULTS_START.len();
    let len = raw[start..].find(RESULTS_END)?;
    match serde_json::from_str::<Value>(raw[start..start + len].trim()) {
        Ok(Value::Array(items)) => Some(items),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Sentinel payload did not parse");
            None
        }
    }
}

fn scan_objects(raw: &str) -> Vec<Value> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(rel) = raw[cursor..].find(VERDICT_SIGNATURE) {
        let start = cursor + rel;
        match object_end(raw, start) {
            Some(end) => {
                if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&raw[start..end]) {
                    found.push(value);
                }
                cursor = end;
            }
            // Unterminated object; step past this marker
            None => cursor = start + 1,
        }
    }
    found
}

/// Byte offset just past the brace closing the object opened at `start`.
fn object_end(raw: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in raw.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use testsmith_common::types::VerdictStatus;

    #[test]
    fn test_sentinel_payload() {
        let raw = format!(
            "compiling...\n{}\n[{{\"status\":\"pass\",\"expected\":[1],\"actual\":[1],\"time\":0.5}}]\n{}\n",
            RESULTS_START, RESULTS_END
        );
        let values = extract(&raw).unwrap();
        assert_eq!(values, vec![json!({"status": "pass", "expected": [1], "actual": [1], "time": 0.5})]);
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let raw = format!("{}\n[]\n{}\n", RESULTS_START, RESULTS_END);
        assert_eq!(extract(&raw).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_fallback_without_sentinels() {
        let raw = "warning: unused\n{\"status\":\"pass\",\"expected\":1,\"actual\":1,\"time\":0}\n";
        let values = extract(raw).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["status"], "pass");
    }

    #[test]
    fn test_fallback_ignores_braces_in_strings() {
        let raw = concat!(
            "noise {\"status\":\"error\",\"expected\":null,\"actual\":null,\"time\":0,\"error\":\"bad } \\\" {\"}",
            " more noise {\"status\":\"fail\",\"expected\":{\"a\":1},\"actual\":{\"a\":2},\"time\":1}"
        );
        let values = extract(raw).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["error"], "bad } \" {");
        assert_eq!(values[1]["actual"], json!({"a": 2}));
    }

    #[test]
    fn test_corrupt_payload_falls_back() {
        let raw = format!(
            "{}\n[{{\"status\":\"pass\",\"expected\":1,\"actual\":1,\"time\":0}}, {{\"status\":\n{}\n",
            RESULTS_START, RESULTS_END
        );
        let values = extract(&raw).unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_truncated_marker_is_skipped() {
        let raw = "{\"status\":\"pass\",\"expected\":1 {\"status\":\"fail\",\"expected\":1,\"actual\":2,\"time\":0}";
        // The first marker never closes at depth zero, so only the inner object survives
        let values = extract(raw).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["status"], "fail");
    }

    #[test]
    fn test_nothing_recoverable() {
        assert_eq!(extract("Segmentation fault\n"), Err(RecoveryError::NoValidResults));
        assert_eq!(extract(""), Err(RecoveryError::NoValidResults));
    }

    #[test]
    fn test_extract_verdicts_skips_undecodable() {
        let raw = format!(
            "{}\n[{{\"status\":\"fail\",\"expected\":[1,2],\"actual\":[2,1],\"time\":0.1,\"logs\":\"hi\\n\"}},{{\"status\":\"weird\"}}]\n{}",
            RESULTS_START, RESULTS_END
        );
        let verdicts = extract_verdicts(&raw).unwrap();
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].status, VerdictStatus::Fail);
        assert_eq!(verdicts[0].logs.as_deref(), Some("hi\n"));
    }
}
