//! Canonical JSON text shared with the generated runtimes.
//!
//! Compact, object keys sorted, whole-valued floats below 1e15 written as
//! integers, non-finite numbers as `null`. Generated programs compare the
//! canonical text of the actual value against canonical expected strings
//! computed here at synthesis time.

use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Rewrite numbers into their canonical form, recursively.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => canonical_number(n),
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, v) in map {
                out.insert(key.clone(), canonicalize(v));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn canonical_number(n: &Number) -> Value {
    if n.is_i64() || n.is_u64() {
        return Value::Number(n.clone());
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => Value::from(f as i64),
        Some(f) if f.is_finite() => Value::Number(n.clone()),
        _ => Value::Null,
    }
}

/// Compact canonical text of `value`.
pub fn to_canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, &canonicalize(value));
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(out, &map[key]);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Ordering used by unordered comparison: numbers numerically, anything
/// else by canonical text.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    to_canonical_string(a).cmp(&to_canonical_string(b))
}

/// Recursively sort every array so element order no longer matters.
pub fn normalize_unordered(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut sorted: Vec<Value> = items.iter().map(normalize_unordered).collect();
            sorted.sort_by(compare);
            Value::Array(sorted)
        }
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, v) in map {
                out.insert(key.clone(), normalize_unordered(v));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Canonical strings a result may equal to pass.
///
/// With `multi_expected` every element of an array-valued expectation is
/// an alternative; a non-array expectation is treated as a single one.
pub fn accepted_outputs(expected: &Value, unordered: bool, multi_expected: bool) -> Vec<String> {
    let alternatives: Vec<&Value> = match expected {
        Value::Array(items) if multi_expected => items.iter().collect(),
        other => vec![other],
    };
    let mut accepted: Vec<String> = alternatives
        .into_iter()
        .map(|v| {
            let v = canonicalize(v);
            if unordered {
                to_canonical_string(&normalize_unordered(&v))
            } else {
                to_canonical_string(&v)
            }
        })
        .collect();
    accepted.dedup();
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_string_sorts_keys_and_compacts() {
        let value = json!({"b": [1, 2.0], "a": {"d": true, "c": null}});
        assert_eq!(to_canonical_string(&value), r#"{"a":{"c":null,"d":true},"b":[1,2]}"#);
    }

    #[test]
    fn test_fractional_and_large_floats_survive() {
        assert_eq!(to_canonical_string(&json!(2.5)), "2.5");
        assert_eq!(to_canonical_string(&json!(-0.0)), "0");
        assert_eq!(to_canonical_string(&json!(1e16)), "1e+16");
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(to_canonical_string(&json!("a\"b\n")), r#""a\"b\n""#);
    }

    #[test]
    fn test_normalize_unordered_nested() {
        let a = json!([[3, 1], [2]]);
        let b = json!([[2], [1, 3]]);
        assert_eq!(
            to_canonical_string(&normalize_unordered(&a)),
            to_canonical_string(&normalize_unordered(&b))
        );
    }

    #[test]
    fn test_compare_numbers_numerically() {
        let mut values = vec![json!(10), json!(9), json!(-1)];
        values.sort_by(compare);
        assert_eq!(values, vec![json!(-1), json!(9), json!(10)]);
    }

    #[test]
    fn test_accepted_outputs_multi_expected() {
        let expected = json!([[0, 1], [1, 0]]);
        assert_eq!(accepted_outputs(&expected, false, true), vec!["[0,1]", "[1,0]"]);
        assert_eq!(accepted_outputs(&expected, false, false), vec!["[[0,1],[1,0]]"]);
        assert_eq!(accepted_outputs(&expected, true, true), vec!["[0,1]"]);
    }
}
