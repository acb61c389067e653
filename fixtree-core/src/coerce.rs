//! Free-text to typed value coercion
//!
//! Converts what the operator typed into a JSON value shaped by the declared
//! or inferred type. Never fails: anything that cannot be converted falls back
//! to the raw text (or a plain comma split for arrays).
//!
//! Type names are compared case-insensitively, so `Promise<any>` and other
//! object-like names take the JSON-or-raw default path.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Coerce `value` against `target_type`.
pub fn coerce(value: &str, target_type: &str) -> Value {
    let ty = target_type.trim().to_lowercase();

    if ty.contains("[]") {
        return coerce_array(value, &ty.replacen("[]", "", 1));
    }

    if ty.contains('|') {
        // Only the first alternative is ever considered
        let first = ty
            .split('|')
            .next()
            .unwrap_or_default()
            .trim()
            .replace(['\'', '"'], "");
        return coerce(value, &first);
    }

    match ty.as_str() {
        "string" => raw(value),
        "number" => parse_number(value).unwrap_or_else(|| raw(value)),
        "boolean" => parse_bool_ignore_case(value).unwrap_or_else(|| raw(value)),
        "any" | "unknown" => match value {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => parse_number(value).unwrap_or_else(|| raw(value)),
        },
        _ => {
            if value.starts_with('{') || value.starts_with('[') {
                if let Ok(parsed) = serde_json::from_str(value) {
                    return parsed;
                }
            }
            raw(value)
        }
    }
}

fn coerce_array(value: &str, element_type: &str) -> Value {
    if value.starts_with('[') && value.ends_with(']') {
        return serde_json::from_str(value).unwrap_or_else(|_| {
            Value::Array(value.split(',').map(|item| raw(item.trim())).collect())
        });
    }
    Value::Array(
        value
            .split(',')
            .map(|item| coerce(item.trim(), element_type))
            .collect(),
    )
}

fn raw(value: &str) -> Value {
    Value::String(value.to_string())
}

fn parse_bool_ignore_case(value: &str) -> Option<Value> {
    if value.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if value.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

/// Longest leading decimal number, after optional whitespace and sign
fn numeric_prefix(value: &str) -> Option<&str> {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = PREFIX.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
    });
    re.captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the leading number, ignoring trailing text (`"3px"` is 3).
///
/// Finite floats only. Whole numbers within the exact-integer range of an
/// f64 are emitted as JSON integers so `3` stays `3`, not `3.0`.
fn parse_number(value: &str) -> Option<Value> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    let n: f64 = numeric_prefix(value)?.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        return Some(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n).map(Value::Number)
}
