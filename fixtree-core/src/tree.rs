//! Function tree data model
//!
//! The persisted artifact is a `FunctionTree`: relative file path → `FileEntry`,
//! and each `FileEntry` maps a function name to its `FunctionRecord`.
//!
//! Global invariants enforced:
//! - Placeholder values are distinct variants, never ordinary strings
//! - Map order is discovery order and survives a save/load cycle
//! - Paths are relative to the scan root and use `/` separators
//!
//! On disk the placeholders are plain strings, so an operator answer that is
//! literally `awaiting_user_input` or `$_unknown` reloads as the placeholder.
//! The wizard warns when an answer collides with a marker
//! (`collides_with_marker`).

use crate::ordered::OrderedMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Type text used when nothing was declared or captured
pub const ANY_TYPE: &str = "any";

/// On-disk marker for a value the operator has not supplied yet
pub const PENDING_MARKER: &str = "awaiting_user_input";

/// On-disk marker for an expected result the operator declared unknowable
pub const UNKNOWN_MARKER: &str = "$_unknown";

/// Function name → record, in discovery order
pub type FileEntry = OrderedMap<FunctionRecord>;

/// Relative file path → functions in that file, in scan order
pub type FunctionTree = OrderedMap<FileEntry>;

/// A recorded test input or expected result.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Fixture {
    /// Not supplied yet
    Pending,
    /// Operator declared the expected value unknowable
    Unknown,
    /// No value (void-returning functions); omitted from the artifact
    #[default]
    Undefined,
    /// A concrete value
    Value(serde_json::Value),
}

impl Fixture {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Fixture::Undefined)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Fixture::Pending)
    }
}

impl From<serde_json::Value> for Fixture {
    fn from(value: serde_json::Value) -> Self {
        match value.as_str() {
            Some(PENDING_MARKER) => Fixture::Pending,
            Some(UNKNOWN_MARKER) => Fixture::Unknown,
            _ => Fixture::Value(value),
        }
    }
}

/// True if `value` would read back as a placeholder rather than a value
pub fn collides_with_marker(value: &serde_json::Value) -> bool {
    matches!(value.as_str(), Some(PENDING_MARKER) | Some(UNKNOWN_MARKER))
}

impl Serialize for Fixture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fixture::Pending => serializer.serialize_str(PENDING_MARKER),
            Fixture::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
            Fixture::Undefined => serializer.serialize_unit(),
            Fixture::Value(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Fixture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Fixture::from)
    }
}

/// Aspects a test suite should probe, keyed off the return type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestableProperty {
    SideEffects,
    StateChanges,
    ExternalCalls,
    Truthiness,
    EdgeCases,
    Range,
    Precision,
    Length,
    Format,
    Content,
    AsyncBehavior,
    Timeout,
    ErrorHandling,
}

impl TestableProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestableProperty::SideEffects => "side_effects",
            TestableProperty::StateChanges => "state_changes",
            TestableProperty::ExternalCalls => "external_calls",
            TestableProperty::Truthiness => "truthiness",
            TestableProperty::EdgeCases => "edge_cases",
            TestableProperty::Range => "range",
            TestableProperty::Precision => "precision",
            TestableProperty::Length => "length",
            TestableProperty::Format => "format",
            TestableProperty::Content => "content",
            TestableProperty::AsyncBehavior => "async_behavior",
            TestableProperty::Timeout => "timeout",
            TestableProperty::ErrorHandling => "error_handling",
        }
    }
}

/// A signature as captured by the extractor, before hashing and inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    /// Parameter name → declared type text (`any` when untyped)
    pub parameters: OrderedMap<String>,
    /// Raw captured return type text (`any` when none captured)
    pub declared_return: String,
}

/// One discovered function together with its recorded fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    #[serde(rename = "arguments")]
    pub parameters: OrderedMap<String>,
    #[serde(rename = "declaredReturn", default = "any_type")]
    pub declared_return: String,
    #[serde(rename = "return")]
    pub normalized_return: String,
    #[serde(rename = "hash")]
    pub signature_hash: String,
    #[serde(rename = "test", default)]
    pub test_inputs: OrderedMap<Fixture>,
    #[serde(
        rename = "result",
        default,
        skip_serializing_if = "Fixture::is_undefined"
    )]
    pub expected_result: Fixture,
    #[serde(rename = "testableProperties", default)]
    pub testable_properties: Vec<TestableProperty>,
}

fn any_type() -> String {
    ANY_TYPE.to_string()
}

impl FunctionRecord {
    /// Build a fresh record: hashed, normalized, every input pending.
    pub fn from_signature(signature: &FunctionSignature) -> Self {
        let test_inputs = signature
            .parameters
            .keys()
            .map(|name| (name, Fixture::Pending))
            .collect();

        FunctionRecord {
            parameters: signature.parameters.clone(),
            declared_return: signature.declared_return.clone(),
            normalized_return: normalize_return_type(&signature.declared_return),
            signature_hash: crate::hash::signature_hash(
                &signature.name,
                &signature.parameters,
                &signature.declared_return,
            ),
            test_inputs,
            expected_result: Fixture::Pending,
            testable_properties: Vec::new(),
        }
    }

    /// `name(a: T, b: U)` as shown in prompts and the summary
    pub fn display_signature(&self, name: &str) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        format!("{}({})", name, params.join(", "))
    }

    /// Comma-separated tag names, or `none`
    pub fn testable_label(&self) -> String {
        if self.testable_properties.is_empty() {
            return "none".to_string();
        }
        self.testable_properties
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collapse whitespace and cut at the first `{`.
///
/// Empty or `any` input normalizes to `any`. The result may be empty when the
/// captured text starts with `{`; inference treats that like `any`.
pub fn normalize_return_type(declared: &str) -> String {
    if declared.is_empty() || declared == ANY_TYPE {
        return ANY_TYPE.to_string();
    }
    let collapsed = declared.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated = match collapsed.find('{') {
        Some(idx) => &collapsed[..idx],
        None => collapsed.as_str(),
    };
    truncated.trim().to_string()
}

/// Total number of functions across all files
pub fn function_count(tree: &FunctionTree) -> usize {
    tree.values().map(|entry| entry.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signature(name: &str, params: &[(&str, &str)], ret: &str) -> FunctionSignature {
        FunctionSignature {
            name: name.to_string(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            declared_return: ret.to_string(),
        }
    }

    #[test]
    fn test_normalize_return_type() {
        assert_eq!(normalize_return_type(""), "any");
        assert_eq!(normalize_return_type("any"), "any");
        assert_eq!(normalize_return_type("Promise<\n  string\n>"), "Promise< string >");
        assert_eq!(normalize_return_type("Foo { a"), "Foo");
        assert_eq!(normalize_return_type("{ a: string }"), "");
    }

    #[test]
    fn test_fresh_record_is_pending() {
        let record = FunctionRecord::from_signature(&signature(
            "add",
            &[("a", "number"), ("b", "number")],
            "number",
        ));
        assert_eq!(record.normalized_return, "number");
        assert_eq!(record.signature_hash.len(), 8);
        assert!(record.expected_result.is_pending());
        assert!(record.test_inputs.values().all(Fixture::is_pending));
        assert_eq!(record.display_signature("add"), "add(a: number, b: number)");
    }

    #[test]
    fn test_markers_round_trip_as_variants() {
        let value = serde_json::to_value(Fixture::Unknown).unwrap();
        assert_eq!(value, json!("$_unknown"));
        let pending: Fixture = serde_json::from_value(json!("awaiting_user_input")).unwrap();
        assert_eq!(pending, Fixture::Pending);
        let plain: Fixture = serde_json::from_value(json!("hello")).unwrap();
        assert_eq!(plain, Fixture::Value(json!("hello")));
    }

    #[test]
    fn test_undefined_result_is_omitted() {
        let mut record = FunctionRecord::from_signature(&signature("start", &[], "void"));
        record.expected_result = Fixture::Undefined;
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("result").is_none());
        assert_eq!(value["return"], json!("void"));

        let back: FunctionRecord = serde_json::from_value(value).unwrap();
        assert!(back.expected_result.is_undefined());
    }

    #[test]
    fn test_missing_declared_return_defaults_to_any() {
        let json = r#"{
            "arguments": {},
            "return": "boolean",
            "test": {},
            "result": true,
            "hash": "deadbeef"
        }"#;
        let record: FunctionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.declared_return, "any");
        assert_eq!(record.expected_result, Fixture::Value(json!(true)));
        assert!(record.testable_properties.is_empty());
    }

    #[test]
    fn test_marker_text_reloads_as_placeholder() {
        let typed = Fixture::Value(json!("awaiting_user_input"));
        assert!(collides_with_marker(&json!("awaiting_user_input")));
        assert!(collides_with_marker(&json!("$_unknown")));
        assert!(!collides_with_marker(&json!("pending")));
        assert!(!collides_with_marker(&json!(42)));

        let json = serde_json::to_string(&typed).unwrap();
        let back: Fixture = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Fixture::Pending);
    }

    #[test]
    fn test_signatures_compare_with_eq() {
        fn assert_eq_bound<T: Eq>(_: &T) {}

        let a = signature("add", &[("a", "number")], "number");
        assert_eq_bound(&a);
        assert_eq_bound(&a.parameters);
        assert_eq!(a, signature("add", &[("a", "number")], "number"));
        assert_ne!(a, signature("add", &[("a", "string")], "number"));
    }
}
