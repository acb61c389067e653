//! Return-type inference and testable-property tagging
//!
//! Pure and stateless. Inference is a keyword heuristic that seeds a default
//! the operator can override; misclassification is expected.

use crate::tree::{FunctionRecord, FunctionTree, TestableProperty, ANY_TYPE};

/// Keyword rules, checked in order. First hit wins.
const INFERENCE_RULES: &[(&[&str], &str)] = &[
    (&["server", "port"], "void"),
    (&["get", "fetch", "query"], "Promise<any>"),
    (&["set", "update", "save"], "boolean"),
    (&["validate", "check", "is"], "boolean"),
    (&["format", "transform", "convert"], "string"),
    (&["calculate", "compute", "math"], "number"),
];

/// Lower-cased `"<path> <param names...> <return>"`
///
/// The function name itself is not part of the context.
pub fn inference_context(file_path: &str, record: &FunctionRecord) -> String {
    let param_names: Vec<&str> = record.parameters.keys().collect();
    format!(
        "{} {} {}",
        file_path,
        param_names.join(" "),
        record.normalized_return
    )
    .to_lowercase()
}

/// Coarse return type from the context keywords
pub fn infer_return_type(context: &str) -> &'static str {
    INFERENCE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| context.contains(k)))
        .map_or(ANY_TYPE, |&(_, ty)| ty)
}

/// Tags describing what a test suite should probe for a return type.
///
/// Primitive tags apply to the type itself or to the inner type of
/// `Promise<...>`; Promise tags are added whenever the text mentions `Promise`.
pub fn testable_properties(return_type: &str) -> Vec<TestableProperty> {
    use crate::tree::TestableProperty::*;

    let inner = return_type
        .strip_prefix("Promise<")
        .and_then(|rest| rest.strip_suffix('>'))
        .map_or(return_type, str::trim);

    let mut tags = Vec::new();
    match inner {
        "void" => tags.extend([SideEffects, StateChanges, ExternalCalls]),
        "boolean" => tags.extend([Truthiness, EdgeCases]),
        "number" => tags.extend([Range, Precision, EdgeCases]),
        "string" => tags.extend([Length, Format, Content]),
        _ => {}
    }
    if return_type.contains("Promise") {
        tags.extend([AsyncBehavior, Timeout, ErrorHandling]);
    }
    tags
}

/// Infer missing return types and tag every record.
///
/// Records whose normalized return is empty or `any` get an inferred type.
pub fn analyze(tree: FunctionTree) -> FunctionTree {
    tree.map_values(|file_path, functions| {
        functions.map_values(|_, mut record| {
            if record.normalized_return.is_empty() || record.normalized_return == ANY_TYPE {
                let context = inference_context(file_path, &record);
                record.normalized_return = infer_return_type(&context).to_string();
            }
            record.testable_properties = testable_properties(&record.normalized_return);
            record
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered::OrderedMap;
    use crate::tree::FunctionSignature;
    use crate::tree::TestableProperty::*;

    fn record(params: &[&str], ret: &str) -> FunctionRecord {
        FunctionRecord::from_signature(&FunctionSignature {
            name: "f".to_string(),
            parameters: params
                .iter()
                .map(|p| (p.to_string(), "any".to_string()))
                .collect(),
            declared_return: ret.to_string(),
        })
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(infer_return_type("server/index.ts  any"), "void");
        assert_eq!(infer_return_type("client/api.ts query any"), "Promise<any>");
        // "get" beats "validate" because its rule comes first
        assert_eq!(infer_return_type("lib/validate.ts target any"), "Promise<any>");
        assert_eq!(infer_return_type("lib/settings.ts value any"), "boolean");
        assert_eq!(infer_return_type("lib/check.ts  any"), "boolean");
        assert_eq!(infer_return_type("lib/convert.ts  any"), "string");
        assert_eq!(infer_return_type("lib/math.ts  any"), "number");
        assert_eq!(infer_return_type("lib/util.ts  any"), "any");
    }

    #[test]
    fn test_context_excludes_function_name() {
        let r = record(&["Limit", "offset"], "any");
        assert_eq!(
            inference_context("Client/Api.ts", &r),
            "client/api.ts limit offset any"
        );
    }

    #[test]
    fn test_testable_properties() {
        assert_eq!(
            testable_properties("void"),
            vec![SideEffects, StateChanges, ExternalCalls]
        );
        assert_eq!(testable_properties("boolean"), vec![Truthiness, EdgeCases]);
        assert_eq!(testable_properties("number"), vec![Range, Precision, EdgeCases]);
        assert_eq!(testable_properties("string"), vec![Length, Format, Content]);
        assert_eq!(
            testable_properties("Promise<any>"),
            vec![AsyncBehavior, Timeout, ErrorHandling]
        );
        assert_eq!(
            testable_properties("Promise<boolean>"),
            vec![Truthiness, EdgeCases, AsyncBehavior, Timeout, ErrorHandling]
        );
        assert!(testable_properties("User[]").is_empty());
        assert!(testable_properties("any").is_empty());
    }

    #[test]
    fn test_analyze_only_overrides_untyped() {
        let mut functions = OrderedMap::new();
        functions.insert("typed", record(&["a"], "string"));
        functions.insert("untyped", record(&["port"], "any"));
        let mut tree = FunctionTree::new();
        tree.insert("server/index.ts", functions);

        let tree = analyze(tree);
        let functions = tree.get("server/index.ts").unwrap();
        let typed = functions.get("typed").unwrap();
        let untyped = functions.get("untyped").unwrap();

        assert_eq!(typed.normalized_return, "string");
        assert_eq!(typed.testable_properties, vec![Length, Format, Content]);
        assert_eq!(untyped.normalized_return, "void");
        assert_eq!(untyped.declared_return, "any");
        assert_eq!(untyped.testable_properties.len(), 3);
    }

    #[test]
    fn test_empty_normalized_return_is_inferred() {
        let r = record(&[], "{ ok: boolean }");
        assert_eq!(r.normalized_return, "");
        let mut functions = OrderedMap::new();
        functions.insert("compute", r);
        let mut tree = FunctionTree::new();
        tree.insert("lib/math.ts", functions);

        let tree = analyze(tree);
        let r = tree.get("lib/math.ts").and_then(|f| f.get("compute")).unwrap();
        assert_eq!(r.normalized_return, "number");
    }
}
