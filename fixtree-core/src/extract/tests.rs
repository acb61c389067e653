//! Tests for signature extraction

#[cfg(test)]
mod extract_tests {
    use crate::extract::{
        extract_functions, is_valid_function_name, parse_parameters, PatternKind, PatternSet,
        SignaturePattern, SIGNATURE_PATTERNS,
    };
    use crate::tree::FunctionSignature;

    fn names(signatures: &[FunctionSignature]) -> Vec<&str> {
        signatures.iter().map(|s| s.name.as_str()).collect()
    }

    fn params(signature: &FunctionSignature) -> Vec<(&str, &str)> {
        signature
            .parameters
            .iter()
            .map(|(k, v)| (k, v.as_str()))
            .collect()
    }

    #[test]
    fn test_builtin_table_compiles() {
        let set = PatternSet::builtin();
        assert_eq!(set.len(), SIGNATURE_PATTERNS.len());
        assert!(!set.is_empty());
    }

    #[test]
    fn test_typed_declaration() {
        let src = "function add(a: number, b: number): number { return a+b; }";
        let found = extract_functions(src);
        assert_eq!(names(&found), vec!["add"]);
        assert_eq!(params(&found[0]), vec![("a", "number"), ("b", "number")]);
        assert_eq!(found[0].declared_return, "number");
    }

    #[test]
    fn test_exported_async_declaration() {
        let src = r#"
export async function getAllPages(): Promise<any> {
  return db.range('pages');
}
"#;
        let found = extract_functions(src);
        assert_eq!(names(&found), vec!["getAllPages"]);
        assert!(found[0].parameters.is_empty());
        assert_eq!(found[0].declared_return, "Promise<any>");
    }

    #[test]
    fn test_arrow_functions() {
        let src = r#"
const greet = (name: string): string => {
  return name;
};
const double = (n: number) => n * 2;
"#;
        let found = extract_functions(src);
        assert_eq!(names(&found), vec!["greet", "double"]);
        assert_eq!(found[0].declared_return, "string");
        assert_eq!(params(&found[1]), vec![("n", "number")]);
        assert_eq!(found[1].declared_return, "any");
    }

    #[test]
    fn test_class_methods() {
        let src = r#"
class Store {
  private save(key: string): boolean {
    return true;
  }
  load(key) {
    return null;
  }
}
"#;
        let found = extract_functions(src);
        assert_eq!(names(&found), vec!["save", "load"]);
        assert_eq!(found[0].declared_return, "boolean");
        assert_eq!(params(&found[1]), vec![("key", "any")]);
    }

    #[test]
    fn test_object_methods() {
        let src = r#"
const api = {
  list: function (limit: number): string[] {
    return [];
  },
  remove: (id: string) => {
    return id;
  },
};
"#;
        let found = extract_functions(src);
        assert_eq!(names(&found), vec!["list", "remove"]);
        assert_eq!(found[0].declared_return, "string[]");
        assert_eq!(params(&found[1]), vec![("id", "string")]);
    }

    #[test]
    fn test_control_flow_is_not_a_function() {
        let src = r#"
function run(flag: boolean) {
  if (flag) {
    return 1;
  }
  while (flag) {
  }
}
"#;
        let found = extract_functions(src);
        assert_eq!(names(&found), vec!["run"]);
    }

    #[test]
    fn test_first_match_wins_on_redefinition() {
        let src = r#"
function handle(a: string): string { return a; }
const handle = (a: number, b: number) => { return a + b; };
"#;
        let found = extract_functions(src);
        assert_eq!(found.len(), 1);
        assert_eq!(params(&found[0]), vec![("a", "string")]);
        assert_eq!(
            PatternSet::builtin().winning_kind(src, "handle"),
            Some(PatternKind::Declaration)
        );
    }

    #[test]
    fn test_no_functions() {
        assert!(extract_functions("export const PORT = 3000;\n").is_empty());
        assert!(extract_functions("").is_empty());
    }

    #[test]
    fn test_custom_pattern_table() {
        let table = [SignaturePattern {
            kind: PatternKind::Declaration,
            source: r"def\s+(?P<name>\w+)\((?P<params>[^)]*)\)",
        }];
        let set = PatternSet::new(&table).unwrap();
        let found = set.extract("def hello(x, y)");
        assert_eq!(names(&found), vec!["hello"]);
        assert_eq!(params(&found[0]), vec![("x", "any"), ("y", "any")]);
    }

    #[test]
    fn test_pattern_without_required_groups_is_rejected() {
        let table = [SignaturePattern {
            kind: PatternKind::Method,
            source: r"(\w+)\s*\(",
        }];
        assert!(PatternSet::new(&table).is_err());

        let broken = [SignaturePattern {
            kind: PatternKind::Method,
            source: r"(?P<name>\w+",
        }];
        assert!(PatternSet::new(&broken).is_err());
    }

    #[test]
    fn test_function_name_validity() {
        assert!(is_valid_function_name("getAllPages"));
        assert!(is_valid_function_name("_private"));
        assert!(is_valid_function_name("$helper2"));
        assert!(!is_valid_function_name("if"));
        assert!(!is_valid_function_name("catch"));
        assert!(!is_valid_function_name("2fast"));
        assert!(!is_valid_function_name(""));
    }

    #[test]
    fn test_parse_parameters() {
        assert!(parse_parameters("   ").is_empty());

        let parsed = parse_parameters("a: number, b , c: string[]");
        let pairs: Vec<(&str, &str)> = parsed.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(pairs, vec![("a", "number"), ("b", "any"), ("c", "string[]")]);

        let object = parse_parameters("opts: { a: string }");
        assert_eq!(object.get("opts").map(String::as_str), Some("{ a: string }"));
    }

    #[test]
    fn test_parse_parameters_splits_inside_generics() {
        // Known limitation: commas inside type arguments split the parameter.
        let parsed = parse_parameters("m: Map<string, number>");
        let keys: Vec<&str> = parsed.keys().collect();
        assert_eq!(keys, vec!["m", "number>"]);
        assert_eq!(parsed.get("m").map(String::as_str), Some("Map<string"));
    }
}
