//! Human-readable run summary

use crate::tree::FunctionTree;

/// Render every function grouped by file with its hash and tags.
///
/// Output order follows tree order, so identical trees render identically.
pub fn render_summary(tree: &FunctionTree) -> String {
    let mut output = String::new();
    output.push_str("\nFunction Tree Summary:\n");
    output.push_str("======================\n");

    if tree.is_empty() {
        output.push_str("\n(no functions found)\n");
        return output;
    }

    for (file_path, functions) in tree.iter() {
        output.push_str(&format!("\n{}:\n", file_path));
        for (name, record) in functions.iter() {
            output.push_str(&format!(
                "  {} -> {}\n",
                record.display_signature(name),
                record.normalized_return
            ));
            output.push_str(&format!("     Hash: {}\n", record.signature_hash));
            output.push_str(&format!("     Testable: {}\n", record.testable_label()));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer;
    use crate::tree::{FileEntry, FunctionRecord, FunctionSignature};

    #[test]
    fn test_render_summary() {
        let record = FunctionRecord::from_signature(&FunctionSignature {
            name: "add".to_string(),
            parameters: [("a", "number".to_string()), ("b", "number".to_string())]
                .into_iter()
                .collect(),
            declared_return: "number".to_string(),
        });
        let hash = record.signature_hash.clone();
        let mut functions = FileEntry::new();
        functions.insert("add", record);
        let mut tree = FunctionTree::new();
        tree.insert("server/math.ts", functions);
        let tree = infer::analyze(tree);

        let text = render_summary(&tree);
        assert!(text.contains("\nserver/math.ts:\n"));
        assert!(text.contains("  add(a: number, b: number) -> number\n"));
        assert!(text.contains(&format!("     Hash: {}\n", hash)));
        assert!(text.contains("     Testable: range, precision, edge_cases\n"));
    }

    #[test]
    fn test_render_empty() {
        assert!(render_summary(&FunctionTree::new()).contains("(no functions found)"));
    }
}
