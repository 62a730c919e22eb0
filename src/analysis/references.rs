//! Identifier reference collection.

use tree_sitter::{Node, TreeCursor};

use super::analyzer::{extract_string_value, is_field_of, node_text, position};
use super::language::SourceLanguage;
use super::types::Reference;

/// Import statements nested below module level. Their names are
/// declarations, not uses.
const NESTED_IMPORT_KINDS: &[&str] = &[
    "import_statement",
    "import_from_statement",
    "future_import_statement",
];

/// JSX elements compile to `React.createElement` under the classic runtime.
const JSX_ELEMENT_KINDS: &[&str] = &["jsx_opening_element", "jsx_self_closing_element"];

const JSX_FACTORY: &str = "React";

/// Node kinds that reference a binding in JavaScript/TypeScript.
const ECMASCRIPT_REFERENCE_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
];

/// Collect every identifier reference in the tree, skipping the top-level
/// nodes listed in `skipped`.
pub(super) fn collect_references(
    root: &Node,
    source: &str,
    language: SourceLanguage,
    skipped: &[usize],
) -> Vec<Reference> {
    let mut references = Vec::new();
    let mut cursor = root.walk();
    visit_node(&mut cursor, source, language, skipped, &mut references);
    references
}

/// Recursively visit nodes to find references.
fn visit_node(
    cursor: &mut TreeCursor,
    source: &str,
    language: SourceLanguage,
    skipped: &[usize],
    references: &mut Vec<Reference>,
) {
    let node = cursor.node();

    if skipped.contains(&node.id()) || NESTED_IMPORT_KINDS.contains(&node.kind()) {
        return;
    }

    if is_reference(&node, language) {
        if let Some(name) = node_text(&node, source) {
            let (line, column) = position(&node);
            references.push(Reference {
                name: name.to_string(),
                line,
                column,
            });
        }
    }

    if language == SourceLanguage::Python {
        collect_dunder_all(&node, source, references);
    } else if JSX_ELEMENT_KINDS.contains(&node.kind()) {
        let (line, column) = position(&node);
        references.push(Reference {
            name: JSX_FACTORY.to_string(),
            line,
            column,
        });
    }

    // Visit children
    if cursor.goto_first_child() {
        loop {
            visit_node(cursor, source, language, skipped, references);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

fn is_reference(node: &Node, language: SourceLanguage) -> bool {
    match language {
        SourceLanguage::Python => {
            if node.kind() != "identifier" {
                return false;
            }
            match node.parent() {
                // `obj.name` and `f(name=...)` do not refer to a binding `name`
                Some(parent) if parent.kind() == "attribute" => {
                    !is_field_of(&parent, "attribute", node)
                }
                Some(parent) if parent.kind() == "keyword_argument" => {
                    !is_field_of(&parent, "name", node)
                }
                _ => true,
            }
        }
        _ => ECMASCRIPT_REFERENCE_KINDS.contains(&node.kind()),
    }
}

/// Returns true if a module-level statement assigns `__all__`.
pub(super) fn defines_dunder_all(root: &Node, source: &str) -> bool {
    let mut cursor = root.walk();
    let found = root
        .children(&mut cursor)
        .filter(|child| child.kind() == "expression_statement")
        .filter_map(|child| child.named_child(0))
        .any(|statement| is_dunder_all_assignment(&statement, source));
    found
}

fn is_dunder_all_assignment(node: &Node, source: &str) -> bool {
    matches!(node.kind(), "assignment" | "augmented_assignment")
        && node
            .child_by_field_name("left")
            .and_then(|left| node_text(&left, source))
            .is_some_and(|text| text == "__all__")
}

/// Names listed in `__all__` are exported, so they count as used.
fn collect_dunder_all(node: &Node, source: &str, references: &mut Vec<Reference>) {
    if !is_dunder_all_assignment(node, source) {
        return;
    }

    let Some(right) = node.child_by_field_name("right") else {
        return;
    };

    let mut stack = vec![right];
    while let Some(current) = stack.pop() {
        if current.kind() == "string" {
            if let Some(name) = extract_string_value(&current, source) {
                let (line, column) = position(&current);
                references.push(Reference { name, line, column });
            }
            continue;
        }
        let mut cursor = current.walk();
        stack.extend(current.named_children(&mut cursor));
    }
}
