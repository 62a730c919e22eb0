//! Python import statements.

use tree_sitter::Node;

use super::analyzer::{node_text, position, TopLevel};
use super::types::{
    BindingRole, ImportBinding, ImportStatement, StatementKind, WildcardImport,
};

/// Classify a module-level Python statement.
pub(super) fn parse_statement(node: &Node, source: &str) -> TopLevel {
    let parsed = match node.kind() {
        "import_statement" => parse_import(node, source),
        "import_from_statement" => {
            if let Some(wildcard) = parse_wildcard(node, source) {
                return TopLevel::Wildcard(wildcard);
            }
            parse_from_import(node, source)
        }
        "future_import_statement" => None,
        _ => return TopLevel::Code,
    };

    parsed.map_or(TopLevel::Ignored, TopLevel::Import)
}

/// Parse `import a, b.c as d`.
fn parse_import(node: &Node, source: &str) -> Option<ImportStatement> {
    let mut bindings = Vec::new();
    let mut cursor = node.walk();

    for name_node in node.children_by_field_name("name", &mut cursor) {
        bindings.push(module_binding(&name_node, source)?);
    }

    if bindings.is_empty() {
        return None;
    }

    let module = match bindings.as_slice() {
        [only] => Some(only.module.clone()),
        _ => None,
    };

    Some(ImportStatement {
        module,
        kind: StatementKind::PythonImport,
        range: node.byte_range(),
        line: position(node).0,
        bindings,
    })
}

fn module_binding(node: &Node, source: &str) -> Option<ImportBinding> {
    let text = node_text(node, source)?.to_string();
    let (line, column) = position(node);

    match node.kind() {
        "dotted_name" => {
            let local = text.split('.').next().unwrap_or(&text).trim().to_string();
            Some(ImportBinding {
                name: text.clone(),
                local,
                imported: None,
                module: text.clone(),
                role: BindingRole::Module,
                text,
                line,
                column,
            })
        }
        "aliased_import" => {
            let module = node_text(&node.child_by_field_name("name")?, source)?.to_string();
            let alias = node.child_by_field_name("alias")?;
            let local = node_text(&alias, source)?.to_string();
            let (line, column) = position(&alias);
            Some(ImportBinding {
                name: local.clone(),
                local,
                imported: None,
                module,
                role: BindingRole::Module,
                text,
                line,
                column,
            })
        }
        _ => None,
    }
}

/// Parse `from module import *`.
fn parse_wildcard(node: &Node, source: &str) -> Option<WildcardImport> {
    let mut cursor = node.walk();
    if !node
        .children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import")
    {
        return None;
    }

    let module_node = node.child_by_field_name("module_name")?;
    let (line, column) = position(node);
    Some(WildcardImport {
        module: node_text(&module_node, source)?.to_string(),
        line,
        column,
    })
}

/// Parse `from module import a, b as c`.
fn parse_from_import(node: &Node, source: &str) -> Option<ImportStatement> {
    let module_node = node.child_by_field_name("module_name")?;
    let module_text = node_text(&module_node, source)?.to_string();

    let mut cursor = node.walk();
    let mut bindings = Vec::new();
    for name_node in node.children_by_field_name("name", &mut cursor) {
        bindings.push(member_binding(&name_node, source, &module_text)?);
    }

    if bindings.is_empty() {
        return None;
    }

    Some(ImportStatement {
        module: Some(module_text.clone()),
        kind: StatementKind::PythonFrom { module_text },
        range: node.byte_range(),
        line: position(node).0,
        bindings,
    })
}

fn member_binding(node: &Node, source: &str, module: &str) -> Option<ImportBinding> {
    let text = node_text(node, source)?.to_string();

    let (imported, local, anchor) = match node.kind() {
        "dotted_name" => (text.clone(), text.clone(), *node),
        "aliased_import" => {
            let name = node.child_by_field_name("name")?;
            let alias = node.child_by_field_name("alias")?;
            (
                node_text(&name, source)?.to_string(),
                node_text(&alias, source)?.to_string(),
                alias,
            )
        }
        _ => return None,
    };
    let (line, column) = position(&anchor);

    Some(ImportBinding {
        name: local.clone(),
        local,
        imported: Some(imported),
        module: module.to_string(),
        role: BindingRole::Member,
        text,
        line,
        column,
    })
}
