//! JavaScript and TypeScript import statements.
//!
//! Covers ES6 `import` statements (default, named, namespace and
//! side-effect forms, including TypeScript `import type`), TypeScript
//! `import x = require('m')` and CommonJS `require()` calls that appear as
//! whole statements.

use tree_sitter::Node;

use super::analyzer::{extract_string_value, node_text, position, TopLevel};
use super::types::{BindingRole, ImportBinding, ImportStatement, StatementKind};

/// Classify a module-level JavaScript/TypeScript statement.
pub(super) fn parse_statement(node: &Node, source: &str) -> TopLevel {
    match node.kind() {
        "import_statement" => parse_es6_import(node, source)
            .or_else(|| parse_import_require(node, source))
            .map_or(TopLevel::Ignored, TopLevel::Import),
        "lexical_declaration" | "variable_declaration" => {
            parse_require_declaration(node, source).map_or(TopLevel::Code, TopLevel::Import)
        }
        "expression_statement" => {
            parse_bare_require(node, source).map_or(TopLevel::Code, TopLevel::Import)
        }
        // `export { a } from './b'` names symbols of another module
        "export_statement" if node.child_by_field_name("source").is_some() => TopLevel::Ignored,
        _ => TopLevel::Code,
    }
}

/// Parse an ES6 import statement.
fn parse_es6_import(node: &Node, source: &str) -> Option<ImportStatement> {
    let source_node = node.child_by_field_name("source")?;
    let module = extract_string_value(&source_node, source)?;
    if module.is_empty() {
        return None;
    }
    let source_text = node_text(&source_node, source)?.to_string();

    let mut head = "import".to_string();
    let mut semicolon = false;
    let mut bindings = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type" | "typeof" => head = format!("import {}", child.kind()),
            "import_clause" => parse_import_clause(&child, source, &module, &mut bindings),
            ";" => semicolon = true,
            _ => {}
        }
    }

    let kind = if bindings.is_empty() {
        StatementKind::SideEffect
    } else {
        StatementKind::EsImport {
            head,
            source_text,
            semicolon,
        }
    };

    Some(ImportStatement {
        module: Some(module),
        kind,
        range: node.byte_range(),
        line: position(node).0,
        bindings,
    })
}

/// Parse the import clause (everything between 'import' and 'from').
fn parse_import_clause(
    node: &Node,
    source: &str,
    module: &str,
    bindings: &mut Vec<ImportBinding>,
) {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                // Default import: import foo from 'module'
                if let Some(binding) = binding_for(
                    &child,
                    &child,
                    source,
                    module,
                    Some("default".to_string()),
                    BindingRole::Default,
                ) {
                    bindings.push(binding);
                }
            }
            "namespace_import" => {
                // Namespace import: import * as foo from 'module'
                if let Some(name) = find_child(&child, "identifier") {
                    if let Some(binding) =
                        binding_for(&child, &name, source, module, None, BindingRole::Namespace)
                    {
                        bindings.push(binding);
                    }
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() == "import_specifier" {
                        if let Some(binding) = parse_import_specifier(&spec, source, module) {
                            bindings.push(binding);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parse a single import specifier: foo or foo as bar
fn parse_import_specifier(node: &Node, source: &str, module: &str) -> Option<ImportBinding> {
    let name_node = node.child_by_field_name("name")?;
    let imported = match name_node.kind() {
        "string" => extract_string_value(&name_node, source)?,
        _ => node_text(&name_node, source)?.to_string(),
    };
    let local_node = node.child_by_field_name("alias").unwrap_or(name_node);

    binding_for(
        node,
        &local_node,
        source,
        module,
        Some(imported),
        BindingRole::Named,
    )
}

fn binding_for(
    spec: &Node,
    local_node: &Node,
    source: &str,
    module: &str,
    imported: Option<String>,
    role: BindingRole,
) -> Option<ImportBinding> {
    let local = node_text(local_node, source)?.to_string();
    let (line, column) = position(local_node);

    Some(ImportBinding {
        name: local.clone(),
        local,
        imported,
        module: module.to_string(),
        role,
        text: node_text(spec, source)?.to_string(),
        line,
        column,
    })
}

fn find_child<'tree>(node: &Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Parse TypeScript `import fs = require('fs')`.
fn parse_import_require(node: &Node, source: &str) -> Option<ImportStatement> {
    let clause = find_child(node, "import_require_clause")?;
    let name_node = find_child(&clause, "identifier")?;
    let source_node = clause
        .child_by_field_name("source")
        .or_else(|| find_child(&clause, "string"))?;

    let module = extract_string_value(&source_node, source)?;
    if module.is_empty() {
        return None;
    }

    let binding = binding_for(
        &clause,
        &name_node,
        source,
        &module,
        None,
        BindingRole::Entire,
    )?;

    Some(ImportStatement {
        module: Some(module),
        kind: StatementKind::Require,
        range: node.byte_range(),
        line: position(node).0,
        bindings: vec![binding],
    })
}

/// Parse `const x = require('module')` with a single declarator.
fn parse_require_declaration(node: &Node, source: &str) -> Option<ImportStatement> {
    let mut cursor = node.walk();
    let declarators: Vec<_> = node
        .children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .collect();

    let [declarator] = declarators.as_slice() else {
        return None;
    };

    // Destructuring patterns are left alone
    let name_node = declarator.child_by_field_name("name")?;
    if name_node.kind() != "identifier" {
        return None;
    }

    let value = declarator.child_by_field_name("value")?;
    let module = require_argument(&value, source)?;
    let binding = binding_for(
        declarator,
        &name_node,
        source,
        &module,
        None,
        BindingRole::Entire,
    )?;

    Some(ImportStatement {
        module: Some(module),
        kind: StatementKind::Require,
        range: node.byte_range(),
        line: position(node).0,
        bindings: vec![binding],
    })
}

/// Parse `require('module');` used only for its side effects.
fn parse_bare_require(node: &Node, source: &str) -> Option<ImportStatement> {
    let call = node.named_child(0)?;
    let module = require_argument(&call, source)?;

    Some(ImportStatement {
        module: Some(module),
        kind: StatementKind::SideEffect,
        range: node.byte_range(),
        line: position(node).0,
        bindings: Vec::new(),
    })
}

/// Returns the module string of a `require('...')` call expression.
fn require_argument(node: &Node, source: &str) -> Option<String> {
    if node.kind() != "call_expression" {
        return None;
    }

    let func_node = node.child_by_field_name("function")?;
    if node_text(&func_node, source)? != "require" {
        return None;
    }

    let args_node = node.child_by_field_name("arguments")?;
    let mut cursor = args_node.walk();
    let found = args_node
        .children(&mut cursor)
        .find(|child| child.kind() == "string");
    let module = extract_string_value(&found?, source)?;

    (!module.is_empty()).then_some(module)
}
