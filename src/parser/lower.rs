//! # CST Lowering
//!
//! Lowers the tree-sitter C parse tree into the detector-facing
//! [`SyntaxNode`] tree. The lowering normalizes the grammar shapes the
//! detectors key on: `if`/`switch`/`for`/`while` conditions get dedicated
//! wrapper kinds (so "inside a condition" is a subtree property, not a
//! heuristic), `else` arms are wrapped with the keyword's line, binary
//! expressions are tagged with their operator class, and declarations are
//! split into a type specifier plus one declarator per comma.
//!
//! Comments are dropped during lowering so statement-shape checks (first
//! statement of a `default:` body, single-statement `else` bodies) are not
//! confused by interleaved trivia.

use tree_sitter::Node;

use super::tree::{BinaryOp, NodeKind, SyntaxNode};

/// Lowers one tree-sitter node (and its subtree) into a [`SyntaxNode`].
pub fn lower(node: Node, src: &str) -> SyntaxNode {
    let kind = node.kind();
    match kind {
        "translation_unit" => container(node, src, NodeKind::TranslationUnit),
        "function_definition" => container(node, src, NodeKind::Function),
        "declaration" => lower_declaration(node, src),
        "if_statement" => lower_if(node, src),
        "switch_statement" => lower_switch(node, src),
        "for_statement" => lower_for(node, src),
        "while_statement" => lower_while(node, src),
        "do_statement" => lower_do(node, src),
        "case_statement" => lower_case(node, src),
        "compound_statement" => container(node, src, NodeKind::Compound),
        "expression_statement" => container(node, src, NodeKind::ExprStatement),
        "return_statement" => container(node, src, NodeKind::Return),
        "break_statement" => make(node, src, NodeKind::Break),
        "continue_statement" => make(node, src, NodeKind::Continue),
        "goto_statement" => make(node, src, NodeKind::Goto),
        "binary_expression" => lower_binary(node, src),
        "assignment_expression" => container(node, src, NodeKind::Assignment),
        "call_expression" => lower_call(node, src),
        "parenthesized_expression" => container(node, src, NodeKind::Paren),
        "unary_expression" | "pointer_expression" | "update_expression" => {
            container(node, src, NodeKind::Unary)
        }
        "identifier" => make(node, src, NodeKind::Identifier),
        "number_literal" | "char_literal" | "string_literal" | "concatenated_string" | "true"
        | "false" | "null" => make(node, src, NodeKind::Literal),
        _ => container(node, src, NodeKind::Other),
    }
}

/// Leaf node: position and text only.
fn make(node: Node, src: &str, kind: NodeKind) -> SyntaxNode {
    SyntaxNode::new(
        kind,
        text_of(node, src),
        node.start_position().row + 1,
        node.start_position().column,
        node.end_position().row + 1,
    )
}

/// Node whose children are the lowered named children, comments dropped.
fn container(node: Node, src: &str, kind: NodeKind) -> SyntaxNode {
    let mut out = make(node, src, kind);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        out.children.push(lower(child, src));
    }
    out
}

fn lower_declaration(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::Declaration);

    let declarator_kinds = [
        "init_declarator",
        "identifier",
        "pointer_declarator",
        "array_declarator",
        "function_declarator",
    ];

    let mut type_parts: Vec<String> = Vec::new();
    let mut declarators: Vec<SyntaxNode> = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        if declarator_kinds.contains(&child.kind()) {
            declarators.push(make(child, src, NodeKind::Declarator));
        } else if declarators.is_empty() {
            type_parts.push(text_of(child, src));
        }
    }

    let mut type_node = make(node, src, NodeKind::TypeSpecifier);
    type_node.text = type_parts.join(" ");
    out.children.push(type_node);
    out.children.extend(declarators);
    out
}

fn lower_if(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::If);

    if let Some(cond) = node.child_by_field_name("condition") {
        out.children.push(lower_condition(cond, src, NodeKind::IfCondition));
    }
    if let Some(consequence) = node.child_by_field_name("consequence") {
        out.children.push(lower(consequence, src));
    }
    if let Some(alternative) = node.child_by_field_name("alternative") {
        // Newer grammars wrap the arm in an `else_clause` starting at the
        // `else` keyword; older ones point straight at the statement.
        let mut else_node = make(alternative, src, NodeKind::Else);
        if alternative.kind() == "else_clause" {
            let mut cursor = alternative.walk();
            for child in alternative.named_children(&mut cursor) {
                if child.kind() == "comment" {
                    continue;
                }
                else_node.children.push(lower(child, src));
            }
        } else {
            else_node.children.push(lower(alternative, src));
        }
        out.children.push(else_node);
    }
    out
}

fn lower_switch(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::Switch);
    if let Some(cond) = node.child_by_field_name("condition") {
        out.children
            .push(lower_condition(cond, src, NodeKind::SwitchCondition));
    }
    if let Some(body) = node.child_by_field_name("body") {
        out.children.push(lower(body, src));
    }
    out
}

fn lower_for(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::For);
    if let Some(init) = node.child_by_field_name("initializer") {
        out.children.push(lower(init, src));
    }
    if let Some(cond) = node.child_by_field_name("condition") {
        out.children
            .push(lower_condition(cond, src, NodeKind::ForCondition));
    }
    if let Some(update) = node.child_by_field_name("update") {
        out.children.push(lower(update, src));
    }
    if let Some(body) = node.child_by_field_name("body") {
        out.children.push(lower(body, src));
    }
    out
}

fn lower_while(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::While);
    if let Some(cond) = node.child_by_field_name("condition") {
        out.children
            .push(lower_condition(cond, src, NodeKind::WhileCondition));
    }
    if let Some(body) = node.child_by_field_name("body") {
        out.children.push(lower(body, src));
    }
    out
}

fn lower_do(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::DoWhile);
    if let Some(body) = node.child_by_field_name("body") {
        out.children.push(lower(body, src));
    }
    if let Some(cond) = node.child_by_field_name("condition") {
        out.children
            .push(lower_condition(cond, src, NodeKind::WhileCondition));
    }
    out
}

/// Wraps a condition expression, stripping a surrounding parenthesized
/// expression so the wrapper's text is the bare condition.
fn lower_condition(cond: Node, src: &str, kind: NodeKind) -> SyntaxNode {
    let inner = if cond.kind() == "parenthesized_expression" {
        cond.named_child(0).unwrap_or(cond)
    } else {
        cond
    };
    let mut wrapper = make(inner, src, kind);
    wrapper.children.push(lower(inner, src));
    wrapper
}

fn lower_case(node: Node, src: &str) -> SyntaxNode {
    let value = node.child_by_field_name("value");
    let kind = if value.is_some() {
        NodeKind::CaseLabel
    } else {
        NodeKind::DefaultLabel
    };

    let mut out = make(node, src, kind);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        if let Some(v) = value {
            if child.id() == v.id() {
                continue;
            }
        }
        out.children.push(lower(child, src));
    }
    out
}

fn lower_binary(node: Node, src: &str) -> SyntaxNode {
    let op = node
        .child_by_field_name("operator")
        .map(|o| BinaryOp::from_token(o.kind()))
        .unwrap_or(BinaryOp::Other);

    let mut out = make(node, src, NodeKind::Binary(op));
    if let Some(left) = node.child_by_field_name("left") {
        out.children.push(lower(left, src));
    }
    if let Some(right) = node.child_by_field_name("right") {
        out.children.push(lower(right, src));
    }
    out
}

fn lower_call(node: Node, src: &str) -> SyntaxNode {
    let mut out = make(node, src, NodeKind::Call);
    if let Some(function) = node.child_by_field_name("function") {
        out.children.push(lower(function, src));
    }
    if let Some(args) = node.child_by_field_name("arguments") {
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() == "comment" {
                continue;
            }
            out.children.push(lower(arg, src));
        }
    }
    out
}

fn text_of(node: Node, src: &str) -> String {
    node.utf8_text(src.as_bytes()).unwrap_or_default().to_string()
}
