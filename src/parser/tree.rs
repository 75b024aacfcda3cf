//! # Syntax Tree Model
//!
//! A language-neutral syntax tree for one C translation unit, lowered from
//! the tree-sitter CST. Nodes are a tagged variant ([`NodeKind`]) carrying
//! position, raw source text, and children; detectors traverse the tree
//! depth-first via enter/exit callbacks keyed on the kind tag.
//!
//! The tree is immutable once built and may be re-traversed by any number of
//! detectors.

/// Binary operator classes the detectors care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `^`
    BitXor,
    /// Any other binary operator.
    Other,
}

impl BinaryOp {
    /// Maps an operator token to its class.
    pub fn from_token(token: &str) -> Self {
        match token {
            "||" => BinaryOp::LogicalOr,
            "&&" => BinaryOp::LogicalAnd,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEqual,
            ">=" => BinaryOp::GreaterEqual,
            "^" => BinaryOp::BitXor,
            _ => BinaryOp::Other,
        }
    }

    /// The operator's source spelling, used when synthesizing guard text.
    pub fn token(&self) -> &'static str {
        match self {
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::BitXor => "^",
            BinaryOp::Other => "?",
        }
    }

    /// True for `==` and `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }
}

/// Node-kind tag for the lowered syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    TranslationUnit,
    /// Function definition; declarations below it are function-local.
    Function,
    /// A declaration statement; children are one `TypeSpecifier` followed by
    /// one `Declarator` per comma-separated declarator.
    Declaration,
    /// Textual type hint of a declaration (`int`, `unsigned char`, ...).
    TypeSpecifier,
    /// One declarator, with initializer text if present (`key = 0x5A`).
    Declarator,
    /// `if` statement; children are `IfCondition`, the then-branch, and an
    /// optional `Else`.
    If,
    /// The condition expression of an `if`, parentheses stripped.
    IfCondition,
    /// `else` arm; node line is the `else` keyword's line.
    Else,
    Switch,
    SwitchCondition,
    For,
    /// The middle clause of a `for` header; branches here are never flagged.
    ForCondition,
    While,
    WhileCondition,
    DoWhile,
    CaseLabel,
    DefaultLabel,
    Compound,
    ExprStatement,
    /// `return`; a bare `return;` has no children.
    Return,
    Break,
    Continue,
    Goto,
    /// Binary expression; children are the left and right operands.
    Binary(BinaryOp),
    Assignment,
    /// Call expression; text is the full call including arguments.
    Call,
    Paren,
    Unary,
    Identifier,
    Literal,
    Other,
}

/// One node of the lowered syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Raw source slice for this node.
    pub text: String,
    /// Start line, 1-indexed to match [`SourceLines`](super::SourceLines).
    pub line: usize,
    /// Start column, 0-indexed.
    pub column: usize,
    /// End line, 1-indexed, inclusive.
    pub end_line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, text: String, line: usize, column: usize, end_line: usize) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            end_line,
            children: Vec::new(),
        }
    }

    /// First child, if any.
    pub fn first_child(&self) -> Option<&SyntaxNode> {
        self.children.first()
    }

    /// First child with the given kind.
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind == kind)
    }
}

/// The lowered syntax tree for one translation unit.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }
}

/// Depth-first traversal with enter/exit callbacks.
///
/// `enter` fires before a node's children, `exit` after. This mirrors the
/// listener discipline the detectors' scratch state depends on: every enter
/// is paired with exactly one exit, in LIFO order.
pub fn walk<E, X>(node: &SyntaxNode, enter: &mut E, exit: &mut X)
where
    E: FnMut(&SyntaxNode),
    X: FnMut(&SyntaxNode),
{
    enter(node);
    for child in &node.children {
        walk(child, enter, exit);
    }
    exit(node);
}
