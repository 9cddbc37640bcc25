//! Read-only document tree handed to rules.
//!
//! Built once per file by a parser adapter; nothing here mutates after construction.

use crate::resolve::EvalContext;
use ociguard_types::{RepoPath, SourceRange};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub root: RepoPath,

    /// One entry per configuration directory, in path order.
    pub modules: Vec<Module>,
}

/// A directory of configuration files sharing one variable namespace.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub dir: RepoPath,
    pub documents: Vec<Document>,
    pub context: EvalContext,
}

/// One parsed file: an ordered forest of top-level blocks.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub path: RepoPath,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug)]
pub struct Block {
    /// Block keyword, e.g. `resource` or `provider`.
    pub kind: String,
    pub labels: Vec<String>,
    pub attributes: BTreeMap<String, Attribute>,
    /// Nested blocks in source order. The same kind may repeat.
    pub blocks: Vec<Block>,
    /// Keyword through last label.
    pub def_range: SourceRange,
    /// Whole block including the body.
    pub range: SourceRange,
}

impl Block {
    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

#[derive(Clone, Debug)]
pub struct Attribute {
    pub name: String,
    pub expr: Expression,
    /// `name = value`.
    pub range: SourceRange,
}

#[derive(Clone, Debug)]
pub struct Expression {
    pub kind: ExprKind,
    pub range: SourceRange,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(Value),
    /// `root.attr[index]...`; a bare `root` has no steps.
    Traversal {
        root: String,
        steps: Vec<TraversalStep>,
    },
    Call {
        name: String,
        args: Vec<Expression>,
    },
    /// A quoted or heredoc string with interpolations.
    Template(Vec<TemplatePart>),
    Array(Vec<Expression>),
    Object(Vec<(String, Expression)>),
    /// Forms the static resolver never reduces (conditionals, operators, for-expressions).
    /// `operands` keeps the sub-expressions so references inside stay visible.
    Opaque {
        form: OpaqueForm,
        operands: Vec<Expression>,
    },
}

#[derive(Clone, Debug)]
pub enum TraversalStep {
    Attr(String),
    Index(Expression),
    /// `[*]` or `.*`.
    Splat,
}

#[derive(Clone, Debug)]
pub enum TemplatePart {
    Literal(String),
    Interpolation(Expression),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpaqueForm {
    Conditional,
    Operation,
    ForExpr,
    Directive,
}

impl OpaqueForm {
    pub fn describe(self) -> &'static str {
        match self {
            OpaqueForm::Conditional => "conditional expression",
            OpaqueForm::Operation => "operator expression",
            OpaqueForm::ForExpr => "for expression",
            OpaqueForm::Directive => "template directive",
        }
    }
}

impl Expression {
    pub fn new(kind: ExprKind, range: SourceRange) -> Self {
        Self { kind, range }
    }

    /// True if anything in the tree is computed rather than written out literally.
    pub fn is_computed(&self) -> bool {
        match &self.kind {
            ExprKind::Literal(_) => false,
            ExprKind::Traversal { .. } | ExprKind::Call { .. } => true,
            ExprKind::Template(parts) => parts.iter().any(|p| match p {
                TemplatePart::Literal(_) => false,
                TemplatePart::Interpolation(e) => e.is_computed(),
            }),
            ExprKind::Array(items) => items.iter().any(Expression::is_computed),
            ExprKind::Object(items) => items.iter().any(|(_, e)| e.is_computed()),
            ExprKind::Opaque { form, operands } => {
                *form == OpaqueForm::ForExpr || operands.iter().any(Expression::is_computed)
            }
        }
    }
}
