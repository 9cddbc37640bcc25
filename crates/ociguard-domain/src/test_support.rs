//! Builders for synthetic documents used by unit tests.

use crate::model::{
    Attribute, Block, Document, ExprKind, Expression, OpaqueForm, TemplatePart, TraversalStep,
};
use ociguard_types::{RepoPath, SourcePos, SourceRange};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const FILE: &str = "main.tf";

/// Single-line range in [`FILE`]; byte offsets are not meaningful here.
pub fn span(line: u32, start: u32, end: u32) -> SourceRange {
    SourceRange::new(
        RepoPath::new(FILE),
        SourcePos::new(line, start, 0),
        SourcePos::new(line, end, 0),
    )
}

pub fn at(mut expr: Expression, line: u32, start: u32, end: u32) -> Expression {
    expr.range = span(line, start, end);
    expr
}

fn expr(kind: ExprKind) -> Expression {
    Expression::new(kind, span(1, 1, 1))
}

pub fn lit(value: Value) -> Expression {
    expr(ExprKind::Literal(value))
}

pub fn str_lit(s: &str) -> Expression {
    lit(json!(s))
}

pub fn bool_lit(b: bool) -> Expression {
    lit(json!(b))
}

pub fn int_lit(i: i64) -> Expression {
    lit(json!(i))
}

/// `var.name` style traversal from a dotted path.
pub fn var(path: &str) -> Expression {
    let mut parts = path.split('.');
    let root = parts.next().unwrap_or_default().to_string();
    let steps = parts.map(|p| TraversalStep::Attr(p.to_string())).collect();
    expr(ExprKind::Traversal { root, steps })
}

pub fn call(name: &str, args: Vec<Expression>) -> Expression {
    expr(ExprKind::Call {
        name: name.to_string(),
        args,
    })
}

pub fn template(parts: Vec<TemplatePart>) -> Expression {
    expr(ExprKind::Template(parts))
}

pub fn opaque(form: OpaqueForm, operands: Vec<Expression>) -> Expression {
    expr(ExprKind::Opaque { form, operands })
}

pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    /// Where the block keyword through its last label sits.
    pub fn at(mut self, line: u32, start: u32, end: u32) -> Self {
        self.block.def_range = span(line, start, end);
        self.block.range = span(line, start, end);
        self
    }

    pub fn attr(mut self, name: &str, expr: Expression) -> Self {
        let range = expr.range.clone();
        self.block.attributes.insert(
            name.to_string(),
            Attribute {
                name: name.to_string(),
                expr,
                range,
            },
        );
        self
    }

    pub fn child(mut self, block: Block) -> Self {
        self.block.blocks.push(block);
        self
    }

    pub fn children(mut self, blocks: Vec<Block>) -> Self {
        self.block.blocks.extend(blocks);
        self
    }

    pub fn build(self) -> Block {
        self.block
    }
}

pub fn block(kind: &str, labels: &[&str]) -> BlockBuilder {
    BlockBuilder {
        block: Block {
            kind: kind.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            attributes: BTreeMap::new(),
            blocks: Vec::new(),
            def_range: span(1, 1, 1),
            range: span(1, 1, 1),
        },
    }
}

pub fn resource(kind: &str, name: &str) -> BlockBuilder {
    block("resource", &[kind, name])
}

pub fn provider(name: &str) -> BlockBuilder {
    block("provider", &[name])
}

pub fn document(blocks: Vec<Block>) -> Document {
    Document {
        path: RepoPath::new(FILE),
        blocks,
    }
}
