//! hcl-edit syntax tree to the domain document model.

use anyhow::Context;
use hcl_edit::expr::{Expression as HclExpr, ObjectKey, TraversalOperator};
use hcl_edit::structure::{Block as HclBlock, BlockLabel, Body, Structure};
use hcl_edit::template::{Element, Template};
use hcl_edit::{Decorated, Span};
use ociguard_domain::model::{
    Attribute, Block, Document, ExprKind, Expression, OpaqueForm, TemplatePart, TraversalStep,
};
use ociguard_types::{RepoPath, SourcePos, SourceRange};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::ops::Range;

pub fn parse_document(path: &RepoPath, text: &str) -> anyhow::Result<Document> {
    let body = hcl_edit::parser::parse_body(text)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("parse {path}"))?;

    let converter = Converter {
        path,
        source: text,
        lines: LineIndex::new(text),
    };
    // Terraform files carry only blocks at the top level.
    let (_, blocks) = converter.body(&body);
    Ok(Document {
        path: path.clone(),
        blocks,
    })
}

/// Byte offsets of line starts, for byte -> (line, column) conversion.
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    /// 1-based line and character column of `offset` in `source`.
    pub(crate) fn position(&self, source: &str, offset: usize) -> SourcePos {
        let offset = offset.min(source.len());
        let line_idx = self.starts.partition_point(|&s| s <= offset).saturating_sub(1);
        let line_start = self.starts[line_idx];
        let column = source
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - line_start);
        SourcePos::new(line_idx as u32 + 1, column as u32 + 1, offset)
    }
}

struct Converter<'a> {
    path: &'a RepoPath,
    source: &'a str,
    lines: LineIndex,
}

impl Converter<'_> {
    fn range(&self, span: Option<Range<usize>>) -> SourceRange {
        let span = span.unwrap_or(0..0);
        SourceRange::new(
            self.path.clone(),
            self.lines.position(self.source, span.start),
            self.lines.position(self.source, span.end),
        )
    }

    /// Duplicate arguments never reach here: `parse_body` rejects them.
    fn body(&self, body: &Body) -> (BTreeMap<String, Attribute>, Vec<Block>) {
        let mut attributes: BTreeMap<String, Attribute> = BTreeMap::new();
        let mut blocks = Vec::new();
        for structure in body.iter() {
            match structure {
                Structure::Attribute(attr) => {
                    let name = attr.key.value().as_str().to_string();
                    let converted = Attribute {
                        name: name.clone(),
                        expr: self.expr(&attr.value),
                        range: self.range(attr.span()),
                    };
                    attributes.insert(name, converted);
                }
                Structure::Block(block) => blocks.push(self.block(block)),
            }
        }
        (attributes, blocks)
    }

    fn block(&self, block: &HclBlock) -> Block {
        let ident_span = block.ident.span().unwrap_or(0..0);
        let mut def_end = ident_span.end;
        let mut labels = Vec::with_capacity(block.labels.len());
        for label in &block.labels {
            let (text, span) = match label {
                BlockLabel::Ident(ident) => (ident.value().as_str().to_string(), ident.span()),
                BlockLabel::String(s) => (s.value().clone(), s.span()),
            };
            if let Some(span) = span {
                def_end = def_end.max(span.end);
            }
            labels.push(text);
        }

        let (attributes, blocks) = self.body(&block.body);
        Block {
            kind: block.ident.value().as_str().to_string(),
            labels,
            attributes,
            blocks,
            def_range: self.range(Some(ident_span.start..def_end)),
            range: self.range(block.span()),
        }
    }

    fn expr(&self, expr: &HclExpr) -> Expression {
        let range = self.range(expr.span());
        let kind = match expr {
            HclExpr::Null(_) => ExprKind::Literal(Value::Null),
            HclExpr::Bool(b) => ExprKind::Literal(Value::Bool(*b.value())),
            HclExpr::Number(n) => {
                let n = n.value();
                let number = n
                    .as_i64()
                    .map(Number::from)
                    .or_else(|| n.as_u64().map(Number::from))
                    .or_else(|| n.as_f64().and_then(Number::from_f64));
                match number {
                    Some(number) => ExprKind::Literal(Value::Number(number)),
                    None => ExprKind::Opaque {
                        form: OpaqueForm::Operation,
                        operands: Vec::new(),
                    },
                }
            }
            HclExpr::String(s) => ExprKind::Literal(Value::String(s.value().clone())),
            HclExpr::Array(array) => ExprKind::Array(array.iter().map(|e| self.expr(e)).collect()),
            HclExpr::Object(object) => ExprKind::Object(
                object
                    .iter()
                    .map(|(key, value)| (self.object_key(key), self.expr(value.expr())))
                    .collect(),
            ),
            HclExpr::StringTemplate(template) => self.template(template),
            HclExpr::HeredocTemplate(heredoc) => self.template(&heredoc.template),
            HclExpr::Parenthesis(inner) => {
                let mut unwrapped = self.expr(inner.inner());
                unwrapped.range = range;
                return unwrapped;
            }
            HclExpr::Variable(ident) => ExprKind::Traversal {
                root: ident.value().as_str().to_string(),
                steps: Vec::new(),
            },
            HclExpr::Conditional(cond) => ExprKind::Opaque {
                form: OpaqueForm::Conditional,
                operands: vec![
                    self.expr(&cond.cond_expr),
                    self.expr(&cond.true_expr),
                    self.expr(&cond.false_expr),
                ],
            },
            HclExpr::FuncCall(call) => ExprKind::Call {
                name: self.func_name(expr.span()),
                args: call.args.iter().map(|a| self.expr(a)).collect(),
            },
            HclExpr::Traversal(traversal) => self.traversal(&traversal.expr, &traversal.operators),
            HclExpr::UnaryOp(op) => ExprKind::Opaque {
                form: OpaqueForm::Operation,
                operands: vec![self.expr(&op.expr)],
            },
            HclExpr::BinaryOp(op) => ExprKind::Opaque {
                form: OpaqueForm::Operation,
                operands: vec![self.expr(&op.lhs_expr), self.expr(&op.rhs_expr)],
            },
            HclExpr::ForExpr(for_expr) => ExprKind::Opaque {
                form: OpaqueForm::ForExpr,
                operands: vec![
                    self.expr(&for_expr.intro.collection_expr),
                    self.expr(&for_expr.value_expr),
                ],
            },
        };
        Expression::new(kind, range)
    }

    fn traversal(
        &self,
        base: &HclExpr,
        operators: &[Decorated<TraversalOperator>],
    ) -> ExprKind {
        let mut steps = Vec::with_capacity(operators.len());
        let mut index_operands = Vec::new();
        for op in operators {
            let step = match op.value() {
                TraversalOperator::GetAttr(ident) => {
                    TraversalStep::Attr(ident.value().as_str().to_string())
                }
                TraversalOperator::Index(idx) => {
                    let idx = self.expr(idx);
                    index_operands.push(idx.clone());
                    TraversalStep::Index(idx)
                }
                TraversalOperator::LegacyIndex(i) => TraversalStep::Index(Expression::new(
                    ExprKind::Literal(Value::Number(Number::from(*i.value()))),
                    self.range(op.span()),
                )),
                TraversalOperator::AttrSplat(_) | TraversalOperator::FullSplat(_) => {
                    TraversalStep::Splat
                }
            };
            steps.push(step);
        }

        match self.expr(base) {
            Expression {
                kind: ExprKind::Traversal { root, steps: mut base_steps },
                ..
            } => {
                base_steps.extend(steps);
                ExprKind::Traversal {
                    root,
                    steps: base_steps,
                }
            }
            // Traversal over a computed value such as `func().attr`.
            other => {
                let mut operands = vec![other];
                operands.extend(index_operands);
                ExprKind::Opaque {
                    form: OpaqueForm::Operation,
                    operands,
                }
            }
        }
    }

    fn template(&self, template: &Template) -> ExprKind {
        let mut parts = Vec::new();
        let mut has_directive = false;
        for element in template.iter() {
            match element {
                Element::Literal(text) => parts.push(TemplatePart::Literal(text.value().clone())),
                Element::Interpolation(interp) => {
                    parts.push(TemplatePart::Interpolation(self.expr(&interp.expr)))
                }
                Element::Directive(_) => has_directive = true,
            }
        }

        if !has_directive {
            return ExprKind::Template(parts);
        }
        // `%{if}` / `%{for}` bodies are not reduced; keep interpolations for the variable-reference check.
        let operands = parts
            .into_iter()
            .filter_map(|p| match p {
                TemplatePart::Interpolation(e) => Some(e),
                TemplatePart::Literal(_) => None,
            })
            .collect();
        ExprKind::Opaque {
            form: OpaqueForm::Directive,
            operands,
        }
    }

    fn object_key(&self, key: &ObjectKey) -> String {
        match key {
            ObjectKey::Ident(ident) => ident.value().as_str().to_string(),
            ObjectKey::Expression(expr) => match self.expr(expr).kind {
                ExprKind::Literal(Value::String(s)) => s,
                _ => self.text(expr.span()).to_string(),
            },
        }
    }

    /// Function name as written, e.g. `file` or `provider::ns::fn`.
    fn func_name(&self, span: Option<Range<usize>>) -> String {
        let text = self.text(span);
        text.split('(').next().unwrap_or(text).trim().to_string()
    }

    fn text(&self, span: Option<Range<usize>>) -> &str {
        span.and_then(|s| self.source.get(s)).unwrap_or_default()
    }
}
