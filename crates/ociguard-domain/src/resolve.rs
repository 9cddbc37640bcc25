//! Static expression resolution.
//!
//! The resolver reduces an expression to a literal using only an explicit [`EvalContext`].
//! Anything it cannot reduce comes back as [`ResolvedValue::Unresolved`] with a reason; it
//! never guesses.

use crate::model::{ExprKind, Expression, TemplatePart, TraversalStep};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Type the caller wants the value converted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Number,
    String,
    /// No conversion.
    Any,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Any => "any",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unresolved {
    pub reason: String,
}

impl Unresolved {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedValue {
    Literal(Value),
    Unresolved(Unresolved),
}

impl ResolvedValue {
    pub fn into_result(self) -> Result<Value, Unresolved> {
        match self {
            ResolvedValue::Literal(v) => Ok(v),
            ResolvedValue::Unresolved(u) => Err(u),
        }
    }
}

impl From<Result<Value, Unresolved>> for ResolvedValue {
    fn from(value: Result<Value, Unresolved>) -> Self {
        match value {
            Ok(v) => ResolvedValue::Literal(v),
            Err(u) => ResolvedValue::Unresolved(u),
        }
    }
}

/// Values bound to traversal roots (`var`, `local`, ...) for one module.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalContext {
    roots: BTreeMap<String, Value>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `root.name` to `value`, replacing an earlier binding.
    pub fn declare(&mut self, root: &str, name: &str, value: Value) {
        let slot = self
            .roots
            .entry(root.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            map.insert(name.to_string(), value);
        }
    }

    pub fn with(mut self, root: &str, name: &str, value: Value) -> Self {
        self.declare(root, name, value);
        self
    }

    pub fn root(&self, root: &str) -> Option<&Value> {
        self.roots.get(root)
    }

    pub fn get(&self, root: &str, name: &str) -> Option<&Value> {
        self.roots.get(root).and_then(|v| v.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// What rules consume: value resolution plus the parameterization check.
pub trait Resolver {
    fn resolve(&self, expr: &Expression, expected: ValueType) -> ResolvedValue;

    /// True when the expression contains any variable reference, function call, or
    /// for-expression. Purely syntactic: it does not depend on whether resolution succeeds.
    fn references_variable(&self, expr: &Expression) -> bool;
}

#[derive(Clone, Copy, Debug)]
pub struct StaticResolver<'a> {
    ctx: &'a EvalContext,
}

impl<'a> StaticResolver<'a> {
    pub fn new(ctx: &'a EvalContext) -> Self {
        Self { ctx }
    }

    fn reduce(&self, expr: &Expression) -> Result<Value, Unresolved> {
        match &expr.kind {
            ExprKind::Literal(v) => Ok(v.clone()),
            ExprKind::Traversal { root, steps } => self.lookup(root, steps),
            ExprKind::Call { name, .. } => Err(Unresolved::new(format!(
                "function call `{name}()` cannot be evaluated statically"
            ))),
            ExprKind::Template(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Literal(text) => out.push_str(text),
                        TemplatePart::Interpolation(inner) => {
                            let value = self.reduce(inner)?;
                            out.push_str(&primitive_to_string(&value).ok_or_else(|| {
                                Unresolved::new(format!(
                                    "cannot interpolate {} into a string",
                                    describe_value(&value)
                                ))
                            })?);
                        }
                    }
                }
                Ok(Value::String(out))
            }
            ExprKind::Array(items) => items
                .iter()
                .map(|e| self.reduce(e))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            ExprKind::Object(items) => {
                let mut map = Map::new();
                for (key, e) in items {
                    map.insert(key.clone(), self.reduce(e)?);
                }
                Ok(Value::Object(map))
            }
            ExprKind::Opaque { form, .. } => Err(Unresolved::new(format!(
                "{} cannot be evaluated statically",
                form.describe()
            ))),
        }
    }

    fn lookup(&self, root: &str, steps: &[TraversalStep]) -> Result<Value, Unresolved> {
        let path = traversal_path(root, steps);
        let mut current = self
            .ctx
            .root(root)
            .ok_or_else(|| Unresolved::new(format!("unknown reference `{path}`")))?;

        for step in steps {
            current = match step {
                TraversalStep::Attr(name) => current.get(name.as_str()),
                TraversalStep::Index(idx) => match (current, self.reduce(idx)?) {
                    (Value::Array(items), Value::Number(n)) => {
                        n.as_u64().and_then(|i| items.get(i as usize))
                    }
                    (Value::Object(map), Value::String(key)) => map.get(&key),
                    _ => None,
                },
                TraversalStep::Splat => {
                    return Err(Unresolved::new(format!(
                        "splat in `{path}` cannot be evaluated statically"
                    )));
                }
            }
            .ok_or_else(|| Unresolved::new(format!("`{path}` has no value")))?;
        }

        if current.is_null() {
            return Err(Unresolved::new(format!("`{path}` has no value")));
        }
        Ok(current.clone())
    }
}

impl Resolver for StaticResolver<'_> {
    fn resolve(&self, expr: &Expression, expected: ValueType) -> ResolvedValue {
        self.reduce(expr)
            .and_then(|v| convert(v, expected))
            .into()
    }

    fn references_variable(&self, expr: &Expression) -> bool {
        expr.is_computed()
    }
}

/// HCL primitive conversion from `value` to `expected`.
pub fn convert(value: Value, expected: ValueType) -> Result<Value, Unresolved> {
    let mismatch =
        |v: &Value| Unresolved::new(format!("expected {expected}, found {}", describe_value(v)));

    match (expected, value) {
        (ValueType::Any, v) => Ok(v),
        (_, Value::Null) => Err(Unresolved::new("value is null")),
        (ValueType::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
        (ValueType::Bool, Value::String(s)) => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch(&Value::String(s.clone()))),
        },
        (ValueType::Number, Value::Number(n)) => Ok(Value::Number(n)),
        (ValueType::Number, Value::String(s)) => parse_number(&s)
            .map(Value::Number)
            .ok_or_else(|| mismatch(&Value::String(s))),
        (ValueType::String, Value::String(s)) => Ok(Value::String(s)),
        (ValueType::String, v @ (Value::Bool(_) | Value::Number(_))) => {
            Ok(Value::String(primitive_to_string(&v).unwrap_or_default()))
        }
        (_, v) => Err(mismatch(&v)),
    }
}

fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn primitive_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

/// `var.a.b[...]` rendering of a traversal for diagnostics.
pub fn traversal_path(root: &str, steps: &[TraversalStep]) -> String {
    let mut out = root.to_string();
    for step in steps {
        match step {
            TraversalStep::Attr(name) => {
                out.push('.');
                out.push_str(name);
            }
            TraversalStep::Index(idx) => match &idx.kind {
                ExprKind::Literal(Value::Number(n)) => out.push_str(&format!("[{n}]")),
                ExprKind::Literal(Value::String(s)) => out.push_str(&format!("[{s:?}]")),
                _ => out.push_str("[...]"),
            },
            TraversalStep::Splat => out.push_str("[*]"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OpaqueForm;
    use crate::test_support::{call, int_lit, opaque, str_lit, template, var};
    use serde_json::json;

    fn ctx() -> EvalContext {
        EvalContext::new()
            .with("var", "access_type", json!("ObjectRead"))
            .with("var", "ports", json!([22, 443]))
            .with("var", "flag", json!("true"))
            .with("var", "unset", Value::Null)
            .with("local", "region", json!("eu-frankfurt-1"))
    }

    fn resolve(expr: &Expression, ty: ValueType) -> ResolvedValue {
        let ctx = ctx();
        StaticResolver::new(&ctx).resolve(expr, ty)
    }

    #[test]
    fn literals_resolve_verbatim() {
        assert_eq!(
            resolve(&str_lit("NoPublicAccess"), ValueType::String),
            ResolvedValue::Literal(json!("NoPublicAccess"))
        );
        assert_eq!(
            resolve(&int_lit(22), ValueType::Number),
            ResolvedValue::Literal(json!(22))
        );
    }

    #[test]
    fn variables_resolve_through_context() {
        assert_eq!(
            resolve(&var("var.access_type"), ValueType::String),
            ResolvedValue::Literal(json!("ObjectRead"))
        );
        assert_eq!(
            resolve(&var("local.region"), ValueType::Any),
            ResolvedValue::Literal(json!("eu-frankfurt-1"))
        );
    }

    #[test]
    fn unknown_or_null_references_are_unresolved() {
        for path in ["var.missing", "module.net.id", "var.unset"] {
            match resolve(&var(path), ValueType::String) {
                ResolvedValue::Unresolved(u) => assert!(u.reason.contains(path), "{}", u.reason),
                other => panic!("expected unresolved for {path}, got {other:?}"),
            }
        }
    }

    #[test]
    fn primitive_conversions_follow_hcl_rules() {
        assert_eq!(
            resolve(&var("var.flag"), ValueType::Bool),
            ResolvedValue::Literal(json!(true))
        );
        assert_eq!(
            resolve(&str_lit("22"), ValueType::Number),
            ResolvedValue::Literal(json!(22))
        );
        assert_eq!(
            resolve(&int_lit(6), ValueType::String),
            ResolvedValue::Literal(json!("6"))
        );
        assert!(matches!(
            resolve(&str_lit("yes"), ValueType::Bool),
            ResolvedValue::Unresolved(_)
        ));
        assert!(matches!(
            resolve(&var("var.ports"), ValueType::String),
            ResolvedValue::Unresolved(_)
        ));
    }

    #[test]
    fn templates_concatenate_resolved_parts() {
        let expr = template(vec![
            TemplatePart::Literal("bucket-".to_string()),
            TemplatePart::Interpolation(var("local.region")),
        ]);
        assert_eq!(
            resolve(&expr, ValueType::String),
            ResolvedValue::Literal(json!("bucket-eu-frankfurt-1"))
        );
    }

    #[test]
    fn calls_and_opaque_forms_are_unresolved() {
        assert!(matches!(
            resolve(&call("file", vec![str_lit("key.pem")]), ValueType::String),
            ResolvedValue::Unresolved(_)
        ));
        assert!(matches!(
            resolve(&opaque(OpaqueForm::Conditional, vec![]), ValueType::Any),
            ResolvedValue::Unresolved(_)
        ));
    }

    #[test]
    fn references_variable_is_syntactic() {
        let ctx = ctx();
        let r = StaticResolver::new(&ctx);
        assert!(!r.references_variable(&str_lit("hardcoded_password")));
        assert!(r.references_variable(&var("var.access_type")));
        assert!(r.references_variable(&var("var.missing")));
        assert!(r.references_variable(&call("file", vec![str_lit("key.pem")])));
        assert!(r.references_variable(&opaque(OpaqueForm::ForExpr, vec![])));
        assert!(!r.references_variable(&template(vec![TemplatePart::Literal(
            "plain".to_string()
        )])));
    }
}
