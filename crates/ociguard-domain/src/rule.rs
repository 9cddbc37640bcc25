//! The rule interface and the runner a rule sees during one document pass.

use crate::emit::{Emitter, RuleStamp};
use crate::extract::{extract_labeled, ExtractError, ExtractedBlock};
use crate::model::{Document, Expression};
use crate::resolve::{Resolver, ValueType};
use crate::schema::BodySchema;
use ociguard_types::{Finding, Severity, SourceRange};
use serde_json::Value;

/// A single policy check. Implementations are stateless.
pub trait Rule {
    /// Stable identifier; also the key under `[rules.*]` in config.
    fn name(&self) -> &'static str;

    fn enabled(&self) -> bool {
        true
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn link(&self) -> &'static str;

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError>;
}

/// Why a rule pass on a document stopped before completing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CheckError {
    #[error("cannot evaluate expression at {range}: {reason}")]
    Unresolved {
        rule: String,
        range: SourceRange,
        reason: String,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl CheckError {
    pub fn range(&self) -> Option<&SourceRange> {
        match self {
            CheckError::Unresolved { range, .. } => Some(range),
            CheckError::Extract(
                ExtractError::BlockWhereAttributeExpected { range, .. }
                | ExtractError::AttributeWhereBlockExpected { range, .. }
                | ExtractError::MissingLabel { range, .. },
            ) => Some(range),
        }
    }
}

/// Per-(rule, document) handle: extraction, evaluation, emission.
pub struct Runner<'d> {
    document: &'d Document,
    resolver: &'d dyn Resolver,
    stamp: RuleStamp,
    emitter: Emitter,
}

impl<'d> Runner<'d> {
    pub fn new(document: &'d Document, resolver: &'d dyn Resolver, stamp: RuleStamp) -> Self {
        Self {
            document,
            resolver,
            stamp,
            emitter: Emitter::new(),
        }
    }

    pub fn resolver(&self) -> &'d dyn Resolver {
        self.resolver
    }

    /// `resource "<kind>" "<name>"` blocks.
    pub fn resource_content<'s>(
        &self,
        kind: &str,
        schema: &'s BodySchema,
    ) -> Result<Vec<ExtractedBlock<'s>>, CheckError>
    where
        'd: 's,
    {
        Ok(extract_labeled(self.document, "resource", kind, schema)?)
    }

    /// `provider "<name>"` blocks.
    pub fn provider_content<'s>(
        &self,
        name: &str,
        schema: &'s BodySchema,
    ) -> Result<Vec<ExtractedBlock<'s>>, CheckError>
    where
        'd: 's,
    {
        Ok(extract_labeled(self.document, "provider", name, schema)?)
    }

    /// Resolve `expr` or fail the pass. Unresolved is never treated as compliant.
    pub fn evaluate(&self, expr: &Expression, expected: ValueType) -> Result<Value, CheckError> {
        self.resolver
            .resolve(expr, expected)
            .into_result()
            .map_err(|u| self.unresolved(expr, u.reason))
    }

    pub fn evaluate_bool(&self, expr: &Expression) -> Result<bool, CheckError> {
        match self.evaluate(expr, ValueType::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(self.unresolved(expr, format!("expected bool, found {other}"))),
        }
    }

    pub fn evaluate_string(&self, expr: &Expression) -> Result<String, CheckError> {
        match self.evaluate(expr, ValueType::String)? {
            Value::String(s) => Ok(s),
            other => Err(self.unresolved(expr, format!("expected string, found {other}"))),
        }
    }

    /// Numbers with a fractional part are rejected.
    pub fn evaluate_int(&self, expr: &Expression) -> Result<i64, CheckError> {
        let value = self.evaluate(expr, ValueType::Number)?;
        let whole = value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        });
        whole.ok_or_else(|| self.unresolved(expr, format!("expected a whole number, found {value}")))
    }

    pub fn emit(&mut self, code: &str, message: impl Into<String>, range: &SourceRange) {
        self.emitter.emit(self.stamp, code, message, range);
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.emitter.into_findings()
    }

    fn unresolved(&self, expr: &Expression, reason: String) -> CheckError {
        CheckError::Unresolved {
            rule: self.stamp.id.to_string(),
            range: expr.range.clone(),
            reason,
        }
    }
}
