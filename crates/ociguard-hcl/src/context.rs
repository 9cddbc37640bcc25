//! Per-module variable resolution context.
//!
//! Order of precedence, lowest first: `variable` block defaults, caller overrides.
//! `locals` are then reduced against that context until nothing new resolves.

use ociguard_domain::model::Document;
use ociguard_domain::resolve::{EvalContext, ResolvedValue, Resolver, StaticResolver, ValueType};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub fn build_context(documents: &[Document], overrides: &BTreeMap<String, Value>) -> EvalContext {
    let mut ctx = EvalContext::new();

    for (name, default) in variable_defaults(documents) {
        ctx.declare("var", &name, default);
    }
    for (name, value) in overrides {
        ctx.declare("var", name, value.clone());
    }

    let mut pending: Vec<_> = documents
        .iter()
        .flat_map(|d| d.blocks.iter().filter(|b| b.kind == "locals"))
        .flat_map(|b| b.attributes.values())
        .collect();

    // Locals may reference each other in any order.
    loop {
        let before = pending.len();
        let mut resolved = Vec::new();
        pending.retain(|attr| {
            match StaticResolver::new(&ctx).resolve(&attr.expr, ValueType::Any) {
                ResolvedValue::Literal(v) => {
                    resolved.push((attr.name.clone(), v));
                    false
                }
                ResolvedValue::Unresolved(_) => true,
            }
        });
        for (name, value) in resolved {
            ctx.declare("local", &name, value);
        }
        if pending.is_empty() || pending.len() == before {
            break;
        }
    }
    for attr in pending {
        debug!(local = %attr.name, range = %attr.range, "local value not statically known");
    }

    ctx
}

/// `variable "<name>" { default = ... }`, skipping defaults that are not literal.
fn variable_defaults(documents: &[Document]) -> Vec<(String, Value)> {
    let empty = EvalContext::new();
    let resolver = StaticResolver::new(&empty);
    documents
        .iter()
        .flat_map(|d| d.blocks.iter().filter(|b| b.kind == "variable"))
        .filter_map(|block| {
            let name = block.first_label()?;
            let default = block.attributes.get("default")?;
            match resolver.resolve(&default.expr, ValueType::Any) {
                ResolvedValue::Literal(v) => Some((name.to_string(), v)),
                ResolvedValue::Unresolved(u) => {
                    debug!(variable = name, reason = %u.reason, "variable default not statically known");
                    None
                }
            }
        })
        .collect()
}
