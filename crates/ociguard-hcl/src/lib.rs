//! Host adapters: discover Terraform files, parse HCL, build per-module contexts.
//!
//! This crate is allowed to do filesystem IO. Everything it produces is handed to
//! `ociguard-domain` as plain data.

#![forbid(unsafe_code)]

mod context;
mod discover;
mod parse;

use anyhow::Context;
use camino::Utf8Path;
use ociguard_domain::model::{Document, Module, Workspace};
use ociguard_types::RepoPath;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub use context::build_context;
pub use discover::discover_terraform_files;
pub use parse::parse_document;

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a Terraform file and build its module context.
    ///
    /// Returns `Ok(...)` on valid HCL, `Err(...)` otherwise. **Never panics** on any input.
    pub fn parse_terraform(text: &str) -> anyhow::Result<()> {
        let doc = parse::parse_document(&RepoPath::new("main.tf"), text)?;
        let _ = context::build_context(std::slice::from_ref(&doc), &BTreeMap::new());
        Ok(())
    }

    /// Compile exclude patterns and match them against candidate paths.
    /// **Never panics** on any input.
    pub fn expand_excludes(
        patterns: &[String],
        candidates: &[String],
    ) -> anyhow::Result<Vec<String>> {
        let set = discover::build_globset(patterns)?;
        Ok(candidates
            .iter()
            .filter(|c| set.is_match(c))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub exclude: Vec<String>,
    /// `var.<name>` values that win over `variable` defaults in every module.
    pub variables: BTreeMap<String, Value>,
}

/// Build the in-memory workspace the rule engine evaluates.
///
/// One module per directory containing `*.tf` files. Any file that fails to parse aborts
/// the load.
pub fn load_workspace(root: &Utf8Path, opts: &LoadOptions) -> anyhow::Result<Workspace> {
    let files = discover::discover_terraform_files(root, &opts.exclude)
        .context("discover terraform files")?;

    let mut by_dir: BTreeMap<RepoPath, Vec<Document>> = BTreeMap::new();
    for path in files {
        let abs = root.join(path.as_str());
        let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
        let doc = parse::parse_document(&path, &text)?;
        debug!(file = %path, blocks = doc.blocks.len(), "parsed");
        by_dir.entry(path.parent()).or_default().push(doc);
    }

    let modules = by_dir
        .into_iter()
        .map(|(dir, documents)| {
            let context = context::build_context(&documents, &opts.variables);
            Module {
                dir,
                documents,
                context,
            }
        })
        .collect();

    Ok(Workspace {
        root: RepoPath::from(root),
        modules,
    })
}
