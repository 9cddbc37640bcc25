//! Declarative description of what a rule wants pulled out of a block.

use std::collections::{BTreeMap, BTreeSet};

/// Attributes and nested block types to extract from a block body.
///
/// Pure data: extraction never fails because something named here is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodySchema {
    pub attributes: BTreeSet<String>,
    pub blocks: BTreeMap<String, BodySchema>,
}

impl BodySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.attributes.insert(name.to_string());
        self
    }

    pub fn attributes<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.attributes
            .extend(names.into_iter().map(|n| n.to_string()));
        self
    }

    pub fn block(mut self, kind: &str, body: BodySchema) -> Self {
        self.blocks.insert(kind.to_string(), body);
        self
    }

    pub fn wants_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn block_schema(&self, kind: &str) -> Option<&BodySchema> {
        self.blocks.get(kind)
    }
}
