//! Schema-driven block extraction.
//!
//! Absence is data, not failure: requested attributes or child blocks that are not in the
//! source are simply left out, and [`ExtractedBlock::attribute`] reports them as
//! [`Lookup::Missing`]. Only structural mismatches between the document and the schema are
//! errors.

use crate::model::{Attribute, Block, Document};
use crate::schema::BodySchema;
use ociguard_types::SourceRange;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("{range}: `{name}` is written as a block, expected an argument")]
    BlockWhereAttributeExpected { name: String, range: SourceRange },

    #[error("{range}: `{name}` is written as an argument, expected a block")]
    AttributeWhereBlockExpected { name: String, range: SourceRange },

    #[error("{range}: `{kind}` block has no label")]
    MissingLabel { kind: String, range: SourceRange },
}

/// Result of asking an extracted block for an attribute.
#[derive(Clone, Copy, Debug)]
pub enum Lookup<T> {
    Present(T),
    /// Requested by the schema, not written in the source.
    Missing,
    /// The schema never asked for it.
    NotRequested,
}

impl<T> Lookup<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Lookup::Present(v) => Some(v),
            Lookup::Missing | Lookup::NotRequested => None,
        }
    }
}

/// A read-only view of one block reduced to what its schema asked for.
#[derive(Clone, Debug)]
pub struct ExtractedBlock<'a> {
    pub kind: &'a str,
    pub labels: &'a [String],
    pub def_range: &'a SourceRange,
    pub attributes: BTreeMap<&'a str, &'a Attribute>,
    /// Requested child blocks in source order, every occurrence kept.
    pub blocks: Vec<ExtractedBlock<'a>>,
    schema: &'a BodySchema,
}

impl<'a> ExtractedBlock<'a> {
    pub fn first_label(&self) -> Option<&'a str> {
        self.labels.first().map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Lookup<&'a Attribute> {
        if !self.schema.wants_attribute(name) {
            return Lookup::NotRequested;
        }
        match self.attributes.get(name) {
            Some(attr) => Lookup::Present(*attr),
            None => Lookup::Missing,
        }
    }

    pub fn blocks_of<'s>(&'s self, kind: &'s str) -> impl Iterator<Item = &'s ExtractedBlock<'a>> {
        self.blocks.iter().filter(move |b| b.kind == kind)
    }
}

/// Every top-level block of `block_type`, extracted per `schema`.
pub fn extract<'a>(
    document: &'a Document,
    block_type: &str,
    schema: &'a BodySchema,
) -> Result<Vec<ExtractedBlock<'a>>, ExtractError> {
    document
        .blocks
        .iter()
        .filter(|b| b.kind == block_type)
        .map(|b| extract_block(b, schema))
        .collect()
}

/// Top-level blocks of `block_type` whose first label is `first_label`
/// (`resource "oci_core_instance" ...`, `provider "oci"`).
///
/// A block of the requested type without any label is malformed.
pub fn extract_labeled<'a>(
    document: &'a Document,
    block_type: &str,
    first_label: &str,
    schema: &'a BodySchema,
) -> Result<Vec<ExtractedBlock<'a>>, ExtractError> {
    let mut out = Vec::new();
    for block in document.blocks.iter().filter(|b| b.kind == block_type) {
        let Some(label) = block.first_label() else {
            return Err(ExtractError::MissingLabel {
                kind: block.kind.clone(),
                range: block.def_range.clone(),
            });
        };
        if label == first_label {
            out.push(extract_block(block, schema)?);
        }
    }
    Ok(out)
}

fn extract_block<'a>(
    block: &'a Block,
    schema: &'a BodySchema,
) -> Result<ExtractedBlock<'a>, ExtractError> {
    let mut attributes = BTreeMap::new();
    for name in &schema.attributes {
        if let Some(attr) = block.attributes.get(name) {
            attributes.insert(attr.name.as_str(), attr);
        } else if let Some(child) = block.blocks.iter().find(|c| &c.kind == name) {
            return Err(ExtractError::BlockWhereAttributeExpected {
                name: name.clone(),
                range: child.def_range.clone(),
            });
        }
    }

    for kind in schema.blocks.keys() {
        if let Some(attr) = block.attributes.get(kind) {
            return Err(ExtractError::AttributeWhereBlockExpected {
                name: kind.clone(),
                range: attr.range.clone(),
            });
        }
    }

    let mut blocks = Vec::new();
    for child in &block.blocks {
        if let Some(child_schema) = schema.block_schema(&child.kind) {
            blocks.push(extract_block(child, child_schema)?);
        }
    }

    Ok(ExtractedBlock {
        kind: &block.kind,
        labels: &block.labels,
        def_range: &block.def_range,
        attributes,
        blocks,
        schema,
    })
}
