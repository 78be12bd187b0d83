//! # Schema Classifier
//!
//! Pure functions that decide which kind of schema a [`SchemaNode`] is.
//!
//! Composed schemas (`oneOf` / `anyOf` / `allOf`) are resolved to their
//! first branch before classification. Only that branch drives the shape of
//! the generated code; the remaining branches are kept but not modeled.
//! Nullability, annotations and validation constraints are always read from
//! the original node, never from the resolved branch.

use crate::spec::{ReferenceSchema, SchemaBody, SchemaNode};

/// The kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Reference,
    Array,
    Map,
    String,
    Number,
    Integer,
    Boolean,
    Composed,
    Unknown,
}

/// A classified node with the parts each kind needs borrowed out of it.
#[derive(Debug, Clone, Copy)]
pub enum Classified<'a> {
    Reference(&'a ReferenceSchema),
    Array(&'a SchemaNode),
    Map(Option<&'a SchemaNode>),
    String,
    Number,
    Integer,
    Boolean,
    Composed(&'a [SchemaNode]),
    Unknown,
}

impl Classified<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Classified::Reference(_) => Kind::Reference,
            Classified::Array(_) => Kind::Array,
            Classified::Map(_) => Kind::Map,
            Classified::String => Kind::String,
            Classified::Number => Kind::Number,
            Classified::Integer => Kind::Integer,
            Classified::Boolean => Kind::Boolean,
            Classified::Composed(_) => Kind::Composed,
            Classified::Unknown => Kind::Unknown,
        }
    }
}

/// Classify a node without resolving composition.
pub fn classify_node(node: &SchemaNode) -> Classified<'_> {
    match &node.body {
        SchemaBody::Reference(r) => Classified::Reference(r),
        SchemaBody::Array(items) => Classified::Array(items),
        SchemaBody::Map(values) => Classified::Map(values.as_deref()),
        SchemaBody::String { .. } => Classified::String,
        SchemaBody::Number => Classified::Number,
        SchemaBody::Integer => Classified::Integer,
        SchemaBody::Boolean => Classified::Boolean,
        SchemaBody::Composed(c) => Classified::Composed(&c.branches),
        SchemaBody::Object(_) | SchemaBody::Unknown => Classified::Unknown,
    }
}

/// Kind of a node. Total: every node maps to exactly one kind.
pub fn classify(node: &SchemaNode) -> Kind {
    classify_node(node).kind()
}

/// Result of decomposing a composed schema.
#[derive(Debug, Clone, Copy)]
pub struct Decomposed<'a> {
    /// The branch that drives code shape
    pub primary: &'a SchemaNode,
    /// Every branch in declaration order
    pub branches: &'a [SchemaNode],
}

/// Split a node into its primary branch and all branches.
///
/// Non-composed nodes (and composed nodes without branches) decompose to
/// themselves.
pub fn decompose(node: &SchemaNode) -> Decomposed<'_> {
    match &node.body {
        SchemaBody::Composed(c) if !c.branches.is_empty() => Decomposed {
            primary: &c.branches[0],
            branches: &c.branches,
        },
        _ => Decomposed {
            primary: node,
            branches: std::slice::from_ref(node),
        },
    }
}

/// Follow primary branches until a non-composed node is reached.
pub fn resolve(node: &SchemaNode) -> &SchemaNode {
    let mut current = node;
    loop {
        let next = decompose(current).primary;
        if std::ptr::eq(next, current) {
            return current;
        }
        current = next;
    }
}

pub fn is_nullable(original: &SchemaNode) -> bool {
    original.nullable
}

pub fn is_annotated(original: &SchemaNode) -> bool {
    !original.annotations.is_empty()
}

pub fn is_validation_constrained(original: &SchemaNode) -> bool {
    !original.constraints.is_empty()
}
