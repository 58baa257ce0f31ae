//! BER node tree
//!
//! A parsed (or hand-built) BER structure is a tree of [`Node`]s. Leaves are
//! [`ValueNode`]s holding the raw content octets; containers are
//! [`SequenceNode`]s holding their children in encoding order.
//!
//! # Encoding Forcing
//!
//! Every constructor runs the requested primitive/constructed flag through
//! [`TagType::effective_encoding`]: scalar types (INTEGER, NULL, REAL, ...)
//! are always primitive and aggregate types (SEQUENCE, SET, EXTERNAL,
//! EMBEDDED PDV) always constructed. Nodes are immutable once built, so the
//! rule holds for the lifetime of the tree.

use crate::length::length_field_size;
use crate::tag::BerTag;
use ber_core::{BerError, BerResult, Encoding, TagClass, TagType};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A node of a BER tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Primitive-style leaf with raw content octets
    Value(ValueNode),
    /// Container of child nodes
    Sequence(SequenceNode),
}

impl Node {
    pub fn tag_class(&self) -> TagClass {
        match self {
            Node::Value(value) => value.tag_class,
            Node::Sequence(sequence) => sequence.tag_class,
        }
    }

    pub fn tag_type(&self) -> TagType {
        match self {
            Node::Value(value) => value.tag_type,
            Node::Sequence(sequence) => sequence.tag_type,
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Node::Value(value) => value.encoding,
            Node::Sequence(sequence) => sequence.encoding,
        }
    }

    /// Identifier octet of this node
    pub fn tag(&self) -> BerTag {
        BerTag::new(self.tag_class(), self.encoding(), self.tag_type())
    }

    /// Total encoded size in bytes (identifier + length field + content)
    ///
    /// Always equal to the length of the node's encoding.
    pub fn size(&self) -> usize {
        match self {
            Node::Value(value) => value.size(),
            Node::Sequence(sequence) => sequence.size(),
        }
    }

    /// Length of the content octets alone
    pub fn content_len(&self) -> usize {
        match self {
            Node::Value(value) => value.data.len(),
            Node::Sequence(sequence) => sequence.content_len,
        }
    }

    pub fn as_value(&self) -> Option<&ValueNode> {
        match self {
            Node::Value(value) => Some(value),
            Node::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceNode> {
        match self {
            Node::Sequence(sequence) => Some(sequence),
            Node::Value(_) => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }
}

impl From<ValueNode> for Node {
    fn from(value: ValueNode) -> Self {
        Node::Value(value)
    }
}

impl From<SequenceNode> for Node {
    fn from(sequence: SequenceNode) -> Self {
        Node::Sequence(sequence)
    }
}

/// Leaf node owning its content octets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ValueNodeRepr")]
pub struct ValueNode {
    tag_class: TagClass,
    tag_type: TagType,
    encoding: Encoding,
    data: Bytes,
}

impl ValueNode {
    /// Create a value node
    ///
    /// # Arguments
    /// * `tag_class` - Tag class
    /// * `tag_type` - Tag type
    /// * `encoding` - Requested encoding, overridden for scalar and aggregate types
    /// * `data` - Content octets
    ///
    /// # Errors
    /// Returns `InvalidValue` for SEQUENCE, SET, EXTERNAL and EMBEDDED PDV.
    /// Those types always decode as containers, so they are built with
    /// [`SequenceNode`] instead.
    pub fn new(
        tag_class: TagClass,
        tag_type: TagType,
        encoding: Encoding,
        data: impl Into<Bytes>,
    ) -> BerResult<Self> {
        if tag_type.is_aggregate() {
            return Err(BerError::InvalidValue(format!(
                "{} must be built as a SequenceNode",
                tag_type
            )));
        }
        Ok(Self::build(tag_class, tag_type, encoding, data.into()))
    }

    /// Create a primitive Universal class value node
    ///
    /// # Errors
    /// Same as [`ValueNode::new`].
    pub fn universal(tag_type: TagType, data: impl Into<Bytes>) -> BerResult<Self> {
        Self::new(TagClass::Universal, tag_type, Encoding::Primitive, data)
    }

    /// Create a Universal NULL
    pub fn null() -> Self {
        Self::build(TagClass::Universal, TagType::Null, Encoding::Primitive, Bytes::new())
    }

    /// Callers guarantee `tag_type` is not an aggregate type
    pub(crate) fn build(
        tag_class: TagClass,
        tag_type: TagType,
        encoding: Encoding,
        data: Bytes,
    ) -> Self {
        Self {
            tag_class,
            tag_type,
            encoding: tag_type.effective_encoding(encoding),
            data,
        }
    }

    pub fn tag_class(&self) -> TagClass {
        self.tag_class
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Content octets
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Content octets as a shared buffer
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }

    pub fn size(&self) -> usize {
        1 + length_field_size(self.data.len()) + self.data.len()
    }
}

/// Container node owning its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SequenceNodeRepr")]
pub struct SequenceNode {
    tag_class: TagClass,
    tag_type: TagType,
    encoding: Encoding,
    nodes: Vec<Node>,
    #[serde(skip_serializing)]
    content_len: usize,
}

impl SequenceNode {
    /// Create a SEQUENCE node
    ///
    /// SEQUENCE is always constructed, so `encoding` is only kept for
    /// symmetry with [`ValueNode::new`].
    pub fn new(tag_class: TagClass, encoding: Encoding, nodes: Vec<Node>) -> Self {
        Self::build(tag_class, TagType::Sequence, encoding, nodes)
    }

    /// Create a Universal SEQUENCE
    pub fn sequence(nodes: Vec<Node>) -> Self {
        Self::new(TagClass::Universal, Encoding::Constructed, nodes)
    }

    /// Create a Universal SET
    pub fn set(nodes: Vec<Node>) -> Self {
        Self::build(TagClass::Universal, TagType::Set, Encoding::Constructed, nodes)
    }

    /// Create a container with an explicit aggregate tag type
    ///
    /// # Errors
    /// Returns `InvalidValue` unless `tag_type` is SEQUENCE, SET, EXTERNAL or
    /// EMBEDDED PDV. Any other type would be forced primitive or read back
    /// as a leaf, so the encoding could not describe the children.
    pub fn with_tag_type(
        tag_class: TagClass,
        tag_type: TagType,
        nodes: Vec<Node>,
    ) -> BerResult<Self> {
        if !tag_type.is_aggregate() {
            return Err(BerError::InvalidValue(format!(
                "{} cannot hold child nodes",
                tag_type
            )));
        }
        Ok(Self::build(tag_class, tag_type, Encoding::Constructed, nodes))
    }

    fn build(tag_class: TagClass, tag_type: TagType, encoding: Encoding, nodes: Vec<Node>) -> Self {
        let content_len = nodes.iter().map(Node::size).sum();
        Self {
            tag_class,
            tag_type,
            encoding: tag_type.effective_encoding(encoding),
            nodes,
            content_len,
        }
    }

    pub(crate) fn from_parts(tag_class: TagClass, tag_type: TagType, nodes: Vec<Node>) -> Self {
        Self::build(tag_class, tag_type, Encoding::Constructed, nodes)
    }

    pub fn tag_class(&self) -> TagClass {
        self.tag_class
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Children in encoding order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of the children's encoded sizes
    pub fn content_len(&self) -> usize {
        self.content_len
    }

    pub fn size(&self) -> usize {
        1 + length_field_size(self.content_len) + self.content_len
    }
}

impl<'a> IntoIterator for &'a SequenceNode {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[derive(Deserialize)]
struct ValueNodeRepr {
    tag_class: TagClass,
    tag_type: TagType,
    encoding: Encoding,
    data: Bytes,
}

impl TryFrom<ValueNodeRepr> for ValueNode {
    type Error = BerError;

    fn try_from(repr: ValueNodeRepr) -> BerResult<Self> {
        ValueNode::new(repr.tag_class, repr.tag_type, repr.encoding, repr.data)
    }
}

#[derive(Deserialize)]
struct SequenceNodeRepr {
    tag_class: TagClass,
    tag_type: TagType,
    nodes: Vec<Node>,
}

impl TryFrom<SequenceNodeRepr> for SequenceNode {
    type Error = BerError;

    fn try_from(repr: SequenceNodeRepr) -> BerResult<Self> {
        SequenceNode::with_tag_type(repr.tag_class, repr.tag_type, repr.nodes)
    }
}
