//! BER encoder for node trees
//!
//! # Usage Example
//!
//! ```rust
//! use ber_codec::encoder::encode;
//! use ber_codec::node::{SequenceNode, ValueNode};
//! use ber_core::TagType;
//!
//! let node = SequenceNode::sequence(vec![
//!     ValueNode::universal(TagType::Integer, vec![0x01]).unwrap().into(),
//! ]);
//! assert_eq!(&encode(&node.into())[..], &[0x30, 0x03, 0x02, 0x01, 0x01]);
//! ```

use crate::length::encode_length_into;
use crate::node::Node;
use crate::tag::BerTag;
use bytes::{BufMut, Bytes, BytesMut};

/// BER encoder accumulating TLV triplets
///
/// Output always uses the definite length form with the shortest length
/// field, so encoding is a pure function of the tree.
///
/// # Memory Management
///
/// The encoder writes into a `BytesMut`. [`encode`] sizes it exactly from
/// [`Node::size`], so a single tree never reallocates.
#[derive(Debug, Default)]
pub struct BerEncoder {
    buffer: BytesMut,
}

impl BerEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet from raw content octets
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) {
        self.buffer.put_u8(tag.compose());
        encode_length_into(value.len(), &mut self.buffer);
        self.buffer.put_slice(value);
    }

    /// Encode a node and all its descendants, depth first
    pub fn encode_node(&mut self, node: &Node) {
        log::trace!("encoding {} ({} bytes)", node.tag(), node.size());

        match node {
            Node::Value(value) => self.encode_tlv(&node.tag(), value.data()),
            Node::Sequence(sequence) => {
                self.buffer.put_u8(node.tag().compose());
                encode_length_into(sequence.content_len(), &mut self.buffer);
                for child in sequence {
                    self.encode_node(child);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}

/// Encode a node tree into a fresh buffer
pub fn encode(node: &Node) -> Bytes {
    let mut encoder = BerEncoder::with_capacity(node.size());
    encoder.encode_node(node);
    encoder.into_bytes()
}

/// Append the encoding of a node tree to `buf`
pub fn encode_into(node: &Node, buf: &mut BytesMut) {
    buf.reserve(node.size());
    let mut encoder = BerEncoder {
        buffer: buf.split_off(buf.len()),
    };
    encoder.encode_node(node);
    buf.unsplit(encoder.buffer);
}
