//! Recursive BER parser
//!
//! Turns a byte buffer into a [`Node`] tree. The parser is stateless between
//! calls; a [`Parser`] value only carries its [`ParseOptions`].
//!
//! # Usage Example
//!
//! ```rust
//! use ber_codec::parser::parse;
//!
//! let node = parse(&[0x30, 0x03, 0x02, 0x01, 0x07]).unwrap();
//! assert_eq!(node.as_sequence().unwrap().len(), 1);
//! ```
//!
//! # Parsing Process
//! 1. Decompose the identifier octet
//! 2. Decode the length field
//! 3. Check the content fits inside the buffer
//! 4. For SEQUENCE, SET, EXTERNAL and EMBEDDED PDV, parse the content as
//!    child nodes until the declared length is used up; otherwise keep the
//!    content octets verbatim
//!
//! Constructed nodes may use the indefinite length form, in which case
//! children are read until an end-of-contents marker. For non-aggregate
//! types the children's definite-length encodings become the value's
//! payload. Primitive nodes must carry a definite length.
//!
//! A child never reads past the end of its parent. Running off the buffer
//! is `OutOfData`; overrunning the parent inside the buffer is
//! `InvalidValue`.

use crate::encoder::encode_into;
use crate::length::{decode_length, BerLength};
use crate::node::{Node, SequenceNode, ValueNode};
use crate::tag::BerTag;
use ber_core::{BerError, BerResult};
use bytes::{Bytes, BytesMut};

/// Default maximum nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many levels of nodes may be nested
    ///
    /// The root counts as level 1, so a limit of 1 only accepts a lone node
    /// or an empty container.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// BER parser
///
/// # Error Handling
///
/// Parsing is fail-fast: the first error aborts the whole parse and no
/// partial tree is returned. Errors can occur due to:
/// - Buffer underflow (`OutOfData` with the offset and length requested)
/// - Unknown tag numbers or children overrunning their parent (`InvalidValue`)
/// - Nesting beyond [`ParseOptions::max_depth`] (`DepthLimitExceeded`)
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse one node from the start of `data`
    ///
    /// The data is copied once; use [`Parser::parse_bytes`] to share an
    /// existing buffer. Bytes after the first node are ignored.
    pub fn parse(&self, data: &[u8]) -> BerResult<Node> {
        self.parse_bytes(Bytes::copy_from_slice(data))
    }

    /// Parse one node, with value payloads sharing `data`
    pub fn parse_bytes(&self, data: Bytes) -> BerResult<Node> {
        self.parse_with_length(data).map(|(node, _)| node)
    }

    /// Parse one node and report how many bytes it occupied
    ///
    /// The consumed count covers the node as it appeared in the input, which
    /// can differ from [`Node::size`] when the input used a non-minimal or
    /// indefinite length.
    pub fn parse_with_length(&self, data: Bytes) -> BerResult<(Node, usize)> {
        self.parse_node(&data, 0, data.len(), 1).inspect_err(|e| {
            log::debug!("BER parse of {} bytes failed: {}", data.len(), e);
        })
    }

    /// Parse consecutive root nodes until the buffer is exhausted
    pub fn parse_all(&self, data: Bytes) -> BerResult<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let (node, consumed) = self.parse_node(&data, offset, data.len(), 1).inspect_err(|e| {
                log::debug!("BER parse of root at offset {} failed: {}", offset, e);
            })?;
            offset += consumed;
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Parse the node at `offset`, reading nothing at or beyond `end`
    ///
    /// `end` is the buffer length for a root node and the end of the
    /// enclosing region for a child.
    fn parse_node(
        &self,
        data: &Bytes,
        offset: usize,
        end: usize,
        depth: usize,
    ) -> BerResult<(Node, usize)> {
        if depth > self.options.max_depth {
            return Err(BerError::DepthLimitExceeded(self.options.max_depth));
        }

        let region = &data[..end];
        let octet = *region
            .get(offset)
            .ok_or_else(|| out_of_region(data.len(), end, offset, 1))?;
        let tag = BerTag::decompose(octet)?;
        let (length, length_octets) =
            decode_length(region, offset + 1).map_err(|e| match e {
                BerError::OutOfData { offset, length } => {
                    out_of_region(data.len(), end, offset, length)
                }
                other => other,
            })?;
        let data_start = offset + 1 + length_octets;

        match length {
            BerLength::Definite(data_length) => {
                let data_end = data_start
                    .checked_add(data_length)
                    .filter(|data_end| *data_end <= end)
                    .ok_or_else(|| out_of_region(data.len(), end, data_start, data_length))?;

                log::trace!("{} at offset {}, length {}", tag, offset, data_length);

                let node = if tag.tag_type().is_aggregate() {
                    let nodes = self.parse_children(data, data_start, data_end, depth)?;
                    SequenceNode::from_parts(tag.class(), tag.tag_type(), nodes).into()
                } else {
                    ValueNode::build(
                        tag.class(),
                        tag.tag_type(),
                        tag.encoding(),
                        data.slice(data_start..data_end),
                    )
                    .into()
                };
                Ok((node, data_end - offset))
            }
            BerLength::Indefinite => {
                if !tag.tag_type().is_aggregate() && !tag.is_constructed() {
                    return Err(BerError::InvalidValue(format!(
                        "Indefinite length on primitive {} at offset {}",
                        tag, offset
                    )));
                }

                log::trace!("{} at offset {}, indefinite length", tag, offset);

                let (nodes, data_end) =
                    self.parse_until_end_of_contents(data, data_start, end, depth)?;
                let node = if tag.tag_type().is_aggregate() {
                    SequenceNode::from_parts(tag.class(), tag.tag_type(), nodes).into()
                } else {
                    // Opaque constructed value: payload is the children
                    // re-encoded with definite lengths
                    let mut payload = BytesMut::new();
                    for child in &nodes {
                        encode_into(child, &mut payload);
                    }
                    ValueNode::build(tag.class(), tag.tag_type(), tag.encoding(), payload.freeze())
                        .into()
                };
                Ok((node, data_end - offset))
            }
        }
    }

    /// Parse the content `[start, end)` of a definite-length aggregate
    fn parse_children(
        &self,
        data: &Bytes,
        start: usize,
        end: usize,
        depth: usize,
    ) -> BerResult<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let (node, consumed) = self.parse_node(data, cursor, end, depth + 1)?;
            cursor += consumed;
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Parse children until a `0x00 0x00` marker, returning the offset after it
    fn parse_until_end_of_contents(
        &self,
        data: &Bytes,
        start: usize,
        end: usize,
        depth: usize,
    ) -> BerResult<(Vec<Node>, usize)> {
        let mut nodes = Vec::new();
        let mut cursor = start;
        loop {
            match data[..end].get(cursor..cursor + 2) {
                Some([0x00, 0x00]) => return Ok((nodes, cursor + 2)),
                Some(_) => {}
                None => return Err(out_of_region(data.len(), end, cursor, 2)),
            }
            let (node, consumed) = self.parse_node(data, cursor, end, depth + 1)?;
            cursor += consumed;
            nodes.push(node);
        }
    }
}

/// Error for `length` bytes at `offset` that do not fit before `end`
///
/// Running off the buffer is `OutOfData`; a read that fits the buffer but
/// crosses the enclosing node's end is `InvalidValue`.
fn out_of_region(buffer_len: usize, end: usize, offset: usize, length: usize) -> BerError {
    let fits_buffer = offset
        .checked_add(length)
        .is_some_and(|read_end| read_end <= buffer_len);
    if end < buffer_len && fits_buffer {
        BerError::InvalidValue(format!(
            "{} byte(s) at offset {} overrun the enclosing node ending at {}",
            length, offset, end
        ))
    } else {
        BerError::out_of_data(offset, length)
    }
}

/// Parse one node from the start of `data` with default options
pub fn parse(data: &[u8]) -> BerResult<Node> {
    Parser::new().parse(data)
}
