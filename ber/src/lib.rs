//! Schema-agnostic ASN.1 BER decoder and encoder
//!
//! Parses BER (ITU-T X.690) data into a tree of tagged nodes and encodes
//! such trees back to bytes.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ber-core`: error type and the tag class / tag type / encoding enums
//! - `ber-codec`: tag and length codecs, node tree, parser, encoder,
//!   INTEGER/REAL helpers and hex/base64 adapters
//!
//! # Usage
//!
//! ```
//! use ber::{encode, parse, SequenceNode, ValueNode, Node};
//!
//! let node: Node = SequenceNode::sequence(vec![
//!     ValueNode::from(1i64).into(),
//!     ValueNode::from(2i64).into(),
//! ])
//! .into();
//!
//! let bytes = encode(&node);
//! assert_eq!(bytes, [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
//! assert_eq!(parse(&bytes).unwrap(), node);
//! ```
//!
//! # Logging
//!
//! Parse and encode steps are reported through the `log` facade at trace
//! level, parse failures at debug level. Nothing is emitted unless the
//! application installs a logger.

// Re-export core types
pub use ber_core::{BerError, BerResult, Encoding, TagClass, TagType};

pub use ber_codec::{
    BerEncoder, BerLength, BerTag, DEFAULT_MAX_DEPTH, Node, ParseOptions, Parser, SequenceNode,
    ValueNode, parse_base64, parse_hex,
};

// Re-export codec building blocks
pub mod codec {
    pub use ber_codec::{encoder, length, number, parser, tag, text};
}

/// Parse one BER node from the start of `data`
///
/// Trailing bytes after the first node are not inspected.
pub fn parse(data: &[u8]) -> BerResult<Node> {
    ber_codec::parse(data)
}

/// Encode a node tree; the result is exactly `node.size()` bytes long
pub fn encode(node: &Node) -> Vec<u8> {
    ber_codec::encode(node).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(value: u8) -> Node {
        ValueNode::universal(TagType::Integer, vec![value])
            .unwrap()
            .into()
    }

    #[test]
    fn test_scalar_scenario() {
        assert_eq!(encode(&integer(0x01)), vec![0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_empty_aggregate_scenario() {
        let node: Node = SequenceNode::sequence(vec![]).into();
        assert_eq!(encode(&node), vec![0x30, 0x00]);
    }

    #[test]
    fn test_nested_scenario() {
        let data = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let node: Node = SequenceNode::sequence(vec![integer(0x01), integer(0x02)]).into();
        assert_eq!(encode(&node), data);

        let parsed = parse(&data).unwrap();
        assert_eq!(parsed, node);
        let sequence = parsed.as_sequence().unwrap();
        assert!(sequence.iter().all(|child| child.size() == 3));
    }

    #[test]
    fn test_length_boundaries() {
        for (len, expected) in [
            (127usize, vec![0x7F]),
            (128, vec![0x81, 0x80]),
            (256, vec![0x82, 0x01, 0x00]),
        ] {
            let node: Node = ValueNode::universal(TagType::OctetString, vec![0; len])
                .unwrap()
                .into();
            let encoded = encode(&node);
            assert_eq!(&encoded[1..1 + expected.len()], &expected[..]);
            assert_eq!(encoded.len(), node.size());
            assert_eq!(parse(&encoded).unwrap(), node);
        }
    }

    #[test]
    fn test_truncation() {
        assert_eq!(parse(&[0x02]), Err(BerError::OutOfData { offset: 1, length: 1 }));
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(parse(&[0x1F, 0x00]), Err(BerError::InvalidValue(_))));
    }

    #[test]
    fn test_depth_limit_configurable() {
        let data = [0x30, 0x04, 0x30, 0x02, 0x05, 0x00];
        let parser = Parser::with_options(ParseOptions::new().with_max_depth(2));
        assert_eq!(parser.parse(&data), Err(BerError::DepthLimitExceeded(2)));
        assert!(parse(&data).is_ok());
    }

    #[test]
    fn test_text_adapters() {
        let node = parse_hex("3006020101020102").unwrap();
        assert_eq!(parse_base64(&node.to_base64()).unwrap(), node);
    }
}
