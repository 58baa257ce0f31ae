//! BER (Basic Encoding Rules) TLV engine for ASN.1
//!
//! This crate parses and encodes BER data (ITU-T X.690) without an ASN.1
//! schema: it recovers the tag/length/value structure, not the meaning.
//!
//! # ASN.1 BER Encoding Overview
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! - **Tag**: class, primitive/constructed flag and tag number ([`tag`])
//! - **Length**: short, long or indefinite form ([`length`])
//! - **Value**: raw content octets, or the TLVs of child values
//!
//! # Modules
//!
//! - [`node`]: the `Value | Sequence` tree
//! - [`parser`]: bytes to tree, with a nesting depth limit
//! - [`encoder`]: tree to bytes, always definite length
//! - [`number`]: INTEGER and REAL content conventions
//! - [`text`]: hex and base64 adapters
//!
//! # Limitations
//!
//! - Only single-octet identifiers (tag numbers 0-30) are supported
//! - Indefinite length is accepted for constructed nodes only, and output
//!   always uses definite lengths

pub mod encoder;
pub mod length;
pub mod node;
pub mod number;
pub mod parser;
pub mod tag;
pub mod text;

pub use ber_core::{BerError, BerResult, Encoding, TagClass, TagType};
pub use encoder::{encode, encode_into, BerEncoder};
pub use length::{decode_length, encode_length, BerLength};
pub use node::{Node, SequenceNode, ValueNode};
pub use parser::{parse, ParseOptions, Parser, DEFAULT_MAX_DEPTH};
pub use tag::BerTag;
pub use text::{parse_base64, parse_hex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_serde_round_trip() {
        let node: Node = SequenceNode::sequence(vec![
            ValueNode::from(5i64).into(),
            ValueNode::universal(TagType::OctetString, vec![0xDE, 0xAD])
                .unwrap()
                .into(),
        ])
        .into();
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.size(), node.size());
    }

    #[test]
    fn test_node_deserialize_applies_forcing() {
        let json = r#"{"Value":{"tag_class":"Universal","tag_type":"Integer","encoding":"Constructed","data":[1]}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.encoding(), Encoding::Primitive);
        assert_eq!(&encode(&node)[..], &[0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_node_deserialize_rejects_aggregate_value() {
        let json = r#"{"Value":{"tag_class":"Universal","tag_type":"Sequence","encoding":"Primitive","data":[255]}}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }

    #[test]
    fn test_node_deserialize_rejects_scalar_container() {
        let json = r#"{"Sequence":{"tag_class":"Universal","tag_type":"Integer","nodes":[]}}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }

    #[test]
    fn test_known_certificate_fragment() {
        // AlgorithmIdentifier { sha1WithRSAEncryption, NULL }
        let data = [
            0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x05, 0x05,
            0x00,
        ];
        let node = parse(&data).unwrap();
        let sequence = node.as_sequence().unwrap();
        assert_eq!(sequence.nodes()[0].tag_type(), TagType::ObjectIdentifier);
        assert_eq!(sequence.nodes()[1].tag_type(), TagType::Null);
        assert_eq!(node.size(), data.len());
        assert_eq!(&encode(&node)[..], &data[..]);
    }
}
