//! Hex and base64 text adapters
//!
//! Thin wrappers converting text to bytes before handing them to the parser,
//! and formatting encoded nodes back to text. Malformed text is rejected with
//! `InvalidValue` before any BER parsing happens.

use crate::encoder::encode;
use crate::node::{Node, ValueNode};
use crate::parser::Parser;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ber_core::{BerError, BerResult, Encoding, TagClass, TagType};
use bytes::Bytes;

/// Decode a hex string (either case, no separators)
///
/// # Errors
/// Returns `InvalidValue` for odd-length strings or non-hex characters.
pub fn decode_hex(text: &str) -> BerResult<Vec<u8>> {
    hex::decode(text).map_err(|e| BerError::InvalidValue(format!("Invalid hex string: {}", e)))
}

/// Decode a standard-alphabet, padded base64 string
pub fn decode_base64(text: &str) -> BerResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| BerError::InvalidValue(format!("Invalid base64 string: {}", e)))
}

/// Parse one node from a hex string
pub fn parse_hex(text: &str) -> BerResult<Node> {
    Parser::new().parse_bytes(Bytes::from(decode_hex(text)?))
}

/// Parse one node from a base64 string
pub fn parse_base64(text: &str) -> BerResult<Node> {
    Parser::new().parse_bytes(Bytes::from(decode_base64(text)?))
}

impl Node {
    /// Lowercase hex of the node's encoding
    pub fn to_hex(&self) -> String {
        hex::encode(encode(self))
    }

    /// Padded base64 of the node's encoding
    pub fn to_base64(&self) -> String {
        STANDARD.encode(encode(self))
    }
}

impl ValueNode {
    /// Create a value node whose payload is given as hex
    ///
    /// # Errors
    /// Returns `InvalidValue` for malformed hex or an aggregate tag type.
    pub fn from_hex(
        tag_class: TagClass,
        tag_type: TagType,
        encoding: Encoding,
        text: &str,
    ) -> BerResult<Self> {
        ValueNode::new(tag_class, tag_type, encoding, decode_hex(text)?)
    }

    /// Lowercase hex of the payload alone
    pub fn data_hex(&self) -> String {
        hex::encode(self.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SequenceNode;
    use crate::parser::parse;

    // PKCS#7 SignedData with indefinite-length containers
    const PKCS7_SAMPLE: &str = "MIAGCSqGSIb3DQEHAqCAMIACAQExCzAJBgUrDgMCGgUAMIAGCSqGSIb3DQEHAQAAoIAwggHvMIIBWKADAgECAhAvoXazbunwSfREtACZZhlFMA0GCSqGSIb3DQEBBQUAMAwxCjAIBgNVBAMMAWEwHhcNMDgxMDE1MTUwMzQxWhcNMDkxMDE1MTUwMzQxWjAMMQowCAYDVQQDDAFhMIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQCJUwlwhu5hR8X01f+vG0mKPRHsVRjpZNxSEmsmFPdDiD9kylE3ertTDf0gRkpIvWfNJ+eymuxoXF0Qgl5gXAVuSrjupGD6J+VapixJiwLXJHokmDihLs3zfGARz08O3qnO5ofBy0pRxq5isu/bAAcjoByZ1sI/g0iAuotC1UFObwIDAQABo1IwUDAOBgNVHQ8BAf8EBAMCBPAwHQYDVR0OBBYEFEIGXQB4h+04Z3y/n7Nv94+CqPitMB8GA1UdIwQYMBaAFEIGXQB4h+04Z3y/n7Nv94+CqPitMA0GCSqGSIb3DQEBBQUAA4GBAE0G7tAiaacJxvP3fhEj+yP9VDxL0omrRRAEaMXwWaBf/Ggk1T/u+8/CDAdjuGNCiF6ctooKc8u8KpnZJsGqnpGQ4n6L2KjTtRUDh+hija0eJRBFdirPQe2HAebQGFnmOk6Mn7KiQfBIsOzXim/bFqaBSbf06bLTQNwFouSO+jwOAAAxggElMIIBIQIBATAgMAwxCjAIBgNVBAMMAWECEC+hdrNu6fBJ9ES0AJlmGUUwCQYFKw4DAhoFAKBdMBgGCSqGSIb3DQEJAzELBgkqhkiG9w0BBwEwHAYJKoZIhvcNAQkFMQ8XDTA4MTAxNTE1MDM0M1owIwYJKoZIhvcNAQkEMRYEFAAAAAAAAAAAAAAAAAAAAAAAAAAAMA0GCSqGSIb3DQEBAQUABIGAdB7ShyMGf5lVdZtvwKlnYLHMUqJWuBnFk7aQwHAmg3JnH6OcgId2F+xfg6twXm8hhUBkhHPlHGoWa5kQtN9n8rz3NorzvcM/1Xv9+0Eal7NYSn2Hb0C0DMj2XNIYH2C6CLIHkmy1egzUvzsomZPTkx5nGDWm+8WHCjWb9A6lyrMAAAAAAAA=";

    #[test]
    fn test_parse_hex() {
        let node = parse_hex("3006020101020102").unwrap();
        let sequence = node.as_sequence().unwrap();
        assert_eq!(sequence.len(), 2);
        assert_eq!(node.to_hex(), "3006020101020102");
    }

    #[test]
    fn test_parse_hex_uppercase() {
        let node = parse_hex("04020AFF").unwrap();
        assert_eq!(node.as_value().unwrap().data(), &[0x0A, 0xFF]);
        assert_eq!(node.to_hex(), "04020aff");
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(matches!(parse_hex("300"), Err(BerError::InvalidValue(_))));
        assert!(matches!(parse_hex("30zz"), Err(BerError::InvalidValue(_))));
        assert!(matches!(
            ValueNode::from_hex(TagClass::Universal, TagType::Integer, Encoding::Primitive, "0g"),
            Err(BerError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_truncated_hex_reaches_parser() {
        assert_eq!(parse_hex("02"), Err(BerError::out_of_data(1, 1)));
    }

    #[test]
    fn test_base64_round_trip() {
        let node: Node = SequenceNode::sequence(vec![
            ValueNode::from(42i64).into(),
            ValueNode::universal(TagType::Utf8String, b"hello".to_vec())
                .unwrap()
                .into(),
        ])
        .into();
        let text = node.to_base64();
        assert_eq!(text, "MAoCASoMBWhlbGxv");
        assert_eq!(parse_base64(&text).unwrap(), node);
    }

    #[test]
    fn test_bad_base64_rejected() {
        assert!(matches!(parse_base64("MA=!"), Err(BerError::InvalidValue(_))));
    }

    #[test]
    fn test_value_from_hex() {
        let value =
            ValueNode::from_hex(TagClass::Universal, TagType::Integer, Encoding::Primitive, "00FF")
                .unwrap();
        assert_eq!(value.to_i64().unwrap(), 255);
        assert_eq!(value.data_hex(), "00ff");
    }

    #[test]
    fn test_pkcs7_sample() {
        let bytes = decode_base64(PKCS7_SAMPLE).unwrap();
        let (node, consumed) = Parser::new()
            .parse_with_length(Bytes::from(bytes.clone()))
            .unwrap();

        assert_eq!(consumed, bytes.len());

        let content_info = node.as_sequence().unwrap();
        assert_eq!(content_info.len(), 2);
        let oid = content_info.nodes()[0].as_value().unwrap();
        assert_eq!(oid.tag_type(), TagType::ObjectIdentifier);
        assert_eq!(oid.data_hex(), "2a864886f70d010702");

        // [0] EXPLICIT wrapper has tag number 0, kept as an opaque value
        // holding its content re-encoded with definite lengths
        let wrapper = content_info.nodes()[1].as_value().unwrap();
        assert_eq!(wrapper.tag_class(), TagClass::ContextSpecific);
        assert_eq!(wrapper.tag_type(), TagType::EndOfContent);
        let signed_data = parse(wrapper.data()).unwrap();
        assert_eq!(signed_data.size(), wrapper.data().len());

        // Definite-length re-encoding parses back to the same tree
        let reencoded = parse_base64(&node.to_base64()).unwrap();
        assert_eq!(reencoded, node);
    }
}
