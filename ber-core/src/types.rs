//! Tag class, tag type and encoding enums shared by the codec

use crate::error::{BerError, BerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
///
/// The class lives in bits 8-7 of the identifier octet, so the four
/// variants cover every possible bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagClass {
    /// Universal class (00)
    #[default]
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from an identifier octet (bits 8-7)
    pub fn from_bits(octet: u8) -> Self {
        match (octet >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class to its identifier octet bits
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT",
            TagClass::Private => "PRIVATE",
        };
        f.write_str(name)
    }
}

/// Primitive or constructed content (bit 6 of the identifier octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Primitive = 0,
    Constructed = 1,
}

impl Encoding {
    /// Get encoding from an identifier octet (bit 6)
    pub fn from_bits(octet: u8) -> Self {
        if octet & 0x20 != 0 {
            Encoding::Constructed
        } else {
            Encoding::Primitive
        }
    }

    /// Convert encoding to its identifier octet bit
    pub fn to_bits(self) -> u8 {
        (self as u8) << 5
    }

    pub fn is_constructed(self) -> bool {
        self == Encoding::Constructed
    }
}

/// Universal tag numbers 0-30 as registered in ITU-T X.680 / X.690
///
/// Number 31 is the high-tag-number escape and has no variant here; the
/// codec only handles single-octet identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagType {
    EndOfContent = 0,
    Boolean = 1,
    #[default]
    Integer = 2,
    BitString = 3,
    OctetString = 4,
    Null = 5,
    ObjectIdentifier = 6,
    ObjectDescriptor = 7,
    External = 8,
    Real = 9,
    Enumerated = 10,
    EmbeddedPdv = 11,
    Utf8String = 12,
    RelativeOid = 13,
    Reserved14 = 14,
    Reserved15 = 15,
    Sequence = 16,
    Set = 17,
    NumericString = 18,
    PrintableString = 19,
    T61String = 20,
    VideotexString = 21,
    Ia5String = 22,
    UtcTime = 23,
    GeneralizedTime = 24,
    GraphicString = 25,
    VisibleString = 26,
    GeneralString = 27,
    UniversalString = 28,
    CharacterString = 29,
    BmpString = 30,
}

impl TagType {
    /// Look up a tag type by its 5-bit tag number
    ///
    /// # Errors
    /// Returns `InvalidValue` for numbers outside 0-30.
    pub fn from_number(number: u8) -> BerResult<Self> {
        let tag_type = match number {
            0 => TagType::EndOfContent,
            1 => TagType::Boolean,
            2 => TagType::Integer,
            3 => TagType::BitString,
            4 => TagType::OctetString,
            5 => TagType::Null,
            6 => TagType::ObjectIdentifier,
            7 => TagType::ObjectDescriptor,
            8 => TagType::External,
            9 => TagType::Real,
            10 => TagType::Enumerated,
            11 => TagType::EmbeddedPdv,
            12 => TagType::Utf8String,
            13 => TagType::RelativeOid,
            14 => TagType::Reserved14,
            15 => TagType::Reserved15,
            16 => TagType::Sequence,
            17 => TagType::Set,
            18 => TagType::NumericString,
            19 => TagType::PrintableString,
            20 => TagType::T61String,
            21 => TagType::VideotexString,
            22 => TagType::Ia5String,
            23 => TagType::UtcTime,
            24 => TagType::GeneralizedTime,
            25 => TagType::GraphicString,
            26 => TagType::VisibleString,
            27 => TagType::GeneralString,
            28 => TagType::UniversalString,
            29 => TagType::CharacterString,
            30 => TagType::BmpString,
            _ => {
                return Err(BerError::InvalidValue(format!(
                    "Unsupported tag number: {}",
                    number
                )));
            }
        };
        Ok(tag_type)
    }

    /// Get the 5-bit tag number
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Whether the parser treats this type as a container of child nodes
    ///
    /// Only SEQUENCE, SET, EXTERNAL and EMBEDDED PDV qualify.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            TagType::External | TagType::EmbeddedPdv | TagType::Sequence | TagType::Set
        )
    }

    /// The encoding every node of this type must carry, if fixed
    ///
    /// Scalar types are always primitive and aggregate types always
    /// constructed; string-like types may use either and return `None`.
    pub fn forced_encoding(self) -> Option<Encoding> {
        match self {
            TagType::EndOfContent
            | TagType::Boolean
            | TagType::Integer
            | TagType::Null
            | TagType::ObjectIdentifier
            | TagType::Real
            | TagType::Enumerated
            | TagType::RelativeOid => Some(Encoding::Primitive),
            TagType::External | TagType::EmbeddedPdv | TagType::Sequence | TagType::Set => {
                Some(Encoding::Constructed)
            }
            _ => None,
        }
    }

    /// Apply the forcing rule to a requested encoding
    pub fn effective_encoding(self, requested: Encoding) -> Encoding {
        self.forced_encoding().unwrap_or(requested)
    }
}

impl TryFrom<u8> for TagType {
    type Error = BerError;

    fn try_from(number: u8) -> BerResult<Self> {
        Self::from_number(number)
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagType::EndOfContent => "END-OF-CONTENT",
            TagType::Boolean => "BOOLEAN",
            TagType::Integer => "INTEGER",
            TagType::BitString => "BIT STRING",
            TagType::OctetString => "OCTET STRING",
            TagType::Null => "NULL",
            TagType::ObjectIdentifier => "OBJECT IDENTIFIER",
            TagType::ObjectDescriptor => "ObjectDescriptor",
            TagType::External => "EXTERNAL",
            TagType::Real => "REAL",
            TagType::Enumerated => "ENUMERATED",
            TagType::EmbeddedPdv => "EMBEDDED PDV",
            TagType::Utf8String => "UTF8String",
            TagType::RelativeOid => "RELATIVE-OID",
            TagType::Reserved14 => "RESERVED(14)",
            TagType::Reserved15 => "RESERVED(15)",
            TagType::Sequence => "SEQUENCE",
            TagType::Set => "SET",
            TagType::NumericString => "NumericString",
            TagType::PrintableString => "PrintableString",
            TagType::T61String => "T61String",
            TagType::VideotexString => "VideotexString",
            TagType::Ia5String => "IA5String",
            TagType::UtcTime => "UTCTime",
            TagType::GeneralizedTime => "GeneralizedTime",
            TagType::GraphicString => "GraphicString",
            TagType::VisibleString => "VisibleString",
            TagType::GeneralString => "GeneralString",
            TagType::UniversalString => "UniversalString",
            TagType::CharacterString => "CHARACTER STRING",
            TagType::BmpString => "BMPString",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_class_bits() {
        assert_eq!(TagClass::from_bits(0x30), TagClass::Universal);
        assert_eq!(TagClass::from_bits(0x60), TagClass::Application);
        assert_eq!(TagClass::from_bits(0xA0), TagClass::ContextSpecific);
        assert_eq!(TagClass::from_bits(0xC2), TagClass::Private);
        assert_eq!(TagClass::ContextSpecific.to_bits(), 0x80);
    }

    #[test]
    fn test_tag_type_numbers() {
        for number in 0..=30u8 {
            let tag_type = TagType::from_number(number).unwrap();
            assert_eq!(tag_type.number(), number);
        }
        assert!(matches!(
            TagType::from_number(31),
            Err(BerError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_forced_encoding() {
        assert_eq!(
            TagType::Integer.effective_encoding(Encoding::Constructed),
            Encoding::Primitive
        );
        assert_eq!(
            TagType::Set.effective_encoding(Encoding::Primitive),
            Encoding::Constructed
        );
        assert_eq!(
            TagType::OctetString.effective_encoding(Encoding::Constructed),
            Encoding::Constructed
        );
        assert_eq!(TagType::EndOfContent.forced_encoding(), Some(Encoding::Primitive));
        assert!(!TagType::EndOfContent.is_aggregate());
    }
}
