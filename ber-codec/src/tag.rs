//! Identifier octet codec
//!
//! A BER identifier octet packs three fields:
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//!
//! `CC` is the tag class, `P` the primitive/constructed flag and `TTTTT` the
//! tag number. Only the single-octet form (tag numbers 0-30) is handled; a
//! tag number of 31 announces the multi-octet form and is rejected.

use ber_core::{BerResult, Encoding, TagClass, TagType};
use std::fmt;

/// Mask selecting the tag number bits of an identifier octet
pub const TAG_NUMBER_MASK: u8 = 0x1F;

/// Decoded identifier octet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: TagClass,
    encoding: Encoding,
    tag_type: TagType,
}

impl BerTag {
    /// Create a tag from its three components
    ///
    /// The encoding is kept as given; the node constructors are where the
    /// forcing rule for scalar and aggregate types is applied.
    pub fn new(class: TagClass, encoding: Encoding, tag_type: TagType) -> Self {
        Self {
            class,
            encoding,
            tag_type,
        }
    }

    /// Create a Universal class tag
    pub fn universal(encoding: Encoding, tag_type: TagType) -> Self {
        Self::new(TagClass::Universal, encoding, tag_type)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn is_constructed(&self) -> bool {
        self.encoding.is_constructed()
    }

    /// Split an identifier octet into class, encoding bit and tag type
    ///
    /// # Errors
    /// Returns `InvalidValue` if the tag number bits do not name a known
    /// [`TagType`]. The class always decodes since its two bits have four
    /// valid values.
    pub fn decompose(octet: u8) -> BerResult<Self> {
        let tag_type = TagType::from_number(octet & TAG_NUMBER_MASK)?;
        Ok(Self::new(
            TagClass::from_bits(octet),
            Encoding::from_bits(octet),
            tag_type,
        ))
    }

    /// Pack the tag back into a single identifier octet
    pub fn compose(&self) -> u8 {
        self.class.to_bits() | self.encoding.to_bits() | self.tag_type.number()
    }

    /// Whether this is the end-of-contents marker's identifier (`0x00`)
    pub fn is_end_of_contents(&self) -> bool {
        self.compose() == 0x00
    }
}

impl fmt::Display for BerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.is_constructed() { "cons" } else { "prim" };
        write!(f, "[{} {}] {}", self.class, self.tag_type, form)
    }
}
