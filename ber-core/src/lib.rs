//! Core types for the BER TLV engine
//!
//! This crate provides the error type and the tag vocabulary (class, type,
//! primitive/constructed encoding) used throughout the BER implementation.

pub mod error;
pub mod types;

pub use error::{BerError, BerResult};
pub use types::{Encoding, TagClass, TagType};
