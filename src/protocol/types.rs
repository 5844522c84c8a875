//! Type tags and the padding table
//!
//! The closed set of wire type tags and the width of the tag header each one
//! occupies on the wire.

use std::fmt;

use crate::error::{Result, WireError};

/// Width of every tag header, and the alignment of every value
pub const HEADER_WIDTH: usize = 4;

/// Wire type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum VariantType {
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    Vector3 = 7,
    Basis = 12,
    Transform = 13,
    Dictionary = 18,
    Array = 19,
    ByteArray = 20,
}

impl VariantType {
    /// The tag value written on the wire
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Upper-case name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            VariantType::Bool => "BOOL",
            VariantType::Int => "INT",
            VariantType::Float => "FLOAT",
            VariantType::String => "STRING",
            VariantType::Vector3 => "VECTOR3",
            VariantType::Basis => "BASIS",
            VariantType::Transform => "TRANSFORM",
            VariantType::Dictionary => "DICTIONARY",
            VariantType::Array => "ARRAY",
            VariantType::ByteArray => "POOL_BYTE_ARRAY",
        }
    }

    /// Width of this tag's header marker
    pub fn header_width(self) -> usize {
        HEADER_WIDTH
    }
}

impl TryFrom<u32> for VariantType {
    type Error = WireError;

    fn try_from(tag: u32) -> Result<Self> {
        match tag {
            1 => Ok(VariantType::Bool),
            2 => Ok(VariantType::Int),
            3 => Ok(VariantType::Float),
            4 => Ok(VariantType::String),
            7 => Ok(VariantType::Vector3),
            12 => Ok(VariantType::Basis),
            13 => Ok(VariantType::Transform),
            18 => Ok(VariantType::Dictionary),
            19 => Ok(VariantType::Array),
            20 => Ok(VariantType::ByteArray),
            other => Err(WireError::UnsupportedType(other)),
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the header width for a raw tag.
///
/// Fails with `UnsupportedType` for tags outside the enumeration.
pub fn header_width(tag: u32) -> Result<usize> {
    VariantType::try_from(tag).map(VariantType::header_width)
}

/// Round `len` up to the next multiple of [`HEADER_WIDTH`]
pub fn padded_len(len: usize) -> usize {
    (len + HEADER_WIDTH - 1) & !(HEADER_WIDTH - 1)
}
