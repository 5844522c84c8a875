//! Read stream (decoder)
//!
//! Wraps one inbound message and a cursor. Construction consumes the array
//! envelope header; typed reads then walk the arguments in caller-known order.
//!
//! Every `read_*` takes a `validate` flag. When true the value's tag is read
//! and checked against the expected kind first; a mismatch fails with
//! `TypeMismatch` and leaves the cursor on the offending tag. When false only
//! the payload is read.
//!
//! No read ever consumes more bytes than remain: short buffers fail with
//! `OutOfRange`.

use crate::config::{BytePoolLength, CodecConfig};
use crate::error::{Result, WireError};

use super::types::{padded_len, VariantType};
use super::value::{Basis, Dictionary, Transform, Variant, Vector3};

/// Cursor over the bytes of a single inbound message
#[derive(Debug)]
pub struct ReadStream<'a> {
    data: &'a [u8],

    /// Offset of the next unread byte
    pos: usize,

    /// Envelope element count, the event code included
    count: usize,

    config: CodecConfig,
}

impl<'a> ReadStream<'a> {
    /// Open a message with the default configuration
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_config(data, &CodecConfig::default())
    }

    /// Open a message, consuming and validating the envelope header
    pub fn with_config(data: &'a [u8], config: &CodecConfig) -> Result<Self> {
        let mut stream = Self {
            data,
            pos: 0,
            count: 0,
            config: config.clone(),
        };
        // Envelope header: ARRAY tag + element count
        stream.expect_tag(VariantType::Array, true)?;
        stream.count = stream.read_len()?;

        tracing::trace!(count = stream.count, len = data.len(), "opened read stream");
        Ok(stream)
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Envelope element count, the event code included
    pub fn element_count(&self) -> usize {
        self.count
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// True once the cursor has reached the end of the message
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Tag of the next value, without consuming it
    pub fn peek_tag(&self) -> Result<u32> {
        let bytes = self.peek(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Advance past `n` bytes without parsing them
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read the envelope's event code (the first element)
    pub fn read_event_code(&mut self) -> Result<i32> {
        self.read_int(true)
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    pub fn read_bool(&mut self, validate: bool) -> Result<bool> {
        self.expect_tag(VariantType::Bool, validate)?;
        Ok(self.read_word()? != 0)
    }

    pub fn read_int(&mut self, validate: bool) -> Result<i32> {
        self.expect_tag(VariantType::Int, validate)?;
        self.read_word()
    }

    pub fn read_float(&mut self, validate: bool) -> Result<f32> {
        self.expect_tag(VariantType::Float, validate)?;
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a padded ASCII string.
    ///
    /// Non-ASCII content means the stream is misaligned and fails with
    /// `NonAscii`.
    pub fn read_string(&mut self, validate: bool) -> Result<String> {
        self.expect_tag(VariantType::String, validate)?;
        let len = self.read_len()?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        if !bytes.is_ascii() {
            return Err(WireError::NonAscii { offset });
        }
        let value = bytes.iter().map(|&b| char::from(b)).collect();

        // Skip zero padding up to the next word
        self.skip(padded_len(len) - len)?;
        Ok(value)
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn read_vector3(&mut self, validate: bool) -> Result<Vector3> {
        self.expect_tag(VariantType::Vector3, validate)?;
        self.ensure(12)?;
        Ok(Vector3::new(
            self.read_float(false)?,
            self.read_float(false)?,
            self.read_float(false)?,
        ))
    }

    /// Read a basis as three rows of x, y, z.
    pub fn read_basis(&mut self, validate: bool) -> Result<Basis> {
        self.expect_tag(VariantType::Basis, validate)?;
        self.ensure(36)?;
        Ok(Basis::from_rows(
            self.read_vector3(false)?,
            self.read_vector3(false)?,
            self.read_vector3(false)?,
        ))
    }

    /// Read a transform: basis, then origin.
    pub fn read_transform(&mut self, validate: bool) -> Result<Transform> {
        self.expect_tag(VariantType::Transform, validate)?;
        self.ensure(48)?;
        let basis = self.read_basis(false)?;
        let origin = self.read_vector3(false)?;
        Ok(Transform::new(basis, origin))
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Read a dictionary, decoding each entry with the supplied callbacks.
    ///
    /// Entries are returned in wire order.
    pub fn read_dictionary<K, V, FK, FV>(
        &mut self,
        mut read_key: FK,
        mut read_value: FV,
        validate: bool,
    ) -> Result<Vec<(K, V)>>
    where
        FK: FnMut(&mut Self) -> Result<K>,
        FV: FnMut(&mut Self) -> Result<V>,
    {
        self.expect_tag(VariantType::Dictionary, validate)?;
        let count = self.read_len()?;
        let mut entries = Vec::with_capacity(self.bounded_capacity(count));
        for _ in 0..count {
            let key = read_key(self)?;
            let value = read_value(self)?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// Read a sub-array of self-describing values.
    pub fn read_array(&mut self, validate: bool) -> Result<Vec<Variant>> {
        self.expect_tag(VariantType::Array, validate)?;
        self.read_array_items(0)
    }

    /// Read a raw byte blob.
    pub fn read_byte_array(&mut self, validate: bool) -> Result<Vec<u8>> {
        self.expect_tag(VariantType::ByteArray, validate)?;
        let declared = self.read_len()?;

        // Optionally drop the unaligned tail
        let len = match self.config.byte_array_length {
            BytePoolLength::Exact => declared,
            BytePoolLength::TruncateToWord => {
                let truncated = declared & !3;
                if truncated != declared {
                    tracing::warn!(
                        declared,
                        truncated,
                        offset = self.pos,
                        "truncating byte array to word boundary"
                    );
                }
                truncated
            }
        };
        Ok(self.take(len)?.to_vec())
    }

    // =========================================================================
    // Generic reads
    // =========================================================================

    /// Read the next self-describing value, whatever its kind.
    pub fn read_next(&mut self) -> Result<Variant> {
        self.read_value(0)
    }

    /// Drain every remaining value.
    ///
    /// Best effort: the first error stops the drain and whatever was decoded
    /// up to that point is returned. Use typed reads for strict decoding.
    pub fn read_all(&mut self) -> Vec<Variant> {
        let mut values = Vec::new();
        while !self.is_empty() {
            match self.read_next() {
                Ok(value) => values.push(value),
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        offset = self.pos,
                        decoded = values.len(),
                        "stopping drain early"
                    );
                    break;
                }
            }
        }
        values
    }

    fn read_value(&mut self, depth: usize) -> Result<Variant> {
        if depth > self.config.max_depth {
            return Err(WireError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        // Consume the tag, then read the payload untagged
        let ty = VariantType::try_from(self.peek_tag()?)?;
        self.skip(ty.header_width())?;

        let value = match ty {
            VariantType::Bool => Variant::Bool(self.read_bool(false)?),
            VariantType::Int => Variant::Int(self.read_int(false)?),
            VariantType::Float => Variant::Float(self.read_float(false)?),
            VariantType::String => Variant::String(self.read_string(false)?),
            VariantType::Vector3 => Variant::Vector3(self.read_vector3(false)?),
            VariantType::Basis => Variant::Basis(self.read_basis(false)?),
            VariantType::Transform => Variant::Transform(self.read_transform(false)?),
            VariantType::Dictionary => {
                let entries = self.read_dictionary(
                    |r| r.read_value(depth + 1),
                    |r| r.read_value(depth + 1),
                    false,
                )?;
                Variant::Dictionary(entries.into_iter().collect::<Dictionary>())
            }
            VariantType::Array => Variant::Array(self.read_array_items(depth)?),
            VariantType::ByteArray => Variant::ByteArray(self.read_byte_array(false)?),
        };
        Ok(value)
    }

    /// Count prefix plus that many nested values, every one kept.
    fn read_array_items(&mut self, depth: usize) -> Result<Vec<Variant>> {
        let count = self.read_len()?;
        let mut items = Vec::with_capacity(self.bounded_capacity(count));
        for _ in 0..count {
            items.push(self.read_value(depth + 1)?);
        }
        Ok(items)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Check and consume the expected tag. Nothing is consumed on mismatch.
    fn expect_tag(&mut self, expected: VariantType, validate: bool) -> Result<()> {
        if !validate {
            return Ok(());
        }
        let found = self.peek_tag()?;
        if found != expected.tag() {
            return Err(WireError::TypeMismatch { expected, found });
        }
        self.pos += expected.header_width();
        Ok(())
    }

    fn read_word(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Untagged 32-bit length or count prefix
    fn read_len(&mut self) -> Result<usize> {
        let raw = self.read_word()?;
        let len = usize::try_from(raw).map_err(|_| WireError::InvalidLength(i64::from(raw)))?;
        if len > self.config.max_collection_len {
            return Err(WireError::InvalidLength(i64::from(raw)));
        }
        Ok(len)
    }

    /// Preallocation hint that a hostile count cannot inflate
    fn bounded_capacity(&self, count: usize) -> usize {
        count.min(self.remaining() / 4)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        self.peek(n).map(|_| ())
    }

    fn peek(&self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(WireError::OutOfRange {
                requested: n,
                available,
                offset: self.pos,
            });
        }
        Ok(&self.data[self.pos..self.pos + n])
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }
}
