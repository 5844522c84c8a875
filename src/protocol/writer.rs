//! Write stream (encoder)
//!
//! Builds one outbound message: the array envelope header followed by the
//! event's arguments, each written with its own primitive.
//!
//! ```text
//! ┌───────────┬───────────┬───────────┬──────────────┬──────────────┐
//! │ ARRAY (4) │ Count (4) │ INT (4)   │ EventCode(4) │  Args ...    │
//! └───────────┴───────────┴───────────┴──────────────┴──────────────┘
//! ```
//!
//! Every `write_*` takes an `encode_tag` flag. When false only the payload is
//! written, which is how composites write their float components.

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{BufferPolicy, CodecConfig};
use crate::error::{Result, WireError};

use super::types::{padded_len, VariantType};
use super::value::{Basis, Transform, Variant, Vector3};

/// Accumulates the bytes of a single outbound message
#[derive(Debug)]
pub struct WriteStream {
    /// Encoded bytes so far
    buf: BytesMut,

    /// Hard limit under `BufferPolicy::Fixed`
    capacity: usize,

    policy: BufferPolicy,
}

impl WriteStream {
    /// Open a message envelope with the default configuration.
    ///
    /// `count` is the envelope element count, the event code included.
    pub fn new(count: usize, event_code: i32) -> Result<Self> {
        Self::with_config(count, event_code, &CodecConfig::default())
    }

    /// Open a message envelope
    pub fn with_config(count: usize, event_code: i32, config: &CodecConfig) -> Result<Self> {
        tracing::trace!(event_code, count, "opening write stream");

        let mut stream = Self {
            buf: BytesMut::with_capacity(config.write_capacity),
            capacity: config.write_capacity,
            policy: config.buffer_policy,
        };
        stream.write_tag(VariantType::Array)?;
        stream.write_len(count)?;
        stream.write_int(event_code, true)?;
        Ok(stream)
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    pub fn write_bool(&mut self, value: bool, encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 4)?;
        if encode_tag {
            self.buf.put_u32_le(VariantType::Bool.tag());
        }
        self.buf.put_i32_le(i32::from(value));
        Ok(())
    }

    pub fn write_int(&mut self, value: i32, encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 4)?;
        if encode_tag {
            self.buf.put_u32_le(VariantType::Int.tag());
        }
        self.buf.put_i32_le(value);
        Ok(())
    }

    pub fn write_float(&mut self, value: f32, encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 4)?;
        if encode_tag {
            self.buf.put_u32_le(VariantType::Float.tag());
        }
        self.buf.put_f32_le(value);
        Ok(())
    }

    /// Write an ASCII string: length, bytes, then zero padding to a word.
    pub fn write_string(&mut self, value: &str, encode_tag: bool) -> Result<()> {
        if !value.is_ascii() {
            return Err(WireError::NonAscii {
                offset: self.position(),
            });
        }

        let padded = padded_len(value.len());
        self.reserve_value(encode_tag, 4 + padded)?;
        if encode_tag {
            self.buf.put_u32_le(VariantType::String.tag());
        }
        self.write_len(value.len())?;
        self.buf.put_slice(value.as_bytes());
        self.buf.put_bytes(0, padded - value.len());
        Ok(())
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn write_vector3(&mut self, value: Vector3, encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 12)?;
        if encode_tag {
            self.write_tag(VariantType::Vector3)?;
        }
        for component in value.to_array() {
            self.write_float(component, false)?;
        }
        Ok(())
    }

    /// Write a basis as three rows of x, y, z.
    pub fn write_basis(&mut self, value: &Basis, encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 36)?;
        if encode_tag {
            self.write_tag(VariantType::Basis)?;
        }
        for row in value.rows {
            self.write_vector3(row, false)?;
        }
        Ok(())
    }

    /// Write a transform: basis, then origin.
    pub fn write_transform(&mut self, value: &Transform, encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 48)?;
        if encode_tag {
            self.write_tag(VariantType::Transform)?;
        }
        self.write_basis(&value.basis, false)?;
        self.write_vector3(value.origin, false)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Write a dictionary, encoding each entry with the supplied callbacks.
    ///
    /// Entries are written in iteration order. On error nothing of the
    /// dictionary is left in the buffer.
    pub fn write_dictionary<I, K, V, FK, FV>(
        &mut self,
        entries: I,
        mut write_key: FK,
        mut write_value: FV,
        encode_tag: bool,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
        FK: FnMut(&mut Self, K) -> Result<()>,
        FV: FnMut(&mut Self, V) -> Result<()>,
    {
        let entries = entries.into_iter();
        self.write_whole(|w| {
            if encode_tag {
                w.write_tag(VariantType::Dictionary)?;
            }
            w.write_len(entries.len())?;
            for (key, value) in entries {
                write_key(w, key)?;
                write_value(w, value)?;
            }
            Ok(())
        })
    }

    /// Write a sub-array of self-describing values.
    ///
    /// On error nothing of the array is left in the buffer.
    pub fn write_array(&mut self, items: &[Variant], encode_tag: bool) -> Result<()> {
        self.write_whole(|w| {
            if encode_tag {
                w.write_tag(VariantType::Array)?;
            }
            w.write_len(items.len())?;
            items.iter().try_for_each(|item| w.write_variant(item))
        })
    }

    /// Write a raw byte blob. Byte arrays are never padded.
    pub fn write_byte_array(&mut self, bytes: &[u8], encode_tag: bool) -> Result<()> {
        self.reserve_value(encode_tag, 4 + bytes.len())?;
        if encode_tag {
            self.buf.put_u32_le(VariantType::ByteArray.tag());
        }
        self.write_len(bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Write any value with its tag.
    pub fn write_variant(&mut self, value: &Variant) -> Result<()> {
        match value {
            Variant::Bool(v) => self.write_bool(*v, true),
            Variant::Int(v) => self.write_int(*v, true),
            Variant::Float(v) => self.write_float(*v, true),
            Variant::String(v) => self.write_string(v, true),
            Variant::Vector3(v) => self.write_vector3(*v, true),
            Variant::Basis(v) => self.write_basis(v, true),
            Variant::Transform(v) => self.write_transform(v, true),
            Variant::Dictionary(dict) => self.write_dictionary(
                dict.iter(),
                |w, key| w.write_variant(key),
                |w, value| w.write_variant(value),
                true,
            ),
            Variant::Array(items) => self.write_array(items, true),
            Variant::ByteArray(bytes) => self.write_byte_array(bytes, true),
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// The bytes written so far
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Finish the message
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Run a multi-part write, dropping its bytes if any part fails
    fn write_whole<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let start = self.buf.len();
        let result = write(self);
        if result.is_err() {
            self.buf.truncate(start);
        }
        result
    }

    fn write_tag(&mut self, ty: VariantType) -> Result<()> {
        self.reserve(4)?;
        self.buf.put_u32_le(ty.tag());
        Ok(())
    }

    /// Untagged 32-bit length or count prefix
    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| WireError::InvalidLength(len as i64))?;
        self.write_int(len, false)
    }

    fn reserve_value(&mut self, encode_tag: bool, payload: usize) -> Result<()> {
        self.reserve(if encode_tag { 4 + payload } else { payload })
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let requested = self.buf.len() + additional;
        if self.policy == BufferPolicy::Fixed && requested > self.capacity {
            return Err(WireError::CapacityExceeded {
                requested,
                capacity: self.capacity,
            });
        }
        self.buf.reserve(additional);
        Ok(())
    }
}
