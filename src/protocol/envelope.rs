//! Message envelope
//!
//! One RPC message: an array whose first element is the integer event code,
//! followed by the event's arguments.
//!
//! ```text
//! ┌───────────┬───────────────┬──────────┬───────────────┬──────────────┐
//! │ ARRAY (4) │ 1 + nargs (4) │ INT (4)  │ EventCode (4) │ Arg values...│
//! └───────────┴───────────────┴──────────┴───────────────┴──────────────┘
//! ```
//!
//! The framing helpers at the bottom prepend a little-endian `u32` byte length
//! so messages can be written back to back to a file or pipe.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::config::CodecConfig;
use crate::error::{Result, WireError};

use super::reader::ReadStream;
use super::value::Variant;
use super::writer::WriteStream;

/// Length prefix width used by the stream helpers
pub const FRAME_HEADER_SIZE: usize = 4;

/// A decoded RPC message
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Message {
    /// Event code, the first envelope element
    pub event_code: i32,

    /// Typed arguments in wire order
    pub args: Vec<Variant>,
}

impl Message {
    pub fn new(event_code: i32) -> Self {
        Self {
            event_code,
            args: Vec::new(),
        }
    }

    /// Append an argument
    pub fn with_arg(mut self, arg: impl Into<Variant>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Envelope element count: the event code plus every argument
    pub fn element_count(&self) -> usize {
        1 + self.args.len()
    }

    /// Encode to wire bytes
    pub fn encode(&self, config: &CodecConfig) -> Result<Bytes> {
        let mut stream = WriteStream::with_config(self.element_count(), self.event_code, config)?;
        for arg in &self.args {
            stream.write_variant(arg)?;
        }
        Ok(stream.into_bytes())
    }

    /// Strictly decode wire bytes.
    ///
    /// Exactly `count - 1` arguments are read after the event code. Any
    /// decode error rejects the whole message.
    pub fn decode(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let mut stream = ReadStream::with_config(bytes, config)?;
        let count = stream.element_count();
        if count == 0 {
            return Err(WireError::InvalidLength(0));
        }

        // Event code, then the remaining elements as arguments
        let event_code = stream.read_event_code()?;
        let args = (1..count)
            .map(|_| stream.read_next())
            .collect::<Result<Vec<_>>>()?;

        if !stream.is_empty() {
            tracing::debug!(
                event_code,
                trailing = stream.remaining(),
                "message has bytes past its last argument"
            );
        }

        Ok(Self { event_code, args })
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write one length-prefixed message to a stream
pub fn write_message<W: Write>(writer: &mut W, message: &Message, config: &CodecConfig) -> Result<()> {
    let bytes = message.encode(config)?;
    let len = u32::try_from(bytes.len()).map_err(|_| WireError::InvalidLength(bytes.len() as i64))?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed message from a stream
///
/// Blocks until a complete message is received or an error occurs
pub fn read_message<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<Message> {
    // Read header first
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header)?;

    // Validate message length
    let len = u32::from_le_bytes(header) as usize;
    let limit = config.max_collection_len.max(config.write_capacity);
    if len > limit {
        return Err(WireError::InvalidLength(len as i64));
    }

    // Read message bytes
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;

    Message::decode(&payload, config)
}
