//! # zonewire
//!
//! Typed variant binary codec for RPC messages exchanged with game-server
//! zone processes:
//! - Self-describing, tag-prefixed values aligned to 4 bytes
//! - Array envelopes carrying an event code plus typed arguments
//! - Strict field-by-field decoding with a best-effort drain for diagnostics
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Zone / session layer (caller)                 │
//! │            socket I/O, event-code dispatch table             │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ outbound                     │ inbound
//!                ▼                              ▼
//!         ┌─────────────┐               ┌─────────────┐
//!         │ WriteStream │               │ ReadStream  │
//!         │  (encoder)  │               │  (decoder)  │
//!         └──────┬──────┘               └──────┬──────┘
//!                │                             │
//!                └──────────────┬──────────────┘
//!                               ▼
//!                       ┌───────────────┐
//!                       │  VariantType  │
//!                       │ padding table │
//!                       └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use zonewire::protocol::{ReadStream, WriteStream};
//!
//! let mut writer = WriteStream::new(2, 7).unwrap();
//! writer.write_int(99, true).unwrap();
//! let bytes = writer.into_bytes();
//!
//! let mut reader = ReadStream::new(&bytes).unwrap();
//! assert_eq!(reader.element_count(), 2);
//! assert_eq!(reader.read_event_code().unwrap(), 7);
//! assert_eq!(reader.read_int(true).unwrap(), 99);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{BufferPolicy, BytePoolLength, CodecConfig};
pub use error::{Result, WireError};
pub use protocol::{Message, ReadStream, Variant, VariantType, WriteStream};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of zonewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
