//! Protocol Module
//!
//! The typed variant wire format exchanged with game-server zone processes.
//!
//! ## Value Format
//! ```text
//! ┌──────────┬──────────────────────────────────────────┐
//! │ Tag (4)  │         Payload (multiple of 4)          │
//! └──────────┴──────────────────────────────────────────┘
//! ```
//!
//! All fields are little-endian. Every value starts on a 4-byte boundary
//! relative to the start of the message, except after a byte array whose
//! length is not a multiple of 4 (byte arrays are never padded).
//!
//! ### Tags
//! - 1:  BOOL            - 4-byte 0/1
//! - 2:  INT             - 4-byte signed
//! - 3:  FLOAT           - 4-byte IEEE-754
//! - 4:  STRING          - len (4) + ASCII + zero pad to 4
//! - 7:  VECTOR3         - float x 3
//! - 12: BASIS           - float x 9, row major
//! - 13: TRANSFORM       - basis + origin
//! - 18: DICTIONARY      - count (4) + (key, value) values
//! - 19: ARRAY           - count (4) + values
//! - 20: POOL_BYTE_ARRAY - len (4) + raw bytes

mod envelope;
mod reader;
mod types;
mod value;
mod writer;

pub use envelope::{read_message, write_message, Message, FRAME_HEADER_SIZE};
pub use reader::ReadStream;
pub use types::{header_width, padded_len, VariantType, HEADER_WIDTH};
pub use value::{Basis, Dictionary, Transform, Variant, Vector3};
pub use writer::WriteStream;
