//! Configuration for zonewire
//!
//! Centralized codec configuration with sensible defaults.

/// Codec configuration shared by write and read streams
#[derive(Debug, Clone)]
pub struct CodecConfig {
    // -------------------------------------------------------------------------
    // Write Configuration
    // -------------------------------------------------------------------------
    /// Initial size of the write buffer (in bytes). Under
    /// [`BufferPolicy::Fixed`] this is also the hard message size limit.
    pub write_capacity: usize,

    /// What a write stream does when a message outgrows `write_capacity`
    pub buffer_policy: BufferPolicy,

    // -------------------------------------------------------------------------
    // Read Configuration
    // -------------------------------------------------------------------------
    /// How the declared length of a byte array is interpreted on read
    pub byte_array_length: BytePoolLength,

    /// Largest count or length prefix accepted before allocating
    pub max_collection_len: usize,

    /// Maximum nesting of arrays/dictionaries in a generic read
    pub max_depth: usize,
}

/// Write buffer growth policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPolicy {
    /// Fail with `CapacityExceeded` once `write_capacity` would be passed
    Fixed,

    /// Grow the buffer as needed
    Growable,
}

/// Byte array length handling on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytePoolLength {
    /// Read exactly the declared number of bytes
    Exact,

    /// Round the declared length down to a multiple of 4 before reading.
    /// Matches peers that drop the unaligned tail.
    TruncateToWord,
}

/// Write buffer size used by the game-server peers
pub const DEFAULT_WRITE_CAPACITY: usize = 1000;

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            write_capacity: DEFAULT_WRITE_CAPACITY,
            buffer_policy: BufferPolicy::Fixed,
            byte_array_length: BytePoolLength::Exact,
            max_collection_len: 1 << 20,
            max_depth: 32,
        }
    }
}

impl CodecConfig {
    /// Create a new config builder
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }
}

/// Builder for CodecConfig
#[derive(Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    /// Set the write buffer capacity (in bytes)
    pub fn write_capacity(mut self, bytes: usize) -> Self {
        self.config.write_capacity = bytes;
        self
    }

    /// Set the write buffer growth policy
    pub fn buffer_policy(mut self, policy: BufferPolicy) -> Self {
        self.config.buffer_policy = policy;
        self
    }

    /// Set how byte array lengths are read
    pub fn byte_array_length(mut self, mode: BytePoolLength) -> Self {
        self.config.byte_array_length = mode;
        self
    }

    /// Set the largest accepted count/length prefix
    pub fn max_collection_len(mut self, len: usize) -> Self {
        self.config.max_collection_len = len;
        self
    }

    /// Set the nesting limit for generic reads
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn build(self) -> CodecConfig {
        self.config
    }
}
