//! Fixed-size command buffer

/// Number of 32-bit words in a command buffer
pub const COMMAND_BUFFER_WORDS: usize = 64;

/// A fixed-length word buffer carrying one marshaled request or reply.
///
/// Word 0 holds the header; the remaining words hold the payload. The
/// same buffer instance carries the request in and the reply out of a
/// synchronous service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuffer {
    words: [u32; COMMAND_BUFFER_WORDS],
}

impl CommandBuffer {
    /// Creates a zeroed buffer
    pub fn new() -> Self {
        Self {
            words: [0; COMMAND_BUFFER_WORDS],
        }
    }

    /// Reads a word; out-of-range indices read as zero
    pub fn word(&self, index: usize) -> u32 {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// Writes a word; out-of-range indices are ignored
    pub fn set_word(&mut self, index: usize, value: u32) {
        if let Some(slot) = self.words.get_mut(index) {
            *slot = value;
        }
    }

    /// Returns the raw word array
    pub fn words(&self) -> &[u32; COMMAND_BUFFER_WORDS] {
        &self.words
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}
