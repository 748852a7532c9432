//! Command header packing

use std::fmt;

const COMMAND_ID_MASK: u32 = 0xFFFF;
const COUNT_MASK: u32 = 0x3F;
const NORMAL_SHIFT: u32 = 16;
const TRANSLATE_SHIFT: u32 = 22;

/// Decoded form of the command buffer's header word.
///
/// The header declares the command identifier and how many payload words
/// follow it: `normal_params` ordinary words, then `translate_params`
/// words carrying handles and static-buffer descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Command identifier (16 bits)
    pub command_id: u16,
    /// Number of normal parameter words (6 bits)
    pub normal_params: u32,
    /// Number of translate words: handles plus 2 per static buffer (6 bits)
    pub translate_params: u32,
}

impl Header {
    /// Creates a header, masking counts to their 6-bit fields
    pub fn new(command_id: u16, normal_params: u32, translate_params: u32) -> Self {
        Self {
            command_id,
            normal_params: normal_params & COUNT_MASK,
            translate_params: translate_params & COUNT_MASK,
        }
    }

    /// Packs the header into its wire word
    pub fn encode(&self) -> u32 {
        u32::from(self.command_id)
            | (self.normal_params & COUNT_MASK) << NORMAL_SHIFT
            | (self.translate_params & COUNT_MASK) << TRANSLATE_SHIFT
    }

    /// Unpacks a wire word into a header
    pub fn decode(word: u32) -> Self {
        Self {
            command_id: (word & COMMAND_ID_MASK) as u16,
            normal_params: (word >> NORMAL_SHIFT) & COUNT_MASK,
            translate_params: (word >> TRANSLATE_SHIFT) & COUNT_MASK,
        }
    }

    /// Total number of payload words the header declares
    pub fn payload_words(&self) -> usize {
        (self.normal_params + self.translate_params) as usize
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cmd=0x{:04X} normal={} translate={}",
            self.command_id, self.normal_params, self.translate_params
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let header = Header::new(0x1D, 1, 4);
        assert_eq!(Header::decode(header.encode()), header);
    }

    #[test]
    fn test_fields_do_not_overlap() {
        let header = Header::new(0xFFFF, 0x3F, 0x3F);
        let decoded = Header::decode(header.encode());
        assert_eq!(decoded.command_id, 0xFFFF);
        assert_eq!(decoded.normal_params, 0x3F);
        assert_eq!(decoded.translate_params, 0x3F);
    }

    #[test]
    fn test_counts_are_masked() {
        let header = Header::new(1, 0x40, 0x7F);
        assert_eq!(header.normal_params, 0);
        assert_eq!(header.translate_params, 0x3F);
    }

    #[test]
    fn test_payload_words() {
        assert_eq!(Header::new(0x12, 4, 0).payload_words(), 4);
        assert_eq!(Header::new(0x1B, 12, 1).payload_words(), 13);
    }
}
