//! Request parsing and reply building
//!
//! A handler parses its arguments with [`RequestParser`], then converts
//! the same buffer into a reply through [`RequestParser::make_builder`].
//! Every failure here is protocol-fatal: it means the guest or the host
//! broke the wire contract, and the offending call is aborted rather
//! than answered.

use core_types::{Handle, ResultCode};
use thiserror::Error;

use crate::buffer::CommandBuffer;
use crate::header::Header;

/// Protocol-fatal wire contract violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpcError {
    /// The header word does not match what the handler declared
    #[error("Header mismatch: expected {expected}, found {found}")]
    HeaderMismatch { expected: Header, found: Header },

    /// A pop ran past the words the header declared
    #[error("Read overrun at word {cursor} (declared payload ends at {limit})")]
    ReadOverrun { cursor: usize, limit: usize },

    /// A push ran past the words the reply header declared
    #[error("Write overrun in {section} section")]
    WriteOverrun { section: &'static str },

    /// A static-buffer descriptor declared a size other than the one the
    /// handler expects for this payload
    #[error("Static buffer size mismatch: declared {declared}, expected {expected}")]
    StaticBufferSizeMismatch { declared: u32, expected: u32 },

    /// The handler built a reply before consuming every declared word
    #[error("Incomplete parse: consumed {consumed} payload words of {declared}")]
    IncompleteParse { consumed: usize, declared: usize },
}

/// Parses a request out of a command buffer.
///
/// Construction validates the header against the command id and word
/// counts the handler declares; each pop advances a word cursor and is
/// bounds-checked against the declared payload.
#[derive(Debug)]
pub struct RequestParser {
    words: [u32; crate::buffer::COMMAND_BUFFER_WORDS],
    header: Header,
    cursor: usize,
    limit: usize,
}

impl RequestParser {
    /// Validates the header and positions the cursor at the first
    /// payload word.
    pub fn new(
        buffer: &CommandBuffer,
        command_id: u16,
        normal_params: u32,
        translate_params: u32,
    ) -> Result<Self, IpcError> {
        let expected = Header::new(command_id, normal_params, translate_params);
        let found = Header::decode(buffer.word(0));
        if found != expected {
            return Err(IpcError::HeaderMismatch { expected, found });
        }
        Ok(Self {
            words: *buffer.words(),
            header: expected,
            cursor: 1,
            limit: 1 + expected.payload_words(),
        })
    }

    /// The validated header
    pub fn header(&self) -> Header {
        self.header
    }

    fn next_word(&mut self) -> Result<u32, IpcError> {
        if self.cursor >= self.limit {
            return Err(IpcError::ReadOverrun {
                cursor: self.cursor,
                limit: self.limit,
            });
        }
        let word = self.words[self.cursor];
        self.cursor += 1;
        Ok(word)
    }

    /// Pops one normal parameter word
    pub fn pop(&mut self) -> Result<u32, IpcError> {
        self.next_word()
    }

    /// Pops a 64-bit value (low word first)
    pub fn pop_u64(&mut self) -> Result<u64, IpcError> {
        let low = self.next_word()?;
        let high = self.next_word()?;
        Ok(u64::from(low) | u64::from(high) << 32)
    }

    /// Pops a raw byte record, advancing the cursor by whole words.
    ///
    /// The record occupies `len.div_ceil(4)` words; trailing padding
    /// bytes in the last word are discarded.
    pub fn pop_raw(&mut self, len: usize) -> Result<Vec<u8>, IpcError> {
        let mut bytes = Vec::with_capacity(len);
        let words = len.div_ceil(4);
        for _ in 0..words {
            bytes.extend_from_slice(&self.next_word()?.to_le_bytes());
        }
        bytes.truncate(len);
        Ok(bytes)
    }

    /// Pops a handle word
    pub fn pop_handle(&mut self) -> Result<Handle, IpcError> {
        Ok(Handle::from_raw(self.next_word()?))
    }

    /// Pops a static-buffer descriptor and checks its declared size.
    ///
    /// The descriptor is two words: the guest virtual address, then the
    /// declared byte size. A declared size that disagrees with
    /// `expected_size` is a wire contract violation, not a recoverable
    /// error.
    pub fn pop_static_buffer(&mut self, expected_size: u32) -> Result<u32, IpcError> {
        let address = self.next_word()?;
        let declared = self.next_word()?;
        if declared != expected_size {
            return Err(IpcError::StaticBufferSizeMismatch {
                declared,
                expected: expected_size,
            });
        }
        Ok(address)
    }

    /// Consumes the parser and starts a reply in the same buffer.
    ///
    /// Fails if the request's declared payload was not consumed exactly:
    /// leftover words mean the parse and the header disagree, which is
    /// the malformed-request invariant of the wire format.
    pub fn make_builder<'a>(
        self,
        buffer: &'a mut CommandBuffer,
        normal_params: u32,
        translate_params: u32,
    ) -> Result<RequestBuilder<'a>, IpcError> {
        if self.cursor != self.limit {
            return Err(IpcError::IncompleteParse {
                consumed: self.cursor - 1,
                declared: self.limit - 1,
            });
        }
        Ok(RequestBuilder::new(
            buffer,
            self.header.command_id,
            normal_params,
            translate_params,
        ))
    }
}

/// Builds a reply into a command buffer.
///
/// The header is rewritten with the reply's word counts up front; pushes
/// then fill the normal section (result code and parameters) and the
/// translate section (copied handles) positionally, so section layout is
/// independent of call order.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    buffer: &'a mut CommandBuffer,
    normal_cursor: usize,
    normal_end: usize,
    translate_cursor: usize,
    translate_end: usize,
}

impl<'a> RequestBuilder<'a> {
    /// Starts a reply from scratch, rewriting the header word.
    ///
    /// Handlers normally reach this through
    /// [`RequestParser::make_builder`]; building directly is for reply
    /// paths that never parse (stubbed commands).
    pub fn new(
        buffer: &'a mut CommandBuffer,
        command_id: u16,
        normal_params: u32,
        translate_params: u32,
    ) -> Self {
        let header = Header::new(command_id, normal_params, translate_params);
        buffer.set_word(0, header.encode());
        let normal_end = 1 + header.normal_params as usize;
        Self {
            buffer,
            normal_cursor: 1,
            normal_end,
            translate_cursor: normal_end,
            translate_end: normal_end + header.translate_params as usize,
        }
    }

    /// Pushes one normal parameter word
    pub fn push(&mut self, value: u32) -> Result<(), IpcError> {
        if self.normal_cursor >= self.normal_end {
            return Err(IpcError::WriteOverrun { section: "normal" });
        }
        self.buffer.set_word(self.normal_cursor, value);
        self.normal_cursor += 1;
        Ok(())
    }

    /// Pushes the call's result code (always the first normal word)
    pub fn push_result(&mut self, code: ResultCode) -> Result<(), IpcError> {
        self.push(code.raw())
    }

    /// Pushes a 64-bit value (low word first)
    pub fn push_u64(&mut self, value: u64) -> Result<(), IpcError> {
        self.push(value as u32)?;
        self.push((value >> 32) as u32)
    }

    /// Pushes a raw byte record, zero-padding the final word
    pub fn push_raw(&mut self, bytes: &[u8]) -> Result<(), IpcError> {
        for chunk in bytes.chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            self.push(u32::from_le_bytes(word))?;
        }
        Ok(())
    }

    /// Pushes freshly-created handles into the translate section
    pub fn push_copy_handles(&mut self, handles: &[Handle]) -> Result<(), IpcError> {
        for handle in handles {
            if self.translate_cursor >= self.translate_end {
                return Err(IpcError::WriteOverrun {
                    section: "translate",
                });
            }
            self.buffer.set_word(self.translate_cursor, handle.as_raw());
            self.translate_cursor += 1;
        }
        Ok(())
    }
}
