//! Emulated guest memory
//!
//! A flat byte region standing in for the guest's address space. The
//! command buffer's static-buffer path copies records between here and
//! service state; nothing else is modeled (no paging, no permissions).

use core_types::KernelError;

/// Default base address of the emulated region
pub const DEFAULT_BASE: u32 = 0x1000_0000;

/// Default size of the emulated region (256 KiB)
pub const DEFAULT_SIZE: usize = 0x4_0000;

/// A contiguous emulated guest memory region
#[derive(Debug)]
pub struct GuestMemory {
    base: u32,
    bytes: Vec<u8>,
}

impl GuestMemory {
    /// Creates a zeroed region at the given base address
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            bytes: vec![0; size],
        }
    }

    /// The region's base address
    pub fn base(&self) -> u32 {
        self.base
    }

    /// The region's size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn offset(&self, address: u32, len: usize) -> Result<usize, KernelError> {
        let start = address
            .checked_sub(self.base)
            .ok_or(KernelError::InvalidAddress(address, len))? as usize;
        let end = start
            .checked_add(len)
            .ok_or(KernelError::InvalidAddress(address, len))?;
        if end > self.bytes.len() {
            return Err(KernelError::InvalidAddress(address, len));
        }
        Ok(start)
    }

    /// Copies `len` bytes out of guest memory
    pub fn read_block(&self, address: u32, len: usize) -> Result<Vec<u8>, KernelError> {
        let start = self.offset(address, len)?;
        Ok(self.bytes[start..start + len].to_vec())
    }

    /// Copies bytes into guest memory
    pub fn write_block(&mut self, address: u32, data: &[u8]) -> Result<(), KernelError> {
        let start = self.offset(address, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl Default for GuestMemory {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_SIZE)
    }
}
