//! Shared memory blocks

/// A guest-provided shared memory block.
///
/// Only the identity and size are modeled; services that accept a
/// shared memory handle use the size to validate the guest's declared
/// block size.
#[derive(Debug)]
pub struct SharedMemory {
    name: String,
    size: u32,
}

impl SharedMemory {
    /// Creates a shared memory record of the given byte size
    pub fn new(size: u32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// The block's debugging name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the block in bytes
    pub fn size(&self) -> u32 {
        self.size
    }
}
