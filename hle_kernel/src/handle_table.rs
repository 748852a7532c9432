//! Handle-indexed object table
//!
//! Maps small integer handles to reference-counted kernel objects.
//! Handle values are allocated monotonically and never reused while any
//! object lives, so a stale handle can never silently alias a newer
//! object. An object's lifetime is the count of outstanding handles to
//! it; [`HandleTable::duplicate`] mints additional handles (the reply
//! path's copy-handle descriptors use this), and the object is
//! destroyed when the count reaches zero.

use core_types::{Handle, KernelError};
use std::collections::HashMap;

use crate::event::Event;
use crate::object::KernelObject;
use crate::session::{ClientSession, ServerSession};
use crate::shared_memory::SharedMemory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ObjectId(u64);

#[derive(Debug)]
struct ObjectEntry {
    object: KernelObject,
    refcount: u32,
}

/// The per-process kernel object table
#[derive(Debug)]
pub struct HandleTable {
    objects: HashMap<ObjectId, ObjectEntry>,
    handles: HashMap<Handle, ObjectId>,
    next_handle: u32,
    next_object: u64,
}

impl HandleTable {
    /// Creates an empty table; handle values start at 1 (0 is the
    /// invalid sentinel)
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            handles: HashMap::new(),
            next_handle: 1,
            next_object: 0,
        }
    }

    fn alloc_handle(&mut self) -> Handle {
        let handle = Handle::from_raw(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Inserts an object with refcount 1 and returns its first handle
    pub fn create(&mut self, object: KernelObject) -> Handle {
        let object_id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.insert(
            object_id,
            ObjectEntry {
                object,
                refcount: 1,
            },
        );
        let handle = self.alloc_handle();
        self.handles.insert(handle, object_id);
        handle
    }

    /// Mints a fresh handle to an existing object (refcount + 1)
    pub fn duplicate(&mut self, handle: Handle) -> Result<Handle, KernelError> {
        let object_id = *self
            .handles
            .get(&handle)
            .ok_or(KernelError::NotFound(handle))?;
        let entry = self
            .objects
            .get_mut(&object_id)
            .ok_or(KernelError::NotFound(handle))?;
        entry.refcount += 1;
        let new_handle = self.alloc_handle();
        self.handles.insert(new_handle, object_id);
        Ok(new_handle)
    }

    /// Closes a handle (refcount - 1).
    ///
    /// Returns the object when this was the last handle, so the caller
    /// can run kind-specific teardown; returns `None` when other
    /// handles keep the object alive.
    pub fn close(&mut self, handle: Handle) -> Result<Option<KernelObject>, KernelError> {
        let object_id = self
            .handles
            .remove(&handle)
            .ok_or(KernelError::NotFound(handle))?;
        let entry = self
            .objects
            .get_mut(&object_id)
            .ok_or(KernelError::NotFound(handle))?;
        entry.refcount -= 1;
        if entry.refcount == 0 {
            let entry = self.objects.remove(&object_id).expect("entry exists");
            return Ok(Some(entry.object));
        }
        Ok(None)
    }

    /// Looks up any object kind
    pub fn get(&self, handle: Handle) -> Option<&KernelObject> {
        let object_id = self.handles.get(&handle)?;
        self.objects.get(object_id).map(|e| &e.object)
    }

    /// Looks up any object kind, mutably
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut KernelObject> {
        let object_id = self.handles.get(&handle)?;
        self.objects.get_mut(object_id).map(|e| &mut e.object)
    }

    /// Resolves a handle to an event; absent or other-kind handles fail
    /// with NotFound
    pub fn get_event(&self, handle: Handle) -> Result<&Event, KernelError> {
        match self.get(handle) {
            Some(KernelObject::Event(event)) => Ok(event),
            _ => Err(KernelError::NotFound(handle)),
        }
    }

    /// Mutable event lookup
    pub fn get_event_mut(&mut self, handle: Handle) -> Result<&mut Event, KernelError> {
        match self.get_mut(handle) {
            Some(KernelObject::Event(event)) => Ok(event),
            _ => Err(KernelError::NotFound(handle)),
        }
    }

    /// Resolves a handle to a shared memory block
    pub fn get_shared_memory(&self, handle: Handle) -> Result<&SharedMemory, KernelError> {
        match self.get(handle) {
            Some(KernelObject::SharedMemory(shmem)) => Ok(shmem),
            _ => Err(KernelError::NotFound(handle)),
        }
    }

    /// Resolves a handle to a client session
    pub fn get_client_session(&self, handle: Handle) -> Result<&ClientSession, KernelError> {
        match self.get(handle) {
            Some(KernelObject::ClientSession(session)) => Ok(session),
            _ => Err(KernelError::NotFound(handle)),
        }
    }

    /// Resolves a handle to a server session
    pub fn get_server_session(&self, handle: Handle) -> Result<&ServerSession, KernelError> {
        match self.get(handle) {
            Some(KernelObject::ServerSession(session)) => Ok(session),
            _ => Err(KernelError::NotFound(handle)),
        }
    }

    /// Mutable server session lookup
    pub fn get_server_session_mut(
        &mut self,
        handle: Handle,
    ) -> Result<&mut ServerSession, KernelError> {
        match self.get_mut(handle) {
            Some(KernelObject::ServerSession(session)) => Ok(session),
            _ => Err(KernelError::NotFound(handle)),
        }
    }

    /// Current refcount of the object behind a handle (tests and
    /// diagnostics)
    pub fn refcount(&self, handle: Handle) -> Option<u32> {
        let object_id = self.handles.get(&handle)?;
        self.objects.get(object_id).map(|e| e.refcount)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of live handles
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ResetType;

    fn event_object(name: &str) -> KernelObject {
        KernelObject::Event(Event::new(ResetType::OneShot, name))
    }

    #[test]
    fn test_create_and_get() {
        let mut table = HandleTable::new();
        let handle = table.create(event_object("ev"));
        assert!(!handle.is_invalid());
        assert_eq!(table.get_event(handle).unwrap().name(), "ev");
    }

    #[test]
    fn test_get_after_close_fails_not_found() {
        let mut table = HandleTable::new();
        let handle = table.create(event_object("ev"));
        let destroyed = table.close(handle).unwrap();
        assert!(destroyed.is_some());
        assert_eq!(
            table.get_event(handle).unwrap_err(),
            KernelError::NotFound(handle)
        );
    }

    #[test]
    fn test_type_mismatch_fails_not_found() {
        let mut table = HandleTable::new();
        let handle = table.create(event_object("ev"));
        assert_eq!(
            table.get_shared_memory(handle).unwrap_err(),
            KernelError::NotFound(handle)
        );
    }

    #[test]
    fn test_duplicate_keeps_object_alive() {
        let mut table = HandleTable::new();
        let first = table.create(event_object("ev"));
        let second = table.duplicate(first).unwrap();
        assert_ne!(first, second);
        assert_eq!(table.refcount(first), Some(2));

        // Closing one handle keeps the object reachable via the other.
        assert!(table.close(first).unwrap().is_none());
        assert!(table.get_event(second).is_ok());
        assert_eq!(table.refcount(second), Some(1));

        // The last close destroys the object.
        assert!(table.close(second).unwrap().is_some());
        assert_eq!(table.object_count(), 0);
    }

    #[test]
    fn test_handles_are_never_reused() {
        let mut table = HandleTable::new();
        let first = table.create(event_object("a"));
        table.close(first).unwrap();
        let second = table.create(event_object("b"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_close_unknown_handle_fails() {
        let mut table = HandleTable::new();
        let bogus = Handle::from_raw(99);
        assert_eq!(
            table.close(bogus).unwrap_err(),
            KernelError::NotFound(bogus)
        );
    }

    #[test]
    fn test_double_close_fails() {
        let mut table = HandleTable::new();
        let handle = table.create(event_object("ev"));
        table.close(handle).unwrap();
        assert!(table.close(handle).is_err());
    }
}
