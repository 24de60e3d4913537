//! Frame buffer memory
//!
//! A full frame does not fit in internal SRAM on most parts, so the frame
//! buffer comes from a separate, larger and slower region (PSRAM on the
//! reference board). Allocation is fallible and observable.

/// Allocator for one large pixel buffer
pub trait FrameMemory {
    /// Owned buffer type
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// Allocate `len` zeroed bytes, or `None` if the region cannot hold them
    fn allocate(&mut self, len: usize) -> Option<Self::Buffer>;

    /// Return a buffer to the region
    fn release(&mut self, buffer: Self::Buffer);
}

/// Frame memory served from the global allocator
///
/// Firmware that maps PSRAM into the global heap gets PSRAM frame buffers
/// from this. An optional limit models a region smaller than the heap.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapFrameMemory {
    limit: Option<usize>,
}

#[cfg(feature = "alloc")]
impl HeapFrameMemory {
    /// Unlimited heap-backed frame memory
    pub const fn new() -> Self {
        Self { limit: None }
    }

    /// Refuse allocations larger than `limit` bytes
    pub const fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

#[cfg(feature = "alloc")]
impl FrameMemory for HeapFrameMemory {
    type Buffer = alloc::vec::Vec<u8>;

    fn allocate(&mut self, len: usize) -> Option<Self::Buffer> {
        if self.limit.is_some_and(|limit| len > limit) {
            return None;
        }

        let mut buffer = alloc::vec::Vec::new();
        buffer.try_reserve_exact(len).ok()?;
        buffer.resize(len, 0);
        Some(buffer)
    }

    fn release(&mut self, buffer: Self::Buffer) {
        drop(buffer);
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    #[test]
    fn test_heap_allocation_is_zeroed() {
        let mut memory = HeapFrameMemory::new();
        let buffer = memory.allocate(64).unwrap();
        assert_eq!(buffer.len(), 64);
        assert!(buffer.iter().all(|&b| b == 0));
        memory.release(buffer);
    }

    #[test]
    fn test_limit_refuses_oversized() {
        let mut memory = HeapFrameMemory::with_limit(100);
        assert!(memory.allocate(101).is_none());
        assert!(memory.allocate(100).is_some());
    }
}
