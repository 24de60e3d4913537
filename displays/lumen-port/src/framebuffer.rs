//! Frame buffer ownership
//!
//! One buffer of exactly `width × height × bytes_per_pixel` bytes, taken
//! from [`FrameMemory`] at port init and handed back at shutdown. Its size
//! always comes from the same [`PanelGeometry`] the panel was configured
//! with.

use lumen_core::config::PanelGeometry;
use lumen_hal::memory::FrameMemory;

/// Frame memory could not supply the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocError {
    /// Bytes requested
    pub requested: usize,
}

/// Render target owned by the port
pub struct FrameBuffer<B> {
    buffer: B,
    width: u16,
    height: u16,
    bytes_per_pixel: usize,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuffer<B> {
    /// Allocate a buffer for one full frame of `geometry`
    ///
    /// A buffer of the wrong size is handed back to `memory` and reported
    /// as an allocation failure.
    pub fn allocate<M>(memory: &mut M, geometry: &PanelGeometry) -> Result<Self, AllocError>
    where
        M: FrameMemory<Buffer = B>,
    {
        let requested = geometry.frame_len();
        let buffer = memory.allocate(requested).ok_or(AllocError { requested })?;
        if buffer.as_ref().len() != requested {
            memory.release(buffer);
            return Err(AllocError { requested });
        }

        Ok(Self {
            buffer,
            width: geometry.width,
            height: geometry.height,
            bytes_per_pixel: geometry.bytes_per_pixel(),
        })
    }

    /// Return the buffer to `memory`
    pub fn release<M>(self, memory: &mut M)
    where
        M: FrameMemory<Buffer = B>,
    {
        memory.release(self.buffer);
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.buffer.as_ref().len()
    }

    /// Always false for an allocated frame
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }
}
