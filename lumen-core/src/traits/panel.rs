//! Display panel trait

use crate::area::BlitRect;
use crate::config::PanelGeometry;

/// Panel error that knows whether the panel can still be driven
///
/// A failure before the panel has been touched (opening the command bus,
/// the software reset) is retryable. Anything later leaves the panel half
/// configured.
pub trait FatalError {
    /// Check if the panel cannot be driven after this error
    fn is_fatal(&self) -> bool;
}

/// Trait for display panels with a bring-up sequence and a blit primitive
///
/// State machine: uninitialized → `init` → ready → `blit`* → ready →
/// `shutdown` → uninitialized.
pub trait DisplayPanel {
    /// Bring-up or streaming error
    type Error: FatalError;

    /// Geometry the panel was built for
    fn geometry(&self) -> &PanelGeometry;

    /// Run the full bring-up sequence
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Stream the half-open rectangle from `pixels`
    ///
    /// `pixels` holds exactly `rect.pixel_count()` pixels, row-major.
    /// Returns once the rectangle has been handed to the streaming hardware.
    fn blit(&mut self, rect: &BlitRect, pixels: &[u8]) -> Result<(), Self::Error>;

    /// Close the streaming session, then the command session
    fn shutdown(&mut self) -> Result<(), Self::Error>;

    /// Check if the panel accepts blits
    fn is_ready(&self) -> bool;
}
