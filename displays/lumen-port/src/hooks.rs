//! Flush and poll callbacks
//!
//! The engine calls these synchronously from its scheduler pass, one at a
//! time. Neither callback propagates driver errors: a failed touch read
//! reads as "released", a failed blit leaves that region unchanged until
//! the next redraw.

use lumen_core::area::Area;
use lumen_core::traits::{DisplayPanel, FlushDone, PointerEvent, PortCallbacks, TouchController};

/// Last pointer position, reported with release events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerTracker {
    x: u16,
    y: u16,
}

impl PointerTracker {
    /// Record a press
    pub fn press(&mut self, x: u16, y: u16) -> PointerEvent {
        self.x = x;
        self.y = y;
        PointerEvent::pressed(x, y)
    }

    /// Release at the last known position
    pub fn release(&self) -> PointerEvent {
        PointerEvent::released(self.x, self.y)
    }

    /// Last known position
    pub fn last(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

/// Callbacks handed to [`GraphicsEngine::run`](lumen_core::GraphicsEngine::run)
pub struct PortHooks<'a, P, T> {
    panel: &'a mut P,
    touch: &'a mut T,
    pointer: &'a mut PointerTracker,
}

impl<'a, P, T> PortHooks<'a, P, T>
where
    P: DisplayPanel,
    T: TouchController,
{
    pub fn new(panel: &'a mut P, touch: &'a mut T, pointer: &'a mut PointerTracker) -> Self {
        Self {
            panel,
            touch,
            pointer,
        }
    }
}

impl<P, T> PortCallbacks for PortHooks<'_, P, T>
where
    P: DisplayPanel,
    T: TouchController,
{
    fn flush(&mut self, area: &Area, pixels: &[u8]) -> FlushDone {
        match area.to_blit() {
            Some(rect) => {
                if self.panel.blit(&rect, pixels).is_err() {
                    warn!(
                        "Flush of {},{}..{},{} failed",
                        rect.x0,
                        rect.y0,
                        rect.x1,
                        rect.y1
                    );
                }
            }
            None => warn!("Flush with inverted area {}", area),
        }
        FlushDone
    }

    fn poll(&mut self) -> PointerEvent {
        match self.touch.read_sample() {
            Ok(sample) if sample.touched => self.pointer.press(sample.x, sample.y),
            Ok(_) => self.pointer.release(),
            Err(_) => {
                debug!("Touch read failed, reporting release");
                self.pointer.release()
            }
        }
    }
}
