//! The hardware-display collaborator contract.
//!
//! This crate renders into memory; pushing a finished frame over a bus is
//! the job of a chip-specific driver implementing [`DisplayLink`]. A
//! driver needs nothing beyond the buffer's public surface — mode tag,
//! dimensions and raw bytes — to transmit a frame, so any encoding can
//! travel over any wire protocol.

use crate::buffer::FrameBuffer;
use crate::color::Color;

/// Implemented by hardware display drivers that consume finished frames.
///
/// `show`/`show_region` perform the actual bus I/O; the pixel passthroughs
/// let the highest-level drawing API target a display that keeps its own
/// internal frame memory instead of a local buffer.
pub trait DisplayLink {
    /// Bus or protocol error type of the concrete driver.
    type Error;

    /// Transmit a whole frame.
    fn show(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;

    /// Transmit the region bounded by `left..=right`, `top..=bottom`.
    fn show_region(
        &mut self,
        frame: &FrameBuffer,
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    ) -> Result<(), Self::Error>;

    /// Set the color used by subsequent [`draw_pixel`](Self::draw_pixel)
    /// calls.
    fn set_pen_color(&mut self, color: Color);

    /// Write one pen-colored pixel directly to the display's own memory.
    fn draw_pixel(&mut self, x: u32, y: u32) -> Result<(), Self::Error>;

    /// Invert one pixel directly in the display's own memory.
    fn invert_pixel(&mut self, x: u32, y: u32) -> Result<(), Self::Error>;
}
