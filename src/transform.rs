//! Whole-buffer transforms: rotate, scale, convert.
//!
//! All three are format-agnostic: they walk the source pixel-by-pixel
//! through [`Color`](crate::Color) and write into a freshly allocated
//! output, so they work for any pairing of the twelve encodings.

use crate::buffer::{BufferError, FrameBuffer};
use crate::format::ColorMode;
use crate::palette::Palette;

/// Quarter-turn rotation steps.
///
/// Used both by the rotating transforms here and as the logical-coordinate
/// mapping of the [`Canvas`](crate::Canvas).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    Deg180,
    /// Quarter turn counter-clockwise.
    Deg270,
}

impl Rotation {
    /// Whether this rotation swaps a frame's width and height.
    #[inline]
    pub const fn swaps_dimensions(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl FrameBuffer {
    /// New buffer holding this frame rotated by `rotation`.
    ///
    /// 0° is a byte-for-byte clone; 90°/270° swap the output dimensions.
    ///
    /// # Errors
    ///
    /// [`BufferError::PaletteEmpty`] when rotating an indexed frame whose
    /// stored indices have no configured entries.
    pub fn rotated(&self, rotation: Rotation) -> Result<FrameBuffer, BufferError> {
        if rotation == Rotation::Deg0 {
            return Ok(self.clone());
        }
        let (w, h) = (self.width(), self.height());
        let (out_w, out_h) = if rotation.swaps_dimensions() {
            (h, w)
        } else {
            (w, h)
        };
        let mut out = FrameBuffer::with_layout_of(self, out_w, out_h);
        for y in 0..h {
            for x in 0..w {
                let c = self.get_pixel(x, y)?;
                let (dx, dy) = match rotation {
                    Rotation::Deg0 => (x, y),
                    Rotation::Deg90 => (h - 1 - y, x),
                    Rotation::Deg180 => (w - 1 - x, h - 1 - y),
                    Rotation::Deg270 => (y, w - 1 - x),
                };
                out.set_pixel(dx, dy, c)?;
            }
        }
        Ok(out)
    }

    /// New buffer upscaled by integer `factor`, nearest neighbor: every
    /// source pixel becomes a `factor` x `factor` block.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] for factor 0 or an overflowing
    /// output size.
    pub fn scaled_up(&self, factor: u32) -> Result<FrameBuffer, BufferError> {
        if factor == 0 {
            return Err(BufferError::InvalidDimensions);
        }
        let out_w = self
            .width()
            .checked_mul(factor)
            .ok_or(BufferError::InvalidDimensions)?;
        let out_h = self
            .height()
            .checked_mul(factor)
            .ok_or(BufferError::InvalidDimensions)?;
        let mut out = FrameBuffer::with_layout_of(self, out_w, out_h);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = self.get_pixel(x, y)?;
                out.fill_rect(x * factor, y * factor, factor, factor, c)?;
            }
        }
        Ok(out)
    }

    /// New buffer with the same dimensions re-encoded as `mode`.
    ///
    /// The universal format bridge: a same-mode conversion is a clone,
    /// anything else copies pixel-by-pixel through [`Color`](crate::Color),
    /// losing
    /// exactly the target encoding's quantization.
    ///
    /// # Errors
    ///
    /// Converting into an indexed mode fails with
    /// [`BufferError::PaletteEmpty`] — use
    /// [`converted_with_palette`](Self::converted_with_palette) instead.
    pub fn converted(&self, mode: ColorMode) -> Result<FrameBuffer, BufferError> {
        if mode == self.color_mode() {
            return Ok(self.clone());
        }
        let mut out = FrameBuffer::new(self.width(), self.height(), mode);
        self.copy_pixels_into(&mut out)?;
        Ok(out)
    }

    /// Like [`converted`](Self::converted), but the indexed target quantizes
    /// into `palette`.
    ///
    /// # Errors
    ///
    /// [`BufferError::NotIndexed`] if `mode` carries no palette.
    pub fn converted_with_palette(
        &self,
        mode: ColorMode,
        palette: Palette,
    ) -> Result<FrameBuffer, BufferError> {
        if !mode.is_indexed() {
            return Err(BufferError::NotIndexed);
        }
        let mut out = FrameBuffer::new(self.width(), self.height(), mode);
        out.set_palette(palette);
        self.copy_pixels_into(&mut out)?;
        Ok(out)
    }

    fn copy_pixels_into(&self, out: &mut FrameBuffer) -> Result<(), BufferError> {
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.set_pixel(x, y, self.get_pixel(x, y)?)?;
            }
        }
        Ok(())
    }
}
