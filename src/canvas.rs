//! Stateful 2-D rasterizer.
//!
//! [`Canvas`] holds drawing state — current font, stroke width, rotation
//! and pen color — and renders shapes, bitmaps and text purely through a
//! target buffer's per-pixel operations. It knows nothing about byte
//! layout: every algorithm works in logical coordinates, which pass
//! through the rotation map before reaching the buffer, and bounds are
//! enforced by the buffer alone (an off-frame write fails the buffer
//! call, there is no pre-clipping here).

use core::fmt;

use crate::buffer::{BufferError, FrameBuffer};
use crate::color::Color;
use crate::font::Font;
use crate::format::ColorMode;
use crate::transform::Rotation;

// ---------------------------------------------------------------------------
// CanvasError
// ---------------------------------------------------------------------------

/// Errors from canvas operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanvasError {
    /// Text operation with no font set.
    NoFont,
    /// Failure from the target buffer.
    Buffer(BufferError),
}

impl From<BufferError> for CanvasError {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFont => write!(f, "no font set"),
            Self::Buffer(e) => write!(f, "buffer error: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Draw options
// ---------------------------------------------------------------------------

/// Horizontal anchoring of rendered text relative to the given x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// x is the left edge of the string.
    #[default]
    Left,
    /// x is the center of the string.
    Center,
    /// x is the right edge of the string.
    Right,
}

/// Raster operation combining a 1-bit source with the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BitmapOp {
    /// Set bits paint the pen color, clear bits paint black.
    #[default]
    Copy,
    /// Set bits paint the pen color, clear bits leave the target alone.
    Or,
    /// Clear bits paint black, set bits leave the target alone.
    And,
    /// Set bits invert the target pixel, clear bits leave it alone.
    Xor,
}

/// Options for [`Canvas::draw_text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub align: TextAlign,
    /// Integer magnification, nearest neighbor. Must be at least 1.
    pub scale: u32,
    pub op: BitmapOp,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            align: TextAlign::Left,
            scale: 1,
            op: BitmapOp::Copy,
        }
    }
}

/// Selection of circle quadrants, combinable with [`union`](Self::union)
/// or `|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quadrants(u8);

impl Quadrants {
    pub const TOP_LEFT: Self = Self(0b0001);
    pub const TOP_RIGHT: Self = Self(0b0010);
    pub const BOTTOM_LEFT: Self = Self(0b0100);
    pub const BOTTOM_RIGHT: Self = Self(0b1000);
    pub const ALL: Self = Self(0b1111);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for Quadrants {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Snapshot<'f> {
    font: Option<&'f Font<'f>>,
    stroke: u32,
    rotation: Rotation,
    pen: Color,
}

/// Drawing state plus the shape/text algorithms.
///
/// A canvas borrows its target buffer only for the duration of each call
/// and never retains it, so one canvas can serve any number of buffers.
pub struct Canvas<'f> {
    font: Option<&'f Font<'f>>,
    stroke: u32,
    rotation: Rotation,
    pen: Color,
    saved: Option<Snapshot<'f>>,
}

impl Default for Canvas<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f> Canvas<'f> {
    /// Canvas with no font, stroke 1, no rotation and a white pen.
    pub const fn new() -> Self {
        Self {
            font: None,
            stroke: 1,
            rotation: Rotation::Deg0,
            pen: Color::WHITE,
            saved: None,
        }
    }

    // State -------------------------------------------------------------------

    /// Set the font used by [`draw_text`](Self::draw_text).
    pub fn set_font(&mut self, font: &'f Font<'f>) {
        self.font = Some(font);
    }

    /// The current font, if one is set.
    pub fn font(&self) -> Option<&'f Font<'f>> {
        self.font
    }

    /// Set the stroke width for lines. Zero is treated as 1.
    pub fn set_stroke(&mut self, stroke: u32) {
        self.stroke = stroke.max(1);
    }

    pub fn stroke(&self) -> u32 {
        self.stroke
    }

    /// Set the logical-coordinate rotation applied to every pixel write.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Set the pen color.
    pub fn set_pen(&mut self, pen: Color) {
        self.pen = pen;
    }

    pub fn pen(&self) -> Color {
        self.pen
    }

    /// Save the current state into the single snapshot slot.
    ///
    /// There is exactly one slot, not a stack: a second save silently
    /// overwrites the first.
    pub fn save_state(&mut self) {
        self.saved = Some(Snapshot {
            font: self.font,
            stroke: self.stroke,
            rotation: self.rotation,
            pen: self.pen,
        });
    }

    /// Restore and consume the saved snapshot.
    ///
    /// Returns false (and changes nothing) when no snapshot is held.
    pub fn restore_state(&mut self) -> bool {
        match self.saved.take() {
            Some(s) => {
                self.font = s.font;
                self.stroke = s.stroke;
                self.rotation = s.rotation;
                self.pen = s.pen;
                true
            }
            None => false,
        }
    }

    // Coordinate mapping ------------------------------------------------------

    /// Logical to physical coordinates against the target's dimensions.
    fn map(&self, target: &FrameBuffer, x: i64, y: i64) -> Result<(u32, u32), CanvasError> {
        let (w, h) = (target.width() as i64, target.height() as i64);
        let (px, py) = match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, h - 1 - x),
        };
        if px < 0 || py < 0 {
            return Err(BufferError::OutOfBounds.into());
        }
        Ok((px as u32, py as u32))
    }

    fn put_color(
        &self,
        target: &mut FrameBuffer,
        x: i64,
        y: i64,
        color: Color,
    ) -> Result<(), CanvasError> {
        let (px, py) = self.map(target, x, y)?;
        target.set_pixel(px, py, color)?;
        Ok(())
    }

    #[inline]
    fn put(&self, target: &mut FrameBuffer, x: i64, y: i64) -> Result<(), CanvasError> {
        self.put_color(target, x, y, self.pen)
    }

    fn hspan(
        &self,
        target: &mut FrameBuffer,
        x0: i64,
        x1: i64,
        y: i64,
    ) -> Result<(), CanvasError> {
        for x in x0.min(x1)..=x0.max(x1) {
            self.put(target, x, y)?;
        }
        Ok(())
    }

    // Pixel passthroughs ------------------------------------------------------

    /// Write one pen-colored pixel at logical `(x, y)`.
    pub fn draw_pixel(&self, target: &mut FrameBuffer, x: u32, y: u32) -> Result<(), CanvasError> {
        self.put(target, x as i64, y as i64)
    }

    /// Invert the target pixel at logical `(x, y)`.
    pub fn invert_pixel(
        &self,
        target: &mut FrameBuffer,
        x: u32,
        y: u32,
    ) -> Result<(), CanvasError> {
        let (px, py) = self.map(target, x as i64, y as i64)?;
        target.invert_pixel(px, py)?;
        Ok(())
    }

    // Lines -------------------------------------------------------------------

    /// Draw a line from `(x0, y0)` to `(x1, y1)`, honoring the stroke width.
    ///
    /// Stroke > 1 draws that many parallel one-pixel lines offset along the
    /// perpendicular of the dominant axis.
    pub fn draw_line(
        &self,
        target: &mut FrameBuffer,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
    ) -> Result<(), CanvasError> {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        if self.stroke == 1 {
            return self.line_1px(target, x0, y0, x1, y1);
        }
        let half = (self.stroke / 2) as i64;
        let along_y = (x1 - x0).abs() >= (y1 - y0).abs();
        for i in 0..self.stroke as i64 {
            let off = i - half;
            if along_y {
                self.line_1px(target, x0, y0 + off, x1, y1 + off)?;
            } else {
                self.line_1px(target, x0 + off, y0, x1 + off, y1)?;
            }
        }
        Ok(())
    }

    fn line_1px(
        &self,
        target: &mut FrameBuffer,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
    ) -> Result<(), CanvasError> {
        if y0 == y1 {
            return self.hspan(target, x0, x1, y0);
        }
        if x0 == x1 {
            for y in y0.min(y1)..=y0.max(y1) {
                self.put(target, x0, y)?;
            }
            return Ok(());
        }
        // Bresenham.
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.put(target, x, y)?;
            if x == x1 && y == y1 {
                return Ok(());
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    // Rectangles --------------------------------------------------------------

    /// Draw a `w` x `h` rectangle with its top-left corner at `(x, y)`.
    pub fn draw_rect(
        &self,
        target: &mut FrameBuffer,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        filled: bool,
    ) -> Result<(), CanvasError> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let (x, y) = (x as i64, y as i64);
        let (r, b) = (x + w as i64 - 1, y + h as i64 - 1);
        if filled {
            for yy in y..=b {
                self.hspan(target, x, r, yy)?;
            }
            return Ok(());
        }
        self.hspan(target, x, r, y)?;
        if b != y {
            self.hspan(target, x, r, b)?;
        }
        for yy in y + 1..b {
            self.put(target, x, yy)?;
            if r != x {
                self.put(target, r, yy)?;
            }
        }
        Ok(())
    }

    // Circles -----------------------------------------------------------------

    /// Draw a full circle centered at `(cx, cy)`.
    pub fn draw_circle(
        &self,
        target: &mut FrameBuffer,
        cx: u32,
        cy: u32,
        r: u32,
        filled: bool,
    ) -> Result<(), CanvasError> {
        self.draw_circle_quadrants(target, cx, cy, r, Quadrants::ALL, filled, false)
    }

    /// Draw selected quadrants of a circle (the rounded-rectangle corner
    /// primitive).
    ///
    /// Midpoint algorithm with decision variable `d = 3 - 2r`.
    /// `center_between_pixels` shifts the positive-side coordinates in by
    /// one, centering the circle between four pixels instead of on one;
    /// a radius of 0 sets exactly the center pixel.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_circle_quadrants(
        &self,
        target: &mut FrameBuffer,
        cx: u32,
        cy: u32,
        r: u32,
        quadrants: Quadrants,
        filled: bool,
        center_between_pixels: bool,
    ) -> Result<(), CanvasError> {
        let (cx, cy) = (cx as i64, cy as i64);
        if r == 0 {
            return self.put(target, cx, cy);
        }
        let adj = if center_between_pixels { 1 } else { 0 };
        let mut x: i64 = 0;
        let mut y: i64 = r as i64;
        let mut d: i64 = 3 - 2 * r as i64;
        while x <= y {
            self.circle_step(target, cx, cy, x, y, adj, quadrants, filled)?;
            if d > 0 {
                d += 2 * (x - y) + 1;
                y -= 1;
            } else {
                d += 2 * x + 1;
            }
            x += 1;
        }
        Ok(())
    }

    /// Plot (or fill to the center) the two octant points of every selected
    /// quadrant for one midpoint step.
    #[allow(clippy::too_many_arguments)]
    fn circle_step(
        &self,
        target: &mut FrameBuffer,
        cx: i64,
        cy: i64,
        x: i64,
        y: i64,
        adj: i64,
        quadrants: Quadrants,
        filled: bool,
    ) -> Result<(), CanvasError> {
        // (dx, dy) per octant point, positive sides pulled in by `adj`.
        let points = [
            (Quadrants::TOP_RIGHT, cx + x - adj, cy - y),
            (Quadrants::TOP_RIGHT, cx + y - adj, cy - x),
            (Quadrants::TOP_LEFT, cx - x, cy - y),
            (Quadrants::TOP_LEFT, cx - y, cy - x),
            (Quadrants::BOTTOM_RIGHT, cx + x - adj, cy + y - adj),
            (Quadrants::BOTTOM_RIGHT, cx + y - adj, cy + x - adj),
            (Quadrants::BOTTOM_LEFT, cx - x, cy + y - adj),
            (Quadrants::BOTTOM_LEFT, cx - y, cy + x - adj),
        ];
        for (q, px, py) in points {
            if !quadrants.contains(q) {
                continue;
            }
            if filled {
                self.hspan(target, cx, px, py)?;
            } else {
                self.put(target, px, py)?;
            }
        }
        Ok(())
    }

    // Rounded rectangles ------------------------------------------------------

    /// Draw a rectangle with quarter-circle corners of the given radius.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] if `2 * radius` exceeds either
    /// side.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rounded_rect(
        &self,
        target: &mut FrameBuffer,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        radius: u32,
        filled: bool,
    ) -> Result<(), CanvasError> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        if radius > w / 2 || radius > h / 2 {
            return Err(BufferError::InvalidDimensions.into());
        }
        if radius == 0 {
            return self.draw_rect(target, x, y, w, h, filled);
        }
        let (x, y, w, h, r) = (x as i64, y as i64, w as i64, h as i64, radius as i64);
        let (right, bottom) = (x + w - 1, y + h - 1);
        let corners = [
            (Quadrants::TOP_LEFT, x + r, y + r),
            (Quadrants::TOP_RIGHT, right - r, y + r),
            (Quadrants::BOTTOM_LEFT, x + r, bottom - r),
            (Quadrants::BOTTOM_RIGHT, right - r, bottom - r),
        ];
        for (q, ccx, ccy) in corners {
            self.draw_circle_quadrants(
                target,
                ccx as u32,
                ccy as u32,
                radius,
                q,
                filled,
                false,
            )?;
        }
        if filled {
            // Corner fills cover the side caps; the straight spans cover
            // the rest.
            for yy in y..y + r {
                self.hspan(target, x + r, right - r, yy)?;
            }
            for yy in y + r..=bottom - r {
                self.hspan(target, x, right, yy)?;
            }
            for yy in bottom - r + 1..=bottom {
                self.hspan(target, x + r, right - r, yy)?;
            }
            return Ok(());
        }
        self.hspan(target, x + r, right - r, y)?;
        self.hspan(target, x + r, right - r, bottom)?;
        for yy in y + r..=bottom - r {
            self.put(target, x, yy)?;
            self.put(target, right, yy)?;
        }
        Ok(())
    }

    // Triangles ---------------------------------------------------------------

    /// Draw a triangle given its three vertices.
    ///
    /// Unfilled draws the three edges; filled scan-fills between the edges
    /// with the vertices sorted by y (top half walks edges 0-1 and 0-2,
    /// bottom half walks 1-2 and 0-2).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(
        &self,
        target: &mut FrameBuffer,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        filled: bool,
    ) -> Result<(), CanvasError> {
        if !filled {
            self.draw_line(target, x0, y0, x1, y1)?;
            self.draw_line(target, x1, y1, x2, y2)?;
            self.draw_line(target, x2, y2, x0, y0)?;
            return Ok(());
        }
        let mut v = [
            (x0 as i64, y0 as i64),
            (x1 as i64, y1 as i64),
            (x2 as i64, y2 as i64),
        ];
        v.sort_by_key(|&(_, y)| y);
        let [(ax, ay), (bx, by), (cx, cy)] = v;

        if ay == cy {
            // All three vertices on one scanline.
            return self.hspan(target, ax.min(bx).min(cx), ax.max(bx).max(cx), ay);
        }
        // Top half: edges a-b and a-c. Skipped entirely for flat-top
        // triangles (ay == by).
        for y in ay..by {
            let xa = edge_x(ax, ay, bx, by, y);
            let xb = edge_x(ax, ay, cx, cy, y);
            self.hspan(target, xa, xb, y)?;
        }
        // Bottom half: edges b-c and a-c, including the middle scanline.
        if by == cy {
            self.hspan(target, bx.min(cx), bx.max(cx), by)?;
        } else {
            for y in by..=cy {
                let xa = edge_x(bx, by, cx, cy, y);
                let xb = edge_x(ax, ay, cx, cy, y);
                self.hspan(target, xa, xb, y)?;
            }
        }
        Ok(())
    }

    // Bitmaps -----------------------------------------------------------------

    /// Blit a one-bit bitmap onto the target at `(x, y)` through the pen.
    ///
    /// Every set source pixel maps to the pen color, every clear one to
    /// black, combined per [`BitmapOp`]; `scale` replicates each source
    /// pixel into a `scale` x `scale` block. The source is read through
    /// its own pixel contract, so any mode works, quantized to one bit.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] for scale 0, plus anything the
    /// target's pixel writes raise.
    pub fn draw_bitmap(
        &self,
        target: &mut FrameBuffer,
        bitmap: &FrameBuffer,
        x: u32,
        y: u32,
        op: BitmapOp,
        scale: u32,
    ) -> Result<(), CanvasError> {
        if scale == 0 {
            return Err(BufferError::InvalidDimensions.into());
        }
        for sy in 0..bitmap.height() {
            for sx in 0..bitmap.width() {
                let on = bitmap.get_pixel(sx, sy)?.to_mono();
                let bx = x as i64 + (sx * scale) as i64;
                let by = y as i64 + (sy * scale) as i64;
                for dy in 0..scale as i64 {
                    for dx in 0..scale as i64 {
                        let (px, py) = (bx + dx, by + dy);
                        match (op, on) {
                            (BitmapOp::Copy, true) => self.put(target, px, py)?,
                            (BitmapOp::Copy, false) => {
                                self.put_color(target, px, py, Color::BLACK)?
                            }
                            (BitmapOp::Or, true) => self.put(target, px, py)?,
                            (BitmapOp::Or, false) => {}
                            (BitmapOp::And, true) => {}
                            (BitmapOp::And, false) => {
                                self.put_color(target, px, py, Color::BLACK)?
                            }
                            (BitmapOp::Xor, true) => {
                                let (mx, my) = self.map(target, px, py)?;
                                target.invert_pixel(mx, my)?;
                            }
                            (BitmapOp::Xor, false) => {}
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // Text --------------------------------------------------------------------

    /// Render `text` with the current font, anchored at `(x, y)` per the
    /// style's alignment.
    ///
    /// Glyph rows are packed into a scratch one-bit bitmap first — one
    /// byte per row per character for fonts up to 8 pixels wide, two
    /// characters per byte for 4-wide fonts, and two characters per
    /// 3-byte group for 12-wide fonts (char 0 in byte 0 plus the high
    /// nibble of byte 1, char 1 in the low nibble of byte 1 plus byte 2)
    /// — then blitted through [`draw_bitmap`](Self::draw_bitmap) with the
    /// style's raster op and scale.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NoFont`] immediately when no font is set.
    pub fn draw_text(
        &self,
        target: &mut FrameBuffer,
        text: &str,
        x: u32,
        y: u32,
        style: TextStyle,
    ) -> Result<(), CanvasError> {
        let font = self.font.ok_or(CanvasError::NoFont)?;
        if style.scale == 0 {
            return Err(BufferError::InvalidDimensions.into());
        }
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return Ok(());
        }
        let bitmap = pack_glyphs(font, text)?;
        let total = (chars * font.width() * style.scale) as i64;
        let start = x as i64
            - match style.align {
                TextAlign::Left => 0,
                TextAlign::Center => total / 2,
                TextAlign::Right => total,
            };
        if start < 0 {
            return Err(BufferError::OutOfBounds.into());
        }
        self.draw_bitmap(target, &bitmap, start as u32, y, style.op, style.scale)
    }
}

/// Row-pack every glyph of `text` into one string-wide Mono1 bitmap.
fn pack_glyphs(font: &Font<'_>, text: &str) -> Result<FrameBuffer, CanvasError> {
    let w = font.width();
    let chars = text.chars().count() as u32;
    let mut bitmap = FrameBuffer::new(chars * w, font.height(), ColorMode::Mono1);
    for (i, c) in text.chars().enumerate() {
        let glyph = font.glyph(c);
        for row in 0..font.height() {
            // Row bits, MSB-aligned into a u16.
            let base = row as usize * font.bytes_per_row();
            let bits = if font.bytes_per_row() == 1 {
                (glyph[base] as u16) << 8
            } else {
                ((glyph[base] as u16) << 8) | glyph[base + 1] as u16
            };
            for col in 0..w {
                if bits & (0x8000 >> col) != 0 {
                    bitmap.set_pixel(i as u32 * w + col, row, Color::WHITE)?;
                }
            }
        }
    }
    Ok(bitmap)
}

/// x of the edge `(x0, y0)`-`(x1, y1)` at scanline `y` (integer walk).
fn edge_x(x0: i64, y0: i64, x1: i64, y1: i64, y: i64) -> i64 {
    x0 + (x1 - x0) * (y - y0) / (y1 - y0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
