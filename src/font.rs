//! Glyph table descriptors.
//!
//! A [`Font`] is a read-only view over externally supplied glyph data —
//! this crate consumes font tables, it never produces them. Tables cover a
//! contiguous run of ASCII characters; anything outside the run resolves
//! to the space glyph rather than an error.
//!
//! Row storage: glyphs up to 8 pixels wide store one byte per row, wider
//! glyphs (9–16) two bytes per row, pixels MSB-aligned in both cases.

use core::fmt;

/// Errors from font table construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontError {
    /// Table length does not match `glyph_count * bytes_per_glyph`.
    LengthMismatch,
    /// Glyph width outside 1..=16 or height 0.
    UnsupportedGeometry,
    /// The covered character range does not include the space character,
    /// which is the mandatory fallback glyph.
    MissingSpace,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch => write!(f, "glyph table length does not match geometry"),
            Self::UnsupportedGeometry => write!(f, "glyph width must be 1..=16 and height > 0"),
            Self::MissingSpace => write!(f, "glyph range must cover the space character"),
        }
    }
}

/// Fixed-cell bitmap font over a borrowed glyph table.
#[derive(Clone, Copy)]
pub struct Font<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    first: u8,
    glyph_count: usize,
}

impl<'a> Font<'a> {
    /// Wrap a glyph table.
    ///
    /// `first` is the character code of the first glyph; the table holds
    /// `glyph_count` consecutive glyphs of `width` x `height` pixels each.
    ///
    /// # Errors
    ///
    /// See [`FontError`]. The space character must be inside the covered
    /// range because unknown characters fall back to it.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        first: u8,
        glyph_count: usize,
    ) -> Result<Self, FontError> {
        if width == 0 || width > 16 || height == 0 {
            return Err(FontError::UnsupportedGeometry);
        }
        let font = Self {
            data,
            width,
            height,
            first,
            glyph_count,
        };
        if data.len() != glyph_count * font.bytes_per_glyph() {
            return Err(FontError::LengthMismatch);
        }
        if !font.covers(b' ') {
            return Err(FontError::MissingSpace);
        }
        Ok(font)
    }

    /// Glyph cell width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Glyph cell height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per glyph row: 1 up to 8 pixels wide, 2 beyond.
    #[inline]
    pub const fn bytes_per_row(&self) -> usize {
        if self.width <= 8 { 1 } else { 2 }
    }

    /// Bytes per stored glyph.
    #[inline]
    pub const fn bytes_per_glyph(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }

    const fn covers(&self, code: u8) -> bool {
        code >= self.first && ((code - self.first) as usize) < self.glyph_count
    }

    /// Row bytes of the glyph for `c`.
    ///
    /// Characters outside the table — including non-ASCII — resolve to the
    /// space glyph, never to an error.
    pub fn glyph(&self, c: char) -> &'a [u8] {
        let code = if c.is_ascii() && self.covers(c as u8) {
            c as u8
        } else {
            b' '
        };
        let start = (code - self.first) as usize * self.bytes_per_glyph();
        &self.data[start..start + self.bytes_per_glyph()]
    }
}

impl fmt::Debug for Font<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Font({}x{}, {} glyphs from {:?})",
            self.width, self.height, self.glyph_count, self.first as char
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Space, '!', '"' at 8x3.
    const TABLE: [u8; 9] = [
        0x00, 0x00, 0x00, // ' '
        0x80, 0x80, 0x80, // '!'
        0xA0, 0xA0, 0x00, // '"'
    ];

    #[test]
    fn construction_validates_geometry() {
        assert!(Font::new(&TABLE, 8, 3, b' ', 3).is_ok());
        assert_eq!(
            Font::new(&TABLE, 0, 3, b' ', 3).unwrap_err(),
            FontError::UnsupportedGeometry
        );
        assert_eq!(
            Font::new(&TABLE, 17, 3, b' ', 3).unwrap_err(),
            FontError::UnsupportedGeometry
        );
        assert_eq!(
            Font::new(&TABLE, 8, 4, b' ', 3).unwrap_err(),
            FontError::LengthMismatch
        );
        // Table starting beyond space has no fallback glyph.
        assert_eq!(
            Font::new(&TABLE, 8, 3, b'0', 3).unwrap_err(),
            FontError::MissingSpace
        );
    }

    #[test]
    fn glyph_lookup() {
        let font = Font::new(&TABLE, 8, 3, b' ', 3).unwrap();
        assert_eq!(font.glyph('!'), &[0x80, 0x80, 0x80]);
        assert_eq!(font.glyph('"'), &[0xA0, 0xA0, 0x00]);
    }

    #[test]
    fn unknown_chars_fall_back_to_space() {
        let font = Font::new(&TABLE, 8, 3, b' ', 3).unwrap();
        assert_eq!(font.glyph('Z'), font.glyph(' '));
        assert_eq!(font.glyph('é'), font.glyph(' '));
    }

    #[test]
    fn wide_fonts_use_two_bytes_per_row() {
        let table = [0u8; 12]; // 2 glyphs, 12x3
        let font = Font::new(&table, 12, 3, b' ', 2).unwrap();
        assert_eq!(font.bytes_per_row(), 2);
        assert_eq!(font.bytes_per_glyph(), 6);
        assert_eq!(font.glyph(' ').len(), 6);
    }
}
