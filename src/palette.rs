//! Indexed-color palettes.
//!
//! An indexed-mode buffer owns a [`Palette`] of 4 or 16 slots. Slots start
//! unset; writing a pixel before any slot is configured is an error, and
//! arbitrary colors resolve to the nearest configured entry.

use crate::buffer::BufferError;
use crate::color::Color;
use crate::format::ColorMode;

/// Fixed-capacity color palette for [`Indexed2`](ColorMode::Indexed2) and
/// [`Indexed4`](ColorMode::Indexed4) buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: [Option<Color>; 16],
    capacity: usize,
}

impl Palette {
    /// Empty 4-entry palette (for 2-bit indexed buffers).
    pub const fn four() -> Self {
        Self {
            entries: [None; 16],
            capacity: 4,
        }
    }

    /// Empty 16-entry palette (for 4-bit indexed buffers).
    pub const fn sixteen() -> Self {
        Self {
            entries: [None; 16],
            capacity: 16,
        }
    }

    /// Empty palette sized for `mode`, or `None` for direct-color modes.
    pub(crate) fn for_mode(mode: ColorMode) -> Option<Self> {
        match mode.palette_len()? {
            4 => Some(Self::four()),
            _ => Some(Self::sixteen()),
        }
    }

    /// Number of slots (4 or 16).
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if no slot has been configured yet.
    pub fn is_empty(&self) -> bool {
        self.entries[..self.capacity].iter().all(Option::is_none)
    }

    /// Configure the slot at `index`.
    pub fn set(&mut self, index: u8, color: Color) -> Result<(), BufferError> {
        if index as usize >= self.capacity {
            return Err(BufferError::PaletteIndexOutOfRange);
        }
        self.entries[index as usize] = Some(color);
        Ok(())
    }

    /// Color stored at `index`, `None` if beyond capacity or unset.
    #[inline]
    pub fn get(&self, index: u8) -> Option<Color> {
        if index as usize >= self.capacity {
            return None;
        }
        self.entries[index as usize]
    }

    /// Index of the configured entry closest to `color`.
    ///
    /// Distance is squared Euclidean over R/G/B (alpha ignored). An exact
    /// match returns immediately; ties go to the lowest index.
    ///
    /// # Errors
    ///
    /// [`BufferError::PaletteEmpty`] if no slot is configured.
    pub fn nearest(&self, color: Color) -> Result<u8, BufferError> {
        let mut best: Option<(u8, u32)> = None;
        for (i, slot) in self.entries[..self.capacity].iter().enumerate() {
            let Some(entry) = slot else { continue };
            let dr = entry.r.abs_diff(color.r) as u32;
            let dg = entry.g.abs_diff(color.g) as u32;
            let db = entry.b.abs_diff(color.b) as u32;
            let dist = dr * dr + dg * dg + db * db;
            if dist == 0 {
                return Ok(i as u8);
            }
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((i as u8, dist));
            }
        }
        best.map(|(i, _)| i).ok_or(BufferError::PaletteEmpty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities() {
        assert_eq!(Palette::four().capacity(), 4);
        assert_eq!(Palette::sixteen().capacity(), 16);
        assert_eq!(
            Palette::for_mode(ColorMode::Indexed2).unwrap().capacity(),
            4
        );
        assert_eq!(
            Palette::for_mode(ColorMode::Indexed4).unwrap().capacity(),
            16
        );
        assert!(Palette::for_mode(ColorMode::Rgb565).is_none());
    }

    #[test]
    fn set_and_get() {
        let mut p = Palette::four();
        assert!(p.is_empty());
        p.set(2, Color::RED).unwrap();
        assert!(!p.is_empty());
        assert_eq!(p.get(2), Some(Color::RED));
        assert_eq!(p.get(0), None);
        assert_eq!(p.set(4, Color::RED), Err(BufferError::PaletteIndexOutOfRange));
    }

    // --- nearest-match search ---

    #[test]
    fn nearest_empty_palette_fails() {
        assert_eq!(
            Palette::four().nearest(Color::RED),
            Err(BufferError::PaletteEmpty)
        );
    }

    #[test]
    fn nearest_exact_match_short_circuits() {
        let mut p = Palette::sixteen();
        p.set(0, Color::BLACK).unwrap();
        p.set(5, Color::RED).unwrap();
        assert_eq!(p.nearest(Color::RED), Ok(5));
    }

    #[test]
    fn nearest_uses_squared_distance() {
        let mut p = Palette::four();
        p.set(0, Color::new(0, 0, 0)).unwrap();
        p.set(1, Color::new(200, 200, 200)).unwrap();
        // (100,100,100) is 30000 from black, 30000 from the light gray:
        // a tie, so the lowest index wins.
        assert_eq!(p.nearest(Color::new(100, 100, 100)), Ok(0));
        // One step brighter tips it to the light entry.
        assert_eq!(p.nearest(Color::new(101, 101, 101)), Ok(1));
    }

    #[test]
    fn nearest_skips_unset_slots() {
        let mut p = Palette::sixteen();
        p.set(9, Color::BLUE).unwrap();
        assert_eq!(p.nearest(Color::WHITE), Ok(9));
    }

    #[test]
    fn nearest_ignores_alpha() {
        let mut p = Palette::four();
        p.set(0, Color::with_alpha(10, 10, 10, 0)).unwrap();
        assert_eq!(p.nearest(Color::new(10, 10, 10)), Ok(0));
    }
}
