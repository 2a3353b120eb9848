//! embedded-graphics integration (feature `graphics`).
//!
//! [`FrameBuffer`] implements [`DrawTarget`], so the whole
//! embedded-graphics ecosystem — primitives, text, images — can render
//! into any of the packed encodings. Out-of-frame pixels are dropped per
//! the `DrawTarget` contract; palette failures of indexed targets still
//! surface as [`BufferError`].

use embedded_graphics_core::Pixel;
use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::PixelColor;
use embedded_graphics_core::primitives::Rectangle;

use crate::buffer::{BufferError, FrameBuffer};
use crate::color::Color;

impl PixelColor for Color {
    type Raw = ();
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Color;
    type Error = BufferError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= self.width() || y >= self.height() {
                continue;
            }
            self.set_pixel(x, y, color)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let x0 = (area.top_left.x as i64).clamp(0, w);
        let y0 = (area.top_left.y as i64).clamp(0, h);
        let x1 = (area.top_left.x as i64 + area.size.width as i64).clamp(0, w);
        let y1 = (area.top_left.y as i64 + area.size.height as i64).clamp(0, h);
        if x0 < x1 && y0 < y1 {
            self.fill_rect(
                x0 as u32,
                y0 as u32,
                (x1 - x0) as u32,
                (y1 - y0) as u32,
                color,
            )?;
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ColorMode;
    use embedded_graphics_core::geometry::Point;

    #[test]
    fn size_reports_dimensions() {
        let buf = FrameBuffer::new(32, 16, ColorMode::Mono1);
        assert_eq!(buf.size(), Size::new(32, 16));
    }

    #[test]
    fn draw_iter_writes_pixels() {
        let mut buf = FrameBuffer::new(8, 8, ColorMode::Rgb565);
        buf.draw_iter([
            Pixel(Point::new(1, 2), Color::RED),
            Pixel(Point::new(3, 4), Color::BLUE),
        ])
        .unwrap();
        assert_eq!(
            buf.get_pixel(1, 2).unwrap(),
            Color::from_rgb565(Color::RED.to_rgb565())
        );
        assert_eq!(
            buf.get_pixel(3, 4).unwrap(),
            Color::from_rgb565(Color::BLUE.to_rgb565())
        );
    }

    #[test]
    fn draw_iter_drops_out_of_frame_pixels() {
        let mut buf = FrameBuffer::new(4, 4, ColorMode::Mono1);
        buf.draw_iter([
            Pixel(Point::new(-1, 0), Color::WHITE),
            Pixel(Point::new(0, 9), Color::WHITE),
            Pixel(Point::new(2, 2), Color::WHITE),
        ])
        .unwrap();
        // (2, 2) is linear bit 10.
        assert_eq!(buf.bytes(), &[0x00, 0b0010_0000]);
    }

    #[test]
    fn fill_solid_clips_to_frame() {
        let mut buf = FrameBuffer::new(8, 8, ColorMode::Rgb332);
        buf.fill_solid(
            &Rectangle::new(Point::new(-2, 6), Size::new(4, 10)),
            Color::WHITE,
        )
        .unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let inside = x < 2 && y >= 6;
                let expect = if inside { 0xFF } else { 0x00 };
                assert_eq!(buf.bytes()[(y * 8 + x) as usize], expect, "({x},{y})");
            }
        }
    }

    #[test]
    fn clear_fills_whole_frame() {
        let mut buf = FrameBuffer::new(8, 2, ColorMode::Mono1);
        buf.clear(Color::WHITE).unwrap();
        assert_eq!(buf.bytes(), &[0xFF, 0xFF]);
    }
}
