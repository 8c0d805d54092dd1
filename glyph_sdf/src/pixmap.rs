// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A straight-alpha RGBA8 render target.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::Rgba8;

/// A `width` by `height` grid of colors, stored row by row with row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    width: u16,
    height: u16,
    buf: Vec<Rgba8>,
}

impl Pixmap {
    /// Transparent black, the initial color of every pixel.
    pub const CLEAR: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Creates a pixmap filled with [`CLEAR`](Self::CLEAR).
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buf: vec![Self::CLEAR; usize::from(width) * usize::from(height)],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Rgba8) {
        self.buf.fill(color);
    }

    /// The pixel at column `x` of row `y`, or `None` outside the pixmap.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgba8> {
        (x < self.width && y < self.height).then(|| self.buf[self.index(x, y)])
    }

    /// Overwrites one pixel. Out of range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgba8) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.buf[idx] = color;
        }
    }

    /// All pixels, row by row.
    pub fn data(&self) -> &[Rgba8] {
        &self.buf
    }

    /// All pixels, row by row, mutably.
    pub fn data_mut(&mut self) -> &mut [Rgba8] {
        &mut self.buf
    }

    /// All pixels as RGBA bytes.
    pub fn data_as_u8_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buf)
    }

    /// Consumes the pixmap and returns its pixels.
    pub fn take(self) -> Vec<Rgba8> {
        self.buf
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Encodes the pixmap as an 8-bit RGBA PNG.
    #[cfg(feature = "png")]
    pub fn write_png<W: std::io::Write>(&self, writer: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width.into(), self.height.into());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.data_as_u8_slice())?;
        writer.finish()
    }

    /// Writes the pixmap to a PNG file, creating parent directories as needed.
    #[cfg(feature = "png")]
    pub fn save_png(&self, path: &std::path::Path) -> std::io::Result<()> {
        use std::io::BufWriter;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_png(BufWriter::new(file))
            .map_err(std::io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8 {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    #[test]
    fn pixels_are_row_major() {
        let mut pixmap = Pixmap::new(3, 2);
        pixmap.set_pixel(2, 1, RED);
        assert_eq!(pixmap.data()[5], RED);
        assert_eq!(pixmap.pixel(2, 1), Some(RED));
        assert_eq!(pixmap.pixel(3, 0), None);
        assert_eq!(&pixmap.data_as_u8_slice()[20..24], &[255, 0, 0, 255]);
    }

    #[test]
    fn new_pixmap_is_clear() {
        let pixmap = Pixmap::new(3, 5);
        assert_eq!(pixmap.data().len(), 15);
        assert!(
            pixmap.data_as_u8_slice().iter().all(|&b| b == 0),
            "every channel starts at zero"
        );
        assert_eq!(pixmap.take(), vec![Pixmap::CLEAR; 15]);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut pixmap = Pixmap::new(2, 2);
        pixmap.fill(RED);
        pixmap.set_pixel(5, 5, Pixmap::CLEAR);
        assert!(pixmap.data().iter().all(|&p| p == RED), "no pixel may change");
    }

    #[cfg(feature = "png")]
    #[test]
    fn encodes_png_signature() {
        let mut pixmap = Pixmap::new(4, 4);
        pixmap.fill(RED);
        let mut bytes = Vec::new();
        pixmap.write_png(&mut bytes).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[cfg(feature = "png")]
    #[test]
    fn saves_png_into_new_directory() {
        let dir = std::env::temp_dir().join(alloc::format!(
            "glyph_sdf_pixmap_{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("red.png");
        let mut pixmap = Pixmap::new(2, 3);
        pixmap.fill(RED);
        pixmap.save_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let mut expected = Vec::new();
        pixmap.write_png(&mut expected).unwrap();
        assert_eq!(bytes, expected);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
