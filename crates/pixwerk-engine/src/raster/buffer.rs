// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owned RGBA raster and mutable rectangular views into it.

use image::{Rgba, RgbaImage};
use pixwerk_core::error::{PixwerkError, Result};
use pixwerk_core::types::Rect;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// In-memory RGBA8 raster, row-major with no padding.
///
/// Backed by an `image::RgbaImage`, so the storage is always exactly
/// `width * height * 4` bytes. Each processing call owns its buffer; filters
/// mutate it in place through a [`PixelView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Transparent black raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Raster filled with a single colour.
    pub fn from_pixel(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Wrap raw RGBA bytes. Fails if the length is not `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .filter(|_| actual == expected)
            .map(|image| Self { image })
            .ok_or(PixwerkError::InvalidBuffer { expected, actual })
    }

    /// Build a raster by evaluating `f` at every coordinate.
    pub fn from_fn(width: u32, height: u32, f: impl FnMut(u32, u32) -> Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_fn(width, height, f),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Rectangle covering the whole raster.
    pub fn bounds(&self) -> Rect {
        Rect::full(self.width(), self.height())
    }

    /// Read one pixel.
    pub fn get(&self, x: u32, y: u32) -> Result<Rgba<u8>> {
        self.check(x, y)?;
        Ok(*self.image.get_pixel(x, y))
    }

    /// Overwrite one pixel.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba<u8>) -> Result<()> {
        self.check(x, y)?;
        self.image.put_pixel(x, y, color);
        Ok(())
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    // -- Views ----------------------------------------------------------------

    /// Mutable window onto `rect`, sharing this buffer's storage.
    ///
    /// The rectangle must already lie inside the raster; use
    /// [`Rect::clamp_to`] first.
    pub fn view_mut(&mut self, rect: Rect) -> Result<PixelView<'_>> {
        let (width, height) = self.dimensions();
        if rect.right() > width || rect.bottom() > height {
            return Err(PixwerkError::OutOfBounds {
                x: rect.right().saturating_sub(1).max(rect.x),
                y: rect.bottom().saturating_sub(1).max(rect.y),
                width,
                height,
            });
        }
        Ok(PixelView {
            data: &mut self.image,
            stride: width as usize,
            rect,
        })
    }

    /// Mutable window onto the whole raster.
    pub fn full_view(&mut self) -> PixelView<'_> {
        let rect = self.bounds();
        let stride = rect.width as usize;
        PixelView {
            data: &mut self.image,
            stride,
            rect,
        }
    }

    fn check(&self, x: u32, y: u32) -> Result<()> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(PixwerkError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok(())
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

/// Rectangular window into a [`PixelBuffer`].
///
/// Coordinates are local to the window: `(0, 0)` is the window's top-left
/// pixel. Writes land directly in the parent buffer.
pub struct PixelView<'a> {
    data: &'a mut [u8],
    /// Width of the parent buffer in pixels.
    stride: usize,
    rect: Rect,
}

impl PixelView<'_> {
    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// Window position and size in parent-buffer coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Rgba<u8>> {
        let offset = self.offset(x, y)?;
        let mut px = [0u8; CHANNELS];
        px.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        Ok(Rgba(px))
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba<u8>) -> Result<()> {
        let offset = self.offset(x, y)?;
        self.data[offset..offset + CHANNELS].copy_from_slice(&color.0);
        Ok(())
    }

    /// Bytes of local row `y` covered by the window, or `None` past the bottom.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let range = self.row_range(y)?;
        Some(&self.data[range])
    }

    /// Mutable bytes of local row `y` covered by the window.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        let range = self.row_range(y)?;
        Some(&mut self.data[range])
    }

    fn row_range(&self, y: u32) -> Option<std::ops::Range<usize>> {
        if y >= self.rect.height {
            return None;
        }
        let start = ((self.rect.y + y) as usize * self.stride + self.rect.x as usize) * CHANNELS;
        Some(start..start + self.rect.width as usize * CHANNELS)
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.rect.width || y >= self.rect.height {
            return Err(PixwerkError::OutOfBounds {
                x,
                y,
                width: self.rect.width,
                height: self.rect.height,
            });
        }
        let px = (self.rect.y + y) as usize * self.stride + (self.rect.x + x) as usize;
        Ok(px * CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        match PixelBuffer::from_raw(2, 2, vec![0; 15]) {
            Err(PixwerkError::InvalidBuffer { expected, actual }) => {
                assert_eq!((expected, actual), (16, 15));
            }
            other => panic!("expected InvalidBuffer, got {:?}", other),
        }
        // Oversized input is also rejected rather than silently truncated.
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 20]).is_err());
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set(2, 1, Rgba([1, 2, 3, 4])).expect("in bounds");
        assert_eq!(buffer.get(2, 1).expect("in bounds"), Rgba([1, 2, 3, 4]));
        assert!(matches!(
            buffer.get(3, 0),
            Err(PixwerkError::OutOfBounds { x: 3, y: 0, .. })
        ));
        assert!(buffer.set(0, 2, Rgba([0, 0, 0, 0])).is_err());
    }

    #[test]
    fn view_writes_into_parent_storage() {
        let mut buffer = PixelBuffer::new(4, 4);
        {
            let mut view = buffer.view_mut(Rect::new(1, 2, 2, 2)).expect("inside");
            view.set(0, 0, Rgba([9, 9, 9, 9])).expect("local origin");
            view.set(1, 1, Rgba([7, 7, 7, 7])).expect("local corner");
            assert!(view.set(2, 0, Rgba([0, 0, 0, 0])).is_err());
        }
        assert_eq!(buffer.get(1, 2).ok(), Some(Rgba([9, 9, 9, 9])));
        assert_eq!(buffer.get(2, 3).ok(), Some(Rgba([7, 7, 7, 7])));
    }

    #[test]
    fn view_rejects_unclamped_rect() {
        let mut buffer = PixelBuffer::new(4, 4);
        assert!(matches!(
            buffer.view_mut(Rect::new(2, 2, 3, 1)),
            Err(PixwerkError::OutOfBounds { x: 4, y: 2, .. })
        ));
    }

    #[test]
    fn view_rows_cover_only_the_window() {
        let mut buffer = PixelBuffer::from_fn(4, 3, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let view = buffer.view_mut(Rect::new(1, 1, 2, 2)).expect("inside");
        assert_eq!(view.row(0), Some(&[1u8, 1, 0, 255, 2, 1, 0, 255][..]));
        assert!(view.row(2).is_none());
    }
}
