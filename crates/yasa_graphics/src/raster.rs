use rgb::{ComponentBytes, FromSlice, RGBA8};

use crate::{Rect, Size};

/// A decoded RGBA8 image kept in CPU memory, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    size: Size<u32>,
    pixels: Vec<RGBA8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster").field("size", &self.size).finish()
    }
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(size: Size<u32>) -> Self {
        Self::filled(size, RGBA8::new(0, 0, 0, 0))
    }

    pub fn filled(size: Size<u32>, color: RGBA8) -> Self {
        Self {
            size,
            pixels: vec![color; size.w as usize * size.h as usize],
        }
    }

    /// Returns `None` if the pixel count does not match the size.
    pub fn from_pixels(size: Size<u32>, pixels: Vec<RGBA8>) -> Option<Self> {
        match pixels.len() == size.w as usize * size.h as usize {
            true => Some(Self { size, pixels }),
            false => None,
        }
    }

    /// Builds a raster from tightly packed RGBA bytes.
    pub fn from_bytes(size: Size<u32>, bytes: &[u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }

        Self::from_pixels(size, bytes.as_rgba().to_vec())
    }

    #[inline]
    pub fn size(&self) -> Size<u32> {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.h
    }

    #[inline]
    pub fn pixels(&self) -> &[RGBA8] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        match x < self.size.w && y < self.size.h {
            true => Some(y as usize * self.size.w as usize + x as usize),
            false => None,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBA8> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Writes a pixel, ignoring coordinates outside of the raster.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: RGBA8) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Copies a rectangle of pixels into a new raster.
    /// Returns `None` if the rectangle is not fully inside this raster.
    pub fn copy_region(&self, region: &Rect<u32>) -> Option<Raster> {
        if !region.fits_within(self.size) {
            return None;
        }

        let mut pixels = Vec::with_capacity(region.w as usize * region.h as usize);
        for y in region.y..region.y + region.h {
            let start = y as usize * self.size.w as usize + region.x as usize;
            pixels.extend_from_slice(&self.pixels[start..start + region.w as usize]);
        }

        Some(Raster {
            size: region.size(),
            pixels,
        })
    }
}
