use std::{cell::Cell, rc::Rc};

use nalgebra::Matrix3;
use rgb::RGBA8;
use yasa_geometry::affine::{transform_point, transform_rect};

use crate::{
    image_cache::{ImageCache, ImageHandle},
    Corners, Image, Point, Raster, Rect, Size, Surface,
};

/// A copy of an image "uploaded" to a [SoftwareSurface].
/// It is lost once the surface bumps its generation.
pub struct SoftwareImage {
    raster: Raster,
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl ImageHandle for SoftwareImage {
    fn is_lost(&self) -> bool {
        self.generation != self.current.get()
    }
}

/// A CPU surface drawing into a [Raster] with nearest neighbour sampling.
pub struct SoftwareSurface {
    target: Raster,
    transform: Matrix3<f32>,
    clip: Option<Rect<f32>>,
    outline_color: RGBA8,
    images: ImageCache<SoftwareImage>,
    generation: Rc<Cell<u64>>,
    uploads: usize,
}

impl SoftwareSurface {
    pub fn new(size: Size<u32>) -> Self {
        Self {
            target: Raster::new(size),
            transform: Matrix3::identity(),
            clip: None,
            outline_color: RGBA8::new(255, 0, 0, 255),
            images: ImageCache::default(),
            generation: Rc::new(Cell::new(0)),
            uploads: 0,
        }
    }

    #[inline]
    pub fn target(&self) -> &Raster {
        &self.target
    }

    pub fn into_raster(self) -> Raster {
        self.target
    }

    pub fn clear(&mut self) {
        self.target = Raster::new(self.target.size());
    }

    pub fn set_outline_color(&mut self, color: RGBA8) {
        self.outline_color = color;
    }

    /// Invalidates every uploaded image, the way a lost graphics context would.
    pub fn lose_images(&mut self) {
        self.generation.set(self.generation.get() + 1);
        self.images.purge_lost();
    }

    /// How many times an image had to be (re)uploaded.
    #[inline]
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Pixel range of the target covered by a device space rectangle.
    fn covered(&self, device: &Rect<f32>) -> (u32, u32, u32, u32) {
        let size = self.target.size();
        let x0 = device.x.floor().max(0.) as u32;
        let y0 = device.y.floor().max(0.) as u32;
        let x1 = (device.x + device.w).ceil().clamp(0., size.w as f32) as u32;
        let y1 = (device.y + device.h).ceil().clamp(0., size.h as f32) as u32;
        (x0, y0, x1, y1)
    }

    fn is_clipped(&self, point: Point<f32>) -> bool {
        self.clip.map_or(false, |clip| !clip.contains(point))
    }
}

fn blend(dst: RGBA8, src: RGBA8) -> RGBA8 {
    if src.a == 255 {
        return src;
    }

    let a = src.a as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
    RGBA8::new(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        (a + dst.a as u32 * (255 - a) / 255) as u8,
    )
}

impl Surface for SoftwareSurface {
    fn blit(&mut self, image: &Image, src: &Corners<u32>, dst: &Corners<i32>) {
        let Some(inverse) = self.transform.try_inverse() else {
            return;
        };

        let sw = src.b.x.saturating_sub(src.a.x);
        let sh = src.b.y.saturating_sub(src.a.y);
        let (dx, dy) = (dst.a.x as f32, dst.a.y as f32);
        let dw = (dst.b.x - dst.a.x) as f32;
        let dh = (dst.b.y - dst.a.y) as f32;
        if sw == 0 || sh == 0 || dw == 0. || dh == 0. {
            return;
        }

        let quad = Rect::new(dx.min(dx + dw), dy.min(dy + dh), dw.abs(), dh.abs());
        let (x0, y0, x1, y1) = self.covered(&transform_rect(&self.transform, &quad));

        let generation = self.generation.clone();
        let uploads = &mut self.uploads;
        let handle = self.images.get_or_create(image, |raster| {
            *uploads += 1;
            SoftwareImage {
                raster: raster.clone(),
                generation: generation.get(),
                current: generation.clone(),
            }
        });

        for py in y0..y1 {
            for px in x0..x1 {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if self.clip.map_or(false, |clip| !clip.contains(center)) {
                    continue;
                }

                // Relative position inside the destination quad, from corner `a` to `b`
                let p = transform_point(&inverse, center);
                let u = (p.x - dx) / dw;
                let v = (p.y - dy) / dh;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }

                let sx = src.a.x + ((u * sw as f32) as u32).min(sw - 1);
                let sy = src.a.y + ((v * sh as f32) as u32).min(sh - 1);
                let Some(color) = handle.raster.pixel(sx, sy) else {
                    continue;
                };

                if color.a > 0 {
                    let below = self.target.pixel(px, py).unwrap_or_default();
                    self.target.put_pixel(px, py, blend(below, color));
                }
            }
        }
    }

    fn outline(&mut self, rect: &Rect<i32>) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }

        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.x + rect.w - 1, rect.y + rect.h - 1);
        let horizontal = (left..=right).flat_map(|x| [(x, top), (x, bottom)]);
        let vertical = (top..=bottom).flat_map(|y| [(left, y), (right, y)]);

        for (x, y) in horizontal.chain(vertical) {
            let center = transform_point(
                &self.transform,
                Point::new(x as f32 + 0.5, y as f32 + 0.5),
            );
            if self.is_clipped(center) || center.x < 0. || center.y < 0. {
                continue;
            }

            self.target
                .put_pixel(center.x as u32, center.y as u32, self.outline_color);
        }
    }

    fn transform(&self) -> Matrix3<f32> {
        self.transform
    }

    fn set_transform(&mut self, transform: Matrix3<f32>) {
        self.transform = transform;
    }

    fn clip(&self) -> Option<Rect<f32>> {
        self.clip
    }

    fn set_clip(&mut self, clip: Option<Rect<f32>>) {
        self.clip = clip;
    }
}
