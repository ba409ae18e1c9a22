use derive_more::Constructor;

pub mod affine;
pub mod flip;

pub use flip::{blit_corners, resolve_box, BlitCorners, Flip};

#[derive(Constructor, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> From<(T, T)> for Point<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Constructor, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size<T> {
    pub w: T,
    pub h: T,
}

impl<T> From<(T, T)> for Size<T> {
    fn from((w, h): (T, T)) -> Self {
        Self::new(w, h)
    }
}

/// A rectangle in image pixel space, with (0; 0) representing the top-left corner.
#[derive(Constructor, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
}

impl<T> From<(T, T, T, T)> for Rect<T> {
    fn from((x, y, w, h): (T, T, T, T)) -> Self {
        Self::new(x, y, w, h)
    }
}

impl<T: Default> From<Size<T>> for Rect<T> {
    fn from(value: Size<T>) -> Self {
        Self::new(T::default(), T::default(), value.w, value.h)
    }
}

impl From<&Rect<u32>> for Rect<i32> {
    fn from(value: &Rect<u32>) -> Self {
        Self::new(
            value.x as i32,
            value.y as i32,
            value.w as i32,
            value.h as i32,
        )
    }
}

impl Rect<u32> {
    #[inline]
    pub fn size(&self) -> Size<u32> {
        Size::new(self.w, self.h)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Whether the whole rectangle lies inside an image of the given size.
    pub fn fits_within(&self, size: Size<u32>) -> bool {
        self.x as u64 + self.w as u64 <= size.w as u64
            && self.y as u64 + self.h as u64 <= size.h as u64
    }

    /// Natural (unflipped) corners of this rectangle.
    pub fn corners(&self) -> Corners<u32> {
        Corners::new(
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y + self.h),
        )
    }
}

impl Rect<i32> {
    /// Two rectangles intersect when they share at least one pixel.
    /// Empty rectangles never intersect anything.
    pub fn intersects(&self, other: &Rect<i32>) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }

        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn translate(&self, offset: Point<i32>) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

impl Rect<f32> {
    #[inline]
    pub fn contains(&self, point: Point<f32>) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.w
            && point.y < self.y + self.h
    }

    #[inline]
    pub fn points(&self) -> [Point<f32>; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y),
            Point::new(self.x + self.w, self.y + self.h),
            Point::new(self.x, self.y + self.h),
        ]
    }
}

/// Defines a rectangle by two dots.
/// Since we are not storing position and size here, by switching points
/// we can change rectangles orientation
///  ---     ---
/// | / |   | \ |
///  ---     ---
#[derive(Constructor, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Corners<T> {
    pub a: Point<T>,
    pub b: Point<T>,
}

impl<T: Copy> Corners<T> {
    pub fn flip_x(self) -> Self {
        Self::new(Point::new(self.b.x, self.a.y), Point::new(self.a.x, self.b.y))
    }

    pub fn flip_y(self) -> Self {
        Self::new(Point::new(self.a.x, self.b.y), Point::new(self.b.x, self.a.y))
    }

    #[inline]
    pub fn points(&self) -> [Point<T>; 4] {
        [
            Point::new(self.a.x, self.a.y),
            Point::new(self.b.x, self.a.y),
            Point::new(self.b.x, self.b.y),
            Point::new(self.a.x, self.b.y),
        ]
    }
}

impl Corners<i32> {
    /// Whether `a` is to the right of `b`, i.e. the horizontal axis is mirrored.
    #[inline]
    pub fn is_mirrored_x(&self) -> bool {
        self.a.x > self.b.x
    }

    #[inline]
    pub fn is_mirrored_y(&self) -> bool {
        self.a.y > self.b.y
    }

    /// The axis aligned rectangle covered by these corners, regardless of orientation.
    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(
            self.a.x.min(self.b.x),
            self.a.y.min(self.b.y),
            (self.a.x - self.b.x).abs(),
            (self.a.y - self.b.y).abs(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        let size = Size::new(64, 32);
        let fits = |x, y, w, h| Rect::<u32>::new(x, y, w, h).fits_within(size);

        assert!(fits(0, 0, 64, 32));
        assert!(fits(60, 30, 4, 2));
        assert!(!fits(60, 30, 5, 2));
        assert!(!fits(u32::MAX, 0, 1, 1));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::<i32>::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
        assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
        assert!(!a.intersects(&Rect::new(2, 2, 0, 5)));
    }

    #[test]
    fn test_corner_orientation() {
        let corners = Corners::<i32>::new(Point::new(0, 0), Point::new(4, 2));
        let flipped = corners.flip_x();

        assert!(flipped.is_mirrored_x());
        assert!(!flipped.is_mirrored_y());
        assert_eq!(flipped.bounds(), corners.bounds());
        assert_eq!(flipped.flip_x(), corners);
    }
}
