use nalgebra::{Matrix3, Point2};

use crate::{Point, Rect};

/// Transforms a point with a homogeneous 2D affine matrix.
#[inline]
pub fn transform_point(transform: &Matrix3<f32>, point: Point<f32>) -> Point<f32> {
    let p = transform.transform_point(&Point2::new(point.x, point.y));
    Point::new(p.x, p.y)
}

/// Axis aligned bounds of a rectangle after it has been transformed.
pub fn transform_rect(transform: &Matrix3<f32>, rect: &Rect<f32>) -> Rect<f32> {
    let points = rect.points().map(|p| transform_point(transform, p));
    bounds(&points)
}

pub fn bounds(points: &[Point<f32>]) -> Rect<f32> {
    if points.is_empty() {
        return Rect::default();
    }

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

pub fn translation(x: f32, y: f32) -> Matrix3<f32> {
    Matrix3::new_translation(&nalgebra::Vector2::new(x, y))
}

pub fn scale(x: f32, y: f32) -> Matrix3<f32> {
    Matrix3::new_nonuniform_scaling(&nalgebra::Vector2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_rect_bounds() {
        let rect = Rect::new(1., 1., 2., 3.);

        let moved = transform_rect(&translation(10., -1.), &rect);
        assert_eq!(moved, Rect::new(11., 0., 2., 3.));

        let mirrored = transform_rect(&scale(-1., 2.), &rect);
        assert_eq!(mirrored, Rect::new(-3., 2., 2., 6.));
    }

    #[test]
    fn test_empty_bounds() {
        assert_eq!(bounds(&[]), Rect::default());
    }
}
