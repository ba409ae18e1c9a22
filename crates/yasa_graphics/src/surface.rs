use std::ops::{Deref, DerefMut};

use nalgebra::Matrix3;
use yasa_geometry::affine::transform_rect;

use crate::{Corners, Image, Rect};

/// A 2D drawing target.
///
/// Coordinates passed to drawing calls are in untransformed surface space;
/// the surface applies its current transform and clip.
pub trait Surface {
    /// Copies the `src` rectangle of `image` onto the `dst` quad.
    ///
    /// `src` is always in natural orientation. Destination corners may be swapped
    /// on either axis, which mirrors the copy along that axis.
    fn blit(&mut self, image: &Image, src: &Corners<u32>, dst: &Corners<i32>);

    /// Strokes the outline of a rectangle one pixel wide.
    fn outline(&mut self, rect: &Rect<i32>);

    fn transform(&self) -> Matrix3<f32>;

    fn set_transform(&mut self, transform: Matrix3<f32>);

    /// Clip rectangle in device space. `None` means the whole surface.
    fn clip(&self) -> Option<Rect<f32>>;

    fn set_clip(&mut self, clip: Option<Rect<f32>>);
}

/// Overrides the transform of a surface until dropped. The clip is carried
/// through the same transform. Both are restored on drop, including when
/// the scope is left by unwinding.
pub struct TransformScope<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    transform: Matrix3<f32>,
    clip: Option<Rect<f32>>,
}

impl<'a, S: Surface + ?Sized> TransformScope<'a, S> {
    pub fn new(surface: &'a mut S, transform: &Matrix3<f32>) -> Self {
        let previous_transform = surface.transform();
        let previous_clip = surface.clip();

        surface.set_transform(*transform);
        surface.set_clip(previous_clip.map(|clip| transform_rect(transform, &clip)));

        Self {
            surface,
            transform: previous_transform,
            clip: previous_clip,
        }
    }
}

impl<'a, S: Surface + ?Sized> Deref for TransformScope<'a, S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.surface
    }
}

impl<'a, S: Surface + ?Sized> DerefMut for TransformScope<'a, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.surface
    }
}

impl<'a, S: Surface + ?Sized> Drop for TransformScope<'a, S> {
    fn drop(&mut self) {
        self.surface.set_transform(self.transform);
        self.surface.set_clip(self.clip);
    }
}

/// Runs `draw` with `transform` applied to the surface, then restores
/// the previous transform and clip.
pub fn with_transform<S, R>(
    surface: &mut S,
    transform: &Matrix3<f32>,
    draw: impl FnOnce(&mut S) -> R,
) -> R
where
    S: Surface + ?Sized,
{
    let mut scope = TransformScope::new(surface, transform);
    draw(&mut scope)
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use yasa_geometry::affine::{scale, translation};

    use super::*;
    use crate::{software::SoftwareSurface, Size};

    #[test]
    fn test_transform_and_clip_are_restored() {
        let mut surface = SoftwareSurface::new(Size::new(8, 8));
        surface.set_clip(Some(Rect::new(1., 1., 2., 2.)));

        let seen = with_transform(&mut surface, &scale(2., 2.), |s| (s.transform(), s.clip()));
        assert_eq!(seen.0, scale(2., 2.));
        assert_eq!(seen.1, Some(Rect::new(2., 2., 4., 4.)));

        assert_eq!(surface.transform(), Matrix3::identity());
        assert_eq!(surface.clip(), Some(Rect::new(1., 1., 2., 2.)));
    }

    #[test]
    fn test_restored_on_failure() {
        let mut surface = SoftwareSurface::new(Size::new(8, 8));

        let result: Result<(), &str> =
            with_transform(&mut surface, &translation(3., 0.), |_| Err("draw failed"));
        assert!(result.is_err());
        assert_eq!(surface.transform(), Matrix3::identity());

        let unwound = catch_unwind(AssertUnwindSafe(|| {
            with_transform(&mut surface, &translation(3., 0.), |_| panic!("draw panicked"))
        }));
        assert!(unwound.is_err());
        assert_eq!(surface.transform(), Matrix3::identity());
    }
}
