use derive_more::Constructor;

use crate::{Corners, Point, Rect, Size};

/// Mirroring of a drawn sprite along each axis. Stored geometry is never
/// flipped, only the mapping to the destination is.
#[derive(Constructor, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
    };
    pub const HORIZONTAL: Flip = Flip {
        horizontal: true,
        vertical: false,
    };
    pub const VERTICAL: Flip = Flip {
        horizontal: false,
        vertical: true,
    };
    pub const BOTH: Flip = Flip {
        horizontal: true,
        vertical: true,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        !self.horizontal && !self.vertical
    }

    pub fn toggle_horizontal(self) -> Self {
        Self::new(!self.horizontal, self.vertical)
    }

    pub fn toggle_vertical(self) -> Self {
        Self::new(self.horizontal, !self.vertical)
    }
}

/// A source rectangle on an atlas and the destination it should be copied to.
#[derive(Constructor, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitCorners {
    /// Always the natural orientation of the region.
    pub src: Corners<u32>,
    /// Corners are swapped on every flipped axis.
    pub dst: Corners<i32>,
}

/// Maps a region of an atlas to a destination with its top-left corner at `origin`.
///
/// Mirroring is expressed by swapping destination corners on a flipped axis,
/// so a single rectangle-to-quad copy draws the flipped sprite.
pub fn blit_corners(region: &Rect<u32>, origin: Point<i32>, flip: Flip) -> BlitCorners {
    let w = region.w as i32;
    let h = region.h as i32;

    let (x1, x2) = match flip.horizontal {
        true => (origin.x + w, origin.x),
        false => (origin.x, origin.x + w),
    };

    let (y1, y2) = match flip.vertical {
        true => (origin.y + h, origin.y),
        false => (origin.y, origin.y + h),
    };

    BlitCorners::new(
        region.corners(),
        Corners::new(Point::new(x1, y1), Point::new(x2, y2)),
    )
}

/// Positions a box, stored in unflipped sprite-local coordinates, in the
/// local space of a sprite of `size` drawn with `flip`.
pub fn resolve_box(bounds: &Rect<u32>, size: Size<u32>, flip: Flip) -> Rect<i32> {
    let x = match flip.horizontal {
        true => size.w as i32 - bounds.w as i32 - bounds.x as i32,
        false => bounds.x as i32,
    };

    let y = match flip.vertical {
        true => size.h as i32 - bounds.h as i32 - bounds.y as i32,
        false => bounds.y as i32,
    };

    Rect::new(x, y, bounds.w as i32, bounds.h as i32)
}
