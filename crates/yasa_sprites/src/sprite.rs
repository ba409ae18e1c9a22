use std::rc::{Rc, Weak};

use log::warn;
use nalgebra::Matrix3;
use serde_json::Value;
use yasa_assets::{fields::Fields, ValidationError};
use yasa_geometry::{blit_corners, resolve_box, Flip, Point, Rect, Size};
use yasa_graphics::{software::SoftwareSurface, with_transform, Image, Raster, Surface};

use crate::frame::{parse_boxes, NamedBox, NamedBoxes};

/// Immutable part of a static sprite, shared by every [SpriteDefinition]
/// handed out for it.
#[derive(Debug)]
pub struct SpriteTemplate {
    pub name: String,
    pub region: Rect<u32>,
    pub boxes: NamedBoxes,
    pub flip: Flip,
}

impl SpriteTemplate {
    pub(crate) fn from_value(value: &Value, sheet: &str) -> Result<Self, ValidationError> {
        let fields = Fields::new(value, format!("sheet '{sheet}' > sprite"))?;
        let name = fields.string("Name")?.to_owned();
        let fields = Fields::new(value, format!("sheet '{sheet}' > sprite '{name}'"))?;

        Ok(Self {
            region: fields.region()?,
            boxes: parse_boxes(&fields, &name)?,
            flip: read_flip(&fields)?,
            name,
        })
    }
}

pub(crate) fn read_flip(fields: &Fields) -> Result<Flip, ValidationError> {
    Ok(Flip::new(
        fields.optional_bool("Flipped Horizontally")?.unwrap_or(false),
        fields.optional_bool("Flipped Vertically")?.unwrap_or(false),
    ))
}

/// Blits `region` of the atlas image with its top-left corner at `position`.
/// Nothing is drawn if the atlas has been dropped.
pub(crate) fn draw_region<S: Surface + ?Sized>(
    image: &Weak<Image>,
    surface: &mut S,
    region: &Rect<u32>,
    position: Point<i32>,
    flip: Flip,
    what: &str,
) {
    let Some(image) = image.upgrade() else {
        warn!("Skipping draw of '{what}', its atlas image is gone");
        return;
    };

    let corners = blit_corners(region, position, flip);
    surface.blit(&image, &corners.src, &corners.dst);
}

/// A static single-frame sprite. Every lookup produces a new definition
/// with its own flip state.
#[derive(Debug, Clone)]
pub struct SpriteDefinition {
    template: Rc<SpriteTemplate>,
    flip: Flip,
    image: Weak<Image>,
}

impl SpriteDefinition {
    pub(crate) fn new(template: Rc<SpriteTemplate>, image: Weak<Image>) -> Self {
        Self {
            flip: template.flip,
            template,
            image,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.template.name
    }

    #[inline]
    pub fn region(&self) -> Rect<u32> {
        self.template.region
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.template.region.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.template.region.h
    }

    #[inline]
    pub fn flip(&self) -> Flip {
        self.flip
    }

    pub fn set_flip(&mut self, flip: Flip) {
        self.flip = flip;
    }

    #[inline]
    pub fn is_flipped_horizontally(&self) -> bool {
        self.flip.horizontal
    }

    pub fn set_flipped_horizontally(&mut self, flipped: bool) {
        self.flip.horizontal = flipped;
    }

    #[inline]
    pub fn is_flipped_vertically(&self) -> bool {
        self.flip.vertical
    }

    pub fn set_flipped_vertically(&mut self, flipped: bool) {
        self.flip.vertical = flipped;
    }

    /// Stored, unflipped boxes of this sprite.
    pub fn bounding_boxes(&self) -> impl Iterator<Item = &NamedBox> {
        self.template.boxes.values()
    }

    /// Position of a named box in the sprite's local space, as currently flipped.
    pub fn bounding_box(&self, name: &str) -> Option<Rect<i32>> {
        let size = Size::new(self.width(), self.height());
        self.template
            .boxes
            .get_by_key(name)
            .map(|b| resolve_box(&b.bounds, size, self.flip))
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, position: Point<i32>) {
        draw_region(
            &self.image,
            surface,
            &self.template.region,
            position,
            self.flip,
            self.name(),
        );
    }

    /// Draws with `transform` replacing the surface transform for the duration of the call.
    pub fn draw_transformed<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        position: Point<i32>,
        transform: &Matrix3<f32>,
    ) {
        with_transform(surface, transform, |s| self.draw(s, position));
    }

    /// Outlines a named box of a sprite drawn at `position`. Unknown names draw nothing.
    pub fn draw_bounding_box<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        name: &str,
        position: Point<i32>,
    ) {
        if let Some(rect) = self.bounding_box(name) {
            surface.outline(&rect.translate(position));
        }
    }

    /// Renders the sprite, flips included, into a raster of its own size.
    /// Returns `None` once the atlas has been dropped.
    pub fn to_raster(&self) -> Option<Raster> {
        self.image.upgrade()?;

        let mut surface = SoftwareSurface::new(Size::new(self.width(), self.height()));
        self.draw(&mut surface, Point::new(0, 0));
        Some(surface.into_raster())
    }
}

#[cfg(test)]
mod tests {
    use rgb::RGBA8;
    use serde_json::json;
    use yasa_geometry::affine::translation;

    use super::*;

    const RED: RGBA8 = RGBA8::new(255, 0, 0, 255);
    const BLUE: RGBA8 = RGBA8::new(0, 0, 255, 255);

    fn image() -> Rc<Image> {
        let raster = Raster::from_pixels(Size::new(3, 1), vec![RGBA8::default(), RED, BLUE]);
        Rc::new(Image::new(raster.unwrap()))
    }

    fn sprite(image: &Rc<Image>) -> SpriteDefinition {
        let value = json!({
            "Name": "Arrow",
            "x": 1, "y": 0, "width": 2, "height": 1,
            "Bounding Boxes": [{"Name": "Tip", "x": 1, "y": 0, "width": 1, "height": 1}]
        });
        let template = SpriteTemplate::from_value(&value, "Items").unwrap();
        SpriteDefinition::new(Rc::new(template), Rc::downgrade(image))
    }

    #[test]
    fn test_bounding_box_follows_flip() {
        let image = image();
        let mut arrow = sprite(&image);

        assert_eq!(arrow.bounding_box("Tip"), Some(Rect::new(1, 0, 1, 1)));
        arrow.set_flipped_horizontally(true);
        assert_eq!(arrow.bounding_box("Tip"), Some(Rect::new(0, 0, 1, 1)));
        arrow.set_flipped_horizontally(false);
        assert_eq!(arrow.bounding_box("Tip"), Some(Rect::new(1, 0, 1, 1)));
        assert_eq!(arrow.bounding_box("Shaft"), None);
    }

    #[test]
    fn test_flip_read_from_metadata() {
        let value = json!({
            "Name": "Mirror", "x": 0, "y": 0, "width": 1, "height": 1,
            "Flipped Vertically": true
        });
        let template = SpriteTemplate::from_value(&value, "Items").unwrap();
        assert_eq!(template.flip, Flip::VERTICAL);
    }

    #[test]
    fn test_draw_and_to_raster() {
        let image = image();
        let mut arrow = sprite(&image);

        let mut surface = SoftwareSurface::new(Size::new(4, 1));
        arrow.draw_transformed(&mut surface, Point::new(0, 0), &translation(2., 0.));
        assert_eq!(surface.target().pixel(2, 0), Some(RED));
        assert_eq!(surface.target().pixel(3, 0), Some(BLUE));

        arrow.set_flip(Flip::HORIZONTAL);
        let raster = arrow.to_raster().unwrap();
        assert_eq!(raster.pixels(), &[BLUE, RED]);
    }

    #[test]
    fn test_draw_bounding_box() {
        let image = image();
        let arrow = sprite(&image);

        let mut surface = SoftwareSurface::new(Size::new(4, 1));
        arrow.draw_bounding_box(&mut surface, "Tip", Point::new(2, 0));
        arrow.draw_bounding_box(&mut surface, "Nope", Point::new(0, 0));

        assert_eq!(surface.target().pixel(3, 0), Some(RED));
        assert_eq!(surface.target().pixel(0, 0), Some(RGBA8::default()));
    }

    #[test]
    fn test_dropped_atlas_draws_nothing() {
        let image = image();
        let arrow = sprite(&image);
        drop(image);

        let mut surface = SoftwareSurface::new(Size::new(2, 1));
        arrow.draw(&mut surface, Point::new(0, 0));
        assert!(surface.target().pixels().iter().all(|p| p.a == 0));
        assert!(arrow.to_raster().is_none());
    }
}
