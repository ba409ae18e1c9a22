use std::rc::{Rc, Weak};

use nalgebra::Matrix3;
use serde_json::Value;
use yasa_assets::{fields::Fields, ValidationError};
use yasa_geometry::{resolve_box, Flip, Point, Rect};
use yasa_graphics::{with_transform, Image, Surface};

use crate::{
    frame::SpriteFrame,
    sprite::{draw_region, read_flip},
};

/// Immutable frames of a named animation, shared by every
/// [AnimationSequence] created for it.
#[derive(Debug)]
pub struct AnimationData {
    pub name: String,
    pub frames: Vec<SpriteFrame>,
    pub flip: Flip,
}

impl AnimationData {
    /// Fails when `frames` is empty, an animation always has a current frame.
    pub fn new(name: String, frames: Vec<SpriteFrame>, flip: Flip) -> Result<Self, ValidationError> {
        match frames.is_empty() {
            true => Err(ValidationError::EmptyAnimation(name)),
            false => Ok(Self { name, frames, flip }),
        }
    }

    pub(crate) fn from_value(value: &Value, sheet: &str) -> Result<Self, ValidationError> {
        let fields = Fields::new(value, format!("sheet '{sheet}' > animation"))?;
        let name = fields.string("Name")?.to_owned();
        let context = format!("sheet '{sheet}' > animation '{name}'");
        let fields = Fields::new(value, context.clone())?;

        let frames = fields
            .array("Frames")?
            .iter()
            .enumerate()
            .map(|(i, frame)| SpriteFrame::from_value(frame, format!("{context} > frame #{i}")))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(name, frames, read_flip(&fields)?)
    }
}

/// A playback cursor over the frames of an animation.
///
/// Sequences created from the same animation share its frames but move
/// their cursors independently.
#[derive(Debug, Clone)]
pub struct AnimationSequence {
    data: Rc<AnimationData>,
    index: usize,
    flip: Flip,
    image: Weak<Image>,
}

impl AnimationSequence {
    pub fn new(data: Rc<AnimationData>, image: Weak<Image>) -> Self {
        Self {
            flip: data.flip,
            index: 0,
            data,
            image,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.frames.len()
    }

    /// Always false, an animation has at least one frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.frames.is_empty()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the cursor to `index`.
    ///
    /// # Panics
    ///
    /// When `index` is out of range.
    pub fn set_index(&mut self, index: usize) {
        assert!(
            index < self.len(),
            "frame {index} is out of range for '{}' with {} frames",
            self.name(),
            self.len()
        );
        self.index = index;
    }

    #[inline]
    pub fn frames(&self) -> &[SpriteFrame] {
        &self.data.frames
    }

    #[inline]
    pub fn frame(&self, index: usize) -> &SpriteFrame {
        &self.data.frames[index]
    }

    #[inline]
    pub fn current_frame(&self) -> &SpriteFrame {
        &self.data.frames[self.index]
    }

    #[inline]
    pub fn current_width(&self) -> u32 {
        self.current_frame().width()
    }

    #[inline]
    pub fn current_height(&self) -> u32 {
        self.current_frame().height()
    }

    pub fn to_next_frame(&mut self) {
        self.index = (self.index + 1) % self.len();
    }

    pub fn to_previous_frame(&mut self) {
        self.index = (self.index + self.len() - 1) % self.len();
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Moves to the first frame called `name`. Unknown names leave the cursor where it is.
    pub fn jump_to_named_frame(&mut self, name: &str) {
        if let Some(index) = self
            .data
            .frames
            .iter()
            .position(|f| f.name.as_deref() == Some(name))
        {
            self.index = index;
        }
    }

    #[inline]
    pub fn is_first_frame(&self) -> bool {
        self.index == 0
    }

    #[inline]
    pub fn is_last_frame(&self) -> bool {
        self.index == self.len() - 1
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

    fn resolve(&self, bounds: Option<&Rect<u32>>) -> Option<Rect<i32>> {
        let frame = self.current_frame();
        bounds.map(|b| resolve_box(b, frame.region.size(), self.flip))
    }

    /// Named box of the current frame, as currently flipped.
    pub fn current_bounding_box(&self, name: &str) -> Option<Rect<i32>> {
        let bounds = self.current_frame().boxes.get_by_key(name).map(|b| &b.bounds);
        self.resolve(bounds)
    }

    pub fn current_collision_box(&self) -> Option<Rect<i32>> {
        self.resolve(self.current_frame().collision_box.as_ref())
    }

    pub fn current_hit_box(&self) -> Option<Rect<i32>> {
        self.resolve(self.current_frame().hit_box.as_ref())
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, position: Point<i32>) {
        draw_region(
            &self.image,
            surface,
            &self.current_frame().region,
            position,
            self.flip,
            self.name(),
        );
    }

    pub fn draw_transformed<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        position: Point<i32>,
        transform: &Matrix3<f32>,
    ) {
        with_transform(surface, transform, |s| self.draw(s, position));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    pub(crate) fn frame(name: &str, duration: u32) -> SpriteFrame {
        SpriteFrame {
            name: Some(name.to_owned()),
            ..SpriteFrame::new(Rect::new(0, 0, 4, 2), duration)
        }
    }

    pub(crate) fn sequence(durations: &[u32]) -> AnimationSequence {
        let frames = durations
            .iter()
            .enumerate()
            .map(|(i, d)| frame(&format!("f{i}"), *d))
            .collect();
        let data = AnimationData::new("walk".into(), frames, Flip::NONE).unwrap();
        AnimationSequence::new(Rc::new(data), Weak::new())
    }

    #[test]
    fn test_empty_animation_is_rejected() {
        assert!(matches!(
            AnimationData::new("idle".into(), vec![], Flip::NONE),
            Err(ValidationError::EmptyAnimation(_))
        ));
    }

    #[test]
    fn test_stepping_wraps_around() {
        let mut sequence = sequence(&[10, 10, 10, 10]);

        for _ in 0..4 {
            sequence.to_next_frame();
        }
        assert_eq!(sequence.index(), 0);

        sequence.to_previous_frame();
        assert!(sequence.is_last_frame());
        for _ in 0..3 {
            sequence.to_previous_frame();
        }
        assert!(sequence.is_first_frame());
    }

    #[test]
    fn test_jump_to_named_frame() {
        let mut sequence = sequence(&[10, 10, 10]);

        sequence.jump_to_named_frame("f2");
        assert_eq!(sequence.index(), 2);
        sequence.jump_to_named_frame("missing");
        assert_eq!(sequence.index(), 2);

        sequence.reset();
        assert_eq!(sequence.index(), 0);
    }

    #[test]
    fn test_cursors_are_independent() {
        let mut a = sequence(&[10, 10]);
        let b = a.clone();

        a.to_next_frame();
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_index_panics() {
        sequence(&[10]).set_index(1);
    }

    #[test]
    fn test_boxes_follow_current_frame_and_flip() {
        let value = json!({
            "Name": "punch",
            "Frames": [
                {"x": 0, "y": 0, "width": 8, "height": 8, "Collision Box": {"x": 0, "y": 0, "width": 4, "height": 8}},
                {"x": 8, "y": 0, "width": 8, "height": 8, "Hit Box": {"x": 6, "y": 2, "width": 2, "height": 2}}
            ]
        });
        let data = AnimationData::from_value(&value, "Hero").unwrap();
        let mut sequence = AnimationSequence::new(Rc::new(data), Weak::new());

        assert_eq!(sequence.current_collision_box(), Some(Rect::new(0, 0, 4, 8)));
        assert_eq!(sequence.current_hit_box(), None);

        sequence.to_next_frame();
        sequence.set_flipped_horizontally(true);
        assert_eq!(sequence.current_collision_box(), None);
        assert_eq!(sequence.current_hit_box(), Some(Rect::new(0, 2, 2, 2)));
        assert_eq!(sequence.current_width(), 8);
    }
}
