use std::rc::{Rc, Weak};

use log::debug;
use serde_json::Value;
use yasa_assets::{fields::Fields, ValidationError};
use yasa_collections::indexed_map::IndexedMap;
use yasa_geometry::{Rect, Size};
use yasa_graphics::Image;

use crate::{
    animation::{AnimationData, AnimationSequence},
    clock::AnimationClock,
    sprite::{SpriteDefinition, SpriteTemplate},
};

/// A named group of sprites and animations cut from one atlas image.
#[derive(Debug)]
pub struct SpriteSheet {
    name: String,
    sprites: IndexedMap<String, Rc<SpriteTemplate>>,
    animations: IndexedMap<String, Rc<AnimationData>>,
    image: Weak<Image>,
}

pub(crate) fn check_region(region: &Rect<u32>, image: Size<u32>, context: String) -> Result<(), ValidationError> {
    match region.fits_within(image) {
        true => Ok(()),
        false => Err(ValidationError::OutOfBounds {
            context,
            region: *region,
            image,
        }),
    }
}

impl SpriteSheet {
    pub fn new(name: impl Into<String>, image: Weak<Image>) -> Self {
        Self {
            name: name.into(),
            sprites: IndexedMap::default(),
            animations: IndexedMap::default(),
            image,
        }
    }

    /// Builds a sheet from its metadata object. `image` is the size of the
    /// atlas every region has to fit into.
    pub(crate) fn from_value(
        value: &Value,
        image: Size<u32>,
        handle: Weak<Image>,
    ) -> Result<Self, ValidationError> {
        let fields = Fields::new(value, "sheet")?;
        let mut sheet = Self::new(fields.string("Name")?, handle);
        let fields = Fields::new(value, format!("sheet '{}'", sheet.name))?;

        for value in fields.optional_array("Sprites")? {
            let sprite = SpriteTemplate::from_value(value, &sheet.name)?;
            let context = format!("sheet '{}' > sprite '{}'", sheet.name, sprite.name);
            check_region(&sprite.region, image, context)?;
            sheet.add_sprite(sprite)?;
        }

        for value in fields.optional_array("Animations")? {
            let animation = AnimationData::from_value(value, &sheet.name)?;
            for (i, frame) in animation.frames.iter().enumerate() {
                let context = format!(
                    "sheet '{}' > animation '{}' > frame #{i}",
                    sheet.name, animation.name
                );
                check_region(&frame.region, image, context)?;
            }
            sheet.add_animation(animation)?;
        }

        debug!(
            "Loaded sheet '{}' with {} sprites and {} animations",
            sheet.name,
            sheet.sprites.len(),
            sheet.animations.len()
        );

        Ok(sheet)
    }

    fn is_taken(&self, name: &str) -> bool {
        self.sprites.contains_key(name) || self.animations.contains_key(name)
    }

    fn duplicate(&self, name: String) -> ValidationError {
        ValidationError::DuplicateSprite {
            sheet: self.name.clone(),
            name,
        }
    }

    /// Fails if a sprite or an animation with the same name already exists.
    pub fn add_sprite(&mut self, sprite: SpriteTemplate) -> Result<(), ValidationError> {
        if self.is_taken(&sprite.name) {
            return Err(self.duplicate(sprite.name));
        }

        self.sprites.insert(sprite.name.clone(), Rc::new(sprite));
        Ok(())
    }

    /// Fails if a sprite or an animation with the same name already exists.
    pub fn add_animation(&mut self, animation: AnimationData) -> Result<(), ValidationError> {
        if self.is_taken(&animation.name) {
            return Err(self.duplicate(animation.name));
        }

        self.animations
            .insert(animation.name.clone(), Rc::new(animation));
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A new definition of the named sprite, with its own flip state.
    pub fn sprite(&self, name: &str) -> Option<SpriteDefinition> {
        self.sprites
            .get_by_key(name)
            .map(|t| SpriteDefinition::new(t.clone(), self.image.clone()))
    }

    /// A new sequence of the named animation, with its own cursor.
    pub fn animation(&self, name: &str) -> Option<AnimationSequence> {
        self.animations
            .get_by_key(name)
            .map(|a| AnimationSequence::new(a.clone(), self.image.clone()))
    }

    pub fn animation_clock(&self, name: &str) -> Option<AnimationClock> {
        self.animation(name).map(AnimationClock::new)
    }

    pub fn sprite_names(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }
}
