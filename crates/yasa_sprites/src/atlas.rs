use std::rc::Rc;

use log::{debug, warn};
use serde_json::Value;
use yasa_assets::{
    fields::{region, Fields},
    AnimationTables, BoxRecord, RecordKind, ValidationError,
};
use yasa_collections::indexed_map::IndexedMap;
use yasa_geometry::{Flip, Rect};
use yasa_graphics::{Image, Raster};

use crate::{
    animation::{AnimationData, AnimationSequence},
    frame::SpriteFrame,
    sheet::{check_region, SpriteSheet},
};

/// Top level keys the list of sheets may be stored under.
const SHEET_KEYS: [&str; 2] = ["Sheets", "Sprite Atlas"];

/// One decoded image and every sheet cut from it.
///
/// Sprites and animations handed out by the sheets only hold a weak
/// reference to the image, the atlas must outlive them to draw anything.
#[derive(Debug)]
pub struct SpriteAtlas {
    image: Rc<Image>,
    sheets: IndexedMap<String, SpriteSheet>,
}

impl SpriteAtlas {
    pub fn new(raster: Raster, metadata: &Value) -> Result<Self, ValidationError> {
        let image = Rc::new(Image::new(raster));
        let size = image.size();

        let fields = Fields::new(metadata, "atlas")?;
        let key = SHEET_KEYS
            .into_iter()
            .find(|k| fields.optional(k).is_some())
            .unwrap_or(SHEET_KEYS[0]);

        let values = fields.array(key)?;
        let mut sheets = IndexedMap::with_capacity(values.len());
        for value in values {
            let sheet = SpriteSheet::from_value(value, size, Rc::downgrade(&image))?;
            sheets
                .try_insert(sheet.name().to_owned(), sheet)
                .map_err(|(name, _)| ValidationError::DuplicateSheet(name))?;
        }

        debug!(
            "Loaded atlas {} ({}x{}) with {} sheets",
            image.id(),
            size.w,
            size.h,
            sheets.len()
        );

        Ok(Self { image, sheets })
    }

    #[inline]
    pub fn image(&self) -> &Rc<Image> {
        &self.image
    }

    pub fn sheet(&self, name: &str) -> Option<&SpriteSheet> {
        self.sheets.get_by_key(name)
    }

    pub fn sheets(&self) -> impl Iterator<Item = &SpriteSheet> {
        self.sheets.values()
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Builds an animation over this atlas from tabular frame data.
    ///
    /// A box table that was not provided leaves the frames without boxes of
    /// that kind. A provided one must have exactly one record per frame.
    pub fn animation_from_tables(
        &self,
        name: &str,
        tables: &AnimationTables,
    ) -> Result<AnimationSequence, ValidationError> {
        let size = self.image.size();

        let mut frames = tables
            .frames
            .iter()
            .enumerate()
            .map(|(i, r)| -> Result<SpriteFrame, ValidationError> {
                let context = format!("animation '{name}' > frame #{i}");
                let bounds = region(r.x, r.y, r.width, r.height, &context)?;
                check_region(&bounds, size, context.clone())?;

                let duration = u32::try_from(r.duration).map_err(|_| ValidationError::InvalidField {
                    field: "duration".into(),
                    context,
                    reason: "must be a non negative number of milliseconds".into(),
                })?;

                Ok(SpriteFrame::new(bounds, duration))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for kind in [RecordKind::CollisionBox, RecordKind::HitBox] {
            let Some(boxes) = tables.boxes(kind) else {
                warn!("Animation '{name}' has no {kind} table, its frames get no {kind}");
                continue;
            };

            if boxes.len() != frames.len() {
                return Err(ValidationError::FrameCountMismatch {
                    animation: name.to_owned(),
                    kind,
                    boxes: boxes.len(),
                    frames: frames.len(),
                });
            }

            for (i, (frame, record)) in frames.iter_mut().zip(boxes).enumerate() {
                let bounds = box_region(record, &format!("animation '{name}' > {kind} #{i}"))?;
                match kind {
                    RecordKind::HitBox => frame.hit_box = Some(bounds),
                    _ => frame.collision_box = Some(bounds),
                }
            }
        }

        let data = AnimationData::new(name.to_owned(), frames, Flip::NONE)?;
        debug!("Built animation '{name}' with {} frames from tables", data.frames.len());

        Ok(AnimationSequence::new(Rc::new(data), Rc::downgrade(&self.image)))
    }
}

fn box_region(record: &BoxRecord, context: &str) -> Result<Rect<u32>, ValidationError> {
    region(record.x, record.y, record.width, record.height, context)
}
