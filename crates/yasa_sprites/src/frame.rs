use serde_json::Value;
use yasa_assets::{fields::Fields, ValidationError};
use yasa_collections::indexed_map::IndexedMap;
use yasa_geometry::Rect;

/// A named sub-rectangle of a sprite, in the sprite's unflipped local space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBox {
    pub name: String,
    pub bounds: Rect<u32>,
}

impl NamedBox {
    pub fn new(name: impl Into<String>, bounds: Rect<u32>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    pub fn intersects(&self, other: &NamedBox) -> bool {
        self.intersects_rect(&Rect::from(&other.bounds))
    }

    pub fn intersects_rect(&self, rect: &Rect<i32>) -> bool {
        Rect::<i32>::from(&self.bounds).intersects(rect)
    }
}

/// Named boxes of one sprite or frame, in declaration order.
pub type NamedBoxes = IndexedMap<String, NamedBox>;

/// Reads the optional `Bounding Boxes` array of `fields`.
/// Two boxes of one owner may not share a name.
pub(crate) fn parse_boxes(fields: &Fields, owner: &str) -> Result<NamedBoxes, ValidationError> {
    let values = fields.optional_array("Bounding Boxes")?;
    let mut boxes = NamedBoxes::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        let context = format!("{} > bounding box #{i}", fields.context());
        let fields = Fields::new(value, context)?;
        let name = fields.string("Name")?;
        let bounds = fields.region()?;

        boxes
            .try_insert(name.to_owned(), NamedBox::new(name, bounds))
            .map_err(|(name, _)| ValidationError::DuplicateBox {
                sprite: owner.to_owned(),
                name,
            })?;
    }

    Ok(boxes)
}

/// One still image of an animation.
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    pub name: Option<String>,
    pub region: Rect<u32>,
    /// Display time in milliseconds
    pub duration: u32,
    pub boxes: NamedBoxes,
    pub collision_box: Option<Rect<u32>>,
    pub hit_box: Option<Rect<u32>>,
}

impl SpriteFrame {
    pub fn new(region: Rect<u32>, duration: u32) -> Self {
        Self {
            name: None,
            region,
            duration,
            boxes: NamedBoxes::default(),
            collision_box: None,
            hit_box: None,
        }
    }

    pub(crate) fn from_value(value: &Value, context: String) -> Result<Self, ValidationError> {
        let fields = Fields::new(value, context)?;

        let name = fields.optional_string("Name")?.map(str::to_owned);
        let region = fields.region()?;
        let duration = match fields.optional_int("Duration")? {
            None => 0,
            Some(d) => u32::try_from(d).map_err(|_| ValidationError::InvalidField {
                field: "Duration".into(),
                context: fields.context().into(),
                reason: "must be a non negative number of milliseconds".into(),
            })?,
        };

        let owner = name.clone().unwrap_or_else(|| fields.context().to_owned());
        let boxes = parse_boxes(&fields, &owner)?;

        let collision_box = fields
            .optional_fields("Collision Box")?
            .map(|f| f.region())
            .transpose()?;
        let hit_box = fields
            .optional_fields("Hit Box")?
            .map(|f| f.region())
            .transpose()?;

        Ok(Self {
            name,
            region,
            duration,
            boxes,
            collision_box,
            hit_box,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.region.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.region.h
    }
}
