//! Typed access to the fields of a parsed metadata object.
//!
//! Every error carries the name of the offending field and a human readable
//! context (e.g. `sheet 'Player' > sprite 'Idle'`), so a broken atlas can be
//! traced back to the entry that caused it.

use serde_json::{Map, Value};
use yasa_geometry::Rect;

use crate::ValidationError;

pub struct Fields<'a> {
    object: &'a Map<String, Value>,
    context: String,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value, context: impl Into<String>) -> Result<Self, ValidationError> {
        let context = context.into();
        match value.as_object() {
            Some(object) => Ok(Self { object, context }),
            None => Err(ValidationError::InvalidField {
                field: "<entry>".into(),
                context,
                reason: "is not an object".into(),
            }),
        }
    }

    #[inline]
    pub fn context(&self) -> &str {
        &self.context
    }

    fn invalid(&self, field: &str, reason: &str) -> ValidationError {
        ValidationError::InvalidField {
            field: field.into(),
            context: self.context.clone(),
            reason: reason.into(),
        }
    }

    /// Looks up a field, treating `null` the same as an absent field.
    pub fn optional(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|v| !v.is_null())
    }

    pub fn require(&self, field: &str) -> Result<&'a Value, ValidationError> {
        self.optional(field)
            .ok_or_else(|| ValidationError::MissingField {
                field: field.into(),
                context: self.context.clone(),
            })
    }

    pub fn string(&self, field: &str) -> Result<&'a str, ValidationError> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "is not a string"))
    }

    pub fn optional_string(&self, field: &str) -> Result<Option<&'a str>, ValidationError> {
        self.optional(field)
            .map(|v| v.as_str().ok_or_else(|| self.invalid(field, "is not a string")))
            .transpose()
    }

    pub fn int(&self, field: &str) -> Result<i64, ValidationError> {
        self.require(field)?
            .as_i64()
            .ok_or_else(|| self.invalid(field, "is not an integer"))
    }

    pub fn optional_int(&self, field: &str) -> Result<Option<i64>, ValidationError> {
        self.optional(field)
            .map(|v| v.as_i64().ok_or_else(|| self.invalid(field, "is not an integer")))
            .transpose()
    }

    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, ValidationError> {
        self.optional(field)
            .map(|v| v.as_bool().ok_or_else(|| self.invalid(field, "is not a boolean")))
            .transpose()
    }

    pub fn array(&self, field: &str) -> Result<&'a [Value], ValidationError> {
        self.require(field)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(field, "is not an array"))
    }

    /// An absent array reads as an empty one.
    pub fn optional_array(&self, field: &str) -> Result<&'a [Value], ValidationError> {
        match self.optional(field) {
            None => Ok(&[]),
            Some(_) => self.array(field),
        }
    }

    pub fn optional_fields(&self, field: &str) -> Result<Option<Fields<'a>>, ValidationError> {
        self.optional(field)
            .map(|v| Fields::new(v, format!("{} > {field}", self.context)))
            .transpose()
    }

    /// Reads a `x`, `y`, `width`, `height` quadruple.
    pub fn region(&self) -> Result<Rect<u32>, ValidationError> {
        region(
            self.int("x")?,
            self.int("y")?,
            self.int("width")?,
            self.int("height")?,
            &self.context,
        )
    }
}

/// Validates a raw region: the position must not be negative, and the size
/// must be positive.
pub fn region(x: i64, y: i64, w: i64, h: i64, context: &str) -> Result<Rect<u32>, ValidationError> {
    if x < 0 || y < 0 {
        return Err(ValidationError::NegativePosition {
            context: context.into(),
            x,
            y,
        });
    }

    if w < 1 || h < 1 {
        return Err(ValidationError::NonPositiveDimension {
            context: context.into(),
            width: w,
            height: h,
        });
    }

    let fit = |v: i64, field: &str| {
        u32::try_from(v).map_err(|_| ValidationError::InvalidField {
            field: field.into(),
            context: context.into(),
            reason: "is too large".into(),
        })
    };

    Ok(Rect::new(
        fit(x, "x")?,
        fit(y, "y")?,
        fit(w, "width")?,
        fit(h, "height")?,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_field_is_named() {
        let value = json!({"Name": "Idle", "x": 1, "y": 2, "width": 3});
        let fields = Fields::new(&value, "sprite 'Idle'").unwrap();

        match fields.region() {
            Err(ValidationError::MissingField { field, context }) => {
                assert_eq!(field, "height");
                assert_eq!(context, "sprite 'Idle'");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_null_reads_as_absent() {
        let value = json!({"Flipped Horizontally": null, "Bounding Boxes": null});
        let fields = Fields::new(&value, "sprite").unwrap();

        assert_eq!(fields.optional_bool("Flipped Horizontally").unwrap(), None);
        assert!(fields.optional_array("Bounding Boxes").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_types() {
        let value = json!({"Name": 5, "x": "left", "Frames": {}});
        let fields = Fields::new(&value, "animation").unwrap();

        assert!(matches!(fields.string("Name"), Err(ValidationError::InvalidField { .. })));
        assert!(matches!(fields.int("x"), Err(ValidationError::InvalidField { .. })));
        assert!(matches!(fields.array("Frames"), Err(ValidationError::InvalidField { .. })));
        assert!(Fields::new(&json!([1, 2]), "sheet").is_err());
    }

    #[test]
    fn test_region_validation() {
        assert_eq!(region(1, 2, 3, 4, "frame").unwrap(), Rect::new(1, 2, 3, 4));
        assert!(matches!(
            region(-1, 0, 1, 1, "frame"),
            Err(ValidationError::NegativePosition { x: -1, y: 0, .. })
        ));
        assert!(matches!(
            region(0, 0, 0, 1, "frame"),
            Err(ValidationError::NonPositiveDimension { width: 0, .. })
        ));
        assert!(matches!(
            region(0, 0, 1 << 40, 1, "frame"),
            Err(ValidationError::InvalidField { .. })
        ));
    }
}
