//! Delimiter separated per-frame records.
//!
//! Frames are `x, y, width, height, duration`, boxes are `x, y, width, height`.
//! One record per line, blank lines are skipped.

use log::debug;
use strum::{Display, EnumIter};

use crate::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRecord {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub duration: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRecord {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Frame(FrameRecord),
    CollisionBox(BoxRecord),
    HitBox(BoxRecord),
}

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Frame,
    CollisionBox,
    HitBox,
}

impl RecordKind {
    #[inline]
    pub fn field_count(&self) -> usize {
        match self {
            RecordKind::Frame => 5,
            RecordKind::CollisionBox | RecordKind::HitBox => 4,
        }
    }

    /// Name of the file holding the records of this kind for an animation,
    /// e.g. `walk_collisionbox.tsv`.
    pub fn file_name(&self, animation: &str) -> String {
        format!("{animation}_{self}.tsv")
    }

    fn build(&self, fields: &[i64]) -> Record {
        let bounds = BoxRecord {
            x: fields[0],
            y: fields[1],
            width: fields[2],
            height: fields[3],
        };

        match self {
            RecordKind::Frame => Record::Frame(FrameRecord {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
                duration: fields[4],
            }),
            RecordKind::CollisionBox => Record::CollisionBox(bounds),
            RecordKind::HitBox => Record::HitBox(bounds),
        }
    }

    /// Parses a single line. `line` is 1-based and only used for errors.
    pub fn parse_line(&self, content: &str, delimiter: char, line: usize) -> Result<Record, FormatError> {
        let error = |reason: String| FormatError::Record {
            line,
            content: content.to_owned(),
            reason,
        };

        let fields = content
            .split(delimiter)
            .map(str::trim)
            .collect::<Vec<_>>();

        if fields.len() != self.field_count() {
            return Err(error(format!(
                "expected {} fields for a {self} record, found {}",
                self.field_count(),
                fields.len()
            )));
        }

        let fields = fields
            .into_iter()
            .map(|f| {
                f.parse::<i64>()
                    .map_err(|_| error(format!("'{f}' is not an integer")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.build(&fields))
    }
}

/// Parses every non blank line of `text` as a record of `kind`.
pub fn parse_table(text: &str, kind: RecordKind, delimiter: char) -> Result<Vec<Record>, FormatError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| kind.parse_line(line, delimiter, number))
        .collect()
}

pub fn parse_frames(text: &str, delimiter: char) -> Result<Vec<FrameRecord>, FormatError> {
    Ok(parse_table(text, RecordKind::Frame, delimiter)?
        .into_iter()
        .filter_map(|r| match r {
            Record::Frame(frame) => Some(frame),
            _ => None,
        })
        .collect())
}

pub fn parse_boxes(text: &str, kind: RecordKind, delimiter: char) -> Result<Vec<BoxRecord>, FormatError> {
    Ok(parse_table(text, kind, delimiter)?
        .into_iter()
        .filter_map(|r| match r {
            Record::CollisionBox(b) | Record::HitBox(b) => Some(b),
            Record::Frame(_) => None,
        })
        .collect())
}

/// Every table describing one animation. Box tables are optional,
/// `None` means the table was not provided at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationTables {
    pub frames: Vec<FrameRecord>,
    pub collision_boxes: Option<Vec<BoxRecord>>,
    pub hit_boxes: Option<Vec<BoxRecord>>,
}

impl AnimationTables {
    pub fn parse(
        frames: &str,
        collision_boxes: Option<&str>,
        hit_boxes: Option<&str>,
        delimiter: char,
    ) -> Result<Self, FormatError> {
        let tables = Self {
            frames: parse_frames(frames, delimiter)?,
            collision_boxes: collision_boxes
                .map(|t| parse_boxes(t, RecordKind::CollisionBox, delimiter))
                .transpose()?,
            hit_boxes: hit_boxes
                .map(|t| parse_boxes(t, RecordKind::HitBox, delimiter))
                .transpose()?,
        };

        debug!(
            "Parsed {} frame records, {} collision boxes, {} hit boxes",
            tables.frames.len(),
            tables.collision_boxes.as_ref().map_or(0, Vec::len),
            tables.hit_boxes.as_ref().map_or(0, Vec::len),
        );

        Ok(tables)
    }

    /// Box records of the given kind. Frames have no boxes.
    pub fn boxes(&self, kind: RecordKind) -> Option<&[BoxRecord]> {
        match kind {
            RecordKind::Frame => None,
            RecordKind::CollisionBox => self.collision_boxes.as_deref(),
            RecordKind::HitBox => self.hit_boxes.as_deref(),
        }
    }
}
