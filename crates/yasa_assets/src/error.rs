use std::{io, path::PathBuf};

use thiserror::Error;
use yasa_geometry::{Rect, Size};

use crate::table::RecordKind;

/// Data which was read fine, but does not describe a valid atlas.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{context}: missing required field '{field}'")]
    MissingField { field: String, context: String },

    #[error("{context}: field '{field}' {reason}")]
    InvalidField {
        field: String,
        context: String,
        reason: String,
    },

    #[error("{context}: position ({x}, {y}) must not be negative")]
    NegativePosition { context: String, x: i64, y: i64 },

    #[error("{context}: size {width}x{height} must be positive")]
    NonPositiveDimension {
        context: String,
        width: i64,
        height: i64,
    },

    #[error("{context}: region {region:?} does not fit into the {}x{} image", .image.w, .image.h)]
    OutOfBounds {
        context: String,
        region: Rect<u32>,
        image: Size<u32>,
    },

    #[error("the atlas has two sheets named '{0}'")]
    DuplicateSheet(String),

    #[error("sheet '{sheet}' has more than one sprite or animation named '{name}'")]
    DuplicateSprite { sheet: String, name: String },

    #[error("'{sprite}' has two bounding boxes named '{name}'")]
    DuplicateBox { sprite: String, name: String },

    #[error("animation '{0}' has no frames")]
    EmptyAnimation(String),

    #[error("animation '{animation}' has {boxes} {kind} records, but {frames} frames")]
    FrameCountMismatch {
        animation: String,
        kind: RecordKind,
        boxes: usize,
        frames: usize,
    },
}

/// An image or a file backing an atlas could not be obtained.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("could not decode the image: {0}")]
    Decode(String),

    #[error("the image is {width}x{height}, which exceeds the {max}x{max} limit")]
    Oversize { width: u32, height: u32, max: u32 },

    #[error("could not read '{path}'")]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{0}' is a directory")]
    Directory(PathBuf),

    #[error("the {0} path is empty")]
    EmptyPath(&'static str),
}

/// Malformed records or structured text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: {reason}: \"{content}\"")]
    Record {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("malformed metadata")]
    Metadata(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Any failure of an atlas loading operation. Nothing partially loaded
/// is ever returned alongside it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
