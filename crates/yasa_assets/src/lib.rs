pub mod error;
pub mod fields;
pub mod metadata;
pub mod png;
pub mod settings;
pub mod table;

pub use error::{FormatError, LoadError, ResourceError, ValidationError};
pub use metadata::{MetadataFormat, MetadataParser};
pub use png::{ImageDecoder, PngDecoder};
pub use settings::AtlasSettings;
pub use table::{AnimationTables, BoxRecord, FrameRecord, Record, RecordKind};
