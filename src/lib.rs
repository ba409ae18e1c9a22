//! Sprite atlases: one image, many named sprites and animations cut from it.
//!
//! ```no_run
//! use yasa::{AtlasLoader, AtlasSettings};
//!
//! let mut loader = AtlasLoader::new(AtlasSettings::default());
//! let atlas = loader.load_files("hero.png", "hero.json").unwrap();
//! let mut walk = atlas.sheet("Hero").unwrap().animation_clock("Walk").unwrap();
//! walk.update(0.016);
//! ```

pub use yasa_assets as assets;
pub use yasa_collections as collections;
pub use yasa_geometry as geometry;
pub use yasa_graphics as graphics;
pub use yasa_sprites as sprites;

pub use yasa_assets::{
    AnimationTables, AtlasSettings, FormatError, LoadError, MetadataFormat, ResourceError,
    ValidationError,
};
pub use yasa_geometry::{Flip, Point, Rect, Size};
pub use yasa_graphics::{software::SoftwareSurface, with_transform, Image, Raster, Surface};
pub use yasa_sprites::*;
