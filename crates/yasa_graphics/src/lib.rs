pub use yasa_geometry::*;

pub mod image;
pub mod image_cache;
pub mod raster;
pub mod software;
pub mod surface;

pub use image::{Image, ImageId};
pub use raster::Raster;
pub use surface::{with_transform, Surface, TransformScope};
