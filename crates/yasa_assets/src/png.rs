use rgb::ComponentBytes;
use yasa_graphics::{Raster, Size};

use crate::ResourceError;

/// Turns encoded image bytes into a [Raster].
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, ResourceError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, ResourceError> {
        decode_png(bytes)
    }
}

pub fn decode_png(png: &[u8]) -> Result<Raster, ResourceError> {
    let image = lodepng::decode32(png).map_err(|e| ResourceError::Decode(e.to_string()))?;
    let size = Size::new(image.width as u32, image.height as u32);

    Raster::from_bytes(size, image.buffer.as_bytes())
        .ok_or_else(|| ResourceError::Decode("pixel buffer does not match image size".into()))
}

/// Rejects rasters larger than `max` pixels on either axis.
pub fn check_dimensions(raster: &Raster, max: u32) -> Result<(), ResourceError> {
    match raster.width() > max || raster.height() > max {
        true => Err(ResourceError::Oversize {
            width: raster.width(),
            height: raster.height(),
            max,
        }),
        false => Ok(()),
    }
}
