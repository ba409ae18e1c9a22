use std::collections::HashMap;

use log::trace;

use crate::{Image, ImageId, Raster};

/// A drawable derived from an [Image] by a surface, such as a texture in
/// video memory. It may be lost at any time (e.g. on a context loss).
pub trait ImageHandle {
    fn is_lost(&self) -> bool;
}

/// Keeps surface handles for images, regenerating a handle from the
/// image's raster whenever it has been lost.
#[derive(Debug)]
pub struct ImageCache<H> {
    handles: HashMap<ImageId, H>,
}

impl<H> Default for ImageCache<H> {
    fn default() -> Self {
        Self {
            handles: Default::default(),
        }
    }
}

impl<H: ImageHandle> ImageCache<H> {
    /// Checks the handle for `image` and recreates it if it is missing or lost.
    pub fn get_or_create(&mut self, image: &Image, create: impl FnOnce(&Raster) -> H) -> &H {
        let id = image.id();
        let valid = self.handles.get(&id).map_or(false, |h| !h.is_lost());

        if !valid {
            trace!("Creating a drawable handle for {id}");
            self.handles.insert(id, create(image.raster()));
        }

        &self.handles[&id]
    }

    pub fn remove(&mut self, id: ImageId) -> Option<H> {
        self.handles.remove(&id)
    }

    /// Forgets every handle which has been lost.
    pub fn purge_lost(&mut self) {
        self.handles.retain(|_, h| !h.is_lost());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
