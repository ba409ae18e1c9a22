use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;

use crate::{Raster, Size};

/// Identity of an [Image], used by surfaces to key the handles they derive from it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "image#{}", _0)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A read-only raster shared by everything drawn from one atlas.
#[derive(Debug)]
pub struct Image {
    id: ImageId,
    raster: Raster,
}

impl Image {
    pub fn new(raster: Raster) -> Self {
        Self {
            id: ImageId::next(),
            raster,
        }
    }

    #[inline]
    pub fn id(&self) -> ImageId {
        self.id
    }

    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    #[inline]
    pub fn size(&self) -> Size<u32> {
        self.raster.size()
    }
}
