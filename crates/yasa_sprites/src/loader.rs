use std::{
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use log::{debug, trace};
use yasa_assets::{
    png::check_dimensions, AnimationTables, AtlasSettings, ImageDecoder, LoadError,
    MetadataFormat, MetadataParser, PngDecoder, RecordKind, ResourceError,
};
use yasa_collections::ttl_cache::TtlCache;

use crate::atlas::SpriteAtlas;

/// Identity of the sources an atlas was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Files { image: PathBuf, metadata: PathBuf },
    /// Caller chosen name of in-memory sources.
    Memory(String),
}

pub type AtlasCache = TtlCache<SourceKey, Rc<SpriteAtlas>>;
pub type TableCache = TtlCache<PathBuf, Rc<AnimationTables>>;

/// Builds atlases and animation tables from encoded sources, and keeps
/// recently used results around so reloading the same sources is cheap.
///
/// Cached atlases are shared, which is fine since they are immutable.
/// Every sprite and animation looked up from them is a new instance.
pub struct AtlasLoader<D: ImageDecoder = PngDecoder> {
    settings: AtlasSettings,
    decoder: D,
    atlases: AtlasCache,
    tables: TableCache,
}

impl AtlasLoader {
    pub fn new(settings: AtlasSettings) -> Self {
        Self::with_decoder(settings, PngDecoder)
    }
}

impl Default for AtlasLoader {
    fn default() -> Self {
        Self::new(AtlasSettings::default())
    }
}

fn read(path: &Path, what: &'static str) -> Result<Vec<u8>, ResourceError> {
    if path.as_os_str().is_empty() {
        return Err(ResourceError::EmptyPath(what));
    }

    if path.is_dir() {
        return Err(ResourceError::Directory(path.to_owned()));
    }

    fs::read(path).map_err(|source| ResourceError::Missing {
        path: path.to_owned(),
        source,
    })
}

/// Reads a table which may legitimately not exist.
fn read_optional_table(path: &Path) -> Result<Option<String>, ResourceError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ResourceError::Missing {
            path: path.to_owned(),
            source,
        }),
    }
}

impl<D: ImageDecoder> AtlasLoader<D> {
    pub fn with_decoder(settings: AtlasSettings, decoder: D) -> Self {
        let atlases = AtlasCache::new(settings.cache_capacity, settings.cache_ttl());
        let tables = TableCache::new(settings.cache_capacity, settings.cache_ttl());
        Self::with_caches(settings, decoder, atlases, tables)
    }

    pub fn with_caches(
        settings: AtlasSettings,
        decoder: D,
        atlases: AtlasCache,
        tables: TableCache,
    ) -> Self {
        Self {
            settings,
            decoder,
            atlases,
            tables,
        }
    }

    #[inline]
    pub fn settings(&self) -> &AtlasSettings {
        &self.settings
    }

    pub fn clear_caches(&mut self) {
        self.atlases.clear();
        self.tables.clear();
    }

    fn build(
        &self,
        image: &[u8],
        metadata: &[u8],
        parser: &impl MetadataParser,
    ) -> Result<SpriteAtlas, LoadError> {
        let raster = self.decoder.decode(image)?;
        check_dimensions(&raster, self.settings.max_image_dimension)?;
        let tree = parser.parse(metadata)?;
        Ok(SpriteAtlas::new(raster, &tree)?)
    }

    fn cached(&mut self, key: &SourceKey) -> Option<Rc<SpriteAtlas>> {
        let atlas = self.atlases.get(key);
        if atlas.is_some() {
            trace!("Atlas cache hit for {key:?}");
        }
        atlas
    }

    /// Loads an atlas from in-memory sources. `key` identifies the sources
    /// in the cache, so it must change whenever the bytes do.
    pub fn load_bytes(
        &mut self,
        key: impl Into<String>,
        image: &[u8],
        metadata: &[u8],
        format: MetadataFormat,
    ) -> Result<Rc<SpriteAtlas>, LoadError> {
        let key = SourceKey::Memory(key.into());
        if let Some(atlas) = self.cached(&key) {
            return Ok(atlas);
        }

        let atlas = Rc::new(self.build(image, metadata, &format)?);
        debug!("Loaded atlas {key:?}");
        self.atlases.insert(key, atlas.clone());
        Ok(atlas)
    }

    /// Loads an atlas from an image file and a metadata file. The metadata
    /// is read as YAML for `.yaml` and `.yml` files, and as JSON otherwise.
    pub fn load_files(
        &mut self,
        image: impl AsRef<Path>,
        metadata: impl AsRef<Path>,
    ) -> Result<Rc<SpriteAtlas>, LoadError> {
        let (image, metadata) = (image.as_ref(), metadata.as_ref());
        let key = SourceKey::Files {
            image: image.to_owned(),
            metadata: metadata.to_owned(),
        };
        if let Some(atlas) = self.cached(&key) {
            return Ok(atlas);
        }

        let image_bytes = read(image, "image")?;
        let metadata_bytes = read(metadata, "metadata")?;
        let format = MetadataFormat::from_path(metadata);

        let atlas = Rc::new(self.build(&image_bytes, &metadata_bytes, &format)?);
        debug!("Loaded atlas from '{}' and '{}'", image.display(), metadata.display());
        self.atlases.insert(key, atlas.clone());
        Ok(atlas)
    }

    /// Reads the frame, collision box and hit box tables of an animation
    /// from `dir`. Only the frame table is required.
    pub fn load_animation_tables(
        &mut self,
        dir: impl AsRef<Path>,
        animation: &str,
    ) -> Result<Rc<AnimationTables>, LoadError> {
        let dir = dir.as_ref();
        let key = dir.join(animation);
        if let Some(tables) = self.tables.get(&key) {
            trace!("Table cache hit for '{}'", key.display());
            return Ok(tables);
        }

        let frames = read(&dir.join(RecordKind::Frame.file_name(animation)), "frame table")?;
        let frames = String::from_utf8(frames).map_err(|e| ResourceError::Missing {
            path: dir.join(RecordKind::Frame.file_name(animation)),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        let collision = read_optional_table(&dir.join(RecordKind::CollisionBox.file_name(animation)))?;
        let hit = read_optional_table(&dir.join(RecordKind::HitBox.file_name(animation)))?;

        let tables = Rc::new(AnimationTables::parse(
            &frames,
            collision.as_deref(),
            hit.as_deref(),
            self.settings.delimiter,
        )?);

        debug!("Loaded tables of '{animation}' from '{}'", dir.display());
        self.tables.insert(key, tables.clone());
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use yasa_assets::{FormatError, ValidationError};

    use super::*;

    const METADATA: &str = r#"{"Sheets": [{"Name": "Hero", "Sprites": [
        {"Name": "Dot", "x": 1, "y": 0, "width": 1, "height": 1}
    ]}]}"#;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let bytes = vec![255u8; (width * height * 4) as usize];
        lodepng::encode32(&bytes, width as usize, height as usize).unwrap()
    }

    /// A fresh directory for one test.
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("yasa-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_bytes_is_cached() {
        let mut loader = AtlasLoader::new(AtlasSettings::default());
        let image = png(2, 1);

        let first = loader
            .load_bytes("hero", &image, METADATA.as_bytes(), MetadataFormat::Json)
            .unwrap();
        // Garbage is never decoded, the cached atlas is returned
        let second = loader
            .load_bytes("hero", b"garbage", b"garbage", MetadataFormat::Json)
            .unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        loader.clear_caches();
        assert!(loader
            .load_bytes("hero", b"garbage", METADATA.as_bytes(), MetadataFormat::Json)
            .is_err());
    }

    #[test]
    fn test_load_errors_are_classified() {
        let mut loader = AtlasLoader::new(AtlasSettings {
            max_image_dimension: 1,
            ..Default::default()
        });

        assert!(matches!(
            loader.load_bytes("big", &png(2, 1), METADATA.as_bytes(), MetadataFormat::Json),
            Err(LoadError::Resource(ResourceError::Oversize { max: 1, .. }))
        ));
        assert!(matches!(
            loader.load_bytes("bad", &png(1, 1), b"{", MetadataFormat::Json),
            Err(LoadError::Format(FormatError::Metadata(_)))
        ));
        assert!(matches!(
            loader.load_bytes("out", &png(1, 1), METADATA.as_bytes(), MetadataFormat::Json),
            Err(LoadError::Validation(ValidationError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_load_files() {
        let dir = scratch("files");
        fs::write(dir.join("atlas.png"), png(2, 1)).unwrap();
        fs::write(
            dir.join("atlas.yml"),
            "Sheets:\n  - Name: Hero\n    Sprites:\n      - {Name: Dot, x: 1, y: 0, width: 1, height: 1}\n",
        )
        .unwrap();

        let mut loader = AtlasLoader::new(AtlasSettings::default());
        let atlas = loader
            .load_files(dir.join("atlas.png"), dir.join("atlas.yml"))
            .unwrap();
        assert_eq!(atlas.sheet("Hero").unwrap().sprite("Dot").unwrap().width(), 1);

        let again = loader
            .load_files(dir.join("atlas.png"), dir.join("atlas.yml"))
            .unwrap();
        assert!(Rc::ptr_eq(&atlas, &again));
    }

    #[test]
    fn test_bad_paths() {
        let dir = scratch("paths");
        let mut loader = AtlasLoader::new(AtlasSettings::default());

        assert!(matches!(
            loader.load_files("", dir.join("atlas.json")),
            Err(LoadError::Resource(ResourceError::EmptyPath("image")))
        ));
        assert!(matches!(
            loader.load_files(&dir, dir.join("atlas.json")),
            Err(LoadError::Resource(ResourceError::Directory(_)))
        ));
        assert!(matches!(
            loader.load_files(dir.join("missing.png"), dir.join("atlas.json")),
            Err(LoadError::Resource(ResourceError::Missing { .. }))
        ));
    }

    #[test]
    fn test_load_animation_tables() {
        let dir = scratch("tables");
        fs::write(dir.join("walk_frame.tsv"), "0\t0\t1\t1\t100\n1\t0\t1\t1\t100\n").unwrap();
        fs::write(dir.join("walk_collisionbox.tsv"), "0\t0\t1\t1\n0\t0\t1\t1\n").unwrap();

        let mut loader = AtlasLoader::new(AtlasSettings::default());
        let tables = loader.load_animation_tables(&dir, "walk").unwrap();
        assert_eq!(tables.frames.len(), 2);
        assert_eq!(tables.collision_boxes.as_ref().map(Vec::len), Some(2));
        assert_eq!(tables.hit_boxes, None);

        fs::remove_file(dir.join("walk_frame.tsv")).unwrap();
        let cached = loader.load_animation_tables(&dir, "walk").unwrap();
        assert!(Rc::ptr_eq(&tables, &cached));

        assert!(matches!(
            loader.load_animation_tables(&dir, "run"),
            Err(LoadError::Resource(ResourceError::Missing { .. }))
        ));
    }

    #[test]
    fn test_malformed_table_is_not_substituted() {
        let dir = scratch("malformed");
        fs::write(dir.join("jump_frame.tsv"), "0\t0\t1\t1\t100\n").unwrap();
        fs::write(dir.join("jump_hitbox.tsv"), "0\t0\t1\n").unwrap();

        let mut loader = AtlasLoader::new(AtlasSettings::default());
        assert!(matches!(
            loader.load_animation_tables(&dir, "jump"),
            Err(LoadError::Format(FormatError::Record { line: 1, .. }))
        ));
    }

    #[test]
    fn test_injected_cache_without_capacity() {
        let mut loader = AtlasLoader::with_caches(
            AtlasSettings::default(),
            PngDecoder,
            AtlasCache::new(0, Duration::from_secs(60)),
            TableCache::new(0, Duration::from_secs(60)),
        );
        let image = png(2, 1);

        let first = loader
            .load_bytes("hero", &image, METADATA.as_bytes(), MetadataFormat::Json)
            .unwrap();
        let second = loader
            .load_bytes("hero", &image, METADATA.as_bytes(), MetadataFormat::Json)
            .unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
    }
}
