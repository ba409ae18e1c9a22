pub mod animation;
pub mod atlas;
pub mod clock;
pub mod frame;
pub mod loader;
pub mod sheet;
pub mod sprite;

pub use animation::{AnimationData, AnimationSequence};
pub use atlas::SpriteAtlas;
pub use clock::{AnimationClock, AnimationEvent, AnimationEventKind, AnimationListener, ListenerId};
pub use frame::{NamedBox, SpriteFrame};
pub use loader::{AtlasCache, AtlasLoader, SourceKey, TableCache};
pub use sheet::SpriteSheet;
pub use sprite::{SpriteDefinition, SpriteTemplate};
