pub mod asset_index;
pub mod locator;
pub mod version;

pub use asset_index::{AssetIndex, AssetObject, LangEntry};
pub use locator::{select_latest, IndexLocator, ManifestRef};
pub use version::{InvalidVersion, PreRelease, Version};
