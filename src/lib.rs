#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod archive;
pub mod bundler;
pub mod config;
pub mod models;
pub mod paths;
pub mod project;
pub mod selection;

pub use archive::{ArchiveBuilder, ZipArchiveBuilder};
pub use bundler::ZipBundler;
pub use config::{ConfigError, PathMapper, ZipBundlerConfig};
pub use models::{ArchiveOptions, EntryOptions, ResolvedOutput, SelectedAsset};
pub use project::{AssetSource, BuildAssets, BuildContext, RawSource};
pub use selection::{AssetInclusion, AssetSelection, FilterPattern};
