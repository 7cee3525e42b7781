//! Host-side build model the bundler plugs into.
//!
//! This mirrors the slice of a build tool's asset-emission lifecycle the
//! bundler needs: the set of final assets a build produced, the default output
//! location, and whether the invocation belongs to a nested child build. Hosts
//! construct a [`BuildContext`] per build and hand it to
//! [`crate::ZipBundler::process`].

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::Result;
use indexmap::IndexMap;

/// Readable content of a single build asset.
///
/// Content access is fallible: a source backed by external storage may fail on
/// read, which aborts archive assembly for the whole build.
pub trait AssetSource {
    /// Return the asset's full content.
    fn bytes(&self) -> Result<Cow<'_, [u8]>>;
}

/// In-memory asset content, and the form the produced archive is emitted as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSource(Vec<u8>);

impl RawSource {
    /// Wrap an owned buffer.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the underlying buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AssetSource for RawSource {
    fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(&self.0))
    }
}

impl From<Vec<u8>> for RawSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for RawSource {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for RawSource {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// Final assets of a build, keyed by their relative output path.
///
/// Only assets that survive the host's own pipeline belong here; transient
/// intermediates of child builds never appear, so filter patterns cannot match
/// them. Insertion order is preserved and drives archive entry order, which
/// keeps archives byte-identical across runs with identical inputs.
pub type BuildAssets = IndexMap<String, Box<dyn AssetSource>>;

/// One build invocation as seen by the bundler.
pub struct BuildContext {
    /// Absolute root output directory of the host build.
    pub output_dir: PathBuf,
    /// Default output filename configured on the host, when one exists.
    pub output_filename: Option<String>,
    /// Whether this invocation belongs to a nested child build whose assets
    /// are merged into the parent before the parent is finalized.
    pub nested: bool,
    /// Final assets produced by the build.
    pub assets: BuildAssets,
}

impl BuildContext {
    /// Create a context for a top-level build rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_filename: None,
            nested: false,
            assets: BuildAssets::new(),
        }
    }

    /// Register an asset under its relative path, replacing any previous
    /// content stored under the same key.
    pub fn emit_asset(&mut self, name: impl Into<String>, source: impl AssetSource + 'static) {
        self.assets.insert(name.into(), Box::new(source));
    }
}
