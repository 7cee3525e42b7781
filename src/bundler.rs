//! Build orchestrator packaging selected assets into the output archive.

use anyhow::{Context, Result};

use crate::archive::{ArchiveBuilder, ZipArchiveBuilder};
use crate::config::{ConfigError, ZipBundlerConfig};
use crate::models::SelectedAsset;
use crate::paths::{make_entry_path, resolve_output};
use crate::project::{BuildContext, RawSource};
use crate::selection::AssetSelection;

/// Archive-emission plugin bound to one immutable configuration.
///
/// One `ZipBundler` may serve any number of builds. Every invocation that does
/// real work opens its own archive session over a fresh output buffer, so
/// archives from separate builds never share state.
#[derive(Debug)]
pub struct ZipBundler {
    config: ZipBundlerConfig,
    selection: AssetSelection,
}

impl ZipBundler {
    /// Create a bundler, validating the configuration eagerly.
    ///
    /// Fails before any build runs when `path_prefix` is not a relative path.
    pub fn new(config: ZipBundlerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let selection = AssetSelection::new(config.include.clone(), config.exclude.clone());
        Ok(Self { config, selection })
    }

    /// Borrow the validated configuration.
    pub fn config(&self) -> &ZipBundlerConfig {
        &self.config
    }

    /// Decide which assets are packaged and where each lands in the archive.
    ///
    /// Assets are visited in the order the host emitted them, so identical
    /// builds yield identical entry ordering. Matching always tests the
    /// original asset name; the mapper and prefix only shape the entry path.
    /// An empty result is valid and produces an empty archive.
    pub fn select(&self, ctx: &BuildContext) -> Vec<SelectedAsset> {
        let prefix = self.config.path_prefix.as_deref().unwrap_or("");

        ctx.assets
            .keys()
            .filter(|name| self.selection.is_included(name))
            .map(|name| {
                let mapped = match &self.config.path_mapper {
                    Some(mapper) => mapper(name),
                    None => name.clone(),
                };
                SelectedAsset {
                    name: name.clone(),
                    archive_path: make_entry_path(prefix, &mapped),
                }
            })
            .collect()
    }

    /// Package the build's assets and register the archive as a new asset.
    ///
    /// The host invokes this once per build. Nested child builds are a no-op,
    /// since their assets are merged into the parent before the parent is
    /// processed. The method returns only after the archive bytes are fully
    /// materialised and registered, so the host can rely on the asset being
    /// present as soon as the call completes. Asset read and archive write
    /// failures abort the invocation; nothing is registered in that case.
    pub fn process(&self, ctx: &mut BuildContext) -> Result<()> {
        self.process_with(
            ctx,
            ZipArchiveBuilder::new(self.config.archive_options.clone()),
        )
    }

    /// Package the build's assets through a caller-supplied archive session.
    ///
    /// The session must be fresh; it is consumed by this invocation.
    pub fn process_with<B: ArchiveBuilder>(
        &self,
        ctx: &mut BuildContext,
        mut builder: B,
    ) -> Result<()> {
        if ctx.nested {
            return Ok(());
        }

        for selected in self.select(ctx) {
            let source = ctx
                .assets
                .get(&selected.name)
                .with_context(|| format!("unknown asset {}", selected.name))?;
            let content = source
                .bytes()
                .with_context(|| format!("failed to read asset {}", selected.name))?;
            builder.add_entry(&selected.archive_path, &content, &self.config.entry_options)?;
        }

        let archive = builder.finalize()?;

        let resolved = resolve_output(
            &ctx.output_dir,
            ctx.output_filename.as_deref(),
            &self.config,
        )?;
        ctx.emit_asset(resolved.asset_key, RawSource::new(archive));
        Ok(())
    }
}
