use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use time_riders_core::GenerationConfig;

/// Settings file accepted through `--config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SettingsFile {
    /// Grid and walk parameters.
    pub(crate) generation: GenerationConfig,
    /// Seed used when none is passed on the command line.
    pub(crate) seed: Option<u64>,
    /// Directory environments are written to when none is passed.
    pub(crate) out_dir: Option<PathBuf>,
}

impl SettingsFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid settings toml")
    }
}

/// Grid parameters shared by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct GridArgs {
    /// TOML settings file; explicit flags take precedence over its values.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Number of grid columns.
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Number of grid rows.
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Number of time riders.
    #[arg(long)]
    pub(crate) riders: Option<usize>,
    /// Number of recently vacated cells a rider may not re-enter.
    #[arg(long)]
    pub(crate) trail: Option<usize>,
    /// Multiple of the grid area bounding the moves of a single walk.
    #[arg(long)]
    pub(crate) max_steps_factor: Option<u32>,
}

impl GridArgs {
    /// Loads the settings file, if any, and applies command-line overrides.
    pub(crate) fn resolve(&self) -> Result<SettingsFile> {
        let settings = match &self.config {
            Some(path) => SettingsFile::load(path)?,
            None => SettingsFile::default(),
        };
        Ok(self.apply(settings))
    }

    fn apply(&self, mut settings: SettingsFile) -> SettingsFile {
        let generation = &mut settings.generation;
        if let Some(width) = self.width {
            generation.width = width;
        }
        if let Some(height) = self.height {
            generation.height = height;
        }
        if let Some(riders) = self.riders {
            generation.num_riders = riders;
        }
        if let Some(trail) = self.trail {
            generation.trail_length = trail;
        }
        if let Some(factor) = self.max_steps_factor {
            generation.max_steps_factor = factor;
        }
        settings
    }
}
