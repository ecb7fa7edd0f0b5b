//! Application settings and command-line flags

use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tbs_data::DatasetConfig;

/// Tamil-capable fonts shipped with common desktop systems, tried in order
/// when no font is configured
pub const SYSTEM_TAMIL_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansTamil-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansTamil-Regular.ttf",
    "/usr/share/fonts/google-noto/NotoSansTamil-Regular.ttf",
    "/usr/share/fonts/truetype/lohit-tamil/Lohit-Tamil.ttf",
    "/usr/share/fonts/truetype/samyak-fonts/Samyak-Tamil.ttf",
    "C:\\Windows\\Fonts\\Nirmala.ttf",
    "C:\\Windows\\Fonts\\latha.ttf",
    "/System/Library/Fonts/Supplemental/Tamil MN.ttc",
    "/Library/Fonts/NotoSansTamil-Regular.ttf",
];

/// Persistent settings, readable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Where verses are read from
    pub dataset: DatasetConfig,

    /// Multiplier for every text style
    pub ui_scale: f32,

    /// A TTF/OTF file with Tamil glyphs
    pub font_path: Option<PathBuf>,

    pub dark_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            ui_scale: 1.0,
            font_path: None,
            dark_mode: false,
        }
    }
}

impl AppSettings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.dataset.validate()?;
        if !(self.ui_scale.is_finite() && self.ui_scale > 0.0) {
            bail!("ui_scale must be a positive number, got {}", self.ui_scale);
        }
        Ok(())
    }

    /// The configured font, else the first system Tamil font present
    pub fn tamil_font_path(&self) -> Option<PathBuf> {
        self.tamil_font_path_with(|path| path.is_file())
    }

    fn tamil_font_path_with(&self, exists: impl Fn(&Path) -> bool) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        SYSTEM_TAMIL_FONTS
            .iter()
            .map(PathBuf::from)
            .find(|path| exists(path))
    }

    /// Read the Tamil font to install
    pub fn read_tamil_font(&self) -> Result<(PathBuf, Vec<u8>)> {
        let path = self
            .tamil_font_path()
            .context("No Tamil font configured and none found on this system; set \"font_path\" in the settings file")?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read Tamil font {}", path.display()))?;
        Ok((path, bytes))
    }

    /// Apply command-line overrides on top of file settings
    pub fn apply_cli(&mut self, cli: &CliArgs) {
        if let Some(dataset) = &cli.dataset {
            self.dataset.path = dataset.clone();
        }
    }
}

/// Flags accepted by the binary
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(
    name = "tamil-bible-slides",
    version,
    about = "Tamil Bible verse slideshow"
)]
pub struct CliArgs {
    /// Settings file (JSON).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verse dataset, overriding the settings file.
    #[arg(long, value_name = "CSV")]
    pub dataset: Option<PathBuf>,

    /// Open this book directly. Kept raw so the route decides whether it is valid.
    #[arg(long, value_name = "ID", allow_hyphen_values = true)]
    pub book: Option<String>,
}

impl CliArgs {
    /// Settings from `--config` (or defaults) with overrides applied
    pub fn load_settings(&self) -> Result<AppSettings> {
        let mut settings = match &self.config {
            Some(path) => AppSettings::from_json_file(path)?,
            None => AppSettings::default(),
        };
        settings.apply_cli(self);
        Ok(settings)
    }
}
