use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Map exporter selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MapFormat {
    /// Structured text: one block per sprite, then animation blocks.
    Atlas,
    /// Lua table (`return { ... }`), 1-based frame indices.
    Lua,
}

impl FromStr for MapFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atlas" | "text" => Ok(Self::Atlas),
            "lua" => Ok(Self::Lua),
            _ => Err(()),
        }
    }
}

/// Packing parameters consumed by the size search and compositor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Maximum atlas width in pixels; the initial probe size of the search.
    #[serde(default = "default_max_dim")]
    pub max_width: u32,
    /// Maximum atlas height in pixels.
    #[serde(default = "default_max_dim")]
    pub max_height: u32,
    /// Blank margin reserved around each sprite; also the edge-bleed
    /// extrusion thickness during compositing.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Round final atlas dimensions up to powers of two.
    #[serde(default)]
    pub power_of_two: bool,
    /// Force the final atlas to be square (max of width/height).
    #[serde(default)]
    pub square: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dim(),
            max_height: default_max_dim(),
            padding: default_padding(),
            power_of_two: false,
            square: false,
        }
    }
}

impl PackerConfig {
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }

    /// Validates the packing parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if self.max_width == 0 || self.max_height == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "atlas dimensions must be positive, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        let total_padding = self.padding.saturating_mul(2);
        if total_padding >= self.max_width || total_padding >= self.max_height {
            return Err(AtlasError::InvalidConfig(format!(
                "padding ({}) * 2 leaves no usable space in {}x{}",
                self.padding, self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.cfg.power_of_two = v;
        self
    }
    pub fn square(mut self, v: bool) -> Self {
        self.cfg.square = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

/// Full configuration for one atlas build run: packing parameters plus
/// discovery inputs, export settings, and output paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Output raster path; the container is selected by extension.
    pub output_image_path: PathBuf,
    /// Output map path.
    pub output_map_path: PathBuf,
    #[serde(default)]
    pub packer: PackerConfig,
    /// Normalized sprite origin in `[0,1]`, carried to the map only.
    #[serde(default = "default_origin")]
    pub origin_x: f32,
    #[serde(default = "default_origin")]
    pub origin_y: f32,
    /// Descend into subdirectories of directory inputs.
    #[serde(default = "default_true")]
    pub recurse_subdirectories: bool,
    /// Emit one animation group per subdirectory.
    #[serde(default = "default_true")]
    pub create_animations: bool,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Ordered list of input files and directories.
    #[serde(default)]
    pub input_paths: Vec<PathBuf>,
    #[serde(default = "default_map_format")]
    pub map_format: MapFormat,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            output_image_path: PathBuf::from("atlas.png"),
            output_map_path: PathBuf::from("atlas.atlas"),
            packer: PackerConfig::default(),
            origin_x: default_origin(),
            origin_y: default_origin(),
            recurse_subdirectories: true,
            create_animations: true,
            frame_rate: default_frame_rate(),
            input_paths: Vec::new(),
            map_format: default_map_format(),
        }
    }
}

impl AtlasConfig {
    /// Validates the whole run configuration, including packing parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        self.packer.validate()?;
        if !(0.0..=1.0).contains(&self.origin_x) || !(0.0..=1.0).contains(&self.origin_y) {
            return Err(AtlasError::InvalidConfig(format!(
                "origin must lie in [0,1], got ({}, {})",
                self.origin_x, self.origin_y
            )));
        }
        if self.frame_rate == 0 {
            return Err(AtlasError::InvalidConfig(
                "frame_rate must be positive".into(),
            ));
        }
        if self.input_paths.is_empty() {
            return Err(AtlasError::InvalidConfig(
                "at least one input path is required".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_dim() -> u32 {
    4096
}
fn default_padding() -> u32 {
    1
}
fn default_origin() -> f32 {
    0.5
}
fn default_frame_rate() -> u32 {
    8
}
fn default_true() -> bool {
    true
}
fn default_map_format() -> MapFormat {
    MapFormat::Atlas
}
