//! Core library for packing sprites into a single texture atlas.
//!
//! - Packing: a free-rectangle packer driven by an iterative size search
//!   that converges on a near-minimal canvas (power-of-two / square
//!   constraints supported).
//! - Pipeline: `pack_image_files` measures, sorts, packs, and composites
//!   the final RGBA canvas with edge-bleed extrusion; `pack_sizes` is the
//!   layout-only variant.
//! - Driver: `pack_sprites` runs discovery through export in one call.
//! - Runtime: `SpriteAtlas` gives O(1) name lookups over an exported map.
//!
//! Quick example:
//! ```ignore
//! use sprite_atlas_core::{pack_sprites, AtlasConfig};
//! # fn main() -> anyhow::Result<()> {
//! let cfg = AtlasConfig {
//!     input_paths: vec!["sprites".into()],
//!     output_image_path: "atlas.png".into(),
//!     output_map_path: "atlas.atlas".into(),
//!     ..Default::default()
//! };
//! pack_sprites(&cfg, |msg| println!("{msg}"))?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod export;
pub mod export_lua;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod runtime;

mod search;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use export::*;
pub use export_lua::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{AtlasConfig, MapFormat, PackerConfig, PackerConfigBuilder};
    pub use crate::discovery::{find_images, AnimationGroup, Discovered};
    pub use crate::error::{AtlasError, Result};
    pub use crate::model::{Animation, AtlasMap, Rect, Sprite};
    pub use crate::packer::RectPacker;
    pub use crate::pipeline::{AtlasLayout, LayoutEntry, PackOutput};
    pub use crate::runtime::SpriteAtlas;
    pub use crate::{pack_image_files, pack_sizes, pack_sprites};
}
