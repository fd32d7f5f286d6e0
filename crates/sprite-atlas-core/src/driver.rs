use crate::config::{AtlasConfig, MapFormat};
use crate::discovery::{self, Discovered};
use crate::error::{AtlasError, Result};
use crate::export::{make_sprite_name, to_atlas_text};
use crate::export_lua::to_lua_table;
use crate::model::{Animation, AtlasMap, Sprite};
use crate::pipeline::{self, PackOutput};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Runs one full atlas build: discovery, packing, compositing, and export.
/// The run is atomic: any fatal error aborts before output files are
/// replaced. Existing files at the output paths are deleted immediately
/// before each new one is written.
///
/// `step` is an advisory progress callback invoked synchronously at the
/// run's checkpoints; it never affects control flow.
#[instrument(skip_all)]
pub fn pack_sprites<F: FnMut(&str)>(cfg: &AtlasConfig, mut step: F) -> Result<()> {
    cfg.validate()?;

    step("Finding sprites...");
    let found = discovery::find_images(
        &cfg.input_paths,
        cfg.recurse_subdirectories,
        cfg.create_animations,
    )?;
    if found.images.is_empty() {
        return Err(AtlasError::NoImages);
    }
    info!(images = found.images.len(), "discovered inputs");

    let out = pipeline::pack_image_files(&found.images, &cfg.packer, &mut step)?;

    step("Generating map...");
    let map = build_map(cfg, &found, &out);

    replace_file(&cfg.output_image_path, &mut step, "Removing existing atlas image...")?;
    step("Saving atlas image...");
    out.canvas
        .save(&cfg.output_image_path)
        .map_err(|source| AtlasError::Encode {
            path: cfg.output_image_path.clone(),
            source,
        })?;

    let text = match cfg.map_format {
        MapFormat::Atlas => to_atlas_text(&map),
        MapFormat::Lua => to_lua_table(&map, out.layout.width, out.layout.height),
    };
    replace_file(&cfg.output_map_path, &mut step, "Removing existing map file...")?;
    step("Saving map file...");
    fs::write(&cfg.output_map_path, text).map_err(|source| AtlasError::Export {
        path: cfg.output_map_path.clone(),
        source,
    })?;

    info!(
        image = %cfg.output_image_path.display(),
        map = %cfg.output_map_path.display(),
        "atlas written"
    );
    step("Done");
    Ok(())
}

/// Assembles the exported map: trimmed rectangles named relative to the
/// first input path, plus animations resolved to indices into the flat
/// sprite list.
fn build_map(cfg: &AtlasConfig, found: &Discovered, out: &PackOutput) -> AtlasMap {
    let relative_to = cfg
        .input_paths
        .first()
        .cloned()
        .unwrap_or_default();

    let mut index_by_key: HashMap<&str, usize> = HashMap::new();
    let mut sprites = Vec::with_capacity(out.layout.entries.len());
    for (i, entry) in out.layout.entries.iter().enumerate() {
        index_by_key.insert(entry.key.as_str(), i);
        sprites.push(Sprite {
            name: make_sprite_name(Path::new(&entry.key), &relative_to),
            rect: entry.trimmed,
            origin: (cfg.origin_x, cfg.origin_y),
        });
    }

    let mut animations = Vec::with_capacity(found.animations.len());
    for group in &found.animations {
        let frames: Vec<usize> = group
            .frames
            .iter()
            .filter_map(|p| index_by_key.get(pipeline::path_key(p).as_str()).copied())
            .collect();
        if !frames.is_empty() {
            animations.push(Animation {
                name: group.name.clone(),
                frame_rate: cfg.frame_rate,
                frames,
            });
        }
    }

    AtlasMap {
        sprites,
        animations,
    }
}

fn replace_file<F: FnMut(&str)>(path: &Path, step: &mut F, msg: &str) -> Result<()> {
    if path.exists() {
        step(msg);
        fs::remove_file(path)?;
    }
    Ok(())
}
