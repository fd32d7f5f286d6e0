use crate::compositing::{blit_rgba, extrude_edges};
use crate::config::PackerConfig;
use crate::error::{AtlasError, Result};
use crate::model::Rect;
use crate::search;
use image::{ImageReader, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// One placed sprite in a layout. `padded` is the rectangle reserved during
/// packing (true size grown by `padding` on each side); `trimmed` is the
/// sprite's true extent, offset by `padding` inside it. The exported map
/// uses `trimmed`; compositing bleeds edges into the `padded` margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub key: String,
    pub padded: Rect,
    pub trimmed: Rect,
}

/// Result of a layout-only pack: final canvas size plus placements in
/// packing order.
#[derive(Debug, Clone)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    pub entries: Vec<LayoutEntry>,
}

/// Result of a full pack: layout (keys are normalized path strings) plus
/// the composited RGBA canvas, handed to the caller by value.
#[derive(Debug)]
pub struct PackOutput {
    pub layout: AtlasLayout,
    pub canvas: RgbaImage,
}

struct Prep {
    path: PathBuf,
    key: String,
    width: u32,
    height: u32,
}

/// Packs bare sizes without touching pixel data. Inputs are
/// (key, width, height); sorting and placement match `pack_image_files`.
#[instrument(skip_all)]
pub fn pack_sizes<K: Into<String>>(
    items: Vec<(K, u32, u32)>,
    cfg: &PackerConfig,
) -> Result<AtlasLayout> {
    cfg.validate()?;
    if items.is_empty() {
        return Err(AtlasError::NoImages);
    }
    let mut items: Vec<(String, u32, u32)> = items
        .into_iter()
        .map(|(k, w, h)| (k.into(), w, h))
        .collect();
    sort_largest_first(&mut items);
    let sizes: Vec<(u32, u32)> = items.iter().map(|&(_, w, h)| (w, h)).collect();
    let solved = search::search(&sizes, cfg, &mut |_| {})?;
    Ok(layout_from(&items, solved, cfg.padding))
}

/// Measures, sorts, and packs the given image files, then composites the
/// final canvas with edge-bleed extrusion. `step` is an advisory progress
/// side channel; it never affects control flow.
#[instrument(skip_all)]
pub fn pack_image_files<F: FnMut(&str)>(
    paths: &[PathBuf],
    cfg: &PackerConfig,
    mut step: F,
) -> Result<PackOutput> {
    cfg.validate()?;
    if paths.is_empty() {
        return Err(AtlasError::NoImages);
    }

    // Measure every input up front; any unreadable image aborts the run.
    let mut preps = Vec::with_capacity(paths.len());
    for path in paths {
        step(&format!("Loading {}...", display_name(path)));
        let (width, height) =
            image::image_dimensions(path).map_err(|source| AtlasError::Decode {
                path: path.clone(),
                source,
            })?;
        preps.push(Prep {
            path: path.clone(),
            key: path_key(path),
            width,
            height,
        });
    }

    step("Sorting images...");
    preps.sort_by(|a, b| {
        b.width
            .cmp(&a.width)
            .then_with(|| b.height.cmp(&a.height))
            .then_with(|| a.key.cmp(&b.key))
    });

    let sizes: Vec<(u32, u32)> = preps.iter().map(|p| (p.width, p.height)).collect();
    let solved = search::search(&sizes, cfg, &mut |msg| step(msg))?;
    info!(
        width = solved.width,
        height = solved.height,
        sprites = preps.len(),
        "packed"
    );

    let items: Vec<(String, u32, u32)> = preps
        .iter()
        .map(|p| (p.key.clone(), p.width, p.height))
        .collect();
    let layout = layout_from(&items, solved, cfg.padding);

    // Composite. Each source image is decoded, copied, and released before
    // moving on to the next one.
    let mut canvas = RgbaImage::new(layout.width, layout.height);
    for (prep, entry) in preps.iter().zip(layout.entries.iter()) {
        step(&format!("Writing {}...", display_name(&prep.path)));
        let rgba = ImageReader::open(&prep.path)
            .map_err(|e| AtlasError::Decode {
                path: prep.path.clone(),
                source: image::ImageError::IoError(e),
            })?
            .with_guessed_format()
            .map_err(|e| AtlasError::Decode {
                path: prep.path.clone(),
                source: image::ImageError::IoError(e),
            })?
            .decode()
            .map_err(|source| AtlasError::Decode {
                path: prep.path.clone(),
                source,
            })?
            .to_rgba8();
        blit_rgba(&rgba, &mut canvas, entry.trimmed.x, entry.trimmed.y);
        if cfg.padding >= 1 {
            extrude_edges(&mut canvas, &entry.trimmed, cfg.padding);
        }
        debug!(key = %entry.key, ?entry.trimmed, "composited");
    }

    Ok(PackOutput { layout, canvas })
}

fn layout_from(items: &[(String, u32, u32)], solved: search::Solved, padding: u32) -> AtlasLayout {
    let entries = items
        .iter()
        .zip(solved.origins.iter())
        .map(|(&(ref key, w, h), &(x, y))| {
            let padded = Rect::new(x, y, w + padding * 2, h + padding * 2);
            LayoutEntry {
                key: key.clone(),
                trimmed: Rect::new(x + padding, y + padding, w, h),
                padded,
            }
        })
        .collect();
    AtlasLayout {
        width: solved.width,
        height: solved.height,
        entries,
    }
}

fn sort_largest_first(items: &mut [(String, u32, u32)]) {
    items.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
}

/// Normalized key for a source path: forward slashes on every platform.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
