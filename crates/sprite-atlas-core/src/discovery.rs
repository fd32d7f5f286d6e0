use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directories whose name starts with this tag are left out of the scan,
/// unless the tagged directory is the sole top-level input path.
pub const ATLAS_DIR_TAG: &str = "[atlas]";

/// One animation grouping: a subdirectory name plus its frame files in
/// lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationGroup {
    pub name: String,
    pub frames: Vec<PathBuf>,
}

/// Result of input discovery: a deduplicated, ordered image list plus the
/// animation groupings found in subdirectories.
#[derive(Debug, Default)]
pub struct Discovered {
    pub images: Vec<PathBuf>,
    pub animations: Vec<AnimationGroup>,
}

/// Collects image files under `input_paths`. Files named directly are
/// taken as-is; directories contribute their direct image files, then
/// (when `recurse` is set) each subdirectory in turn, one `AnimationGroup`
/// per subdirectory when `create_animations` is set.
pub fn find_images(
    input_paths: &[PathBuf],
    recurse: bool,
    create_animations: bool,
) -> Result<Discovered> {
    let mut found = Discovered::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for (i, path) in input_paths.iter().enumerate() {
        if is_tagged(path) && i > 0 {
            debug!(?path, "skipping tagged input path");
            continue;
        }
        if path.is_dir() {
            for file in direct_files(path)? {
                if is_image_file(&file) {
                    push_unique(&mut found.images, &mut seen, file);
                }
            }
            if recurse {
                for dir in direct_dirs(path)? {
                    if is_tagged(&dir) {
                        continue;
                    }
                    collect_group(&dir, create_animations, &mut found, &mut seen)?;
                }
            }
        } else if is_image_file(path) {
            push_unique(&mut found.images, &mut seen, path.clone());
        }
    }
    debug!(
        images = found.images.len(),
        animations = found.animations.len(),
        "discovery complete"
    );
    Ok(found)
}

fn collect_group(
    dir: &Path,
    create_animations: bool,
    found: &mut Discovered,
    seen: &mut HashSet<PathBuf>,
) -> Result<()> {
    let mut frames = Vec::new();
    for file in direct_files(dir)? {
        if is_image_file(&file) {
            push_unique(&mut found.images, seen, file.clone());
            frames.push(file);
        }
    }
    if create_animations && !frames.is_empty() {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        found.animations.push(AnimationGroup { name, frames });
    }
    for sub in direct_dirs(dir)? {
        if !is_tagged(&sub) {
            collect_group(&sub, create_animations, found, seen)?;
        }
    }
    Ok(())
}

/// Direct children of `dir` that are files, in lexicographic name order.
fn direct_files(dir: &Path) -> Result<Vec<PathBuf>> {
    children(dir, true)
}

fn direct_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    children(dir, false)
}

fn children(dir: &Path, files: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() == files {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

fn push_unique(images: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>, path: PathBuf) {
    if seen.insert(path.clone()) {
        images.push(path);
    }
}

fn is_tagged(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase().starts_with(ATLAS_DIR_TAG))
        .unwrap_or(false)
}

pub fn is_image_file(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}
