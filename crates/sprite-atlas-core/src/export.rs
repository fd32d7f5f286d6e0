use crate::model::AtlasMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Serialize the map in the structured-text atlas format: one block per
/// sprite (name, trimmed rectangle, origin), a blank line, then one block
/// per animation (name, frame rate, comma-separated frame indices).
///
/// ```text
/// player/idle
///     12,4,64,64
///     0.5,0.5
///
/// walk
///     8
///     0,1,2,3
/// ```
pub fn to_atlas_text(map: &AtlasMap) -> String {
    let mut out = String::new();
    for s in &map.sprites {
        let _ = writeln!(out, "{}", s.name);
        let _ = writeln!(out, "\t{},{},{},{}", s.rect.x, s.rect.y, s.rect.w, s.rect.h);
        let _ = writeln!(out, "\t{},{}", s.origin.0, s.origin.1);
    }
    if !map.animations.is_empty() {
        out.push('\n');
        for a in &map.animations {
            let _ = writeln!(out, "{}", a.name);
            let _ = writeln!(out, "\t{}", a.frame_rate);
            let indices: Vec<String> = a.frames.iter().map(|i| i.to_string()).collect();
            let _ = writeln!(out, "\t{}", indices.join(","));
        }
    }
    out
}

/// Sprite name for a source path: relative to `relative_to`, extension
/// stripped, forward slashes. Falls back to the file stem when the path is
/// not under `relative_to` (e.g. a single-file input).
pub fn make_sprite_name(path: &Path, relative_to: &Path) -> String {
    let named = match path.strip_prefix(relative_to) {
        Ok(rel) => rel.with_extension(""),
        Err(_) => path
            .file_stem()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.with_extension("")),
    };
    named.to_string_lossy().replace('\\', "/")
}
