use image::{Rgba, RgbaImage};
use sprite_atlas_core::config::{AtlasConfig, MapFormat, PackerConfig};
use sprite_atlas_core::error::AtlasError;
use sprite_atlas_core::pack_sprites;
use sprite_atlas_core::runtime::SpriteAtlas;
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sprite-atlas-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn write_solid(path: &Path, w: u32, h: u32, color: [u8; 4]) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    RgbaImage::from_pixel(w, h, Rgba(color))
        .save(path)
        .expect("write test image");
}

/// in/
///   a.png (8x8), b.png (4x4)
///   walk/ walk_0.png, walk_1.png (2x2)
fn sample_inputs(dir: &Path) -> PathBuf {
    let input = dir.join("in");
    write_solid(&input.join("a.png"), 8, 8, [255, 0, 0, 255]);
    write_solid(&input.join("b.png"), 4, 4, [0, 255, 0, 255]);
    write_solid(&input.join("walk/walk_0.png"), 2, 2, [0, 0, 255, 255]);
    write_solid(&input.join("walk/walk_1.png"), 2, 2, [255, 255, 0, 255]);
    input
}

fn config(dir: &Path, input: PathBuf) -> AtlasConfig {
    AtlasConfig {
        output_image_path: dir.join("atlas.png"),
        output_map_path: dir.join("atlas.atlas"),
        packer: PackerConfig::builder()
            .with_max_dimensions(128, 128)
            .padding(1)
            .build(),
        input_paths: vec![input],
        ..AtlasConfig::default()
    }
}

#[test]
fn full_run_writes_a_parsable_atlas() {
    let dir = scratch_dir("driver-full");
    let cfg = config(&dir, sample_inputs(&dir));
    pack_sprites(&cfg, |_| {}).expect("pack");

    let text = fs::read_to_string(&cfg.output_map_path).expect("map written");
    let atlas = SpriteAtlas::from_map_text(&text).expect("map parses");

    let mut names: Vec<&str> = atlas.sprites().iter().map(|s| s.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["a", "b", "walk/walk_0", "walk/walk_1"]);

    let walk = atlas.animation("walk").expect("walk animation");
    assert_eq!(walk.frame_rate, cfg.frame_rate);
    let frames = atlas.animation_frames("walk").expect("frames resolve");
    assert_eq!(frames[0].name, "walk/walk_0");
    assert_eq!(frames[1].name, "walk/walk_1");

    // every mapped rectangle lies inside the written raster
    let (w, h) = image::image_dimensions(&cfg.output_image_path).expect("image written");
    for s in atlas.sprites() {
        assert!(s.rect.x + s.rect.w <= w, "{} escapes width", s.name);
        assert!(s.rect.y + s.rect.h <= h, "{} escapes height", s.name);
        assert_eq!(s.origin, (cfg.origin_x, cfg.origin_y));
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sprite_pixels_survive_the_round_trip() {
    let dir = scratch_dir("driver-pixels");
    let cfg = config(&dir, sample_inputs(&dir));
    pack_sprites(&cfg, |_| {}).expect("pack");

    let canvas = image::open(&cfg.output_image_path)
        .expect("open atlas")
        .to_rgba8();
    let text = fs::read_to_string(&cfg.output_map_path).expect("map");
    let atlas = SpriteAtlas::from_map_text(&text).expect("parse");

    let a = atlas.sprite("a").expect("a");
    assert_eq!(canvas.get_pixel(a.rect.x, a.rect.y).0, [255, 0, 0, 255]);
    let w0 = atlas.sprite("walk/walk_0").expect("walk_0");
    assert_eq!(canvas.get_pixel(w0.rect.x, w0.rect.y).0, [0, 0, 255, 255]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn existing_outputs_are_replaced() {
    let dir = scratch_dir("driver-replace");
    let cfg = config(&dir, sample_inputs(&dir));
    fs::write(&cfg.output_image_path, b"stale").expect("seed stale image");
    fs::write(&cfg.output_map_path, b"stale").expect("seed stale map");

    pack_sprites(&cfg, |_| {}).expect("pack");

    assert!(image::image_dimensions(&cfg.output_image_path).is_ok());
    let text = fs::read_to_string(&cfg.output_map_path).expect("map");
    assert!(SpriteAtlas::from_map_text(&text).is_ok());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn lua_format_writes_a_lua_table() {
    let dir = scratch_dir("driver-lua");
    let mut cfg = config(&dir, sample_inputs(&dir));
    cfg.output_map_path = dir.join("atlas.lua");
    cfg.map_format = MapFormat::Lua;
    pack_sprites(&cfg, |_| {}).expect("pack");

    let lua = fs::read_to_string(&cfg.output_map_path).expect("map");
    assert!(lua.starts_with("return {"));
    assert!(lua.contains("[\"walk\"]"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_input_leaves_no_outputs_behind() {
    let dir = scratch_dir("driver-empty");
    let input = dir.join("in");
    fs::create_dir_all(&input).expect("mkdir");
    let cfg = config(&dir, input);

    let err = pack_sprites(&cfg, |_| {}).unwrap_err();
    assert!(matches!(err, AtlasError::NoImages));
    assert!(!cfg.output_image_path.exists());
    assert!(!cfg.output_map_path.exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn infeasible_layout_leaves_existing_outputs_untouched() {
    let dir = scratch_dir("driver-atomic");
    let mut cfg = config(&dir, sample_inputs(&dir));
    cfg.packer = PackerConfig::builder()
        .with_max_dimensions(4, 4)
        .padding(1)
        .build();
    fs::write(&cfg.output_map_path, "keep me").expect("seed map");

    let err = pack_sprites(&cfg, |_| {}).unwrap_err();
    assert!(matches!(err, AtlasError::OutOfSpace { .. }));
    assert_eq!(
        fs::read_to_string(&cfg.output_map_path).expect("still there"),
        "keep me"
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn progress_callback_reports_the_run_checkpoints() {
    let dir = scratch_dir("driver-steps");
    let cfg = config(&dir, sample_inputs(&dir));
    let mut steps: Vec<String> = Vec::new();
    pack_sprites(&cfg, |msg| steps.push(msg.to_string())).expect("pack");

    assert_eq!(steps.first().map(String::as_str), Some("Finding sprites..."));
    assert_eq!(steps.last().map(String::as_str), Some("Done"));
    assert!(steps.iter().any(|s| s.starts_with("Pack attempt")));
    assert!(steps.iter().any(|s| s == "Saving atlas image..."));
    assert!(steps.iter().any(|s| s == "Saving map file..."));
    let _ = fs::remove_dir_all(&dir);
}
