use sprite_atlas_core::discovery::find_images;
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sprite-atlas-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, b"").expect("touch");
}

/// root/
///   b.png, a.png, notes.txt
///   walk/ walk_1.png, walk_0.png, walk_2.png
///   nested/ n.png
///   nested/inner/ i.png
///   [atlas]skip/ x.png
fn sample_tree(name: &str) -> PathBuf {
    let root = scratch_dir(name);
    touch(&root.join("b.png"));
    touch(&root.join("a.png"));
    touch(&root.join("notes.txt"));
    touch(&root.join("walk/walk_1.png"));
    touch(&root.join("walk/walk_0.png"));
    touch(&root.join("walk/walk_2.png"));
    touch(&root.join("nested/n.png"));
    touch(&root.join("nested/inner/i.png"));
    touch(&root.join("[atlas]skip/x.png"));
    root
}

fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .expect("under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn full_scan_is_ordered_and_grouped() {
    let root = sample_tree("disc-full");
    let found = find_images(&[root.clone()], true, true).expect("scan");

    assert_eq!(
        names(&found.images, &root),
        [
            "a.png",
            "b.png",
            "nested/n.png",
            "nested/inner/i.png",
            "walk/walk_0.png",
            "walk/walk_1.png",
            "walk/walk_2.png",
        ]
    );

    let walk = found
        .animations
        .iter()
        .find(|g| g.name == "walk")
        .expect("walk group");
    assert_eq!(
        names(&walk.frames, &root),
        ["walk/walk_0.png", "walk/walk_1.png", "walk/walk_2.png"]
    );
    let group_names: Vec<&str> = found.animations.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(group_names, ["nested", "inner", "walk"]);
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn tagged_directories_are_excluded() {
    let root = sample_tree("disc-tagged");
    let found = find_images(&[root.clone()], true, true).expect("scan");
    assert!(found
        .images
        .iter()
        .all(|p| !p.to_string_lossy().contains("skip")));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn tagged_path_is_honored_as_the_first_input() {
    let root = sample_tree("disc-tagged-first");
    let tagged = root.join("[atlas]skip");
    let found = find_images(&[tagged.clone()], true, true).expect("scan");
    assert_eq!(names(&found.images, &tagged), ["x.png"]);

    // but skipped when it is a later input
    let found = find_images(&[root.join("walk"), tagged], true, true).expect("scan");
    assert!(found
        .images
        .iter()
        .all(|p| !p.to_string_lossy().contains("skip")));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn no_recursion_keeps_only_direct_files() {
    let root = sample_tree("disc-flat");
    let found = find_images(&[root.clone()], false, true).expect("scan");
    assert_eq!(names(&found.images, &root), ["a.png", "b.png"]);
    assert!(found.animations.is_empty());
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn animations_off_still_collects_subdirectory_images() {
    let root = sample_tree("disc-noanim");
    let found = find_images(&[root.clone()], true, false).expect("scan");
    assert!(found.animations.is_empty());
    assert!(names(&found.images, &root).contains(&"walk/walk_0.png".to_string()));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn duplicate_inputs_are_deduplicated() {
    let root = sample_tree("disc-dedup");
    let file = root.join("a.png");
    let found =
        find_images(&[file.clone(), file.clone(), root.clone()], true, true).expect("scan");
    let count = found.images.iter().filter(|p| **p == file).count();
    assert_eq!(count, 1);
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn plain_file_inputs_are_taken_as_is() {
    let root = sample_tree("disc-file");
    let found = find_images(&[root.join("b.png"), root.join("a.png")], true, true).expect("scan");
    assert_eq!(names(&found.images, &root), ["b.png", "a.png"]);
    let _ = fs::remove_dir_all(&root);
}
