use crate::model::AtlasMap;
use std::fmt::Write as _;

/// Serialize the map as a Lua table (`return { ... }`). Frame indices are
/// converted to 1-based for Lua. Atlas width/height are included since the
/// text format carries them implicitly in the raster.
pub fn to_lua_table(map: &AtlasMap, width: u32, height: u32) -> String {
    let mut s = String::new();
    s.push_str("return {\n");
    let _ = writeln!(s, "\twidth = {},", width);
    let _ = writeln!(s, "\theight = {},", height);
    s.push_str("\tsprites = {\n");
    for sp in &map.sprites {
        let _ = writeln!(
            s,
            "\t\t[\"{}\"] = {{ x = {}, y = {}, width = {}, height = {}, originX = {}, originY = {} }},",
            lua_escape(&sp.name),
            sp.rect.x,
            sp.rect.y,
            sp.rect.w,
            sp.rect.h,
            sp.origin.0,
            sp.origin.1,
        );
    }
    s.push_str("\t},\n");
    s.push_str("\tanimations = {\n");
    for a in &map.animations {
        let indices: Vec<String> = a.frames.iter().map(|i| (i + 1).to_string()).collect();
        let _ = writeln!(
            s,
            "\t\t[\"{}\"] = {{ fps = {}, frames = {{ {} }} }},",
            lua_escape(&a.name),
            a.frame_rate,
            indices.join(", "),
        );
    }
    s.push_str("\t},\n");
    s.push_str("}\n");
    s
}

fn lua_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
