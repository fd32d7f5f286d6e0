use crate::model::Rect;
use image::RgbaImage;

/// Copy `src` into `canvas` with its top-left at (dx, dy). Pixels are
/// copied verbatim (no blending); writes falling outside the canvas are
/// dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    for (x, y, px) in src.enumerate_pixels() {
        if dx + x < cw && dy + y < ch {
            canvas.put_pixel(dx + x, dy + y, *px);
        }
    }
}

/// Edge-bleed extrusion: replicate the outermost row/column of `content`
/// into the surrounding margin, `amount` pixels thick on all four sides.
/// Copies are exact so bilinear sampling at the seam never picks up the
/// canvas background or a neighboring sprite. `content` must already be
/// blitted; writes are bounds-guarded because the margin of a sprite on
/// the canvas edge may be clipped.
pub fn extrude_edges(canvas: &mut RgbaImage, content: &Rect, amount: u32) {
    if amount == 0 || content.w == 0 || content.h == 0 {
        return;
    }
    let (cw, ch) = canvas.dimensions();
    let bottom_row = content.y + content.h - 1;
    let right_col = content.x + content.w - 1;

    for e in 1..=amount {
        // top margin row
        if content.y >= e {
            for xx in 0..content.w {
                let x = content.x + xx;
                if x < cw && content.y < ch {
                    let px = *canvas.get_pixel(x, content.y);
                    canvas.put_pixel(x, content.y - e, px);
                }
            }
        }
        // bottom margin row
        if bottom_row < ch && bottom_row + e < ch {
            for xx in 0..content.w {
                let x = content.x + xx;
                if x < cw {
                    let px = *canvas.get_pixel(x, bottom_row);
                    canvas.put_pixel(x, bottom_row + e, px);
                }
            }
        }
        // left margin column
        if content.x >= e {
            for yy in 0..content.h {
                let y = content.y + yy;
                if y < ch && content.x < cw {
                    let px = *canvas.get_pixel(content.x, y);
                    canvas.put_pixel(content.x - e, y, px);
                }
            }
        }
        // right margin column
        if right_col < cw && right_col + e < cw {
            for yy in 0..content.h {
                let y = content.y + yy;
                if y < ch {
                    let px = *canvas.get_pixel(right_col, y);
                    canvas.put_pixel(right_col + e, y, px);
                }
            }
        }
    }
}
