use crate::config::PackerConfig;
use crate::error::{AtlasError, Result};
use crate::packer::RectPacker;
use tracing::debug;

/// Shrink policy of the size search. Both dimensions shrink freely until
/// the result stabilizes once, after which only the height is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Free,
    VerticalOnly,
}

/// Placements for one successful pack attempt, aligned with the input
/// order: top-left origin of each padded rectangle.
pub(crate) struct Solved {
    pub width: u32,
    pub height: u32,
    pub origins: Vec<(u32, u32)>,
}

/// Searches for a near-minimal canvas that fits every size in `sizes`
/// (true sprite sizes, pre-sorted; padding is added here). Probes start at
/// the configured maximum and shrink by the smallest sprite dimension per
/// iteration; a failed probe after any success falls back to the last good
/// placement set.
pub(crate) fn search(
    sizes: &[(u32, u32)],
    cfg: &PackerConfig,
    step: &mut dyn FnMut(&str),
) -> Result<Solved> {
    let padding = cfg.padding;

    let mut smallest_w = u32::MAX;
    let mut smallest_h = u32::MAX;
    for &(w, h) in sizes {
        smallest_w = smallest_w.min(w);
        smallest_h = smallest_h.min(h);
    }

    let mut test_w = cfg.max_width;
    let mut test_h = cfg.max_height;
    let mut out_w = cfg.max_width;
    let mut out_h = cfg.max_height;
    let mut best: Option<Vec<(u32, u32)>> = None;
    let mut phase = Phase::Free;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        step(&format!("Pack attempt {attempt}: {test_w}x{test_h}"));
        debug!(attempt, test_w, test_h, ?phase, "probe");

        let Some(origins) = try_pack_all(sizes, test_w, test_h, padding) else {
            // Never succeeded at any size: the images cannot fit at all.
            if best.is_none() {
                return Err(AtlasError::OutOfSpace {
                    max_width: cfg.max_width,
                    max_height: cfg.max_height,
                });
            }
            if phase == Phase::VerticalOnly {
                break;
            }
            // The free shrink overshot; grow back past the last failure and
            // retry with only the height still shrinking.
            phase = Phase::VerticalOnly;
            test_w += smallest_w + padding * 2;
            test_h += smallest_h + padding * 2;
            continue;
        };

        // Tight bounding box of the padded placements.
        let mut bound_w = 0u32;
        let mut bound_h = 0u32;
        for (i, &(x, y)) in origins.iter().enumerate() {
            let (w, h) = sizes[i];
            bound_w = bound_w.max(x + w + padding * 2);
            bound_h = bound_h.max(y + h + padding * 2);
        }
        best = Some(origins);

        // The next probe starts at the tight bound. Once the vertical-only
        // phase begins the width keeps one extra trailing padding, matching
        // the original packer's observable output.
        test_w = if phase == Phase::Free {
            bound_w
        } else {
            bound_w + padding
        };
        test_h = bound_h;

        if cfg.power_of_two {
            test_w = next_pow2(test_w.max(1));
            test_h = next_pow2(test_h.max(1));
        }
        if cfg.square {
            let m = test_w.max(test_h);
            test_w = m;
            test_h = m;
        }

        // Stable size means one axis has converged; switch to the
        // vertical-only pass, and stop after it stabilizes too.
        if test_w == out_w && test_h == out_h {
            if phase == Phase::VerticalOnly {
                break;
            }
            phase = Phase::VerticalOnly;
        }

        out_w = test_w;
        out_h = test_h;

        if phase == Phase::Free {
            test_w = test_w.saturating_sub(smallest_w);
        }
        test_h = test_h.saturating_sub(smallest_h);
    }

    debug!(attempts = attempt, out_w, out_h, "size search converged");
    Ok(Solved {
        width: out_w,
        height: out_h,
        origins: best.expect("search terminates only after a successful attempt"),
    })
}

/// One full pack attempt at a fixed canvas size. Returns padded-rectangle
/// origins in input order, or `None` as soon as any sprite fails to place.
fn try_pack_all(
    sizes: &[(u32, u32)],
    width: u32,
    height: u32,
    padding: u32,
) -> Option<Vec<(u32, u32)>> {
    let mut packer = RectPacker::new(width, height);
    let mut origins = Vec::with_capacity(sizes.len());
    for &(w, h) in sizes {
        let origin = packer.try_pack(w + padding * 2, h + padding * 2)?;
        origins.push(origin);
    }
    Some(origins)
}

pub(crate) fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}
