use crate::model::Rect;

/// Free-rectangle packer over a fixed-size canvas.
///
/// Rectangles are placed strictly in the order requested; callers pre-sort
/// for their placement heuristic. Each placement picks the best-fitting
/// free rectangle (fewest leftover area, ties broken by smallest leftover
/// longest side), splits it along its shorter leftover axis, and prunes
/// free fragments that are fully contained in another.
pub struct RectPacker {
    free: Vec<Rect>,
}

impl RectPacker {
    pub fn new(width: u32, height: u32) -> Self {
        let mut free = Vec::new();
        if width > 0 && height > 0 {
            free.push(Rect::new(0, 0, width, height));
        }
        Self { free }
    }

    /// Attempts to place a `w`x`h` rectangle. Returns its top-left origin,
    /// or `None` when no free rectangle can hold it. Failure is recoverable:
    /// the free-space state is left untouched and the caller may retry at a
    /// different canvas size.
    pub fn try_pack(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let idx = self.choose(w, h)?;
        let fr = self.free.swap_remove(idx);
        let placed = Rect::new(fr.x, fr.y, w, h);
        let (a, b) = split_free_rect(&fr, &placed);
        if let Some(r) = a {
            self.free.push(r);
        }
        if let Some(r) = b {
            self.free.push(r);
        }
        self.prune_free_list();
        Some((placed.x, placed.y))
    }

    /// Number of free fragments currently tracked (diagnostics only).
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    fn choose(&self, w: u32, h: u32) -> Option<usize> {
        let mut best: Option<(usize, u64, u32)> = None;
        for (i, fr) in self.free.iter().enumerate() {
            if fr.w < w || fr.h < h {
                continue;
            }
            let leftover_area = fr.area() - (w as u64) * (h as u64);
            let leftover_long = (fr.w - w).max(fr.h - h);
            let better = match best {
                None => true,
                Some((_, area, long)) => {
                    leftover_area < area || (leftover_area == area && leftover_long < long)
                }
            };
            if better {
                best = Some((i, leftover_area, leftover_long));
            }
        }
        best.map(|(i, _, _)| i)
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            let a = self.free[i];
            let mut remove_i = false;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Splits the leftover of `fr` around `placed` (anchored at `fr`'s top-left)
/// into its two complement sub-rectangles, along the shorter leftover axis.
fn split_free_rect(fr: &Rect, placed: &Rect) -> (Option<Rect>, Option<Rect>) {
    let w_right = fr.w - placed.w;
    let h_bottom = fr.h - placed.h;
    let split_horizontal = h_bottom < w_right;

    let mut bottom = Rect::new(fr.x, placed.y + placed.h, 0, h_bottom);
    let mut right = Rect::new(placed.x + placed.w, fr.y, w_right, 0);
    if split_horizontal {
        bottom.w = fr.w;
        right.h = placed.h;
    } else {
        bottom.w = placed.w;
        right.h = fr.h;
    }
    let r1 = (bottom.w > 0 && bottom.h > 0).then_some(bottom);
    let r2 = (right.w > 0 && right.h > 0).then_some(right);
    (r1, r2)
}
