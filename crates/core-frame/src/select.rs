//! Interactive selection.

use core_draw::Display;
use core_events::{Mouse, MouseSource};
use tracing::{debug, trace};

use crate::Frame;

/// Sign of `a - b`: which side of the anchor a position lies on.
pub fn region(a: usize, b: usize) -> i32 {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

impl<D: Display> Frame<D> {
    /// Track a sweep that started with `m` (a button is down) until the
    /// buttons change or `mouse` runs dry, painting the selection as it
    /// grows and shrinks. Dragging above or below the frame calls `scroll`
    /// with a line delta; the tracker then takes the selection from the
    /// frame again and finally calls `scroll` with 0.
    pub fn select<M: MouseSource + ?Sized>(
        &mut self,
        mouse: &mut M,
        m: Mouse,
        mut scroll: Option<&mut dyn FnMut(&mut Frame<D>, i32)>,
    ) {
        let buttons = m.buttons;
        let mut mp = m.xy;
        let r = self.geom.r;
        let h = self.geom.height();

        self.modified = false;
        let pt = self.ptofchar(self.p0);
        self.draw_sel(pt, self.p0, self.p1, false);
        let mut p0 = self.charofpt(mp);
        let mut p1 = p0;
        self.p0 = p0;
        self.p1 = p1;
        let mut pt0 = self.ptofchar(p0);
        let mut pt1 = self.ptofchar(p1);
        self.draw_sel(pt0, p0, p1, true);
        let mut reg = 0;
        debug!(target: "frame.select", anchor = p0, buttons = buttons.bits(), "select_start");

        loop {
            let mut scrolled = false;
            if let Some(cb) = scroll.as_deref_mut() {
                let delta = if mp.y < r.min.y {
                    Some(-(r.min.y - mp.y) / h - 1)
                } else if mp.y > r.max.y {
                    Some((mp.y - r.max.y) / h + 1)
                } else {
                    None
                };
                if let Some(delta) = delta {
                    debug!(target: "frame.select", delta, "select_scroll");
                    cb(self, delta);
                    if delta < 0 {
                        p0 = self.p1;
                        p1 = self.p0;
                    } else {
                        p0 = self.p0;
                        p1 = self.p1;
                    }
                    scrolled = true;
                    if reg != region(p1, p0) {
                        // Undo the swap below.
                        std::mem::swap(&mut p0, &mut p1);
                    }
                    pt0 = self.ptofchar(p0);
                    pt1 = self.ptofchar(p1);
                    reg = region(p1, p0);
                }
            }

            let q = self.charofpt(mp);
            if p1 != q {
                if reg != region(q, p0) {
                    // Crossed the anchor: retract the old direction.
                    if reg > 0 {
                        self.draw_sel(pt0, p0, p1, false);
                    } else if reg < 0 {
                        self.draw_sel(pt1, p1, p0, false);
                    }
                    p1 = p0;
                    pt1 = pt0;
                    reg = region(q, p0);
                    if reg == 0 {
                        self.draw_sel(pt0, p0, p1, true);
                    }
                }
                let qt = self.ptofchar(q);
                if reg > 0 {
                    if q > p1 {
                        self.draw_sel(pt1, p1, q, true);
                    } else if q < p1 {
                        self.draw_sel(qt, q, p1, false);
                    }
                } else if reg < 0 {
                    if q > p1 {
                        self.draw_sel(pt1, p1, q, false);
                    } else {
                        self.draw_sel(qt, q, p1, true);
                    }
                }
                p1 = q;
                pt1 = qt;
                trace!(target: "frame.select", p0, p1, reg, "select_move");
            }
            self.modified = false;
            if p0 < p1 {
                self.p0 = p0;
                self.p1 = p1;
            } else {
                self.p0 = p1;
                self.p1 = p0;
            }
            if scrolled && let Some(cb) = scroll.as_deref_mut() {
                cb(self, 0);
            }

            let Some(next) = mouse.read_mouse() else {
                trace!(target: "frame.select", "select_mouse_eof");
                break;
            };
            mp = next.xy;
            if next.buttons != buttons {
                break;
            }
        }
        debug!(target: "frame.select", p0 = self.p0, p1 = self.p1, "select_done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_sign_of_difference() {
        assert_eq!(region(1, 2), -1);
        assert_eq!(region(2, 2), 0);
        assert_eq!(region(3, 2), 1);
    }
}
