use core_draw::Display;

use crate::boxes::FrBox;
use crate::error::FrameError;
use crate::Frame;

impl<D: Display> Frame<D> {
    /// Verify the structural invariants: rune counts, selection bounds, line
    /// count, origin, and that no two neighbouring text boxes could have been
    /// merged.
    pub fn check_invariants(&self) -> Result<(), FrameError> {
        let mut total = 0;
        for (i, b) in self.boxes.iter().enumerate() {
            if let FrBox::Text(t) = b {
                let n = t.text.chars().count();
                if n != t.nrune {
                    return Err(FrameError::Invariant(format!(
                        "box {i} holds {n} runes but records {}",
                        t.nrune
                    )));
                }
                if t.nrune == 0 {
                    return Err(FrameError::Invariant(format!("box {i} is empty")));
                }
                if t.text.contains('\0') {
                    return Err(FrameError::Invariant(format!("box {i} holds a NUL")));
                }
            }
            total += b.nrune();
        }
        if total != self.nchars {
            return Err(FrameError::Invariant(format!(
                "boxes hold {total} runes, nchars is {}",
                self.nchars
            )));
        }
        if !(self.p0 <= self.p1 && self.p1 <= self.nchars) {
            return Err(FrameError::Invariant(format!(
                "selection {}..{} outside 0..={}",
                self.p0, self.p1, self.nchars
            )));
        }
        if self.nlines > self.maxlines {
            return Err(FrameError::Invariant(format!(
                "nlines {} exceeds maxlines {}",
                self.nlines, self.maxlines
            )));
        }
        let origin = self.ptofchar(0);
        if origin != self.geom.r.min {
            return Err(FrameError::Invariant(format!("character 0 drawn at {origin:?}")));
        }

        let max_x = self.geom.r.max.x;
        let mut pt = self.geom.r.min;
        for (i, pair) in self.boxes.as_slice().windows(2).enumerate() {
            self.geom.cklinewrap(&mut pt, &pair[0]);
            if pair[0].is_text() && pair[1].is_text() && pt.x + pair[0].wid() + pair[1].wid() < max_x {
                return Err(FrameError::Invariant(format!("boxes {i} and {} are mergeable", i + 1)));
            }
            self.geom.advance(&mut pt, &pair[0]);
        }
        Ok(())
    }
}
