//! Character index <-> pixel point.

use core_draw::{Display, Point};

use crate::Frame;

impl<D: Display> Frame<D> {
    /// Where character `p` is drawn.
    pub fn ptofchar(&self, p: usize) -> Point {
        self.geom
            .ptofchar_ptb(self.boxes.as_slice(), p, self.geom.r.min)
    }

    /// Like `ptofchar` but from box `bn` at `pt`.
    pub fn ptofchar_ptb(&self, p: usize, pt: Point, bn: usize) -> Point {
        let boxes = self.boxes.as_slice();
        self.geom
            .ptofchar_ptb(&boxes[bn.min(boxes.len())..], p, pt)
    }

    /// Like `ptofchar` but only consulting boxes before `nb`: the result is
    /// not wrapped onto the line of box `nb`.
    pub fn ptofchar_nb(&self, p: usize, nb: usize) -> Point {
        let boxes = self.boxes.as_slice();
        self.geom
            .ptofchar_ptb(&boxes[..nb.min(boxes.len())], p, self.geom.r.min)
    }

    /// Character at or just after `pt`.
    pub fn charofpt(&self, pt: Point) -> usize {
        self.geom.charofpt(self.boxes.as_slice(), pt)
    }
}
