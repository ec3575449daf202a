//! Box store.
//!
//! Contract:
//! - A box is either a run of text (`TextRun`) or a single tab/newline
//!   (`Break`). Breaks count as one rune.
//! - The store is a contiguous `Vec`; indices are only meaningful until the
//!   next splice. Callers hold indices, never references, across mutations.
//! - Text runs own their bytes. `dup`, `split` and `merge` copy; nothing is
//!   shared between boxes.
//! - Out-of-range indices and text operations on break boxes are traps.

use core_draw::Font;

use crate::error::{FrameError, trap};

/// Extra capacity reserved on every growth.
pub const SLOP: usize = 25;

/// Initial display width of a break box; recomputed at layout time for tabs.
pub const BREAK_WID_UNSET: i32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakKind {
    Tab,
    Newline,
}

impl BreakKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\t' => Some(BreakKind::Tab),
            '\n' => Some(BreakKind::Newline),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            BreakKind::Tab => '\t',
            BreakKind::Newline => '\n',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub nrune: usize,
    pub wid: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Break {
    pub kind: BreakKind,
    pub minwid: i32, // 0 for newline, width of a space for tab
    pub wid: i32,    // display width at the current position
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrBox {
    Text(TextRun),
    Break(Break),
}

impl Default for FrBox {
    /// A vacant slot: empty text, waiting to be overwritten.
    fn default() -> Self {
        FrBox::Text(TextRun::default())
    }
}

impl FrBox {
    pub fn text(text: impl Into<String>, font: &dyn Font) -> Self {
        let text = text.into();
        FrBox::Text(TextRun {
            nrune: text.chars().count(),
            wid: font.string_width(&text),
            text,
        })
    }

    pub fn brk(kind: BreakKind, font: &dyn Font) -> Self {
        let minwid = match kind {
            BreakKind::Tab => font.string_width(" "),
            BreakKind::Newline => 0,
        };
        FrBox::Break(Break {
            kind,
            minwid,
            wid: BREAK_WID_UNSET,
        })
    }

    /// Logical rune count: breaks are one rune.
    #[inline]
    pub fn nrune(&self) -> usize {
        match self {
            FrBox::Text(t) => t.nrune,
            FrBox::Break(_) => 1,
        }
    }

    #[inline]
    pub fn wid(&self) -> i32 {
        match self {
            FrBox::Text(t) => t.wid,
            FrBox::Break(b) => b.wid,
        }
    }

    /// Width used by line-wrap checks: full width for text, minimum for breaks.
    #[inline]
    pub fn wrap_wid(&self) -> i32 {
        match self {
            FrBox::Text(t) => t.wid,
            FrBox::Break(b) => b.minwid,
        }
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, FrBox::Text(_))
    }

    #[inline]
    pub fn is_newline(&self) -> bool {
        matches!(self, FrBox::Break(Break { kind: BreakKind::Newline, .. }))
    }

    #[inline]
    pub fn is_tab(&self) -> bool {
        matches!(self, FrBox::Break(Break { kind: BreakKind::Tab, .. }))
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            FrBox::Text(t) => Some(t),
            FrBox::Break(_) => None,
        }
    }
}

/// Byte offset of rune `n` in `s` (or `s.len()` past the end).
pub(crate) fn rune_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxStore {
    boxes: Vec<FrBox>,
}

impl BoxStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.boxes.capacity()
    }

    pub fn as_slice(&self) -> &[FrBox] {
        &self.boxes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrBox> {
        self.boxes.iter()
    }

    #[track_caller]
    pub fn get(&self, bn: usize) -> &FrBox {
        match self.boxes.get(bn) {
            Some(b) => b,
            None => trap(self.index_error("get", bn)),
        }
    }

    #[track_caller]
    pub fn get_mut(&mut self, bn: usize) -> &mut FrBox {
        let nbox = self.boxes.len();
        match self.boxes.get_mut(bn) {
            Some(b) => b,
            None => trap(FrameError::BoxIndex {
                op: "get_mut",
                index: bn,
                nbox,
            }),
        }
    }

    pub fn push(&mut self, b: FrBox) {
        if self.boxes.len() == self.boxes.capacity() {
            self.grow(SLOP);
        }
        self.boxes.push(b);
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a >= self.len() || b >= self.len() {
            trap(self.index_error("swap", a.max(b)));
        }
        self.boxes.swap(a, b);
    }

    /// Reserve room for `delta` more boxes.
    pub fn grow(&mut self, delta: usize) {
        self.boxes.reserve(delta);
    }

    /// Insert `n` vacant slots at `at`, shifting the rest up.
    pub fn add(&mut self, at: usize, n: usize) {
        if at > self.len() {
            trap(self.index_error("add", at));
        }
        if self.len() + n > self.capacity() {
            self.grow(n + SLOP);
        }
        self.boxes
            .splice(at..at, std::iter::repeat_with(FrBox::default).take(n));
    }

    /// Remove `a..=b`, shifting the rest down.
    pub fn close(&mut self, a: usize, b: usize) {
        if a >= self.len() || b >= self.len() || b < a {
            trap(self.index_error("close", a.max(b)));
        }
        self.boxes.drain(a..=b);
    }

    /// Drop the text buffers of `a..=b`; break boxes are untouched.
    pub fn free(&mut self, a: usize, b: usize) {
        if b < a {
            return;
        }
        if b >= self.len() {
            trap(self.index_error("free", b));
        }
        for bx in &mut self.boxes[a..=b] {
            if let FrBox::Text(t) = bx {
                t.text = String::new();
            }
        }
    }

    /// `free` then `close`.
    pub fn del(&mut self, a: usize, b: usize) {
        if a >= self.len() || b >= self.len() || b < a {
            trap(self.index_error("del", a.max(b)));
        }
        self.free(a, b);
        self.close(a, b);
    }

    /// Insert a copy of text box `bn` right after it.
    pub fn dup(&mut self, bn: usize) {
        let copy = match self.get(bn) {
            FrBox::Text(t) => FrBox::Text(t.clone()),
            FrBox::Break(_) => trap(FrameError::BreakBox { op: "dup", index: bn }),
        };
        self.add(bn + 1, 1);
        self.boxes[bn + 1] = copy;
    }

    /// Drop the last `n` runes of text box `bn`.
    pub fn truncate(&mut self, bn: usize, n: usize, font: &dyn Font) {
        let t = self.text_mut("truncate", bn, n);
        t.nrune -= n;
        let cut = rune_offset(&t.text, t.nrune);
        t.text.truncate(cut);
        t.wid = font.string_width(&t.text);
    }

    /// Drop the first `n` runes of text box `bn`.
    pub fn chop(&mut self, bn: usize, n: usize, font: &dyn Font) {
        let t = self.text_mut("chop", bn, n);
        let cut = rune_offset(&t.text, n);
        t.text.drain(..cut);
        t.nrune -= n;
        t.wid = font.string_width(&t.text);
    }

    /// Leave the first `n` runes in `bn` and the rest in a new box `bn + 1`.
    pub fn split(&mut self, bn: usize, n: usize, font: &dyn Font) {
        self.dup(bn);
        let nrune = self.get(bn).nrune();
        self.truncate(bn, nrune - n, font);
        self.chop(bn + 1, n, font);
    }

    /// Concatenate text boxes `bn` and `bn + 1` into `bn`.
    pub fn merge(&mut self, bn: usize) {
        if bn + 1 >= self.len() {
            trap(self.index_error("merge", bn + 1));
        }
        let (head, tail) = self.boxes.split_at_mut(bn + 1);
        match (&mut head[bn], &tail[0]) {
            (FrBox::Text(a), FrBox::Text(b)) => {
                a.text.push_str(&b.text);
                a.wid += b.wid;
                a.nrune += b.nrune;
            }
            (FrBox::Break(_), _) => trap(FrameError::BreakBox { op: "merge", index: bn }),
            (_, FrBox::Break(_)) => trap(FrameError::BreakBox {
                op: "merge",
                index: bn + 1,
            }),
        }
        self.del(bn + 1, bn + 1);
    }

    /// Starting at box `bn`, whose first rune is character `p`, return the
    /// index of the box starting at character `q`, splitting one if needed.
    pub fn find(&mut self, mut bn: usize, mut p: usize, q: usize, font: &dyn Font) -> usize {
        while bn < self.len() && p + self.boxes[bn].nrune() <= q {
            p += self.boxes[bn].nrune();
            bn += 1;
        }
        if p != q {
            if bn >= self.len() {
                trap(FrameError::FindPastEnd { q });
            }
            self.split(bn, q - p, font);
            bn += 1;
        }
        bn
    }

    /// Runes in boxes `nb..`.
    pub fn strlen(&self, nb: usize) -> usize {
        self.boxes.iter().skip(nb).map(FrBox::nrune).sum()
    }

    pub(crate) fn splice_from(&mut self, at: usize, other: BoxStore) {
        let n = other.len();
        self.add(at, n);
        for (slot, b) in self.boxes[at..at + n].iter_mut().zip(other.boxes) {
            *slot = b;
        }
    }

    fn text_mut(&mut self, op: &'static str, bn: usize, n: usize) -> &mut TextRun {
        let nbox = self.len();
        match self.boxes.get_mut(bn) {
            None => trap(FrameError::BoxIndex { op, index: bn, nbox }),
            Some(FrBox::Break(_)) => trap(FrameError::BreakBox { op, index: bn }),
            Some(FrBox::Text(t)) if t.nrune < n => trap(FrameError::RuneCount {
                op,
                index: bn,
                nrune: t.nrune,
                n,
            }),
            Some(FrBox::Text(t)) => t,
        }
    }

    fn index_error(&self, op: &'static str, index: usize) -> FrameError {
        FrameError::BoxIndex {
            op,
            index,
            nbox: self.len(),
        }
    }
}

impl<'a> IntoIterator for &'a BoxStore {
    type Item = &'a FrBox;
    type IntoIter = std::slice::Iter<'a, FrBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_draw::CellFont;

    fn font() -> CellFont {
        CellFont::new(10, 12)
    }

    fn store(parts: &[&str]) -> BoxStore {
        let f = font();
        let mut s = BoxStore::new();
        for p in parts {
            match BreakKind::from_char(p.chars().next().unwrap()) {
                Some(k) if p.len() == 1 => s.push(FrBox::brk(k, &f)),
                _ => s.push(FrBox::text(*p, &f)),
            }
        }
        s
    }

    fn texts(s: &BoxStore) -> Vec<String> {
        s.iter()
            .map(|b| match b {
                FrBox::Text(t) => t.text.clone(),
                FrBox::Break(b) => b.kind.as_char().to_string(),
            })
            .collect()
    }

    #[test]
    fn split_keeps_head_and_tail() {
        let f = font();
        let mut s = store(&["héllo"]);
        s.split(0, 2, &f);
        assert_eq!(texts(&s), vec!["hé", "llo"]);
        assert_eq!(s.get(0).nrune(), 2);
        assert_eq!(s.get(0).wid(), 20);
        assert_eq!(s.get(1).wid(), 30);
    }

    #[test]
    fn merge_concatenates_and_sums_width() {
        let mut s = store(&["ab", "cde", "\n"]);
        s.merge(0);
        assert_eq!(texts(&s), vec!["abcde", "\n"]);
        assert_eq!(s.get(0).nrune(), 5);
        assert_eq!(s.get(0).wid(), 50);
    }

    #[test]
    fn find_splits_mid_box() {
        let f = font();
        let mut s = store(&["abc", "\t", "defg"]);
        assert_eq!(s.find(0, 0, 3, &f), 1);
        assert_eq!(s.len(), 3);
        assert_eq!(s.find(0, 0, 6, &f), 3);
        assert_eq!(texts(&s), vec!["abc", "\t", "de", "fg"]);
        let end = s.strlen(0);
        assert_eq!(s.find(0, 0, end, &f), s.len());
    }

    #[test]
    fn add_close_free_del() {
        let mut s = store(&["a", "b", "c"]);
        s.add(1, 2);
        assert_eq!(s.len(), 5);
        assert_eq!(s.get(1).nrune(), 0);
        s.close(1, 2);
        assert_eq!(texts(&s), vec!["a", "b", "c"]);
        s.free(0, 1);
        assert_eq!(texts(&s), vec!["", "", "c"]);
        s.del(0, 1);
        assert_eq!(texts(&s), vec!["c"]);
    }

    #[test]
    fn strlen_counts_breaks_as_one() {
        let s = store(&["ab", "\t", "cd", "\n"]);
        assert_eq!(s.strlen(0), 6);
        assert_eq!(s.strlen(2), 3);
        assert_eq!(s.strlen(4), 0);
    }

    #[test]
    #[should_panic(expected = "break box")]
    fn dup_of_break_traps() {
        let mut s = store(&["\t"]);
        s.dup(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn close_out_of_range_traps() {
        let mut s = store(&["a"]);
        s.close(0, 1);
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn find_past_end_traps() {
        let f = font();
        let mut s = store(&["ab"]);
        s.find(0, 0, 5, &f);
    }
}
