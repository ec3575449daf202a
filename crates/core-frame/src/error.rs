//! Trap conditions.
//!
//! Every variant is a broken invariant: the box array and the backing pixels
//! can no longer be trusted to agree, so the engine does not try to recover.
//! Trap sites call [`trap`], which logs and panics.

use core_draw::Point;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("{op}: box index {index} out of range (nbox {nbox})")]
    BoxIndex {
        op: &'static str,
        index: usize,
        nbox: usize,
    },
    #[error("{op}: box {index} is a break box")]
    BreakBox { op: &'static str, index: usize },
    #[error("{op}: box {index} has {nrune} runes, asked for {n}")]
    RuneCount {
        op: &'static str,
        index: usize,
        nrune: usize,
        n: usize,
    },
    #[error("{op}: nothing fits at {pt:?}")]
    CannotFit { op: &'static str, pt: Point },
    #[error("findbox: position {q} is past the end of the frame")]
    FindPastEnd { q: usize },
    #[error("{op}: layout point {pt:?} is below the frame bottom {max_y}")]
    LayoutOverflow {
        op: &'static str,
        pt: Point,
        max_y: i32,
    },
    #[error("ptofchar: ran off the line at {pt:?}")]
    OffLine { pt: Point },
    #[error("charofpt: end of string in box {index}")]
    EndOfString { index: usize },
    #[error("delete: position {p0} is off the end of the frame")]
    DeleteOffEnd { p0: usize },
    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Abort on a broken invariant.
#[cold]
#[track_caller]
pub fn trap(err: FrameError) -> ! {
    error!(target: "frame.trap", error = %err, "frame_trap");
    panic!("frame trap: {err}");
}
