mod common;

use std::panic::{AssertUnwindSafe, catch_unwind};

use common::*;
use core_draw::CellFont;
use core_frame::{BoxStore, FrBox, FrameError, trap};
use tracing::Level;

fn panic_message(err: Box<dyn std::any::Any + Send>) -> String {
    err.downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_default()
}

#[test]
fn trap_logs_under_frame_trap_then_panics() {
    let mut msg = String::new();
    let logs = capture(Level::ERROR, || {
        let res = catch_unwind(|| {
            trap(FrameError::FindPastEnd { q: 9 });
        });
        msg = panic_message(res.unwrap_err());
    });
    assert!(logs.contains("frame.trap"), "{logs}");
    assert!(logs.contains("past the end"), "{logs}");
    assert!(msg.starts_with("frame trap: findbox"), "{msg}");
}

#[test]
fn out_of_range_box_access_traps() {
    let font = CellFont::new(CELL, LINE);
    let mut store = BoxStore::new();
    store.push(FrBox::text("abc", &font));
    let logs = capture(Level::ERROR, || {
        let res = catch_unwind(AssertUnwindSafe(|| {
            store.get(4);
        }));
        assert!(res.is_err());
    });
    assert!(logs.contains("out of range"), "{logs}");
}

#[test]
fn splitting_a_break_box_traps() {
    let font = CellFont::new(CELL, LINE);
    let mut store = BoxStore::new();
    store.push(FrBox::brk(core_frame::BreakKind::Tab, &font));
    let res = catch_unwind(AssertUnwindSafe(|| store.split(0, 1, &font)));
    let msg = panic_message(res.unwrap_err());
    assert!(msg.contains("break box"), "{msg}");
}

#[test]
fn edits_log_structured_events() {
    let logs = capture(Level::DEBUG, || {
        let mut f = frame(8, 3);
        f.insert_str("abc\tdef", 0);
        f.delete(1, 2);
    });
    assert!(logs.contains("frame.insert"), "{logs}");
    assert!(logs.contains("insert_complete"), "{logs}");
    assert!(logs.contains("delete_complete"), "{logs}");
    // Counts and positions only; document text stays out of the log.
    assert!(!logs.contains("abc"), "{logs}");
}
