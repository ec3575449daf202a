//! Mouse input for frame selection.
//!
//! The frame pulls events while a button is held. A `MouseSource` is anything
//! that can hand over the next event, blocking if needed, and report end of
//! input with `None`. `MouseChannel` is the usual producer/consumer wiring:
//! an input thread sends, the thread running the selection loop reads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use core_draw::Point;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::trace;

// Telemetry: relaxed counters, inspected by tests and logged by the demo.
pub static MOUSE_EVENTS_SENT: AtomicU64 = AtomicU64::new(0);
pub static MOUSE_EVENTS_READ: AtomicU64 = AtomicU64::new(0);
pub static MOUSE_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);

/// Capacity of the bounded channel built by `MouseChannel::bounded`.
pub const MOUSE_CHANNEL_CAP: usize = 1024;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const LEFT       = 0b0000_0001;
        const MIDDLE     = 0b0000_0010;
        const RIGHT      = 0b0000_0100;
        const WHEEL_UP   = 0b0000_1000;
        const WHEEL_DOWN = 0b0001_0000;
    }
}

/// One mouse sample: position, held buttons, timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mouse {
    pub xy: Point,
    pub buttons: Buttons,
    pub msec: u32,
}

impl Mouse {
    pub const fn new(xy: Point, buttons: Buttons, msec: u32) -> Self {
        Self { xy, buttons, msec }
    }

    pub fn at(x: i32, y: i32, buttons: Buttons) -> Self {
        Self::new(Point::new(x, y), buttons, 0)
    }
}

pub trait MouseSource {
    /// Next event, or `None` once input has ended.
    fn read_mouse(&mut self) -> Option<Mouse>;
}

impl<S: MouseSource + ?Sized> MouseSource for &mut S {
    fn read_mouse(&mut self) -> Option<Mouse> {
        (**self).read_mouse()
    }
}

/// Receiving half of a mouse channel.
pub struct MouseChannel {
    rx: Receiver<Mouse>,
}

/// Sending half; cheap to clone.
#[derive(Clone)]
pub struct MouseSender {
    tx: Sender<Mouse>,
}

impl MouseChannel {
    /// Unbounded pair.
    pub fn pair() -> (MouseSender, MouseChannel) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (MouseSender { tx }, MouseChannel { rx })
    }

    /// Bounded pair; senders block when `MOUSE_CHANNEL_CAP` events are queued.
    pub fn bounded() -> (MouseSender, MouseChannel) {
        let (tx, rx) = crossbeam_channel::bounded(MOUSE_CHANNEL_CAP);
        (MouseSender { tx }, MouseChannel { rx })
    }

    /// Events currently queued.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl MouseSource for MouseChannel {
    fn read_mouse(&mut self) -> Option<Mouse> {
        let m = self.rx.recv().ok();
        if m.is_some() {
            MOUSE_EVENTS_READ.fetch_add(1, Ordering::Relaxed);
        } else {
            trace!(target: "events.mouse", "mouse_channel_closed");
        }
        m
    }
}

impl MouseSender {
    /// Blocking send. Returns false when the reader is gone.
    pub fn send(&self, m: Mouse) -> bool {
        match self.tx.send(m) {
            Ok(()) => {
                MOUSE_EVENTS_SENT.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                MOUSE_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Non-blocking send; a full queue drops the event.
    pub fn try_send(&self, m: Mouse) -> bool {
        match self.tx.try_send(m) {
            Ok(()) => {
                MOUSE_EVENTS_SENT.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => {
                trace!(target: "events.mouse", "mouse_event_dropped_full");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                MOUSE_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

/// Replays a fixed list of events, then reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMouse {
    events: VecDeque<Mouse>,
}

impl ScriptedMouse {
    pub fn new<I: IntoIterator<Item = Mouse>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl MouseSource for ScriptedMouse {
    fn read_mouse(&mut self) -> Option<Mouse> {
        self.events.pop_front()
    }
}

/// Straight-line drag from `from` to `to` with the left button held, followed
/// by a release at `to`. `steps` intermediate samples are generated.
pub fn drag_script(from: Point, to: Point, steps: u32) -> Vec<Mouse> {
    let steps = steps.max(1) as i32;
    let mut out = Vec::with_capacity(steps as usize + 1);
    for i in 1..=steps {
        let x = from.x + (to.x - from.x) * i / steps;
        let y = from.y + (to.y - from.y) * i / steps;
        out.push(Mouse::new(Point::new(x, y), Buttons::LEFT, i as u32 * 10));
    }
    out.push(Mouse::new(to, Buttons::empty(), steps as u32 * 10 + 10));
    out
}
