//! Frame tick abstraction for animations
//!
//! The animation engine never owns a timer. It asks a [`Ticker`] for one
//! callback per display refresh and re-arms itself from inside that callback.
//! Hosts wire a ticker to their frame clock; tests and the offline frame
//! exporter drive a [`ManualTicker`] by hand.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// One-shot frame callback, receiving the frame timestamp
pub type FrameCallback = Box<dyn FnOnce(Duration)>;

/// Identifies a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Host frame scheduler.
///
/// All methods take `&self`; implementations use interior mutability and are
/// single-threaded. A callback may schedule or cancel other callbacks while it
/// runs. Cancelling an unknown or already fired handle is a no-op.
pub trait Ticker {
    /// Current frame clock reading
    fn now(&self) -> Duration;

    /// Run `callback` once, on the next frame
    fn schedule(&self, callback: FrameCallback) -> TickHandle;

    /// Drop a pending callback without running it
    fn cancel(&self, handle: TickHandle);
}

/// Pending callbacks for the next frame
#[derive(Default)]
struct FrameQueue {
    next_id: Cell<u64>,
    pending: RefCell<Vec<(TickHandle, FrameCallback)>>,
    /// Handles cancelled while the current frame runs
    cancelled: RefCell<HashSet<TickHandle>>,
}

impl FrameQueue {
    fn push(&self, callback: FrameCallback) -> TickHandle {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let handle = TickHandle(id);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn remove(&self, handle: TickHandle) {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|(h, _)| *h != handle);
        if pending.len() == before {
            self.cancelled.borrow_mut().insert(handle);
        }
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run everything queued before this call. Callbacks scheduled while the
    /// frame runs wait for the next frame.
    fn run(&self, now: Duration) -> usize {
        self.cancelled.borrow_mut().clear();
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let mut ran = 0;
        for (handle, callback) in batch {
            // An earlier callback in this batch may have cancelled this one
            if self.cancelled.borrow().contains(&handle) {
                continue;
            }
            callback(now);
            ran += 1;
        }
        self.cancelled.borrow_mut().clear();
        ran
    }
}

/// Deterministic ticker whose clock only moves when told to
#[derive(Default)]
pub struct ManualTicker {
    now: Cell<Duration>,
    queue: FrameQueue,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward without running callbacks
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }

    /// Run the callbacks pending for the current frame. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        self.queue.run(self.now.get())
    }

    /// Advance by `dt`, then run one frame
    pub fn step(&self, dt: Duration) -> usize {
        self.advance(dt);
        self.run_frame()
    }

    /// Step frames of `dt` until nothing is pending or `max_frames` ran.
    /// Returns the number of frames stepped.
    pub fn run_until_idle(&self, dt: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.has_pending() && frames < max_frames {
            self.step(dt);
            frames += 1;
        }
        frames
    }

    pub fn has_pending(&self) -> bool {
        self.queue.len() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}

impl Ticker for ManualTicker {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn schedule(&self, callback: FrameCallback) -> TickHandle {
        self.queue.push(callback)
    }

    fn cancel(&self, handle: TickHandle) {
        self.queue.remove(handle);
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("now", &self.now.get())
            .field("pending", &self.queue.len())
            .finish()
    }
}

/// Wall-clock ticker for hosts with their own frame loop.
///
/// The host calls [`ClockTicker::pump`] once per refresh (for example from a
/// frame clock tick callback).
pub struct ClockTicker {
    origin: Instant,
    queue: FrameQueue,
}

impl ClockTicker {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: FrameQueue::default(),
        }
    }

    /// Run pending callbacks with the current wall-clock time
    pub fn pump(&self) -> usize {
        self.queue.run(self.origin.elapsed())
    }

    pub fn has_pending(&self) -> bool {
        self.queue.len() > 0
    }
}

impl Default for ClockTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for ClockTicker {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule(&self, callback: FrameCallback) -> TickHandle {
        self.queue.push(callback)
    }

    fn cancel(&self, handle: TickHandle) {
        self.queue.remove(handle);
    }
}
