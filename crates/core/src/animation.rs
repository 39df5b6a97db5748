//! Value animation driven by a host [`Ticker`]
//!
//! An [`AnimationEngine`] owns a single task slot. Starting an animation
//! cancels whatever the slot held, so at most one animation per engine is ever
//! running. Each frame callback carries the generation it was scheduled for;
//! a frame whose generation no longer matches the slot is ignored.
//!
//! User callbacks are never invoked while the slot is borrowed, so they may
//! freely call [`AnimationEngine::animate`] or [`AnimationHandle::cancel`].

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use rg_gauge_types::EasingKind;

use crate::easing::ease;
use crate::ticker::{TickHandle, Ticker};

/// Lifecycle of the engine's task slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    Cancelled,
    Completed,
}

/// What to animate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub from: f64,
    pub to: f64,
    /// Zero, negative and NaN durations complete synchronously
    pub duration_ms: f64,
    pub easing: EasingKind,
}

impl Animation {
    pub fn new(from: f64, to: f64, duration_ms: f64, easing: EasingKind) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing,
        }
    }
}

type UpdateFn = Box<dyn FnMut(f64)>;
type CompleteFn = Box<dyn FnOnce()>;

/// Per-animation callbacks
pub struct AnimationCallbacks {
    on_update: UpdateFn,
    on_counter: Option<UpdateFn>,
    on_complete: Option<CompleteFn>,
}

impl AnimationCallbacks {
    pub fn new(on_update: impl FnMut(f64) + 'static) -> Self {
        Self {
            on_update: Box::new(on_update),
            on_counter: None,
            on_complete: None,
        }
    }

    /// Also report every intermediate value to a counter display
    pub fn counter(mut self, on_counter: impl FnMut(f64) + 'static) -> Self {
        self.on_counter = Some(Box::new(on_counter));
        self
    }

    pub fn on_complete(mut self, on_complete: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }
}

impl fmt::Debug for AnimationCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationCallbacks")
            .field("counter", &self.on_counter.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

struct RunningTask {
    animation: Animation,
    start: Duration,
    handle: Option<TickHandle>,
}

#[derive(Default)]
struct TaskSlot {
    state: EngineState,
    generation: u64,
    task: Option<RunningTask>,
}

type SharedCallbacks = Rc<RefCell<Option<AnimationCallbacks>>>;

/// Runs at most one value animation at a time
pub struct AnimationEngine {
    ticker: Rc<dyn Ticker>,
    slot: Rc<RefCell<TaskSlot>>,
    callbacks: SharedCallbacks,
}

impl AnimationEngine {
    pub fn new(ticker: Rc<dyn Ticker>) -> Self {
        Self {
            ticker,
            slot: Rc::new(RefCell::new(TaskSlot::default())),
            callbacks: Rc::new(RefCell::new(None)),
        }
    }

    /// Start animating, replacing any running animation.
    ///
    /// The replaced animation's completion callback never fires. Durations
    /// that are not strictly positive run `on_update(to)`, the counter and
    /// `on_complete` before this returns.
    pub fn animate(&self, animation: Animation, callbacks: AnimationCallbacks) {
        self.cancel();

        let generation = {
            let mut slot = self.slot.borrow_mut();
            slot.generation = slot.generation.wrapping_add(1);
            slot.state = EngineState::Running;
            slot.generation
        };
        *self.callbacks.borrow_mut() = Some(callbacks);

        if !(animation.duration_ms > 0.0) {
            log::trace!(
                "Animation {} -> {} completes immediately (duration {})",
                animation.from,
                animation.to,
                animation.duration_ms
            );
            if emit(&self.slot, &self.callbacks, generation, animation.to) {
                complete(&self.slot, &self.callbacks);
            }
            return;
        }

        log::trace!(
            "Animation {} -> {} over {}ms ({})",
            animation.from,
            animation.to,
            animation.duration_ms,
            animation.easing
        );
        self.slot.borrow_mut().task = Some(RunningTask {
            animation,
            start: self.ticker.now(),
            handle: None,
        });
        let handle = schedule_frame(&self.ticker, &self.slot, &self.callbacks, generation);
        if let Some(task) = self.slot.borrow_mut().task.as_mut() {
            task.handle = Some(handle);
        }
    }

    /// Stop the running animation without firing its completion callback.
    /// Does nothing when no animation is running.
    pub fn cancel(&self) {
        cancel_slot(&self.ticker, &self.slot, &self.callbacks);
    }

    pub fn state(&self) -> EngineState {
        self.slot.borrow().state
    }

    pub fn is_animating(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Weak handle for cancelling from inside callbacks
    pub fn handle(&self) -> AnimationHandle {
        AnimationHandle {
            ticker: Rc::downgrade(&self.ticker),
            slot: Rc::downgrade(&self.slot),
            callbacks: Rc::downgrade(&self.callbacks),
        }
    }
}

impl Drop for AnimationEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("AnimationEngine")
            .field("state", &slot.state)
            .field("generation", &slot.generation)
            .finish()
    }
}

/// Non-owning reference to an [`AnimationEngine`]
#[derive(Clone)]
pub struct AnimationHandle {
    ticker: Weak<dyn Ticker>,
    slot: Weak<RefCell<TaskSlot>>,
    callbacks: Weak<RefCell<Option<AnimationCallbacks>>>,
}

impl AnimationHandle {
    pub fn cancel(&self) {
        if let (Some(ticker), Some(slot), Some(callbacks)) = (
            self.ticker.upgrade(),
            self.slot.upgrade(),
            self.callbacks.upgrade(),
        ) {
            cancel_slot(&ticker, &slot, &callbacks);
        }
    }

    pub fn is_animating(&self) -> bool {
        match self.slot.upgrade() {
            Some(slot) => {
                let state = slot.borrow().state;
                state == EngineState::Running
            }
            None => false,
        }
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("alive", &(self.slot.strong_count() > 0))
            .finish()
    }
}

fn cancel_slot(ticker: &Rc<dyn Ticker>, slot: &Rc<RefCell<TaskSlot>>, callbacks: &SharedCallbacks) {
    let handle = {
        let mut slot = slot.borrow_mut();
        if slot.state != EngineState::Running {
            return;
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = EngineState::Cancelled;
        slot.task.take().and_then(|task| task.handle)
    };

    if let Some(handle) = handle {
        ticker.cancel(handle);
    }
    // Release outside the borrow: dropping closures may run arbitrary code
    let dropped = callbacks.borrow_mut().take();
    drop(dropped);
}

fn is_current(slot: &Rc<RefCell<TaskSlot>>, generation: u64) -> bool {
    let slot = slot.borrow();
    slot.generation == generation && slot.state == EngineState::Running
}

/// Deliver `value` to the update and counter callbacks. Returns false when a
/// callback cancelled or replaced this animation.
fn emit(
    slot: &Rc<RefCell<TaskSlot>>,
    callbacks: &SharedCallbacks,
    generation: u64,
    value: f64,
) -> bool {
    let Some(mut cbs) = callbacks.borrow_mut().take() else {
        return false;
    };

    (cbs.on_update)(value);
    if !is_current(slot, generation) {
        return false;
    }

    if let Some(counter) = cbs.on_counter.as_mut() {
        counter(value);
        if !is_current(slot, generation) {
            return false;
        }
    }

    *callbacks.borrow_mut() = Some(cbs);
    true
}

fn complete(slot: &Rc<RefCell<TaskSlot>>, callbacks: &SharedCallbacks) {
    {
        let mut slot = slot.borrow_mut();
        slot.state = EngineState::Completed;
        slot.task = None;
    }
    let finished = callbacks.borrow_mut().take();
    if let Some(on_complete) = finished.and_then(|cbs| cbs.on_complete) {
        on_complete();
    }
}

fn schedule_frame(
    ticker: &Rc<dyn Ticker>,
    slot: &Rc<RefCell<TaskSlot>>,
    callbacks: &SharedCallbacks,
    generation: u64,
) -> TickHandle {
    let weak_ticker = Rc::downgrade(ticker);
    let weak_slot = Rc::downgrade(slot);
    let weak_callbacks = Rc::downgrade(callbacks);

    ticker.schedule(Box::new(move |now| {
        let (Some(ticker), Some(slot), Some(callbacks)) = (
            weak_ticker.upgrade(),
            weak_slot.upgrade(),
            weak_callbacks.upgrade(),
        ) else {
            return;
        };
        on_frame(&ticker, &slot, &callbacks, generation, now);
    }))
}

fn on_frame(
    ticker: &Rc<dyn Ticker>,
    slot: &Rc<RefCell<TaskSlot>>,
    callbacks: &SharedCallbacks,
    generation: u64,
    now: Duration,
) {
    let (value, done) = {
        let mut slot = slot.borrow_mut();
        if slot.generation != generation || slot.state != EngineState::Running {
            return;
        }
        let Some(task) = slot.task.as_mut() else {
            return;
        };
        task.handle = None;

        let animation = task.animation;
        let elapsed_ms = now.saturating_sub(task.start).as_secs_f64() * 1000.0;
        let progress = (elapsed_ms / animation.duration_ms).min(1.0);
        if progress >= 1.0 {
            // Land exactly on the target
            (animation.to, true)
        } else {
            let eased = ease(animation.easing, progress);
            (animation.from + (animation.to - animation.from) * eased, false)
        }
    };

    if !emit(slot, callbacks, generation, value) {
        return;
    }

    if done {
        complete(slot, callbacks);
    } else {
        let handle = schedule_frame(ticker, slot, callbacks, generation);
        if let Some(task) = slot.borrow_mut().task.as_mut() {
            task.handle = Some(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::ManualTicker;
    use std::cell::Cell;

    const FRAME: Duration = Duration::from_millis(16);

    fn setup() -> (Rc<ManualTicker>, AnimationEngine) {
        let ticker = Rc::new(ManualTicker::new());
        let engine = AnimationEngine::new(ticker.clone());
        (ticker, engine)
    }

    #[test]
    fn test_zero_duration_completes_synchronously() {
        let (ticker, engine) = setup();
        let log = Rc::new(RefCell::new(Vec::<String>::new()));

        let (u, c, d) = (log.clone(), log.clone(), log.clone());
        engine.animate(
            Animation::new(0.0, 42.0, 0.0, EasingKind::EaseOut),
            AnimationCallbacks::new(move |v| u.borrow_mut().push(format!("update {}", v)))
                .counter(move |v| c.borrow_mut().push(format!("counter {}", v)))
                .on_complete(move || d.borrow_mut().push("complete".to_string())),
        );

        assert_eq!(
            *log.borrow(),
            vec!["update 42", "counter 42", "complete"]
        );
        assert_eq!(engine.state(), EngineState::Completed);
        assert!(!ticker.has_pending());
    }

    #[test]
    fn test_nan_and_negative_durations_are_immediate() {
        for duration in [f64::NAN, -5.0] {
            let (ticker, engine) = setup();
            let updates = Rc::new(RefCell::new(Vec::new()));
            let done = Rc::new(Cell::new(false));

            let (u, d) = (updates.clone(), done.clone());
            engine.animate(
                Animation::new(10.0, 20.0, duration, EasingKind::Linear),
                AnimationCallbacks::new(move |v| u.borrow_mut().push(v))
                    .on_complete(move || d.set(true)),
            );

            assert_eq!(*updates.borrow(), vec![20.0]);
            assert!(done.get());
            assert!(!ticker.has_pending());
        }
    }

    #[test]
    fn test_frames_progress_and_land_on_target() {
        let (ticker, engine) = setup();
        let updates = Rc::new(RefCell::new(Vec::new()));
        let completions = Rc::new(Cell::new(0));

        let (u, c) = (updates.clone(), completions.clone());
        engine.animate(
            Animation::new(0.0, 100.0, 100.0, EasingKind::Linear),
            AnimationCallbacks::new(move |v| u.borrow_mut().push(v))
                .on_complete(move || c.set(c.get() + 1)),
        );
        assert!(engine.is_animating());
        assert!(updates.borrow().is_empty());

        let frames = ticker.run_until_idle(FRAME, 100);
        assert_eq!(frames, 7);

        let updates = updates.borrow();
        assert_eq!(updates.len(), 7);
        assert!(updates.windows(2).all(|w| w[0] < w[1]));
        assert!((updates[0] - 16.0).abs() < 1e-6);
        assert_eq!(*updates.last().unwrap(), 100.0);
        assert_eq!(updates.iter().filter(|&&v| v == 100.0).count(), 1);
        assert_eq!(completions.get(), 1);
        assert_eq!(engine.state(), EngineState::Completed);
    }

    #[test]
    fn test_counter_follows_update() {
        let (ticker, engine) = setup();
        let counts = Rc::new(RefCell::new(Vec::new()));

        let c = counts.clone();
        engine.animate(
            Animation::new(0.0, 10.0, 32.0, EasingKind::EaseInOut),
            AnimationCallbacks::new(|_| {}).counter(move |v| c.borrow_mut().push(v)),
        );
        ticker.run_until_idle(FRAME, 10);

        assert_eq!(counts.borrow().len(), 2);
        assert_eq!(counts.borrow()[1], 10.0);
    }

    #[test]
    fn test_new_animation_suppresses_previous_completion() {
        let (ticker, engine) = setup();
        let first_done = Rc::new(Cell::new(false));
        let second_done = Rc::new(Cell::new(false));

        let d = first_done.clone();
        engine.animate(
            Animation::new(0.0, 50.0, 200.0, EasingKind::Linear),
            AnimationCallbacks::new(|_| {}).on_complete(move || d.set(true)),
        );
        ticker.step(FRAME);

        let d = second_done.clone();
        engine.animate(
            Animation::new(8.0, 90.0, 100.0, EasingKind::Linear),
            AnimationCallbacks::new(|_| {}).on_complete(move || d.set(true)),
        );
        assert_eq!(ticker.pending_count(), 1);

        ticker.run_until_idle(FRAME, 100);
        assert!(!first_done.get());
        assert!(second_done.get());
    }

    #[test]
    fn test_cancel_from_inside_update() {
        let (ticker, engine) = setup();
        let handle = engine.handle();
        let updates = Rc::new(Cell::new(0));
        let done = Rc::new(Cell::new(false));

        let (u, d) = (updates.clone(), done.clone());
        engine.animate(
            Animation::new(0.0, 1.0, 500.0, EasingKind::Bounce),
            AnimationCallbacks::new(move |_| {
                u.set(u.get() + 1);
                handle.cancel();
                handle.cancel();
            })
            .on_complete(move || d.set(true)),
        );

        ticker.run_until_idle(FRAME, 100);
        assert_eq!(updates.get(), 1);
        assert!(!done.get());
        assert_eq!(engine.state(), EngineState::Cancelled);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (ticker, engine) = setup();
        engine.cancel();
        assert_eq!(engine.state(), EngineState::Idle);

        engine.animate(
            Animation::new(0.0, 1.0, 100.0, EasingKind::Linear),
            AnimationCallbacks::new(|_| {}),
        );
        engine.cancel();
        engine.cancel();
        assert_eq!(engine.state(), EngineState::Cancelled);
        assert!(!ticker.has_pending());
        assert!(!engine.handle().is_animating());
    }

    #[test]
    fn test_animate_from_completion_chains() {
        let ticker = Rc::new(ManualTicker::new());
        let engine = Rc::new(AnimationEngine::new(ticker.clone()));
        let last = Rc::new(Cell::new(0.0));

        let weak = Rc::downgrade(&engine);
        let (l1, l2) = (last.clone(), last.clone());
        engine.animate(
            Animation::new(0.0, 1.0, 32.0, EasingKind::Linear),
            AnimationCallbacks::new(move |v| l1.set(v)).on_complete(move || {
                if let Some(engine) = weak.upgrade() {
                    engine.animate(
                        Animation::new(1.0, 5.0, 32.0, EasingKind::Linear),
                        AnimationCallbacks::new(move |v| l2.set(v)),
                    );
                }
            }),
        );

        ticker.run_until_idle(FRAME, 100);
        assert_eq!(last.get(), 5.0);
        assert_eq!(engine.state(), EngineState::Completed);
    }

    #[test]
    fn test_dropping_engine_stops_frames() {
        let ticker = Rc::new(ManualTicker::new());
        let updates = Rc::new(Cell::new(0));
        {
            let engine = AnimationEngine::new(ticker.clone());
            let u = updates.clone();
            engine.animate(
                Animation::new(0.0, 1.0, 100.0, EasingKind::Linear),
                AnimationCallbacks::new(move |_| u.set(u.get() + 1)),
            );
        }
        ticker.run_until_idle(FRAME, 100);
        assert_eq!(updates.get(), 0);
    }
}
