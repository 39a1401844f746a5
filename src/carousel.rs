//! Horizontal scroll-snap carousels (reels and color-group covers).
//!
//! A carousel must always present its first card, whatever scroll offset the
//! browser remembers from a previous visit, a rotation, or a back/forward
//! cache restore. Setting `scrollLeft = 0` once is not enough: snapping and a
//! pending layout pass can move the strip again. The controller therefore runs
//! a **hard reset**:
//!
//! ```text
//! trigger ─► snap off, offset 0 ─► frame 1: offset 0 ─► frame 2: offset 0,
//!                                                       snap on, epoch += 1
//! ```
//!
//! Bumping [`CarouselController::reset_epoch`] tells the host to remount the
//! scroller element (for example by using the epoch as its render key), which
//! drops any offset the browser still has cached for the old element.
//!
//! ## Triggers
//!
//! - first mount
//! - the strip becoming visible (intersection ratio crossing the threshold)
//! - a resize of the strip
//! - a page `load` event (covers back/forward cache restores)
//!
//! A trigger that arrives mid-sequence cancels the pending frame and starts
//! over. Unmounting cancels the pending frame and makes the controller ignore
//! every later callback.
//!
//! ## Host integration
//!
//! The controller never touches a DOM. The host implements [`Scroller`] for
//! the strip element and [`FrameScheduler`] for its animation-frame source,
//! forwards observer callbacks as [`LifecycleEvent`]s to
//! [`CarouselController::handle`], and forwards fired frames to
//! [`CarouselController::on_frame`]. [`FrameQueue`] is a deterministic
//! scheduler for headless hosts.

use tracing::{debug, trace};

/// Intersection ratio at which a strip counts as visible.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// The scrollable strip element, as seen by the controller.
pub trait Scroller {
    fn scroll_left(&self) -> f64;

    /// Jump to `offset` without animation.
    fn set_scroll_left(&mut self, offset: f64);

    fn set_snap_enabled(&mut self, enabled: bool);

    /// Scroll relative to the current offset. The element clamps at its ends.
    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior);

    /// Rendered width of the first card, `None` when the strip is empty.
    fn first_card_width(&self) -> Option<f64>;

    /// Gap between adjacent cards.
    fn card_gap(&self) -> f64;
}

/// Opaque id of a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of animation-frame callbacks.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Observer callbacks the host forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleEvent {
    Mount,
    /// Intersection observer update with the visible fraction of the strip.
    Visibility { ratio: f64 },
    Resize,
    /// Window `load` (including back/forward cache restores).
    PageLoad,
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapState {
    NotReady,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Prev => -1.0,
            Direction::Next => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Detached,
    Idle,
    FirstFrame(FrameHandle),
    SecondFrame(FrameHandle),
}

/// Hard-reset state machine for one scroller instance.
#[derive(Debug, Clone)]
pub struct CarouselController {
    phase: Phase,
    snap: SnapState,
    epoch: u64,
    visible: bool,
    threshold: f64,
}

impl Default for CarouselController {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl CarouselController {
    pub fn new(visibility_threshold: f64) -> Self {
        Self {
            phase: Phase::Detached,
            snap: SnapState::NotReady,
            epoch: 0,
            visible: false,
            threshold: visibility_threshold,
        }
    }

    /// Incremented at the end of every completed hard reset.
    pub fn reset_epoch(&self) -> u64 {
        self.epoch
    }

    pub fn snap_state(&self) -> SnapState {
        self.snap
    }

    pub fn is_mounted(&self) -> bool {
        self.phase != Phase::Detached
    }

    /// A reset sequence is waiting on a frame.
    pub fn is_resetting(&self) -> bool {
        matches!(self.phase, Phase::FirstFrame(_) | Phase::SecondFrame(_))
    }

    pub fn handle<S, F>(&mut self, event: LifecycleEvent, scroller: &mut S, scheduler: &mut F)
    where
        S: Scroller + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        match event {
            LifecycleEvent::Mount => {
                if self.is_mounted() {
                    return;
                }
                self.phase = Phase::Idle;
                self.hard_reset(scroller, scheduler);
            }
            LifecycleEvent::Unmount => {
                self.cancel_pending(scheduler);
                self.phase = Phase::Detached;
                self.visible = false;
                debug!(epoch = self.epoch, "carousel unmounted");
            }
            _ if !self.is_mounted() => {
                trace!(?event, "carousel event ignored while detached");
            }
            LifecycleEvent::Visibility { ratio } => {
                let now_visible = ratio >= self.threshold;
                let entered = now_visible && !self.visible;
                self.visible = now_visible;
                if entered {
                    self.hard_reset(scroller, scheduler);
                }
            }
            LifecycleEvent::Resize | LifecycleEvent::PageLoad => {
                self.hard_reset(scroller, scheduler);
            }
        }
    }

    /// Advance the reset sequence. Frames that are not the one the
    /// controller is waiting for are ignored.
    pub fn on_frame<S, F>(&mut self, handle: FrameHandle, scroller: &mut S, scheduler: &mut F)
    where
        S: Scroller + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        match self.phase {
            Phase::FirstFrame(expected) if expected == handle => {
                scroller.set_scroll_left(0.0);
                let next = scheduler.request_frame();
                self.phase = Phase::SecondFrame(next);
                trace!(?handle, "carousel reset: first frame");
            }
            Phase::SecondFrame(expected) if expected == handle => {
                scroller.set_scroll_left(0.0);
                scroller.set_snap_enabled(true);
                self.snap = SnapState::Ready;
                self.epoch += 1;
                self.phase = Phase::Idle;
                debug!(epoch = self.epoch, "carousel reset complete");
            }
            _ => trace!(?handle, "stale carousel frame ignored"),
        }
    }

    /// Move one card (width plus gap, measured on the first card) in
    /// `direction` with smooth scrolling. No-op for an empty strip.
    pub fn scroll_by<S>(&self, direction: Direction, scroller: &mut S)
    where
        S: Scroller + ?Sized,
    {
        let Some(width) = scroller.first_card_width() else {
            return;
        };
        let step = width + scroller.card_gap();
        scroller.scroll_by(direction.sign() * step, ScrollBehavior::Smooth);
    }

    fn hard_reset<S, F>(&mut self, scroller: &mut S, scheduler: &mut F)
    where
        S: Scroller + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.cancel_pending(scheduler);
        self.snap = SnapState::NotReady;
        scroller.set_snap_enabled(false);
        scroller.set_scroll_left(0.0);
        let handle = scheduler.request_frame();
        self.phase = Phase::FirstFrame(handle);
        trace!(from_epoch = self.epoch, "carousel reset started");
    }

    fn cancel_pending<F>(&mut self, scheduler: &mut F)
    where
        F: FrameScheduler + ?Sized,
    {
        if let Phase::FirstFrame(handle) | Phase::SecondFrame(handle) = self.phase {
            scheduler.cancel_frame(handle);
            self.phase = Phase::Idle;
        }
    }
}

/// Deterministic [`FrameScheduler`]: frames fire when the host calls
/// [`FrameQueue::tick`].
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested and not yet fired or cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Fire one frame: returns every handle requested before this call.
    /// Handles requested while processing them belong to the next tick.
    pub fn tick(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

/// Run frames until the controller has nothing pending. Returns the number
/// of ticks it took.
pub fn settle<S>(
    controller: &mut CarouselController,
    queue: &mut FrameQueue,
    scroller: &mut S,
) -> usize
where
    S: Scroller + ?Sized,
{
    let mut ticks = 0;
    while !queue.pending().is_empty() {
        ticks += 1;
        for handle in queue.tick() {
            controller.on_frame(handle, scroller, queue);
        }
    }
    ticks
}
