//! Cursor trail.
//!
//! Markers live in a FIFO queue; insertion order is recency. Three exits
//! guarantee nothing lingers:
//!
//! 1. **Count eviction** - past the cap the oldest marker fades and detaches.
//! 2. **Age sweep** - a repeating timer retires markers past `max_age_ms`.
//! 3. **Pointer leave / dispose** - everything detaches at once.
//!
//! Exits 1 and 2 detach through [`Task::TrailDetach`]; detaching an element
//! that is already gone is a no-op, so the paths may overlap freely.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::TrailConfig;
use crate::host::{ensure_container, ElementId, Host, Placement, Task, TimerHandle};
use crate::style::{px, secs, speed, TrailJitter, TrailVisual};

/// Id of the trail container.
pub const TRAIL_CONTAINER_ID: &str = "mouse-trail";
/// Class of the trail container.
pub const TRAIL_CONTAINER_CLASS: &str = "mouse-trail-container";
/// Class of one marker.
pub const TRAIL_DOT_CLASS: &str = "trail-dot";

/// One live trail marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailMarker {
    /// Its element.
    pub element: ElementId,
    /// Pointer X it was created at.
    pub x: f64,
    /// Pointer Y it was created at.
    pub y: f64,
    /// Host clock at creation.
    pub created_at: f64,
}

/// Bounded queue of markers following the pointer.
#[derive(Debug)]
pub struct TrailEffect {
    config: TrailConfig,
    container: Option<ElementId>,
    markers: VecDeque<TrailMarker>,
    last_sample: (f64, f64),
    pending_sample: Option<TimerHandle>,
    sweep: Option<TimerHandle>,
}

impl TrailEffect {
    /// Creates a detached trail.
    #[must_use]
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config,
            container: None,
            markers: VecDeque::new(),
            last_sample: (0.0, 0.0),
            pending_sample: None,
            sweep: None,
        }
    }

    /// Gets or creates the container and arms the age sweep.
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.container.is_none() {
            self.container = ensure_container(host, TRAIL_CONTAINER_ID, TRAIL_CONTAINER_CLASS);
        }
        if self.sweep.is_none() {
            self.sweep = Some(host.schedule_repeating(self.config.sweep_interval_ms, Task::TrailSweep));
        }
    }

    /// Live markers, oldest first.
    pub fn markers(&self) -> impl Iterator<Item = &TrailMarker> {
        self.markers.iter()
    }

    /// Number of live markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no marker is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The container, once attached.
    #[must_use]
    pub const fn container(&self) -> Option<ElementId> {
        self.container
    }

    /// Whether a throttled sample is waiting to be drawn.
    #[must_use]
    pub const fn has_pending_sample(&self) -> bool {
        self.pending_sample.is_some()
    }

    /// Accepts a pointer sample unless one is already pending; samples
    /// inside the throttle window are dropped, not queued.
    pub fn on_pointer_move<H: Host + ?Sized>(&mut self, host: &mut H, x: f64, y: f64) {
        if self.pending_sample.is_some() || self.container.is_none() {
            return;
        }
        self.pending_sample = Some(host.schedule(self.config.throttle_ms, Task::TrailSample { x, y }));
    }

    /// The throttle window closed: draw the accepted sample.
    pub fn on_sample<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R, x: f64, y: f64) {
        self.pending_sample = None;
        let Some(container) = self.container else {
            return;
        };

        let now = host.now_ms();
        let speed = speed(self.last_sample, (x, y));
        let visual = TrailVisual::compute(now, speed, TrailJitter::sample(rng), &self.config);
        self.last_sample = (x, y);

        let Some(dot) = host.create_element(Placement::Child(container), "div") else {
            return;
        };
        let (left, top) = visual.origin(x, y);
        host.add_class(dot, TRAIL_DOT_CLASS);
        host.set_style(dot, "background", &visual.gradient());
        host.set_style(dot, "width", &px(visual.size));
        host.set_style(dot, "height", &px(visual.size));
        host.set_style(dot, "left", &px(left));
        host.set_style(dot, "top", &px(top));
        host.set_style(dot, "filter", &format!("blur({})", px(visual.blur)));
        host.set_style(dot, "animation-duration", &secs(visual.fade_secs));
        host.set_style(dot, "opacity", &format!("{:.3}", visual.opacity));

        self.markers.push_back(TrailMarker {
            element: dot,
            x,
            y,
            created_at: now,
        });

        while self.markers.len() > self.config.max_markers {
            self.evict_oldest(host);
        }
    }

    fn evict_oldest<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(oldest) = self.markers.pop_front() {
            fade_out(host, oldest.element, "scale(0.5)", self.config.evict_fade_ms);
        }
    }

    /// Retires every marker older than `max_age_ms`.
    pub fn on_sweep<H: Host + ?Sized>(&mut self, host: &mut H) {
        let now = host.now_ms();
        let max_age = f64::from(self.config.max_age_ms);
        let (expired, kept): (Vec<TrailMarker>, Vec<TrailMarker>) =
            self.markers.drain(..).partition(|m| now - m.created_at > max_age);
        self.markers.extend(kept);

        for marker in &expired {
            fade_out(host, marker.element, "scale(0.3)", self.config.sweep_fade_ms);
        }
        if !expired.is_empty() {
            tracing::trace!(expired = expired.len(), live = self.markers.len(), "trail sweep");
        }
    }

    /// Detaches a faded marker. Safe to call for elements already gone.
    pub fn on_detach<H: Host + ?Sized>(&mut self, host: &mut H, element: ElementId) {
        host.remove(element);
    }

    /// Detaches every marker immediately, without animation, and drops any
    /// pending sample.
    pub fn clear<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(pending) = self.pending_sample.take() {
            host.cancel(pending);
        }
        for marker in self.markers.drain(..) {
            host.remove(marker.element);
        }
    }

    /// Cancels the sweep, clears markers and removes the container.
    /// Idempotent.
    pub fn dispose<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(sweep) = self.sweep.take() {
            host.cancel(sweep);
        }
        self.clear(host);
        if let Some(container) = self.container.take() {
            host.remove(container);
        }
    }
}

/// Starts the exit fade and schedules the detach.
fn fade_out<H: Host + ?Sized>(host: &mut H, element: ElementId, transform: &str, delay_ms: u32) {
    if !host.is_attached(element) {
        return;
    }
    host.set_style(element, "opacity", "0");
    host.set_style(element, "transform", transform);
    host.schedule(delay_ms, Task::TrailDetach(element));
}
