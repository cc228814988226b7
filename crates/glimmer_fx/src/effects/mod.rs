//! Visual effects: cursor trail, click ripple and ambient rain.

pub mod rain;
pub mod ripple;
pub mod trail;

pub use rain::{RainDrop, RainGenerator, RainState};
pub use ripple::{RippleEffect, RippleMarker};
pub use trail::{TrailEffect, TrailMarker};

use rand::Rng;

use crate::config::EffectsConfig;
use crate::host::{ElementId, EventKind, EventTarget, Host, ListenerHandle};

/// Cursor trail and click ripple, enabled and torn down together.
#[derive(Debug)]
pub struct PointerEffects {
    trail: TrailEffect,
    ripple: RippleEffect,
    listeners: Vec<ListenerHandle>,
}

impl PointerEffects {
    /// Creates the effects without touching the page.
    #[must_use]
    pub fn new(config: &EffectsConfig) -> Self {
        Self {
            trail: TrailEffect::new(config.trail.clone()),
            ripple: RippleEffect::new(config.ripple.clone()),
            listeners: Vec::new(),
        }
    }

    /// Creates containers, arms the trail sweep and subscribes to pointer
    /// events on the document. Returns `false` if already enabled.
    pub fn enable<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.is_enabled() {
            return false;
        }
        self.trail.attach(host);
        self.ripple.attach(host);
        for kind in [EventKind::PointerMove, EventKind::Click, EventKind::PointerLeave] {
            self.listeners.push(host.listen(EventTarget::Document, kind));
        }
        tracing::debug!("pointer effects enabled");
        true
    }

    /// Whether listeners are installed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// The trail.
    #[must_use]
    pub const fn trail(&self) -> &TrailEffect {
        &self.trail
    }

    /// The ripple effect.
    #[must_use]
    pub const fn ripple(&self) -> &RippleEffect {
        &self.ripple
    }

    /// Pointer moved.
    pub fn on_pointer_move<H: Host + ?Sized>(&mut self, host: &mut H, x: f64, y: f64) {
        if self.is_enabled() {
            self.trail.on_pointer_move(host, x, y);
        }
    }

    /// Document clicked.
    pub fn on_click<H: Host + ?Sized>(&mut self, host: &mut H, x: f64, y: f64) {
        if self.is_enabled() {
            self.ripple.on_click(host, x, y);
        }
    }

    /// Pointer left the document.
    pub fn on_pointer_leave<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.trail.clear(host);
    }

    /// Routes a throttled trail sample.
    pub fn on_trail_sample<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R, x: f64, y: f64) {
        self.trail.on_sample(host, rng, x, y);
    }

    /// Routes the trail sweep.
    pub fn on_trail_sweep<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.trail.on_sweep(host);
    }

    /// Routes a trail detach.
    pub fn on_trail_detach<H: Host + ?Sized>(&mut self, host: &mut H, element: ElementId) {
        self.trail.on_detach(host, element);
    }

    /// Routes a ripple expiry.
    pub fn on_ripple_expire<H: Host + ?Sized>(&mut self, host: &mut H, element: ElementId) {
        self.ripple.on_expire(host, element);
    }

    /// Unsubscribes, cancels timers and detaches everything. Idempotent;
    /// one-shot detach timers already in flight fire harmlessly.
    pub fn dispose<H: Host + ?Sized>(&mut self, host: &mut H) {
        for handle in self.listeners.drain(..) {
            host.unlisten(handle);
        }
        self.trail.dispose(host);
        self.ripple.dispose(host);
        tracing::debug!("pointer effects disposed");
    }
}
