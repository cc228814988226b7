//! Click ripple. Each ring removes itself when its animation ends, so the
//! population is bounded by click rate times duration and needs no cap.

use crate::config::RippleConfig;
use crate::host::{ensure_container, ElementId, Host, Placement, Task};
use crate::style::{px, ripple_color};

/// Id of the ripple container.
pub const RIPPLE_CONTAINER_ID: &str = "click-effects";
/// Class of the ripple container.
pub const RIPPLE_CONTAINER_CLASS: &str = "click-effects-container";
/// Class of one ring.
pub const RIPPLE_CLASS: &str = "click-effect";

/// One live ripple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleMarker {
    /// Its element.
    pub element: ElementId,
    /// Click X.
    pub x: f64,
    /// Click Y.
    pub y: f64,
    /// Host clock at creation.
    pub created_at: f64,
}

/// Spawns one-shot rings on click.
#[derive(Debug)]
pub struct RippleEffect {
    config: RippleConfig,
    container: Option<ElementId>,
    live: Vec<RippleMarker>,
}

impl RippleEffect {
    /// Creates a detached ripple effect.
    #[must_use]
    pub fn new(config: RippleConfig) -> Self {
        Self {
            config,
            container: None,
            live: Vec::new(),
        }
    }

    /// Gets or creates the container.
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.container.is_none() {
            self.container = ensure_container(host, RIPPLE_CONTAINER_ID, RIPPLE_CONTAINER_CLASS);
        }
    }

    /// The container, once attached.
    #[must_use]
    pub const fn container(&self) -> Option<ElementId> {
        self.container
    }

    /// Rings still animating.
    #[must_use]
    pub fn live(&self) -> &[RippleMarker] {
        &self.live
    }

    /// Spawns a ring centred on the click.
    pub fn on_click<H: Host + ?Sized>(&mut self, host: &mut H, x: f64, y: f64) -> Option<ElementId> {
        let container = self.container?;
        let now = host.now_ms();
        let color = ripple_color(now, &self.config).to_css();

        let ring = host.create_element(Placement::Child(container), "div")?;
        host.add_class(ring, RIPPLE_CLASS);
        host.set_style(ring, "border-color", &color);
        host.set_style(ring, "box-shadow", &format!("0 0 20px {color}"));
        host.set_style(ring, "left", &px(x - self.config.radius_px));
        host.set_style(ring, "top", &px(y - self.config.radius_px));
        host.schedule(self.config.duration_ms, Task::RippleExpire(ring));

        self.live.push(RippleMarker {
            element: ring,
            x,
            y,
            created_at: now,
        });
        Some(ring)
    }

    /// Animation finished: detach the ring.
    pub fn on_expire<H: Host + ?Sized>(&mut self, host: &mut H, element: ElementId) {
        host.remove(element);
        self.live.retain(|r| r.element != element);
    }

    /// Detaches every ring and the container. Idempotent.
    pub fn dispose<H: Host + ?Sized>(&mut self, host: &mut H) {
        for ring in self.live.drain(..) {
            host.remove(ring.element);
        }
        if let Some(container) = self.container.take() {
            host.remove(container);
        }
    }
}
