//! # Page Runtime
//!
//! Owns one instance of every component and is the only thing a host
//! talks to.
//!
//! ```text
//!   host event ──▶ handle_event ──┬─▶ PointerEffects (move, click, leave)
//!                                 ├─▶ FlashMessages  (close click)
//!                                 ├─▶ SearchFilter   (input)
//!                                 └─▶ FormValidator  (submit) ──▶ Toasts
//!
//!   fired Task ──▶ fire ─────────────▶ owning component
//! ```
//!
//! Tasks for a component that was torn down still arrive; every handler
//! tolerates elements that are already gone.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::EffectsConfig;
use crate::effects::{PointerEffects, RainGenerator};
use crate::host::{Clock, Event, EventOutcome, EventTarget, Host, Task};
use crate::page::{is_home_page, FlashMessages, FormValidator, SearchFilter, Toasts};
use crate::stylesheet;

/// Every effect and page utility of one document.
#[derive(Debug)]
pub struct PageRuntime {
    config: EffectsConfig,
    rng: ChaCha8Rng,
    pointer: PointerEffects,
    rain: RainGenerator,
    flash: FlashMessages,
    forms: FormValidator,
    search: SearchFilter,
    toasts: Toasts,
    loaded: bool,
}

impl PageRuntime {
    /// Creates a runtime without touching the page. The RNG uses
    /// `config.seed`, or the clock when no seed is set.
    #[must_use]
    pub fn new<C: Clock + ?Sized>(config: EffectsConfig, clock: &C) -> Self {
        let seed = config.seed.unwrap_or_else(|| clock.now_ms().to_bits());
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pointer: PointerEffects::new(&config),
            rain: RainGenerator::new(config.rain.clone()),
            flash: FlashMessages::new(&config.page),
            forms: FormValidator::new(&config.page),
            search: SearchFilter::new(&config.page),
            toasts: Toasts::new(config.page.toast_duration_ms),
            loaded: false,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Cursor trail and click ripple.
    #[must_use]
    pub const fn pointer(&self) -> &PointerEffects {
        &self.pointer
    }

    /// Ambient rain.
    #[must_use]
    pub const fn rain(&self) -> &RainGenerator {
        &self.rain
    }

    /// Flash messages.
    #[must_use]
    pub const fn flash(&self) -> &FlashMessages {
        &self.flash
    }

    /// Form validation.
    #[must_use]
    pub const fn forms(&self) -> &FormValidator {
        &self.forms
    }

    /// Card search.
    #[must_use]
    pub const fn search(&self) -> &SearchFilter {
        &self.search
    }

    /// Toast notifications.
    #[must_use]
    pub const fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    /// Whether [`Self::on_page_load`] has run.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Injects the stylesheet and enables trail and ripple. A second call
    /// returns the already enabled instance.
    pub fn enable_pointer_effects<H: Host + ?Sized>(&mut self, host: &mut H) -> &mut PointerEffects {
        stylesheet::inject(host);
        self.pointer.enable(host);
        &mut self.pointer
    }

    /// Starts the rain now. Returns `false` if it was already running.
    pub fn start_rain<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        stylesheet::inject(host);
        self.rain.start(host, &mut self.rng)
    }

    /// Stops the rain and cancels a pending delayed start. Returns `false`
    /// if it was already idle.
    pub fn stop_rain<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        self.rain.stop(host)
    }

    /// Document ready: pointer effects everywhere, delayed rain on the home
    /// page, then flash messages, forms and search.
    ///
    /// Effects and rain are set up on the first call only. Later calls wire
    /// flash messages, forms and a search box added since.
    pub fn on_page_load<H: Host + ?Sized>(&mut self, host: &mut H) {
        let path = host.location_path();
        if !self.loaded {
            self.loaded = true;
            self.enable_pointer_effects(host);
            if is_home_page(&path) {
                self.rain.schedule_start(host, &mut self.rng);
            }
        }
        let flashes = self.flash.init(host);
        let forms = self.forms.init(host);
        let search = self.search.init(host);
        tracing::info!(%path, flashes, forms, search, "page effects initialized");
    }

    /// Routes a host event to its component.
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: Event) -> EventOutcome {
        match event {
            Event::PointerMove { x, y } => self.pointer.on_pointer_move(host, x, y),
            Event::PointerLeave => self.pointer.on_pointer_leave(host),
            Event::Click {
                target: EventTarget::Document,
                x,
                y,
            } => self.pointer.on_click(host, x, y),
            Event::Click {
                target: EventTarget::Element(control),
                ..
            } => {
                self.flash.on_close_click(host, control);
            }
            Event::Input { target, value } => {
                if self.search.input() == Some(target) {
                    let shown = self.search.on_input(host, &value);
                    tracing::trace!(shown, "search applied");
                }
            }
            Event::Submit { target } => {
                if self.forms.watches(target) {
                    let outcome = self.forms.validate(host, &mut self.toasts, target);
                    if outcome.is_blocked() {
                        return EventOutcome::PreventDefault;
                    }
                }
            }
        }
        EventOutcome::Continue
    }

    /// Routes a fired timer task to its component.
    pub fn fire<H: Host + ?Sized>(&mut self, host: &mut H, task: Task) {
        match task {
            Task::TrailSample { x, y } => self.pointer.on_trail_sample(host, &mut self.rng, x, y),
            Task::TrailSweep => self.pointer.on_trail_sweep(host),
            Task::TrailDetach(el) => self.pointer.on_trail_detach(host, el),
            Task::RippleExpire(el) => self.pointer.on_ripple_expire(host, el),
            Task::RainAutostart => self.rain.on_autostart(host, &mut self.rng),
            Task::RainTick => self.rain.on_tick(host, &mut self.rng),
            Task::DropExpire(el) => self.rain.on_drop_expire(host, el),
            Task::FlashDismiss(el) => self.flash.on_dismiss_timer(host, el),
            Task::FlashDetach(el) => self.flash.on_detach(host, el),
            Task::CardReveal(el) => self.search.on_reveal(host, el),
            Task::CardCollapse(el) => self.search.on_collapse(host, el),
            Task::ToastExpire(el) => self.toasts.on_expire(host, el),
        }
    }

    /// Tears down pointer effects and rain. Page utilities keep working
    /// until the document goes away.
    pub fn dispose<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.pointer.dispose(host);
        self.rain.stop(host);
    }
}
