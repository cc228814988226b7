//! wasm entry points and the callback plumbing behind them.
//!
//! The runtime and its host live in a thread-local. Every browser callback
//! (timer, listener, export) borrows it for the duration of one call; a
//! callback that arrives while it is already borrowed is dropped and logged.

use std::cell::RefCell;

use gloo::events::EventListener;
use glimmer_fx::host::{ElementId, EventKind, EventOutcome, EventTarget, Surface, Task, TimerHandle};
use glimmer_fx::{EffectsConfig, Event, PageRuntime};
use tracing::Level;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MouseEvent};

use crate::host::WebHost;
use crate::logging;

/// Id of an optional `<script type="application/toml">` block holding the
/// effect configuration.
pub const CONFIG_ELEMENT_ID: &str = "glimmer-config";

struct App {
    runtime: PageRuntime,
    host: WebHost,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut PageRuntime, &mut WebHost) -> R) -> Option<R> {
    APP.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            tracing::warn!("re-entrant callback dropped");
            return None;
        };
        let app = slot.as_mut()?;
        app.host.collect_spent();
        Some(f(&mut app.runtime, &mut app.host))
    })
}

/// Reads the inline configuration block, falling back to defaults.
fn load_config(document: &Document) -> EffectsConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return EffectsConfig::default();
    };
    match EffectsConfig::from_toml_str(&text) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring inline effect config");
            EffectsConfig::default()
        }
    }
}

/// Timer callback.
pub(crate) fn fire(handle: Option<TimerHandle>, task: Task) {
    with_app(|runtime, host| {
        if let Some(handle) = handle {
            host.timer_fired(handle);
        }
        runtime.fire(host, task);
    });
}

/// Listener callback: translates the DOM event and cancels its default
/// action when the runtime asks for it.
pub(crate) fn dispatch(target: EventTarget, kind: EventKind, raw: &web_sys::Event) {
    let outcome = with_app(|runtime, host| {
        let event = translate(host, target, kind, raw)?;
        Some(runtime.handle_event(host, event))
    })
    .flatten();
    if outcome == Some(EventOutcome::PreventDefault) {
        raw.prevent_default();
    }
}

fn translate(host: &WebHost, target: EventTarget, kind: EventKind, raw: &web_sys::Event) -> Option<Event> {
    let pointer = || {
        raw.dyn_ref::<MouseEvent>()
            .map(|m| (f64::from(m.client_x()), f64::from(m.client_y())))
    };
    let element = || match target {
        EventTarget::Element(id) => Some(id),
        EventTarget::Document => None,
    };
    Some(match kind {
        EventKind::PointerMove => {
            let (x, y) = pointer()?;
            Event::PointerMove { x, y }
        }
        EventKind::Click => {
            let (x, y) = pointer().unwrap_or_default();
            Event::Click { target, x, y }
        }
        EventKind::PointerLeave => Event::PointerLeave,
        EventKind::Input => {
            let input: ElementId = element()?;
            Event::Input {
                target: input,
                value: host.value(input).unwrap_or_default(),
            }
        }
        EventKind::Submit => Event::Submit { target: element()? },
    })
}

/// Module start: logging, panic hook, runtime, then page load once the
/// document is parsed.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init(Level::INFO);

    let Some(host) = WebHost::new() else {
        tracing::warn!("no document, effects disabled");
        return;
    };
    let document = host.document().clone();
    let runtime = PageRuntime::new(load_config(&document), &host);
    APP.with(|cell| *cell.borrow_mut() = Some(App { runtime, host }));

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| on_page_load()).forget();
    } else {
        on_page_load();
    }
}

/// Enables the cursor trail and click ripple.
#[wasm_bindgen]
pub fn enable_pointer_effects() {
    with_app(|runtime, host| {
        runtime.enable_pointer_effects(host);
    });
}

/// Starts the rain. Returns `false` if it was already running.
#[wasm_bindgen]
pub fn start_rain() -> bool {
    with_app(|runtime, host| runtime.start_rain(host)).unwrap_or(false)
}

/// Stops the rain. Returns `false` if it was already stopped.
#[wasm_bindgen]
pub fn stop_rain() -> bool {
    with_app(|runtime, host| runtime.stop_rain(host)).unwrap_or(false)
}

/// Wires every page utility. Later calls pick up flash messages, forms
/// and a search box added since the first one.
#[wasm_bindgen]
pub fn on_page_load() {
    with_app(|runtime, host| runtime.on_page_load(host));
}
