//! # Web Host
//!
//! The host traits over a live document.
//!
//! ```text
//!   ElementId ──▶ elements map ──▶ web_sys::Element
//!   TimerHandle ─▶ gloo Timeout / Interval ──▶ bindings::fire(task)
//!   ListenerHandle ─▶ gloo EventListener ──▶ bindings::dispatch(event)
//! ```
//!
//! Elements get an id the first time they are created or found by a query.
//! Dropping a gloo handle cancels it, so `cancel` and `unlisten` only have
//! to forget the handle.

use std::collections::HashMap;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::{Interval, Timeout};
use glimmer_fx::host::{
    Clock, ElementId, EventKind, EventSource, EventTarget, ListenerHandle, Placement, Scheduler,
    Selector, Surface, Task, TimerHandle,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::bindings;

/// Host backed by `web_sys` and `gloo`.
pub struct WebHost {
    document: Document,
    elements: HashMap<ElementId, Element>,
    next_element: u64,
    timeouts: HashMap<TimerHandle, Timeout>,
    intervals: HashMap<TimerHandle, Interval>,
    // One-shot timers that already fired; dropped outside their own callback.
    spent: Vec<Timeout>,
    next_timer: u64,
    listeners: HashMap<ListenerHandle, EventListener>,
    next_listener: u64,
}

impl std::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebHost")
            .field("elements", &self.elements.len())
            .field("timeouts", &self.timeouts.len())
            .field("intervals", &self.intervals.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl WebHost {
    /// Wraps the current document. `None` outside a window.
    #[must_use]
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            elements: HashMap::new(),
            next_element: 0,
            timeouts: HashMap::new(),
            intervals: HashMap::new(),
            spent: Vec::new(),
            next_timer: 0,
            listeners: HashMap::new(),
            next_listener: 0,
        })
    }

    /// The wrapped document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A one-shot timer fired: forget its handle.
    pub(crate) fn timer_fired(&mut self, handle: TimerHandle) {
        if let Some(timeout) = self.timeouts.remove(&handle) {
            self.spent.push(timeout);
        }
    }

    /// Drops spent timers. Called at the start of every callback.
    pub(crate) fn collect_spent(&mut self) {
        self.spent.clear();
    }

    fn register(&mut self, element: Element) -> ElementId {
        if let Some((&id, _)) = self.elements.iter().find(|(_, known)| **known == element) {
            return id;
        }
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(id, element);
        id
    }

    fn html(&self, element: ElementId) -> Option<&HtmlElement> {
        self.elements.get(&element)?.dyn_ref::<HtmlElement>()
    }

    fn parent_node(&self, placement: Placement) -> Option<web_sys::Node> {
        match placement {
            Placement::Head => self.document.head().map(Into::into),
            Placement::Body => self.document.body().map(Into::into),
            Placement::Child(parent) => self.elements.get(&parent).map(|e| e.clone().into()),
            Placement::After(sibling) => self.elements.get(&sibling)?.parent_node(),
        }
    }
}

impl Surface for WebHost {
    fn create_element(&mut self, placement: Placement, tag: &str) -> Option<ElementId> {
        let element = self.document.create_element(tag).ok()?;
        if let Placement::After(sibling) = placement {
            self.elements.get(&sibling)?.after_with_node_1(&element).ok()?;
        } else {
            self.parent_node(placement)?.append_child(&element).ok()?;
        }
        Some(self.register(element))
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(el) = self.elements.get(&element) {
            if let Err(err) = el.set_attribute(name, value) {
                tracing::debug!(?err, name, "set_attribute failed");
            }
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.elements.get(&element)?.get_attribute(name)
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(el) = self.html(element) {
            if let Err(err) = el.style().set_property(property, value) {
                tracing::debug!(?err, property, "set_style failed");
            }
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.html(element)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(el) = self.elements.get(&element) {
            el.set_text_content(Some(text));
        }
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element)?.text_content()
    }

    fn value(&self, element: ElementId) -> Option<String> {
        let el = self.elements.get(&element)?;
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            Some(area.value())
        } else {
            el.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.elements.get(&element) {
            if let Err(err) = el.class_list().add_1(class) {
                tracing::debug!(?err, class, "add_class failed");
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.elements.get(&element) {
            if let Err(err) = el.class_list().remove_1(class) {
                tracing::debug!(?err, class, "remove_class failed");
            }
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn focus(&mut self, element: ElementId) {
        if let Some(el) = self.html(element) {
            if let Err(err) = el.focus() {
                tracing::debug!(?err, "focus failed");
            }
        }
    }

    fn remove(&mut self, element: ElementId) -> bool {
        let Some(el) = self.elements.remove(&element) else {
            return false;
        };
        let was_attached = el.is_connected();
        el.remove();
        // Descendants went with it.
        self.elements.retain(|_, known| known.is_connected());
        was_attached
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.elements.get(&element).is_some_and(|el| el.is_connected())
    }

    fn query_all(&mut self, scope: Option<ElementId>, selector: Selector<'_>) -> Vec<ElementId> {
        let css = selector.to_css();
        let found = match scope {
            Some(scope) => match self.elements.get(&scope) {
                Some(el) => el.query_selector_all(&css),
                None => return Vec::new(),
            },
            None => self.document.query_selector_all(&css),
        };
        let Ok(list) = found else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.register(el))
            .collect()
    }

    fn location_path(&self) -> String {
        self.document
            .location()
            .and_then(|loc| loc.pathname().ok())
            .unwrap_or_default()
    }
}

impl Clock for WebHost {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

impl Scheduler for WebHost {
    fn schedule(&mut self, delay_ms: u32, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        let timeout = Timeout::new(delay_ms, move || bindings::fire(Some(handle), task));
        self.timeouts.insert(handle, timeout);
        handle
    }

    fn schedule_repeating(&mut self, period_ms: u32, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        let interval = Interval::new(period_ms.max(1), move || bindings::fire(None, task));
        self.intervals.insert(handle, interval);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timeouts.remove(&handle);
        self.intervals.remove(&handle);
    }
}

impl EventSource for WebHost {
    fn listen(&mut self, target: EventTarget, kind: EventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;

        let node: web_sys::EventTarget = match target {
            EventTarget::Document => self.document.clone().into(),
            EventTarget::Element(id) => match self.elements.get(&id) {
                Some(el) => el.clone().into(),
                None => return handle,
            },
        };
        let options = if kind == EventKind::Submit {
            EventListenerOptions::enable_prevent_default()
        } else {
            EventListenerOptions::default()
        };
        let listener = EventListener::new_with_options(&node, event_type(kind), options, move |event| {
            bindings::dispatch(target, kind, event);
        });
        self.listeners.insert(handle, listener);
        handle
    }

    fn unlisten(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle);
    }
}

/// DOM event name for a subscription kind.
#[must_use]
pub const fn event_type(kind: EventKind) -> &'static str {
    match kind {
        EventKind::PointerMove => "mousemove",
        EventKind::Click => "click",
        EventKind::PointerLeave => "mouseleave",
        EventKind::Input => "input",
        EventKind::Submit => "submit",
    }
}
