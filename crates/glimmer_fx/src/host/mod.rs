//! # Host Boundary
//!
//! Everything the effects need from the page, expressed as four traits:
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Surface      │ create / style / query / remove elements     │
//! │ EventSource  │ subscribe to pointer, click, input, submit   │
//! │ Clock        │ wall-clock milliseconds                       │
//! │ Scheduler    │ one-shot and repeating timers carrying Tasks │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Timers do not carry closures. They carry a [`Task`] value that the host
//! hands back to [`crate::PageRuntime::fire`] when it is due, which keeps
//! every component an ordinary owned value with no shared mutable state.
//!
//! Removal is idempotent and keyed by [`ElementId`]: removing an element
//! twice, or removing a child of an already-removed container, is a no-op
//! that returns `false`.

pub mod sim;

pub use sim::SimHost;

/// Identity of an element on the host surface.
///
/// Ids are never reused within one host, so a stale id can only ever
/// refer to a detached element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ElementId(pub u64);

/// Cancellation handle for a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TimerHandle(pub u64);

/// Handle for an event subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ListenerHandle(pub u64);

/// Where a new element is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Appended to the document head.
    Head,
    /// Appended to the document body.
    Body,
    /// Appended as the last child of an element.
    Child(ElementId),
    /// Inserted as the next sibling of an element.
    After(ElementId),
}

/// Element lookup, the subset of CSS selectors the page utilities use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `#id`
    Id(&'a str),
    /// `.class`
    Class(&'a str),
    /// `tag`
    Tag(&'a str),
    /// `[attribute]`
    Attribute(&'a str),
}

impl Selector<'_> {
    /// Renders the selector as CSS.
    #[must_use]
    pub fn to_css(self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Class(class) => format!(".{class}"),
            Self::Tag(tag) => tag.to_owned(),
            Self::Attribute(name) => format!("[{name}]"),
        }
    }
}

/// What an event subscription is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The whole document.
    Document,
    /// A single element.
    Element(ElementId),
}

/// Kinds of event the effects subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer moved.
    PointerMove,
    /// Primary click.
    Click,
    /// Pointer left the document.
    PointerLeave,
    /// Text input changed.
    Input,
    /// Form submitted.
    Submit,
}

/// An event delivered by the host to [`crate::PageRuntime::handle_event`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Pointer moved to client coordinates.
    PointerMove {
        /// Client X.
        x: f64,
        /// Client Y.
        y: f64,
    },
    /// Click at client coordinates on a subscribed target.
    Click {
        /// The subscription target that received the click.
        target: EventTarget,
        /// Client X.
        x: f64,
        /// Client Y.
        y: f64,
    },
    /// Pointer left the document.
    PointerLeave,
    /// An input element's value changed.
    Input {
        /// The input element.
        target: ElementId,
        /// Its new value.
        value: String,
    },
    /// A form is being submitted.
    Submit {
        /// The form element.
        target: ElementId,
    },
}

impl Event {
    /// The kind of subscription this event is delivered through.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::Click { .. } => EventKind::Click,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::Input { .. } => EventKind::Input,
            Self::Submit { .. } => EventKind::Submit,
        }
    }
}

/// What the host should do with the native event after handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EventOutcome {
    /// Let the default action happen.
    #[default]
    Continue,
    /// Cancel the default action (blocked form submission).
    PreventDefault,
}

/// Deferred work, handed back to the runtime when its timer fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task {
    /// Throttle window closed; create a trail marker at this sample.
    TrailSample {
        /// Client X.
        x: f64,
        /// Client Y.
        y: f64,
    },
    /// Periodic age sweep of trail markers.
    TrailSweep,
    /// Detach a trail marker after its exit fade.
    TrailDetach(ElementId),
    /// Ripple animation finished.
    RippleExpire(ElementId),
    /// Delayed automatic rain start on the home page.
    RainAutostart,
    /// Rain generation tick.
    RainTick,
    /// A drop finished falling.
    DropExpire(ElementId),
    /// Flash message timed out.
    FlashDismiss(ElementId),
    /// Flash message slide-out finished.
    FlashDetach(ElementId),
    /// Fade a shown card in.
    CardReveal(ElementId),
    /// Collapse a hidden card after its fade-out.
    CardCollapse(ElementId),
    /// Toast notification timed out.
    ToastExpire(ElementId),
}

/// The rendering surface: a document-like element tree.
pub trait Surface {
    /// Creates an element and attaches it at `placement`.
    ///
    /// Returns `None` when the placement anchor is not attached.
    fn create_element(&mut self, placement: Placement, tag: &str) -> Option<ElementId>;

    /// Sets an attribute.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Reads an attribute.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Sets one inline style property.
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// Reads one inline style property.
    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Replaces the element's text content.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Text content of the element and its descendants.
    fn text_content(&self, element: ElementId) -> Option<String>;

    /// Current value of a form control.
    fn value(&self, element: ElementId) -> Option<String>;

    /// Adds a class.
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Removes a class.
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Whether the element carries a class.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Moves keyboard focus to the element.
    fn focus(&mut self, element: ElementId);

    /// Detaches the element and its subtree.
    ///
    /// Idempotent: returns `true` only if the element was attached.
    fn remove(&mut self, element: ElementId) -> bool;

    /// Whether the element is currently part of the document.
    fn is_attached(&self, element: ElementId) -> bool;

    /// All attached elements matching `selector`, in document order,
    /// restricted to descendants of `scope` when given.
    fn query_all(&mut self, scope: Option<ElementId>, selector: Selector<'_>) -> Vec<ElementId>;

    /// First match of [`Self::query_all`].
    fn query_first(&mut self, scope: Option<ElementId>, selector: Selector<'_>) -> Option<ElementId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Path component of the page location.
    fn location_path(&self) -> String;
}

/// Event subscriptions.
pub trait EventSource {
    /// Subscribes to `kind` events on `target`.
    fn listen(&mut self, target: EventTarget, kind: EventKind) -> ListenerHandle;

    /// Removes a subscription. Unknown handles are ignored.
    fn unlisten(&mut self, handle: ListenerHandle);
}

/// Wall clock.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> f64;
}

/// Deferred task scheduling.
pub trait Scheduler {
    /// Runs `task` once after `delay_ms`.
    fn schedule(&mut self, delay_ms: u32, task: Task) -> TimerHandle;

    /// Runs `task` every `period_ms` until cancelled.
    fn schedule_repeating(&mut self, period_ms: u32, task: Task) -> TimerHandle;

    /// Cancels a timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Everything the runtime needs from the page.
pub trait Host: Surface + EventSource + Clock + Scheduler {}

impl<T: Surface + EventSource + Clock + Scheduler> Host for T {}

/// Gets the element with `id`, creating it in the body with `class` when
/// the page does not provide one.
pub fn ensure_container<H: Surface + ?Sized>(host: &mut H, id: &str, class: &str) -> Option<ElementId> {
    if let Some(existing) = host.query_first(None, Selector::Id(id)) {
        return Some(existing);
    }
    let container = host.create_element(Placement::Body, "div")?;
    host.set_attribute(container, "id", id);
    host.add_class(container, class);
    Some(container)
}
