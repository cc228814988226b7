//! # Simulated Host
//!
//! An in-memory document with a virtual clock. Time only moves when
//! [`SimHost::advance`] is called, and due timers fire in `(due, handle)`
//! order, so every run is reproducible.
//!
//! ```rust,ignore
//! let mut host = SimHost::new("/");
//! let mut runtime = PageRuntime::new(EffectsConfig::default(), &host);
//! runtime.on_page_load(&mut host);
//! host.advance(5_000, |host, task| runtime.fire(host, task));
//! ```

use std::collections::{BTreeMap, HashMap};

use super::{
    Clock, ElementId, EventKind, EventSource, EventTarget, ListenerHandle, Placement, Scheduler,
    Selector, Surface, Task, TimerHandle,
};

/// One element of the simulated document.
#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent,
            ..Self::default()
        }
    }

    fn matches(&self, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Id(id) => self.attributes.get("id").is_some_and(|v| v == id),
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
            Selector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
            Selector::Attribute(name) => self.attributes.contains_key(name),
        }
    }

    fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: f64,
    period: Option<u32>,
    task: Task,
}

/// Deterministic in-memory host.
#[derive(Debug, Clone)]
pub struct SimHost {
    nodes: HashMap<ElementId, Node>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    next_element: u64,
    timers: BTreeMap<TimerHandle, Timer>,
    next_timer: u64,
    listeners: BTreeMap<ListenerHandle, (EventTarget, EventKind)>,
    next_listener: u64,
    focused: Option<ElementId>,
    now: f64,
    path: String,
}

impl SimHost {
    /// Creates an empty document (`html > head, body`) at `path`, clock at 0.
    #[must_use]
    pub fn new(path: &str) -> Self {
        let root = ElementId(0);
        let head = ElementId(1);
        let body = ElementId(2);
        let mut nodes = HashMap::new();
        let mut html = Node::new("html", None);
        html.children = vec![head, body];
        nodes.insert(root, html);
        nodes.insert(head, Node::new("head", Some(root)));
        nodes.insert(body, Node::new("body", Some(root)));

        Self {
            nodes,
            root,
            head,
            body,
            next_element: 3,
            timers: BTreeMap::new(),
            next_timer: 0,
            listeners: BTreeMap::new(),
            next_listener: 0,
            focused: None,
            now: 0.0,
            path: path.to_owned(),
        }
    }

    /// The document head.
    #[must_use]
    pub const fn head(&self) -> ElementId {
        self.head
    }

    /// The document body.
    #[must_use]
    pub const fn body(&self) -> ElementId {
        self.body
    }

    /// Sets a form control's value, as if the user typed it.
    pub fn set_value(&mut self, element: ElementId, value: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.value = value.to_owned();
        }
    }

    /// Creates a child element with a class and text in one call.
    pub fn append(&mut self, parent: Placement, tag: &str, class: &str, text: &str) -> Option<ElementId> {
        let element = self.create_element(parent, tag)?;
        if !class.is_empty() {
            self.add_class(element, class);
        }
        if !text.is_empty() {
            self.set_text(element, text);
        }
        Some(element)
    }

    /// Attached children of an element, in order.
    #[must_use]
    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(&element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Element that last received focus, if still attached.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused.filter(|id| self.nodes.contains_key(id))
    }

    /// Number of timers still pending.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Pending timers carrying a task that satisfies `pred`.
    #[must_use]
    pub fn timers_where(&self, pred: impl Fn(&Task) -> bool) -> usize {
        self.timers.values().filter(|t| pred(&t.task)).count()
    }

    /// Number of repeating timers still armed.
    #[must_use]
    pub fn repeating_timers(&self) -> usize {
        self.timers.values().filter(|t| t.period.is_some()).count()
    }

    /// Whether a timer handle is still pending.
    #[must_use]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether anything is subscribed to `kind` on `target`.
    #[must_use]
    pub fn is_listening(&self, target: EventTarget, kind: EventKind) -> bool {
        self.listeners.values().any(|&(t, k)| t == target && k == kind)
    }

    /// Pops the earliest timer due at or before `deadline`, moving the
    /// clock to its due time. Repeating timers are re-armed.
    pub fn next_due(&mut self, deadline: f64) -> Option<Task> {
        let (&handle, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= deadline)
            .min_by(|(ha, a), (hb, b)| a.due.total_cmp(&b.due).then(ha.cmp(hb)))?;
        let timer = *timer;

        self.now = self.now.max(timer.due);
        match timer.period {
            Some(period) => {
                if let Some(entry) = self.timers.get_mut(&handle) {
                    entry.due += f64::from(period);
                }
            }
            None => {
                self.timers.remove(&handle);
            }
        }
        Some(timer.task)
    }

    /// Moves the clock forward by `ms`, handing every task that falls due
    /// to `on_task` in firing order. Tasks scheduled by `on_task` fire in
    /// the same call if they fall inside the window.
    pub fn advance(&mut self, ms: u32, mut on_task: impl FnMut(&mut Self, Task)) {
        let deadline = self.now + f64::from(ms);
        while let Some(task) = self.next_due(deadline) {
            on_task(self, task);
        }
        self.now = deadline;
    }

    fn parent_and_index(&self, placement: Placement) -> Option<(ElementId, usize)> {
        match placement {
            Placement::Head => Some((self.head, self.nodes.get(&self.head)?.children.len())),
            Placement::Body => Some((self.body, self.nodes.get(&self.body)?.children.len())),
            Placement::Child(parent) => Some((parent, self.nodes.get(&parent)?.children.len())),
            Placement::After(sibling) => {
                let parent = self.nodes.get(&sibling)?.parent?;
                let position = self.nodes.get(&parent)?.children.iter().position(|&c| c == sibling)?;
                Some((parent, position + 1))
            }
        }
    }

    fn collect(&self, from: ElementId, selector: Selector<'_>, out: &mut Vec<ElementId>) {
        let Some(node) = self.nodes.get(&from) else {
            return;
        };
        for &child in &node.children {
            if self.nodes.get(&child).is_some_and(|n| n.matches(selector)) {
                out.push(child);
            }
            self.collect(child, selector, out);
        }
    }

    fn gather_text(&self, element: ElementId, out: &mut String) {
        if let Some(node) = self.nodes.get(&element) {
            out.push_str(&node.text);
            for &child in &node.children {
                self.gather_text(child, out);
            }
        }
    }

    fn drop_subtree(&mut self, element: ElementId) {
        if let Some(node) = self.nodes.remove(&element) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Surface for SimHost {
    fn create_element(&mut self, placement: Placement, tag: &str) -> Option<ElementId> {
        let (parent, index) = self.parent_and_index(placement)?;
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.nodes.insert(id, Node::new(tag, Some(parent)));
        self.nodes.get_mut(&parent)?.children.insert(index, id);
        Some(id)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            if name == "value" && node.is_form_control() {
                node.value = value.to_owned();
            }
            node.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.get(&element)?.attributes.get(name).cloned()
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.styles.insert(property.to_owned(), value.to_owned());
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.nodes.get(&element)?.styles.get(property).cloned()
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.text = text.to_owned();
        }
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.nodes.get(&element)?;
        let mut out = String::new();
        self.gather_text(element, &mut out);
        Some(out)
    }

    fn value(&self, element: ElementId) -> Option<String> {
        let node = self.nodes.get(&element)?;
        node.is_form_control().then(|| node.value.clone())
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_owned());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(&element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn focus(&mut self, element: ElementId) {
        if self.nodes.contains_key(&element) {
            self.focused = Some(element);
        }
    }

    fn remove(&mut self, element: ElementId) -> bool {
        if element == self.root || element == self.head || element == self.body {
            return false;
        }
        let Some(parent) = self.nodes.get(&element).map(|node| node.parent) else {
            return false;
        };
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|&c| c != element);
        }
        self.drop_subtree(element);
        true
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.nodes.contains_key(&element)
    }

    fn query_all(&mut self, scope: Option<ElementId>, selector: Selector<'_>) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect(scope.unwrap_or(self.root), selector, &mut out);
        out
    }

    fn location_path(&self) -> String {
        self.path.clone()
    }
}

impl EventSource for SimHost {
    fn listen(&mut self, target: EventTarget, kind: EventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(handle, (target, kind));
        handle
    }

    fn unlisten(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle);
    }
}

impl Clock for SimHost {
    fn now_ms(&self) -> f64 {
        self.now
    }
}

impl Scheduler for SimHost {
    fn schedule(&mut self, delay_ms: u32, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        let due = self.now + f64::from(delay_ms);
        self.timers.insert(handle, Timer { due, period: None, task });
        handle
    }

    fn schedule_repeating(&mut self, period_ms: u32, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        let period = period_ms.max(1);
        let due = self.now + f64::from(period);
        self.timers.insert(
            handle,
            Timer {
                due,
                period: Some(period),
                task,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}
