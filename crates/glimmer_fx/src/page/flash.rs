//! Flash messages: auto-dismiss after a delay, or at once via the close
//! control. Either path runs the same slide-out and then detaches.

use crate::animation::{Easing, Transition};
use crate::config::PageConfig;
use crate::host::{ElementId, EventKind, EventTarget, Host, ListenerHandle, Selector, Task, TimerHandle};

/// Class of a flash message.
pub const FLASH_CLASS: &str = "flash-message";
/// Class of its close control.
pub const FLASH_CLOSE_CLASS: &str = "flash-close";

#[derive(Debug)]
struct FlashEntry {
    message: ElementId,
    close: Option<ElementId>,
    listener: Option<ListenerHandle>,
    auto_dismiss: Option<TimerHandle>,
    dismissing: bool,
}

/// Tracks every flash message on the page.
#[derive(Debug)]
pub struct FlashMessages {
    dismiss_after_ms: u32,
    transition_ms: u32,
    entries: Vec<FlashEntry>,
}

impl FlashMessages {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            dismiss_after_ms: config.flash_dismiss_ms,
            transition_ms: config.flash_transition_ms,
            entries: Vec::new(),
        }
    }

    /// Picks up every flash message not yet tracked: wires its close
    /// control and arms its auto-dismiss timer. Returns how many were new.
    pub fn init<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        let messages = host.query_all(None, Selector::Class(FLASH_CLASS));
        let mut added = 0;
        for message in messages {
            if self.entries.iter().any(|e| e.message == message) {
                continue;
            }
            let close = host.query_first(Some(message), Selector::Class(FLASH_CLOSE_CLASS));
            let listener = close.map(|c| host.listen(EventTarget::Element(c), EventKind::Click));
            let auto_dismiss = Some(host.schedule(self.dismiss_after_ms, Task::FlashDismiss(message)));
            self.entries.push(FlashEntry {
                message,
                close,
                listener,
                auto_dismiss,
                dismissing: false,
            });
            added += 1;
        }
        added
    }

    /// Number of messages still tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending auto-dismiss timer of a message.
    #[must_use]
    pub fn auto_dismiss_timer(&self, message: ElementId) -> Option<TimerHandle> {
        self.entries
            .iter()
            .find(|e| e.message == message)
            .and_then(|e| e.auto_dismiss)
    }

    /// Message whose close control is `control`.
    #[must_use]
    pub fn message_for_close(&self, control: ElementId) -> Option<ElementId> {
        self.entries
            .iter()
            .find(|e| e.close == Some(control))
            .map(|e| e.message)
    }

    /// Close control clicked. Returns `true` if it belonged to a message.
    pub fn on_close_click<H: Host + ?Sized>(&mut self, host: &mut H, control: ElementId) -> bool {
        match self.message_for_close(control) {
            Some(message) => {
                self.dismiss(host, message);
                true
            }
            None => false,
        }
    }

    /// Auto-dismiss timer fired.
    pub fn on_dismiss_timer<H: Host + ?Sized>(&mut self, host: &mut H, message: ElementId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.message == message) {
            entry.auto_dismiss = None;
        }
        self.dismiss(host, message);
    }

    /// Starts the slide-out and cancels the auto-dismiss timer. Returns
    /// `false` if the message is unknown or already leaving.
    pub fn dismiss<H: Host + ?Sized>(&mut self, host: &mut H, message: ElementId) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.message == message) else {
            return false;
        };
        if entry.dismissing {
            return false;
        }
        entry.dismissing = true;
        if let Some(timer) = entry.auto_dismiss.take() {
            host.cancel(timer);
        }

        if host.is_attached(message) {
            let transition = Transition::all(self.transition_ms, Easing::Ease);
            host.set_style(message, "transition", &transition.to_css());
            host.set_style(message, "opacity", "0");
            host.set_style(message, "transform", "translateX(100%)");
        }
        host.schedule(self.transition_ms, Task::FlashDetach(message));
        true
    }

    /// Slide-out finished: detach and forget the message.
    pub fn on_detach<H: Host + ?Sized>(&mut self, host: &mut H, message: ElementId) {
        host.remove(message);
        if let Some(index) = self.entries.iter().position(|e| e.message == message) {
            let entry = self.entries.swap_remove(index);
            if let Some(listener) = entry.listener {
                host.unlisten(listener);
            }
            if let Some(timer) = entry.auto_dismiss {
                host.cancel(timer);
            }
        }
    }
}
