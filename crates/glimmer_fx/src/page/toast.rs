//! Transient notifications.

use crate::host::{ensure_container, ElementId, Host, Placement, Task};

/// Id of the toast stack container.
pub const TOAST_STACK_ID: &str = "toast-stack";

/// Severity of a toast, mapped to a `toast-<level>` class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Something worked.
    Success,
    /// Neutral information.
    Info,
    /// Needs attention.
    Warning,
    /// Something was refused.
    Danger,
}

impl ToastLevel {
    /// Class suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Shows toasts and removes them after a fixed time.
#[derive(Debug)]
pub struct Toasts {
    duration_ms: u32,
    live: Vec<ElementId>,
}

impl Toasts {
    /// Creates an empty toast stack.
    #[must_use]
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            live: Vec::new(),
        }
    }

    /// Toasts on screen.
    #[must_use]
    pub fn live(&self) -> &[ElementId] {
        &self.live
    }

    /// Shows `message` and schedules its removal.
    pub fn show<H: Host + ?Sized>(&mut self, host: &mut H, message: &str, level: ToastLevel) -> Option<ElementId> {
        let stack = ensure_container(host, TOAST_STACK_ID, "toast-stack")?;
        let toast = host.create_element(Placement::Child(stack), "div")?;
        host.add_class(toast, "toast");
        host.add_class(toast, &format!("toast-{}", level.as_str()));
        host.set_attribute(toast, "role", "alert");
        host.set_text(toast, message);
        host.schedule(self.duration_ms, Task::ToastExpire(toast));
        self.live.push(toast);
        Some(toast)
    }

    /// A toast timed out.
    pub fn on_expire<H: Host + ?Sized>(&mut self, host: &mut H, toast: ElementId) {
        host.remove(toast);
        self.live.retain(|&t| t != toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{SimHost, Surface};

    #[test]
    fn test_toast_shown_then_removed() {
        let mut host = SimHost::new("/");
        let mut toasts = Toasts::new(3000);
        let toast = toasts.show(&mut host, "Saved", ToastLevel::Success).unwrap();
        assert!(host.has_class(toast, "toast-success"));
        assert_eq!(host.text_content(toast).as_deref(), Some("Saved"));

        host.advance(3000, |host, task| {
            if let Task::ToastExpire(el) = task {
                toasts.on_expire(host, el);
            }
        });
        assert!(!host.is_attached(toast));
        assert!(toasts.live().is_empty());
    }
}
