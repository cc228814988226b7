//! Required-field validation on submit.

use std::collections::HashMap;

use crate::config::PageConfig;
use crate::host::{ElementId, EventKind, EventTarget, Host, ListenerHandle, Placement, Selector};
use crate::page::toast::{ToastLevel, Toasts};

/// Class added to a field that failed validation.
pub const INVALID_CLASS: &str = "is-invalid";
/// Class of the annotation inserted after a failed field.
pub const FEEDBACK_CLASS: &str = "invalid-feedback";

/// Result of validating a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every required field is filled; let the form submit.
    Allowed,
    /// Submission must be blocked.
    Blocked {
        /// Failing fields in document order.
        invalid: Vec<ElementId>,
    },
}

impl SubmitOutcome {
    /// Whether the default submit action must be prevented.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Validates every form on the page.
#[derive(Debug)]
pub struct FormValidator {
    required_message: String,
    blocked_message: String,
    forms: Vec<(ElementId, ListenerHandle)>,
    annotations: HashMap<ElementId, ElementId>,
}

impl FormValidator {
    /// Creates a validator with no forms attached.
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            required_message: config.required_message.clone(),
            blocked_message: config.blocked_message.clone(),
            forms: Vec::new(),
            annotations: HashMap::new(),
        }
    }

    /// Subscribes to submit on every form not yet watched.
    pub fn init<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut added = 0;
        for form in host.query_all(None, Selector::Tag("form")) {
            if self.watches(form) {
                continue;
            }
            let listener = host.listen(EventTarget::Element(form), EventKind::Submit);
            self.forms.push((form, listener));
            added += 1;
        }
        added
    }

    /// Whether `form` is being validated.
    #[must_use]
    pub fn watches(&self, form: ElementId) -> bool {
        self.forms.iter().any(|&(f, _)| f == form)
    }

    /// Whether `field` currently carries an error annotation.
    #[must_use]
    pub fn is_annotated(&self, field: ElementId) -> bool {
        self.annotations.contains_key(&field)
    }

    /// Checks every `[required]` field of `form`. Failing fields are
    /// annotated and the first one is focused; passing fields are cleared.
    /// A blocked submission also raises a danger toast.
    pub fn validate<H: Host + ?Sized>(&mut self, host: &mut H, toasts: &mut Toasts, form: ElementId) -> SubmitOutcome {
        let mut invalid = Vec::new();
        for field in host.query_all(Some(form), Selector::Attribute("required")) {
            let filled = host
                .value(field)
                .is_some_and(|value| !value.trim().is_empty());
            if filled {
                self.clear(host, field);
            } else {
                self.annotate(host, field);
                invalid.push(field);
            }
        }

        if invalid.is_empty() {
            return SubmitOutcome::Allowed;
        }
        host.focus(invalid[0]);
        toasts.show(host, &self.blocked_message, ToastLevel::Danger);
        tracing::debug!(invalid = invalid.len(), "form submission blocked");
        SubmitOutcome::Blocked { invalid }
    }

    fn annotate<H: Host + ?Sized>(&mut self, host: &mut H, field: ElementId) {
        host.add_class(field, INVALID_CLASS);
        if let Some(&existing) = self.annotations.get(&field) {
            if host.is_attached(existing) {
                return;
            }
        }
        if let Some(feedback) = host.create_element(Placement::After(field), "div") {
            host.add_class(feedback, FEEDBACK_CLASS);
            host.set_text(feedback, &self.required_message);
            self.annotations.insert(field, feedback);
        }
    }

    fn clear<H: Host + ?Sized>(&mut self, host: &mut H, field: ElementId) {
        host.remove_class(field, INVALID_CLASS);
        if let Some(feedback) = self.annotations.remove(&field) {
            host.remove(feedback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{SimHost, Surface};

    struct Page {
        host: SimHost,
        form: ElementId,
        name: ElementId,
        email: ElementId,
    }

    fn page() -> Page {
        let mut host = SimHost::new("/register");
        let form = host.append(Placement::Body, "form", "", "").unwrap();
        let name = host.append(Placement::Child(form), "input", "", "").unwrap();
        host.set_attribute(name, "required", "");
        let email = host.append(Placement::Child(form), "input", "", "").unwrap();
        host.set_attribute(email, "required", "");
        host.append(Placement::Child(form), "input", "optional", "").unwrap();
        Page { host, form, name, email }
    }

    #[test]
    fn test_empty_required_field_blocks_and_is_annotated() {
        let Page { mut host, form, name, email } = page();
        let config = PageConfig::default();
        let mut validator = FormValidator::new(&config);
        let mut toasts = Toasts::new(config.toast_duration_ms);
        host.set_value(email, "a@b.c");

        let outcome = validator.validate(&mut host, &mut toasts, form);
        assert_eq!(outcome, SubmitOutcome::Blocked { invalid: vec![name] });
        assert!(host.has_class(name, INVALID_CLASS));
        assert!(!host.has_class(email, INVALID_CLASS));
        assert!(validator.is_annotated(name));
        assert!(!validator.is_annotated(email));
        assert_eq!(host.focused(), Some(name));
        assert_eq!(toasts.live().len(), 1);
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let Page { mut host, form, name, email } = page();
        let config = PageConfig::default();
        let mut validator = FormValidator::new(&config);
        let mut toasts = Toasts::new(config.toast_duration_ms);
        host.set_value(name, "   ");
        host.set_value(email, "\t");

        let outcome = validator.validate(&mut host, &mut toasts, form);
        assert_eq!(outcome, SubmitOutcome::Blocked { invalid: vec![name, email] });
        assert_eq!(host.focused(), Some(name));
    }

    #[test]
    fn test_fixing_fields_clears_annotations() {
        let Page { mut host, form, name, email } = page();
        let config = PageConfig::default();
        let mut validator = FormValidator::new(&config);
        let mut toasts = Toasts::new(config.toast_duration_ms);

        assert!(validator.validate(&mut host, &mut toasts, form).is_blocked());
        assert!(validator.validate(&mut host, &mut toasts, form).is_blocked());
        assert_eq!(host.query_all(Some(form), Selector::Class(FEEDBACK_CLASS)).len(), 2);

        host.set_value(name, "Ada");
        host.set_value(email, "ada@example.com");
        assert_eq!(validator.validate(&mut host, &mut toasts, form), SubmitOutcome::Allowed);
        assert!(!host.has_class(name, INVALID_CLASS));
        assert!(host.query_all(Some(form), Selector::Class(FEEDBACK_CLASS)).is_empty());
    }

    #[test]
    fn test_init_watches_each_form_once() {
        let Page { mut host, form, .. } = page();
        let mut validator = FormValidator::new(&PageConfig::default());
        assert_eq!(validator.init(&mut host), 1);
        assert_eq!(validator.init(&mut host), 0);
        assert!(validator.watches(form));
        assert!(host.is_listening(EventTarget::Element(form), EventKind::Submit));
    }
}
