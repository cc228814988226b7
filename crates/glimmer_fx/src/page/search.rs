//! Substring search over the post cards.
//!
//! Cards never change while the page is open, so each card's searchable
//! text is built once at init. Showing and hiding are two-step (style now,
//! finish after a delay); each card has at most one pending step, and a
//! newer decision cancels the older one.

use std::collections::HashMap;

use crate::animation::{Easing, Transition};
use crate::config::PageConfig;
use crate::host::{
    ElementId, EventKind, EventTarget, Host, ListenerHandle, Selector, Surface, Task, TimerHandle,
};

/// Id of the search box.
pub const SEARCH_INPUT_ID: &str = "searchInput";
/// Class of a searchable card.
pub const CARD_CLASS: &str = "post-card";
/// Attribute carrying precomputed searchable text.
pub const SEARCH_CONTENT_ATTR: &str = "data-search-content";
/// Card parts searched when no precomputed text is present.
pub const CARD_FIELDS: [&str; 3] = ["post-title", "post-content", "post-author"];

/// A searchable card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Its element.
    pub element: ElementId,
    /// Lowercased searchable text.
    pub text: String,
    /// Whether the last decision was to show it.
    pub shown: bool,
}

/// Builds a card's lowercased searchable text: `data-search-content` when
/// present, otherwise title, content and author joined by spaces.
pub fn searchable_text<H: Surface + ?Sized>(host: &mut H, card: ElementId) -> String {
    if let Some(text) = host.attribute(card, SEARCH_CONTENT_ATTR) {
        return text.to_lowercase();
    }
    CARD_FIELDS
        .iter()
        .map(|&class| {
            host.query_first(Some(card), Selector::Class(class))
                .and_then(|part| host.text_content(part))
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes raw input into a query.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Filters cards as the user types.
#[derive(Debug)]
pub struct SearchFilter {
    reveal_delay_ms: u32,
    collapse_delay_ms: u32,
    input: Option<ElementId>,
    listener: Option<ListenerHandle>,
    cards: Vec<Card>,
    pending: HashMap<ElementId, TimerHandle>,
}

impl SearchFilter {
    /// Creates an inactive filter.
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            reveal_delay_ms: config.card_reveal_delay_ms,
            collapse_delay_ms: config.card_collapse_delay_ms,
            input: None,
            listener: None,
            cards: Vec::new(),
            pending: HashMap::new(),
        }
    }

    /// Finds the search box and the cards. Stays inactive, without a
    /// listener, when either is missing. Returns whether it is active.
    pub fn init<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.is_active() {
            return true;
        }
        let Some(input) = host.query_first(None, Selector::Id(SEARCH_INPUT_ID)) else {
            return false;
        };
        let elements = host.query_all(None, Selector::Class(CARD_CLASS));
        if elements.is_empty() {
            return false;
        }

        let transition = Transition::all(self.collapse_delay_ms, Easing::Ease).to_css();
        self.cards = elements
            .into_iter()
            .map(|element| {
                host.set_style(element, "transition", &transition);
                Card {
                    element,
                    text: searchable_text(host, element),
                    shown: true,
                }
            })
            .collect();
        self.input = Some(input);
        self.listener = Some(host.listen(EventTarget::Element(input), EventKind::Input));
        tracing::debug!(cards = self.cards.len(), "search filter active");
        true
    }

    /// Whether the filter is listening.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// The search box, once found.
    #[must_use]
    pub const fn input(&self) -> Option<ElementId> {
        self.input
    }

    /// All cards with their current decision.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards currently decided as shown.
    pub fn shown(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.cards.iter().filter(|c| c.shown).map(|c| c.element)
    }

    /// Applies a new query. Empty shows every card. Returns how many cards
    /// match.
    pub fn on_input<H: Host + ?Sized>(&mut self, host: &mut H, raw: &str) -> usize {
        let query = normalize_query(raw);
        let mut matched = 0;
        for index in 0..self.cards.len() {
            let hit = self.cards[index].text.contains(query.as_str());
            let element = self.cards[index].element;
            self.cards[index].shown = hit;
            if let Some(stale) = self.pending.remove(&element) {
                host.cancel(stale);
            }
            let timer = if hit {
                matched += 1;
                host.set_style(element, "display", "block");
                host.schedule(self.reveal_delay_ms, Task::CardReveal(element))
            } else {
                host.set_style(element, "opacity", "0");
                host.set_style(element, "transform", "translateY(20px)");
                host.schedule(self.collapse_delay_ms, Task::CardCollapse(element))
            };
            self.pending.insert(element, timer);
        }
        matched
    }

    /// Second step of showing a card.
    pub fn on_reveal<H: Host + ?Sized>(&mut self, host: &mut H, card: ElementId) {
        self.pending.remove(&card);
        host.set_style(card, "opacity", "1");
        host.set_style(card, "transform", "translateY(0)");
    }

    /// Second step of hiding a card.
    pub fn on_collapse<H: Host + ?Sized>(&mut self, host: &mut H, card: ElementId) {
        self.pending.remove(&card);
        host.set_style(card, "display", "none");
    }
}
