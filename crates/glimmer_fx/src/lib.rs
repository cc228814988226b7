//! # Glimmer FX
//!
//! Decorative and convenience effects for a content site:
//! - Cursor trail and click ripple
//! - Ambient rain on the home page
//! - Flash message dismissal, required-field validation, card search
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       PAGE RUNTIME                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  Host events → handle_event → component → Surface calls  │
//! │  Timer fires → fire(Task)   → component → Surface calls  │
//! │        ↑                                      ↓          │
//! │   SimHost (tests)  /  WebHost (glimmer_web, web-sys)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Components never hold callbacks. They schedule [`host::Task`] values
//! and the runtime routes each fired task back to its owner, so the whole
//! crate runs unchanged against the deterministic [`host::SimHost`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod animation;
pub mod config;
pub mod effects;
pub mod error;
pub mod host;
pub mod page;
pub mod runtime;
pub mod style;
pub mod stylesheet;

pub use config::{EffectsConfig, PageConfig, RainConfig, RippleConfig, TrailConfig};
pub use effects::{PointerEffects, RainGenerator, RainState, RippleEffect, TrailEffect};
pub use error::{GlimmerError, GlimmerResult};
pub use host::{Event, EventOutcome, Host, SimHost, Task};
pub use page::{FlashMessages, FormValidator, SearchFilter, SubmitOutcome, ToastLevel, Toasts};
pub use runtime::PageRuntime;
