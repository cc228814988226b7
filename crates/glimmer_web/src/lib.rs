//! # Glimmer Web
//!
//! Runs [`glimmer_fx`] inside a browser page.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  host page JS ──▶ exports (start_rain, on_page_load…) │
//! │                        │                              │
//! │            thread-local PageRuntime + WebHost         │
//! │                        │                              │
//! │   web-sys DOM  ◀── Surface      gloo ◀── Scheduler    │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Only [`logging`] builds off the wasm target; the host and the exports
//! need a browser.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod logging;

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
pub mod host;

#[cfg(target_arch = "wasm32")]
pub use bindings::{enable_pointer_effects, on_page_load, start, start_rain, stop_rain, CONFIG_ELEMENT_ID};
#[cfg(target_arch = "wasm32")]
pub use host::WebHost;
