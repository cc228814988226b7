//! Page utilities: flash messages, required-field validation, card search
//! and the toasts they raise.

pub mod flash;
pub mod form;
pub mod route;
pub mod search;
pub mod toast;

pub use flash::FlashMessages;
pub use form::{FormValidator, SubmitOutcome};
pub use route::is_home_page;
pub use search::SearchFilter;
pub use toast::{ToastLevel, Toasts};
