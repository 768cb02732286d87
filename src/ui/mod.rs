// UI-facing helpers

pub mod notify;

pub use self::notify::{Toast, ToastSurface, UiNotifier};
