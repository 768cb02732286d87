// Thread-safe toast delivery

use std::collections::VecDeque;
use std::thread::{self, ThreadId};

use log::warn;
use parking_lot::Mutex;

/// A transient notification shown over the control-center window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub timeout_secs: u32,
}

impl Toast {
    pub const DEFAULT_TIMEOUT_SECS: u32 = 2;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Host-side rendering of a toast, implemented by the UI shell.
pub trait ToastSurface: Send {
    fn present(&mut self, toast: Toast) -> anyhow::Result<()>;
}

type Waker = Box<dyn Fn() + Send + Sync>;

/// Cross-thread toast dispatcher bound to the UI thread.
///
/// Construct it on the UI thread. Calls from that thread present
/// immediately; calls from worker threads enqueue the toast and trip the
/// waker so the host event loop can run [`UiNotifier::dispatch_pending`].
/// Surface failures are logged, never propagated.
pub struct UiNotifier {
    ui_thread: ThreadId,
    surface: Mutex<Option<Box<dyn ToastSurface>>>,
    pending: Mutex<VecDeque<Toast>>,
    waker: Mutex<Option<Waker>>,
}

impl UiNotifier {
    /// Bind the notifier to the calling thread as the UI thread.
    pub fn new() -> Self {
        Self {
            ui_thread: thread::current().id(),
            surface: Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
            waker: Mutex::new(None),
        }
    }

    /// Attach the surface toasts are presented on.
    pub fn attach_surface(&self, surface: Box<dyn ToastSurface>) {
        *self.surface.lock() = Some(surface);
    }

    /// Detach the surface; subsequent toasts become no-ops.
    pub fn detach_surface(&self) -> Option<Box<dyn ToastSurface>> {
        self.surface.lock().take()
    }

    /// Install a callback invoked after a cross-thread enqueue, typically to
    /// schedule an idle dispatch on the host event loop.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.lock() = Some(Box::new(waker));
    }

    /// Show a toast with the default timeout.
    pub fn toast(&self, message: &str) {
        self.toast_with_timeout(message, Toast::DEFAULT_TIMEOUT_SECS);
    }

    /// Show a toast, safe to call from any thread.
    ///
    /// No-op when no surface is attached.
    pub fn toast_with_timeout(&self, message: &str, timeout_secs: u32) {
        if self.surface.lock().is_none() {
            return;
        }

        let toast = Toast {
            message: message.to_string(),
            timeout_secs,
        };

        if thread::current().id() == self.ui_thread {
            self.present_now(toast);
        } else {
            self.pending.lock().push_back(toast);
            if let Some(waker) = self.waker.lock().as_ref() {
                waker();
            }
        }
    }

    /// Present queued toasts; must run on the UI thread.
    ///
    /// Returns the number presented. Called from any other thread it logs
    /// and does nothing.
    pub fn dispatch_pending(&self) -> usize {
        if thread::current().id() != self.ui_thread {
            warn!("dispatch_pending called off the UI thread; ignoring");
            return 0;
        }

        let mut presented = 0;
        loop {
            let Some(toast) = self.pending.lock().pop_front() else {
                break;
            };
            self.present_now(toast);
            presented += 1;
        }
        presented
    }

    fn present_now(&self, toast: Toast) {
        let mut surface = self.surface.lock();
        if let Some(surface) = surface.as_mut() {
            if let Err(e) = surface.present(toast) {
                warn!("Failed to show toast: {}", e);
            }
        }
    }
}

impl Default for UiNotifier {
    fn default() -> Self {
        Self::new()
    }
}
