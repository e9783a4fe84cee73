//! # System Color-Scheme Signal
//!
//! The platform's "prefers dark" preference, observed with change
//! notification. [`SystemThemeSignal`] is the in-process implementation: a
//! shell, a desktop bridge or a test flips it and every subscriber hears
//! about it.
//!
//! ## Subscription Lifetime
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subscribe(listener) ──► ThemeSubscription                              │
//! │                              │                                          │
//! │          set_prefers_dark()  │  listener(scheme) while alive            │
//! │                              ▼                                          │
//! │                     drop / unsubscribe() ──► listener removed           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Subscriptions only hold a weak reference to the signal, so a forgotten
//! subscription never keeps the signal alive.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use storefront_core::ColorScheme;
use tracing::debug;

/// Callback invoked with the new system scheme.
pub type ColorSchemeListener = Arc<dyn Fn(ColorScheme) + Send + Sync>;

/// A source of the system color-scheme preference.
pub trait ColorSchemeSource: Send + Sync {
    /// The preference right now.
    fn current(&self) -> ColorScheme;

    /// Registers `listener` until the returned subscription is dropped.
    fn subscribe(&self, listener: ColorSchemeListener) -> ThemeSubscription;
}

/// Deregisters a listener on drop.
#[must_use = "dropping the subscription deregisters the listener"]
pub struct ThemeSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ThemeSubscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        ThemeSubscription {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release, for sources that never change.
    pub fn detached() -> Self {
        ThemeSubscription { release: None }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for ThemeSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ThemeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Default)]
struct SignalInner {
    current: ColorScheme,
    next_id: u64,
    listeners: BTreeMap<u64, ColorSchemeListener>,
}

/// In-process, settable system theme signal. Clones share state.
#[derive(Clone, Default)]
pub struct SystemThemeSignal {
    inner: Arc<Mutex<SignalInner>>,
}

impl SystemThemeSignal {
    pub fn new(initial: ColorScheme) -> Self {
        SystemThemeSignal {
            inner: Arc::new(Mutex::new(SignalInner {
                current: initial,
                ..SignalInner::default()
            })),
        }
    }

    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        Self::new(ColorScheme::from_prefers_dark(prefers_dark))
    }

    /// Updates the signal, notifying listeners if the scheme changed.
    pub fn set(&self, scheme: ColorScheme) {
        let listeners: Vec<ColorSchemeListener> = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.current == scheme {
                return;
            }
            inner.current = scheme;
            inner.listeners.values().cloned().collect()
        };

        debug!(scheme = %scheme, listeners = listeners.len(), "System theme changed");
        for listener in listeners {
            listener(scheme);
        }
    }

    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.set(ColorScheme::from_prefers_dark(prefers_dark));
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

impl ColorSchemeSource for SystemThemeSignal {
    fn current(&self) -> ColorScheme {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    fn subscribe(&self, listener: ColorSchemeListener) -> ThemeSubscription {
        let id = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, listener);
            id
        };

        let weak: Weak<Mutex<SignalInner>> = Arc::downgrade(&self.inner);
        ThemeSubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .remove(&id);
            }
        })
    }
}

impl fmt::Debug for SystemThemeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemThemeSignal")
            .field("current", &self.current())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<ColorScheme>>>, ColorSchemeListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: ColorSchemeListener =
            Arc::new(move |scheme: ColorScheme| sink.lock().unwrap().push(scheme));
        (seen, listener)
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let signal = SystemThemeSignal::from_prefers_dark(false);
        let (seen, listener) = recorder();
        let _subscription = signal.subscribe(listener);

        signal.set_prefers_dark(false);
        signal.set_prefers_dark(true);
        signal.set(ColorScheme::Dark);

        assert_eq!(*seen.lock().unwrap(), vec![ColorScheme::Dark]);
        assert_eq!(signal.current(), ColorScheme::Dark);
    }

    #[test]
    fn test_drop_deregisters() {
        let signal = SystemThemeSignal::default();
        let (seen, listener) = recorder();

        let subscription = signal.subscribe(listener);
        assert_eq!(signal.listener_count(), 1);
        subscription.unsubscribe();
        assert_eq!(signal.listener_count(), 0);

        signal.set(ColorScheme::Dark);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subscription_outliving_signal() {
        let (_, listener) = recorder();
        let subscription = {
            let signal = SystemThemeSignal::default();
            signal.subscribe(listener)
        };
        drop(subscription);
    }
}
