use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;

use crate::errors::RemoteServiceError;

/// Invoked with no payload whenever a subscribed table changes
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

type Teardown = Box<dyn FnOnce() + Send>;
type LostHook = Box<dyn FnOnce(RemoteServiceError) + Send>;

#[derive(Default)]
struct Loss {
    error: Option<RemoteServiceError>,
    hook: Option<LostHook>,
}

/// Disposer for a change subscription.
///
/// `dispose` closes the channel on its first call and is a no-op afterwards.
/// Once disposed, callbacks gated through this subscription never fire again.
/// Dropping an undisposed subscription disposes it.
pub struct Subscription {
    label: String,
    active: Arc<AtomicBool>,
    teardown: Mutex<Option<Teardown>>,
    loss: Arc<Mutex<Loss>>,
}

/// Held by the channel task to report that the service ended the channel
#[derive(Clone)]
pub struct LossNotifier {
    active: Arc<AtomicBool>,
    loss: Arc<Mutex<Loss>>,
}

impl LossNotifier {
    /// Deactivates the subscription and hands `error` to the `on_lost` hook.
    ///
    /// Ignored once the subscription is disposed or already lost.
    pub fn lost(&self, error: RemoteServiceError) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        let hook = match self.loss.lock() {
            Ok(mut loss) => match loss.hook.take() {
                Some(hook) => Some(hook),
                None => {
                    loss.error = Some(error.clone());
                    None
                }
            },
            Err(_) => None,
        };
        if let Some(hook) = hook {
            hook(error);
        }
    }
}

impl Subscription {
    pub fn new(label: impl Into<String>, teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            label: label.into(),
            active: Arc::new(AtomicBool::new(true)),
            teardown: Mutex::new(Some(Box::new(teardown))),
            loss: Arc::new(Mutex::new(Loss::default())),
        }
    }

    pub fn loss_notifier(&self) -> LossNotifier {
        LossNotifier {
            active: Arc::clone(&self.active),
            loss: Arc::clone(&self.loss),
        }
    }

    /// Runs `hook` once if the service ends the channel, immediately if it already has
    pub fn on_lost(&self, hook: impl FnOnce(RemoteServiceError) + Send + 'static) {
        let already = match self.loss.lock() {
            Ok(mut loss) => match loss.error.take() {
                Some(error) => Some(error),
                None => {
                    loss.hook = Some(Box::new(hook));
                    return;
                }
            },
            Err(_) => return,
        };
        if let Some(error) = already {
            hook(error);
        }
    }

    /// Wraps `on_change` so it stops firing once this subscription is disposed
    pub fn gate(&self, on_change: ChangeCallback) -> ChangeCallback {
        let active = Arc::clone(&self.active);
        Arc::new(move || {
            if active.load(Ordering::SeqCst) {
                on_change();
            }
        })
    }

    pub fn dispose(&self) {
        self.active.store(false, Ordering::SeqCst);
        let teardown = self.teardown.lock().ok().and_then(|mut slot| slot.take());
        if let Some(teardown) = teardown {
            debug!("Disposing subscription {}", self.label);
            teardown();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}
