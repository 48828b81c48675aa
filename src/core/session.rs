//! Signed-in user context
//!
//! `SessionContext` is created once at startup around an identity provider
//! and handed to every page that needs the current user. Pages subscribe
//! when they are built and the returned `Subscription` unsubscribes when it
//! is dropped with the page.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, IdentityProvider};

/// The identity exposed by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

type Listener = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    current: Option<Identity>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to the current session
#[derive(Clone)]
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
    inner: Arc<Mutex<Inner>>,
}

impl SessionContext {
    /// Create a context seeded with the provider's current identity
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let current = provider.current();
        Self {
            provider,
            inner: Arc::new(Mutex::new(Inner {
                current,
                ..Inner::default()
            })),
        }
    }

    pub fn current(&self) -> Option<Identity> {
        lock(&self.inner).current.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        lock(&self.inner).current.is_some()
    }

    /// Register `listener`; it is called right away with the current identity
    /// and again on every sign-in or sign-out until the subscription drops.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let (id, current) = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener.clone()));
            (id, inner.current.clone())
        };
        listener(current.as_ref());
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe with a local copy of the identity that the caller can read each frame
    pub fn watch<F>(&self, on_change: F) -> SessionWatch
    where
        F: Fn() + Send + Sync + 'static,
    {
        let slot = Arc::new(Mutex::new(None));
        let writer = slot.clone();
        let subscription = self.subscribe(move |identity| {
            *writer.lock().unwrap_or_else(PoisonError::into_inner) = identity.cloned();
            on_change();
        });
        SessionWatch {
            slot,
            _subscription: subscription,
        }
    }

    pub fn sign_in(
        &self,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<Identity, BackendError> {
        let identity = self.provider.sign_in(display_name, avatar_url)?;
        tracing::info!("Signed in as {} ({})", identity.display_name, identity.id);
        self.set(Some(identity.clone()));
        Ok(identity)
    }

    pub fn sign_out(&self) -> Result<(), BackendError> {
        self.provider.sign_out()?;
        tracing::info!("Signed out");
        self.set(None);
        Ok(())
    }

    /// Number of live subscriptions
    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    fn set(&self, identity: Option<Identity>) {
        let listeners: Vec<Listener> = {
            let mut inner = lock(&self.inner);
            inner.current = identity.clone();
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(identity.as_ref());
        }
    }
}

/// Keeps a listener registered; unsubscribes on drop
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// A page-local view of the session identity
pub struct SessionWatch {
    slot: Arc<Mutex<Option<Identity>>>,
    _subscription: Subscription,
}

impl SessionWatch {
    pub fn identity(&self) -> Option<Identity> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeProvider {
        current: Mutex<Option<Identity>>,
    }

    impl IdentityProvider for FakeProvider {
        fn current(&self) -> Option<Identity> {
            self.current.lock().unwrap().clone()
        }

        fn sign_in(&self, display_name: &str, avatar_url: Option<&str>) -> Result<Identity, BackendError> {
            let identity = Identity {
                id: "id-1".to_string(),
                display_name: display_name.to_string(),
                avatar_url: avatar_url.map(str::to_string),
            };
            *self.current.lock().unwrap() = Some(identity.clone());
            Ok(identity)
        }

        fn sign_out(&self) -> Result<(), BackendError> {
            *self.current.lock().unwrap() = None;
            Ok(())
        }
    }

    #[test]
    fn test_subscribe_notifies_until_dropped() {
        let session = SessionContext::new(Arc::new(FakeProvider::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = session.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.listener_count(), 1);

        session.sign_in("Ada", None).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(sub);
        assert_eq!(session.listener_count(), 0);
        session.sign_out().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_watch_tracks_identity() {
        let session = SessionContext::new(Arc::new(FakeProvider::default()));
        let watch = session.watch(|| {});
        assert!(watch.identity().is_none());

        session.sign_in("Grace", Some("https://example.com/g.png")).unwrap();
        assert_eq!(watch.identity().map(|i| i.display_name), Some("Grace".to_string()));
        assert!(session.is_signed_in());

        session.sign_out().unwrap();
        assert!(watch.identity().is_none());
    }

    #[test]
    fn test_listener_may_read_session() {
        let session = SessionContext::new(Arc::new(FakeProvider::default()));
        let inner = session.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let _sub = session.subscribe(move |_| {
            *sink.lock().unwrap() = inner.current().map(|i| i.id);
        });
        session.sign_in("Linus", None).unwrap();
        assert_eq!(seen.lock().unwrap().clone(), Some("id-1".to_string()));
    }
}
