//! Shared, rebindable indirection to an observable.
//!
//! A [`Handle<T>`] lets downstream nodes subscribe to a logical *slot*
//! rather than to a specific value: swapping the underlying object is
//! indistinguishable from the object changing.  All clones of a handle
//! share one inner [`Link`], which
//!
//! * holds the current target (possibly absent),
//! * optionally observes that target, forwarding its notifications, and
//! * is itself observable, broadcasting each time it is rebound.
//!
//! [`RelinkableHandle<T>`] is the write-capable view exposing
//! [`link_to`][RelinkableHandle::link_to]; it dereferences to `Handle<T>`
//! for reading.  The split is plain composition, not inheritance: both are
//! thin wrappers around the same reference-counted link.

use std::ops::Deref;
use std::sync::{Arc, Mutex, Weak};

use crate::errors::Result;
use crate::patterns::observable::{Observable, ObservableImpl, Observer};

struct LinkState<T: ?Sized> {
    target: Option<Arc<T>>,
    is_observer: bool,
}

/// The shared inner record of a [`Handle`].
///
/// Both observer (of its pointee) and observable (to the handle's readers).
pub struct Link<T: ?Sized> {
    state: Mutex<LinkState<T>>,
    observable: ObservableImpl,
}

impl<T: ?Sized> Link<T> {
    fn lock(&self) -> std::sync::MutexGuard<'_, LinkState<T>> {
        self.state.lock().expect("handle link mutex poisoned")
    }
}

impl<T: Observable + Send + Sync + ?Sized + 'static> Link<T> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(LinkState {
                target: None,
                is_observer: false,
            }),
            observable: ObservableImpl::new(),
        })
    }

    /// Rebind the link.
    ///
    /// No-op when the target (compared by identity) and the observation mode
    /// are both unchanged; otherwise deregisters from the old target,
    /// installs the new one, registers if requested, and publishes one
    /// notification from the link itself.
    fn relink(this: &Arc<Self>, target: Option<Arc<T>>, register_as_observer: bool) {
        let weak = Arc::downgrade(this) as Weak<dyn Observer>;
        {
            let mut state = this.lock();
            let same_target = match (&state.target, &target) {
                (Some(old), Some(new)) => Arc::ptr_eq(old, new),
                (None, None) => true,
                _ => false,
            };
            if same_target && state.is_observer == register_as_observer {
                return;
            }
            if state.is_observer {
                if let Some(old) = &state.target {
                    old.unregister_observer(&weak);
                }
            }
            state.target = target;
            state.is_observer = register_as_observer;
            if register_as_observer {
                if let Some(new) = &state.target {
                    new.register_observer(weak);
                }
            }
        }
        this.observable.notify();
    }
}

impl<T: ?Sized> Observer for Link<T>
where
    T: Send + Sync,
{
    fn update(&self) -> Result<()> {
        // A notification from a stale, already-replaced target carries no
        // information; only forward while a target is present.
        let bound = self.lock().target.is_some();
        if bound {
            self.observable.notify();
        }
        Ok(())
    }
}

/// A shared handle to an observable of type `T`.
///
/// Copies are cheap and all of them see the same link: rebinding through a
/// [`RelinkableHandle`] clone is visible to every reader.  The handle is
/// itself observable — subscribers hear about rebinds and, when the link
/// observes its target, about target changes too.
pub struct Handle<T: ?Sized> {
    link: Arc<Link<T>>,
}

impl<T: Observable + Send + Sync + ?Sized + 'static> Handle<T> {
    /// Create a handle bound to `target`, observing it.
    pub fn new(target: Arc<T>) -> Self {
        Self::with_observer(target, true)
    }

    /// Create a handle bound to `target`, observing it only if
    /// `register_as_observer` is set.
    ///
    /// Leaving the mode off is an optimization for targets that never
    /// change; rebinding is still propagated.
    pub fn with_observer(target: Arc<T>, register_as_observer: bool) -> Self {
        let link = Link::new();
        Link::relink(&link, Some(target), register_as_observer);
        Self { link }
    }

    /// Create a handle bound to nothing.
    pub fn empty() -> Self {
        Self { link: Link::new() }
    }

    /// `true` if no target is currently bound.
    pub fn is_empty(&self) -> bool {
        self.link.lock().target.is_none()
    }

    /// The currently bound target, or `None` for an empty handle.
    pub fn current_link(&self) -> Option<Arc<T>> {
        self.link.lock().target.clone()
    }

    /// Whether the link is registered as observer of its target.
    pub fn observes_target(&self) -> bool {
        self.link.lock().is_observer
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized> Observable for Handle<T> {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.link.observable.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.link.observable.unregister(observer);
    }

    fn unregister_all_observers(&self) {
        self.link.observable.unregister_all();
    }

    fn observer_count(&self) -> usize {
        self.link.observable.count()
    }

    fn observers(&self) -> Vec<Weak<dyn Observer>> {
        self.link.observable.snapshot()
    }

    fn notify_observers(&self) {
        self.link.observable.notify();
    }
}

/// The write-capable view of a [`Handle`].
pub struct RelinkableHandle<T: ?Sized> {
    handle: Handle<T>,
}

impl<T: Observable + Send + Sync + ?Sized + 'static> RelinkableHandle<T> {
    /// Create a relinkable handle bound to `target`, observing it.
    pub fn new(target: Arc<T>) -> Self {
        Self {
            handle: Handle::new(target),
        }
    }

    /// Create a relinkable handle bound to nothing.
    pub fn empty() -> Self {
        Self {
            handle: Handle::empty(),
        }
    }

    /// Rebind every copy of this handle to `target`.
    pub fn link_to(&self, target: Arc<T>, register_as_observer: bool) {
        Link::relink(&self.handle.link, Some(target), register_as_observer);
    }

    /// Detach every copy of this handle from its target.
    pub fn unlink(&self) {
        Link::relink(&self.handle.link, None, false);
    }

    /// A read-only copy sharing the same link.
    pub fn as_handle(&self) -> Handle<T> {
        self.handle.clone()
    }
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T: ?Sized> Deref for RelinkableHandle<T> {
    type Target = Handle<T>;

    fn deref(&self) -> &Handle<T> {
        &self.handle
    }
}
