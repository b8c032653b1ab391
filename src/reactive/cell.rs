//! Single-threaded observable value with replay-on-subscribe.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

const DEFAULT_MAX_CASCADE: usize = 100;

/// Options for a [`ReactiveCell`].
#[derive(Debug, Clone)]
pub struct CellOptions {
    max_cascade: usize,
}

impl CellOptions {
    pub fn new() -> Self {
        Self {
            max_cascade: DEFAULT_MAX_CASCADE,
        }
    }

    /// Sets how many notification passes one outermost `set` may trigger,
    /// counting passes queued by subscribers that `set` again. Clamped to 1.
    pub fn with_max_cascade(mut self, passes: usize) -> Self {
        self.max_cascade = passes.max(1);
        self
    }

    pub fn max_cascade(&self) -> usize {
        self.max_cascade
    }
}

impl Default for CellOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct Inner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
    notifying: bool,
    pending: VecDeque<T>,
    options: CellOptions,
}

impl<T> Inner<T> {
    fn is_live(&self, id: u64) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// A value plus the set of callbacks watching it.
///
/// Subscribing replays the current value at once, then every `set` runs one
/// notification pass over the subscribers in subscription order. Nothing is
/// batched or deduplicated.
///
/// A subscriber may call `set` on the same cell. That value is stored right
/// away and its pass is queued behind the running one, so passes never nest.
/// A cascade of queued passes stops after [`CellOptions::max_cascade`].
///
/// Cloning yields another handle to the same cell.
///
/// # Example
///
/// ```rust
/// use fieldwork::ReactiveCell;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let cell = ReactiveCell::new(1);
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&seen);
/// let sub = cell.subscribe(move |v| sink.borrow_mut().push(*v));
/// cell.set(2);
/// sub.unsubscribe();
/// cell.set(3);
///
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// assert_eq!(cell.get(), 3);
/// ```
pub struct ReactiveCell<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: Clone + 'static> ReactiveCell<T> {
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, CellOptions::default())
    }

    pub fn with_options(initial: T, options: CellOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                listeners: Vec::new(),
                next_id: 0,
                notifying: false,
                pending: VecDeque::new(),
                options,
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value.clone();
            if inner.notifying {
                inner.pending.push_back(value);
                return;
            }
            inner.notifying = true;
        }
        self.run_passes(value);
    }

    /// Sets the value to `f(current)`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let current = self.get();
        self.set(f(&current));
    }

    /// Calls `listener` with the current value, then on every change until
    /// the returned token is unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let listener: Listener<T> = Rc::new(listener);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::clone(&listener)));
            (id, inner.value.clone())
        };

        listener(&current);

        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Drops every subscriber.
    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn run_passes(&self, first: T) {
        let _guard = PassGuard { inner: &self.inner };
        let max = self.inner.borrow().options.max_cascade;
        let mut value = first;
        let mut passes = 0;

        loop {
            self.notify(&value);
            passes += 1;

            let mut inner = self.inner.borrow_mut();
            let Some(next) = inner.pending.pop_front() else {
                return;
            };
            if passes >= max {
                let dropped = inner.pending.len() + 1;
                tracing::warn!(passes, dropped, "notification cascade truncated");
                return;
            }
            value = next;
        }
    }

    fn notify(&self, value: &T) {
        // Borrow only while copying the listener list; callbacks may touch the cell.
        let snapshot: Vec<(u64, Listener<T>)> = self.inner.borrow().listeners.clone();
        tracing::trace!(listeners = snapshot.len(), "notification pass");

        for (id, listener) in snapshot {
            if self.inner.borrow().is_live(id) {
                listener(value);
            }
        }
    }
}

/// Ends the running cascade however `run_passes` exits, so a listener that
/// panics cannot leave the cell stuck queueing instead of notifying.
struct PassGuard<'a, T> {
    inner: &'a RefCell<Inner<T>>,
}

impl<T> Drop for PassGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.notifying = false;
            inner.pending.clear();
        }
    }
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("ReactiveCell")
                .field("value", &inner.value)
                .field("subscribers", &inner.listeners.len())
                .finish(),
            Err(_) => f.debug_struct("ReactiveCell").finish_non_exhaustive(),
        }
    }
}

/// Token returned by `subscribe`.
///
/// Dropping the token keeps the subscription alive; call
/// [`unsubscribe`](Self::unsubscribe) to end it.
pub struct Subscription {
    cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: RefCell::new(Some(Box::new(cancel))),
        }
    }

    /// Stops further notifications. Calling it again does nothing.
    pub fn unsubscribe(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.borrow().is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
