//! Multicast channels holding a latest value.

use std::fmt;

use super::cell::{CellOptions, ReactiveCell, Subscription};

/// A writable multicast channel: a [`ReactiveCell`] under the usual
/// `next`/`value` names, with a read-only view for consumers.
///
/// ```rust
/// use fieldwork::ValueChannel;
///
/// let channel = ValueChannel::new(Vec::<String>::new());
/// let view = channel.as_read_only();
///
/// channel.next(vec!["email".to_string()]);
/// assert_eq!(view.value(), vec!["email"]);
/// ```
pub struct ValueChannel<T> {
    cell: ReactiveCell<T>,
}

impl<T: Clone + 'static> ValueChannel<T> {
    pub fn new(initial: T) -> Self {
        Self {
            cell: ReactiveCell::new(initial),
        }
    }

    pub fn with_options(initial: T, options: CellOptions) -> Self {
        Self {
            cell: ReactiveCell::with_options(initial, options),
        }
    }

    /// Publishes `value` to every subscriber.
    pub fn next(&self, value: T) {
        self.cell.set(value);
    }

    pub fn value(&self) -> T {
        self.cell.get()
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.cell.update(f);
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.cell.subscribe(listener)
    }

    /// Drops every subscriber.
    pub fn clear(&self) {
        self.cell.clear();
    }

    /// Returns a view that can observe the channel but not publish to it.
    pub fn as_read_only(&self) -> ReadOnlyChannel<T> {
        ReadOnlyChannel {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Clone for ValueChannel<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueChannel").field(&self.cell).finish()
    }
}

/// Observe-only view of a [`ValueChannel`].
pub struct ReadOnlyChannel<T> {
    cell: ReactiveCell<T>,
}

impl<T: Clone + 'static> ReadOnlyChannel<T> {
    pub fn value(&self) -> T {
        self.cell.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.cell.subscribe(listener)
    }
}

impl<T> Clone for ReadOnlyChannel<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnlyChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnlyChannel").field(&self.cell).finish()
    }
}
