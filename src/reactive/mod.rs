//! Observable values for the presentation layer.
//!
//! These types are single-threaded (`Rc`-based): they live with the UI
//! component that owns them and are torn down with [`ReactiveCell::clear`].

mod cell;
mod channel;

pub use cell::{CellOptions, ReactiveCell, Subscription};
pub use channel::{ReadOnlyChannel, ValueChannel};
